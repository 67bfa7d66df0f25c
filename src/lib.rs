//! permission-guardian - permission rules for coding agents, derived from a
//! project's tech stack
//!
//! The library looks for indicator files to work out which stacks a project
//! uses, turns those stacks into allow/ask/deny command rules, and merges
//! the rules into a JSON settings file without reordering or dropping what
//! is already there.
//!
//! # Example Usage
//!
//! ```no_run
//! use permission_guardian::{PermissionSynthesizer, StackDetector};
//! use std::path::Path;
//!
//! let detections = StackDetector::with_defaults().detect(Path::new("."))?;
//! let stacks: Vec<&String> = detections.keys().collect();
//! let policy = PermissionSynthesizer::with_defaults().synthesize(stacks, Some(&detections));
//!
//! for rule in policy.allow() {
//!     println!("allow {}", rule);
//! }
//! # Ok::<(), permission_guardian::DetectError>(())
//! ```
//!
//! # Project Structure
//!
//! - [`stack`]: stack catalog, indicator scanning and shell-tool probing
//! - [`permissions`]: rule tables, synthesis and the order-stable merge
//! - [`settings`]: loading and saving the settings file
//! - [`service`]: the detect, synthesize, merge, save pipeline
//! - [`fs`]: file system abstraction with a real and an in-memory backend

pub mod cli;
pub mod config;
pub mod fs;
pub mod permissions;
pub mod service;
pub mod settings;
pub mod stack;
pub mod util;

pub use config::{ConfigError, GuardianConfig};
pub use permissions::{
    merge, PermissionCategory, PermissionPolicy, PermissionSource, PermissionSynthesizer,
    StackPermissionTable,
};
pub use service::{GenerateOutcome, GenerateRequest, GuardianService, ServiceError, StackSelection};
pub use settings::{SettingsDocument, SettingsError, SettingsStore};
pub use stack::{DetectError, DetectionResult, Detections, StackCatalog, StackDetector};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
