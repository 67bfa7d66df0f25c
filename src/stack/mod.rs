//! Technology stack detection
//!
//! A stack is detected when at least one of its indicator files exists in the
//! scanned directory. Each result carries the matched indicators and a
//! coverage score (matched / total, two decimals). Optional shell utilities are
//! reported as the `shell-tools` pseudo-stack, resolved through an
//! [`ExecutableResolver`] instead of the file system.

pub mod catalog;
pub mod detector;
pub mod tools;

pub use catalog::{CatalogError, StackCatalog, StackDefinition, SHELL_TOOLS};
pub use detector::{
    confidence, DetectError, DetectionResult, Detections, StackDetector, ToolAvailability,
};
pub use tools::{ExecutableResolver, PathResolver, StaticResolver};
