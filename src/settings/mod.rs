//! Persisted settings
//!
//! The policy lives under the `permissions` key of a JSON settings file,
//! as `allow`/`ask`/`deny` string arrays.

pub mod document;
pub mod store;

pub use document::SettingsDocument;
pub use store::{SettingsError, SettingsStore};

/// Settings location relative to the project directory.
pub const DEFAULT_SETTINGS_PATH: &str = ".claude/settings.json";
