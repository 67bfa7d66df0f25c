//! Detect, synthesize, merge, save
//!
//! `GuardianService` is the thin orchestration layer the CLI drives:
//! 1. Validates the project directory and detects stacks (auto mode)
//! 2. Synthesizes a policy for the selected stacks
//! 3. Merges it into the persisted settings
//! 4. Saves the result unless asked for a dry run

use crate::fs::{FileSystem, RealFileSystem};
use crate::permissions::{PermissionPolicy, PermissionSynthesizer};
use crate::settings::{SettingsDocument, SettingsError, SettingsStore};
use crate::stack::{DetectError, Detections, StackDetector};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("No stack names given")]
    NoStacks,
}

impl ServiceError {
    /// A user-facing message with a hint on how to fix the problem.
    pub fn help_message(&self) -> String {
        match self {
            ServiceError::Detect(DetectError::DirectoryNotFound(path)) => format!(
                "Error: Directory '{}' does not exist\n\n\
                 Help: Pass the project root, or run from inside it.",
                path.display()
            ),
            ServiceError::Detect(DetectError::NotADirectory(path)) => format!(
                "Error: '{}' is not a directory\n\n\
                 Help: Pass the project root directory, not a file inside it.",
                path.display()
            ),
            ServiceError::Settings(e) => format!(
                "Error: {}\n\n\
                 Help: Check that the settings location is writable, or choose \
                 another one with --settings.",
                e
            ),
            ServiceError::NoStacks => "Error: --stacks requires a comma-separated list\n\n\
                 Example: permission-guardian generate --stacks node,python,docker"
                .to_string(),
        }
    }
}

/// Which stacks to generate permissions for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackSelection {
    /// Detect stacks in the project directory and use every one found.
    Auto,
    /// Use exactly these names; no detection runs.
    Explicit(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub project_dir: PathBuf,
    pub selection: StackSelection,
    pub settings_path: PathBuf,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    /// Stacks permissions were generated for, in processing order.
    pub stacks: Vec<String>,
    /// Detection results when the selection was automatic.
    pub detections: Option<Detections>,
    /// Freshly synthesized rules, before merging.
    pub generated: PermissionPolicy,
    /// The merged settings document.
    pub document: SettingsDocument,
    /// Rules the merge added to the persisted policy.
    pub added: usize,
    /// Where the settings live (written unless `dry_run`).
    pub settings_path: PathBuf,
    pub written: bool,
}

pub struct GuardianService {
    detector: StackDetector,
    synthesizer: PermissionSynthesizer,
    fs: Arc<dyn FileSystem>,
}

impl GuardianService {
    pub fn new(
        detector: StackDetector,
        synthesizer: PermissionSynthesizer,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            detector,
            synthesizer,
            fs,
        }
    }

    /// Built-in tables against the real file system and `PATH`.
    pub fn with_defaults() -> Self {
        Self::new(
            StackDetector::with_defaults(),
            PermissionSynthesizer::with_defaults(),
            Arc::new(RealFileSystem::new()),
        )
    }

    pub fn detector(&self) -> &StackDetector {
        &self.detector
    }

    pub fn detect(&self, dir: &Path) -> Result<Detections, ServiceError> {
        Ok(self.detector.detect(dir)?)
    }

    pub fn generate(&self, request: &GenerateRequest) -> Result<GenerateOutcome, ServiceError> {
        let (stacks, detections) = match &request.selection {
            StackSelection::Auto => {
                let detections = self.detector.detect(&request.project_dir)?;
                let stacks: Vec<String> = detections.keys().cloned().collect();
                info!("Auto-detected stacks: {}", stacks.join(", "));
                (stacks, Some(detections))
            }
            StackSelection::Explicit(names) => {
                let stacks: Vec<String> = names
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
                if stacks.is_empty() {
                    return Err(ServiceError::NoStacks);
                }
                (stacks, None)
            }
        };

        let generated = self.synthesizer.synthesize(&stacks, detections.as_ref());

        let store = SettingsStore::new(self.fs.clone(), &request.settings_path);
        let mut document = store.load()?;
        if document.was_malformed() {
            warn!(
                "Existing settings at {} were unreadable and will be replaced",
                request.settings_path.display()
            );
        }

        let mut merged = document.policy().clone();
        let added = merged.extend_from(&generated);
        document.set_policy(merged);
        info!("Merge added {} new rule(s)", added);

        let written = if request.dry_run {
            false
        } else {
            store.save(&document)?;
            true
        };

        Ok(GenerateOutcome {
            stacks,
            detections,
            generated,
            document,
            added,
            settings_path: request.settings_path.clone(),
            written,
        })
    }
}
