use super::catalog::{StackCatalog, StackDefinition, SHELL_TOOLS};
use super::tools::{ExecutableResolver, PathResolver};
use crate::fs::{FileSystem, RealFileSystem};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Per-stack detection results, in catalog order with `shell-tools` last.
pub type Detections = IndexMap<String, DetectionResult>;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Directory '{}' does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Path '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub detected: bool,
    /// Indicator files found, or installed tool names for `shell-tools`.
    #[serde(rename = "indicators")]
    pub matched_indicators: Vec<String>,
    pub confidence: f64,
    /// Unavailable tool names; only set for `shell-tools`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<String>>,
}

impl DetectionResult {
    /// A result for `matched` out of `total` candidates.
    pub fn from_matches(matched: Vec<String>, total: usize) -> Self {
        Self {
            detected: !matched.is_empty(),
            confidence: confidence(matched.len(), total),
            matched_indicators: matched,
            missing: None,
        }
    }

    /// Installed tool names for `shell-tools`, matched files otherwise.
    pub fn installed(&self) -> &[String] {
        &self.matched_indicators
    }

    pub fn missing(&self) -> &[String] {
        self.missing.as_deref().unwrap_or(&[])
    }

    pub fn validate(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence)
    }
}

/// Fraction of `total` that was found, rounded to two decimals.
///
/// This is indicator coverage, not a probability.
pub fn confidence(found: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let ratio = found.min(total) as f64 / total as f64;
    (ratio * 100.0).round() / 100.0
}

/// Tool availability split into installed and missing, both in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolAvailability {
    pub installed: Vec<String>,
    pub missing: Vec<String>,
}

pub struct StackDetector {
    catalog: StackCatalog,
    fs: Arc<dyn FileSystem>,
    resolver: Arc<dyn ExecutableResolver>,
}

impl StackDetector {
    pub fn new(
        catalog: StackCatalog,
        fs: Arc<dyn FileSystem>,
        resolver: Arc<dyn ExecutableResolver>,
    ) -> Self {
        Self {
            catalog,
            fs,
            resolver,
        }
    }

    /// Built-in catalog against the real file system and `PATH`.
    pub fn with_defaults() -> Self {
        Self::new(
            StackCatalog::builtin(),
            Arc::new(RealFileSystem::new()),
            Arc::new(PathResolver::new()),
        )
    }

    pub fn catalog(&self) -> &StackCatalog {
        &self.catalog
    }

    /// Scans `dir` for every stack's indicator files and probes shell tools.
    ///
    /// Stacks with no matching indicator are left out of the result, as is
    /// `shell-tools` when no tool is installed.
    pub fn detect(&self, dir: &Path) -> Result<Detections, DetectError> {
        if !self.fs.exists(dir) {
            return Err(DetectError::DirectoryNotFound(dir.to_path_buf()));
        }
        if !self.fs.is_dir(dir) {
            return Err(DetectError::NotADirectory(dir.to_path_buf()));
        }

        info!("Scanning {} for stack indicators", dir.display());

        let mut detections = Detections::new();
        for def in self.catalog.stacks() {
            if let Some(result) = self.detect_stack(dir, def) {
                debug!(
                    stack = %def.name,
                    confidence = result.confidence,
                    "Stack detected"
                );
                detections.insert(def.name.clone(), result);
            }
        }

        let tools = self.check_shell_tools();
        if !tools.installed.is_empty() {
            let mut result =
                DetectionResult::from_matches(tools.installed, self.catalog.shell_tools().len());
            result.missing = Some(tools.missing);
            detections.insert(SHELL_TOOLS.to_string(), result);
        }

        info!("Detected {} stack(s)", detections.len());
        Ok(detections)
    }

    fn detect_stack(&self, dir: &Path, def: &StackDefinition) -> Option<DetectionResult> {
        let matched: Vec<String> = def
            .indicators
            .iter()
            .filter(|indicator| {
                let present = self.fs.exists(&self.fs.join(dir, indicator));
                debug!(stack = %def.name, indicator = %indicator, present, "Probed indicator");
                present
            })
            .cloned()
            .collect();

        if matched.is_empty() {
            return None;
        }

        Some(DetectionResult::from_matches(matched, def.indicators.len()))
    }

    /// Tool availability as recorded in `detections`, without probing again.
    pub fn tool_availability(&self, detections: &Detections) -> ToolAvailability {
        match detections.get(SHELL_TOOLS) {
            Some(result) => ToolAvailability {
                installed: result.installed().to_vec(),
                missing: result.missing().to_vec(),
            },
            None => ToolAvailability {
                installed: Vec::new(),
                missing: self.catalog.shell_tools().to_vec(),
            },
        }
    }

    /// Splits the catalog's shell tools into installed and missing.
    pub fn check_shell_tools(&self) -> ToolAvailability {
        let mut availability = ToolAvailability::default();
        for tool in self.catalog.shell_tools() {
            if self.resolver.is_available(tool) {
                availability.installed.push(tool.clone());
            } else {
                availability.missing.push(tool.clone());
            }
        }
        debug!(
            installed = ?availability.installed,
            missing = ?availability.missing,
            "Checked shell tools"
        );
        availability
    }
}
