//! Output formatting
//!
//! Detection results render as JSON (machine-readable) or as a short
//! human-readable summary. Generation always gets a human summary.
//!
//! # Example
//!
//! ```
//! use permission_guardian::cli::output::{OutputFormat, OutputFormatter};
//! use permission_guardian::stack::{Detections, ToolAvailability};
//!
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter
//!     .format_detections(&Detections::new(), &ToolAvailability::default())
//!     .unwrap();
//! assert_eq!(output, "{}");
//! ```

use anyhow::{Context, Result};

use crate::service::GenerateOutcome;
use crate::stack::{Detections, ToolAvailability, SHELL_TOOLS};

const BREW_ALL_TOOLS: &str = "brew install fd ripgrep ast-grep fzf jq yq";
const LINUX_HINT: &str = "Linux: Use your package manager (apt, dnf, pacman, etc.)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// Human-readable summary
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_detections(
        &self,
        detections: &Detections,
        tools: &ToolAvailability,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => format_detections_json(detections),
            OutputFormat::Human => Ok(detection_summary(detections, tools)),
        }
    }
}

fn format_detections_json(detections: &Detections) -> Result<String> {
    serde_json::to_string_pretty(detections).context("Failed to serialize detections to JSON")
}

/// Summary of a detection run: one line per stack, then an install tip
/// when optional shell tools are missing.
pub fn detection_summary(detections: &Detections, tools: &ToolAvailability) -> String {
    let mut output = String::from("=== Tech Stack Detection Summary ===\n");

    if detections.is_empty() {
        output.push_str("No tech stacks detected in this directory.\n");
    }

    for (stack, result) in detections {
        if stack == SHELL_TOOLS {
            output.push_str(&format!(
                "\u{2713} {}: {} installed\n",
                stack,
                result.installed().join(", ")
            ));
            if !result.missing().is_empty() {
                output.push_str(&format!(
                    "  Optional tools not installed: {}\n",
                    result.missing().join(", ")
                ));
            }
        } else {
            output.push_str(&format!(
                "\u{2713} {}: {}\n",
                stack,
                result.matched_indicators.join(", ")
            ));
        }
    }

    if !tools.missing.is_empty() {
        if tools.installed.is_empty() {
            output.push_str("\nTip: Install modern shell tools for better productivity:\n");
            output.push_str(&format!("   macOS: {}\n", BREW_ALL_TOOLS));
            output.push_str(&format!("   {}\n", LINUX_HINT));
        } else {
            output.push_str(&format!(
                "\nTip: {} optional shell tools not installed: {}\n",
                tools.missing.len(),
                tools.missing.join(", ")
            ));
        }
    }

    output
}

/// Summary of a generation run: where the rules went, which stacks they came
/// from, and the final rules per category.
pub fn generation_summary(outcome: &GenerateOutcome) -> String {
    let mut output = String::new();

    if outcome.written {
        output.push_str(&format!(
            "\u{2713} Permissions updated in {}\n",
            outcome.settings_path.display()
        ));
    } else {
        output.push_str(&format!(
            "Dry run: {} was not modified\n",
            outcome.settings_path.display()
        ));
    }

    if outcome.stacks.is_empty() {
        output.push_str("\nNo stacks detected; no permissions generated.\n");
    } else {
        output.push_str(&format!(
            "\nGenerated permissions for: {}\n",
            outcome.stacks.join(", ")
        ));
    }
    output.push_str(&format!("New rules added: {}\n", outcome.added));

    let policy = outcome.document.policy();
    for category in policy.non_empty_categories() {
        let rules = policy.rules(category);
        output.push_str(&format!("\n{}:\n", category.as_str().to_uppercase()));
        for rule in rules {
            output.push_str(&format!("  - {}\n", rule));
        }
    }

    let missing = outcome
        .detections
        .as_ref()
        .and_then(|d| d.get(SHELL_TOOLS))
        .map(|result| result.missing())
        .unwrap_or_default();
    if !missing.is_empty() {
        output.push_str(&format!(
            "\nOptional shell tools not installed: {}\n",
            missing.join(", ")
        ));
        output.push_str("   Install them for better productivity:\n");
        output.push_str(&format!("   macOS: brew install {}\n", missing.join(" ")));
        output.push_str(&format!("   {}\n", LINUX_HINT));
    }

    output
}
