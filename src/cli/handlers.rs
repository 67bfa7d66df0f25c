//! Subcommand handlers
//!
//! Each handler runs one subcommand against a [`GuardianService`] and returns
//! the process exit code.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use super::commands::{DetectArgs, GenerateArgs};
use super::output::{detection_summary, generation_summary, OutputFormat, OutputFormatter};
use crate::config::GuardianConfig;
use crate::service::{GenerateRequest, GuardianService, StackSelection};
use crate::settings::SettingsDocument;

fn project_dir(path: &Option<PathBuf>) -> PathBuf {
    path.clone().unwrap_or_else(|| PathBuf::from("."))
}

pub fn handle_detect(service: &GuardianService, args: &DetectArgs, quiet: bool) -> i32 {
    let dir = project_dir(&args.path);
    debug!("Project directory: {}", dir.display());

    let detections = match service.detect(&dir) {
        Ok(detections) => detections,
        Err(e) => {
            error!("Detection failed: {}", e);
            eprintln!("{}", e.help_message());
            return 1;
        }
    };
    let tools = service.detector().tool_availability(&detections);

    let format = OutputFormat::from(args.format);
    let rendered = match OutputFormatter::new(format).format_detections(&detections, &tools) {
        Ok(rendered) => rendered,
        Err(e) => {
            error!("{:#}", e);
            return 1;
        }
    };
    println!("{}", rendered);

    if format == OutputFormat::Json && !quiet {
        eprint!("\n{}", detection_summary(&detections, &tools));
    }

    0
}

pub fn handle_generate(
    service: &GuardianService,
    args: &GenerateArgs,
    config: &GuardianConfig,
    quiet: bool,
) -> i32 {
    let dir = project_dir(&args.path);
    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(|| config.settings_path_for(&dir));

    let selection = match &args.stacks {
        Some(stacks) if !args.auto => StackSelection::Explicit(stacks.clone()),
        _ => StackSelection::Auto,
    };
    info!(
        "Generating permissions ({}) into {}",
        match &selection {
            StackSelection::Auto => "auto-detect",
            StackSelection::Explicit(_) => "explicit stacks",
        },
        settings_path.display()
    );

    let request = GenerateRequest {
        project_dir: dir,
        selection,
        settings_path,
        dry_run: args.dry_run,
    };

    let outcome = match service.generate(&request) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Generation failed: {}", e);
            eprintln!("{}", e.help_message());
            return 1;
        }
    };

    if args.dry_run {
        if let Err(e) = print_document(&outcome.document, &outcome.settings_path) {
            error!("{:#}", e);
            return 1;
        }
    }

    if !quiet {
        eprint!("\n{}", generation_summary(&outcome));
    }

    0
}

fn print_document(document: &SettingsDocument, path: &Path) -> Result<()> {
    let text = document
        .to_json_pretty()
        .with_context(|| format!("Failed to render merged settings for {}", path.display()))?;
    print!("{}", text);
    Ok(())
}
