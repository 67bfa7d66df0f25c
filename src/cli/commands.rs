use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Generate coding-agent permission rules from a project's tech stack
#[derive(Parser, Debug)]
#[command(
    name = "permission-guardian",
    about = "Generate coding-agent permission rules from a project's tech stack",
    version,
    long_about = "permission-guardian looks for well-known indicator files (package.json, \
                  Cargo.toml, Dockerfile, ...) to work out which tech stacks a project uses, \
                  checks which optional shell tools are installed, and merges matching \
                  allow/ask/deny rules into the agent's settings file without disturbing \
                  existing rules."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress summaries and non-error logs"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Detect tech stacks and shell tools in a project",
        long_about = "Scans a project directory for stack indicator files and checks which \
                      optional shell tools are on PATH.\n\n\
                      Examples:\n  \
                      permission-guardian detect\n  \
                      permission-guardian detect /path/to/project\n  \
                      permission-guardian detect --format human"
    )]
    Detect(DetectArgs),

    #[command(
        about = "Generate permissions and merge them into the settings file",
        long_about = "Builds allow/ask/deny rules for the given or detected stacks and merges \
                      them into the settings file. Existing rules and unrelated settings are \
                      kept; running twice changes nothing.\n\n\
                      Examples:\n  \
                      permission-guardian generate --auto\n  \
                      permission-guardian generate --stacks node,docker,git\n  \
                      permission-guardian generate --auto --dry-run"
    )]
    Generate(GenerateArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    #[arg(
        value_name = "PATH",
        help = "Project directory (defaults to current directory)"
    )]
    pub path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
#[command(group(ArgGroup::new("mode").required(true).args(["auto", "stacks"])))]
pub struct GenerateArgs {
    #[arg(
        value_name = "PATH",
        help = "Project directory (defaults to current directory)"
    )]
    pub path: Option<PathBuf>,

    #[arg(long, help = "Detect stacks in PATH and generate rules for them")]
    pub auto: bool,

    #[arg(
        long,
        value_name = "STACKS",
        value_delimiter = ',',
        help = "Comma-separated stack names, e.g. node,python,docker"
    )]
    pub stacks: Option<Vec<String>>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Settings file (defaults to .claude/settings.json under PATH)"
    )]
    pub settings: Option<PathBuf>,

    #[arg(long, help = "Print the merged settings instead of writing them")]
    pub dry_run: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
