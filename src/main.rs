use permission_guardian::cli::commands::{CliArgs, Commands};
use permission_guardian::cli::handlers::{handle_detect, handle_generate};
use permission_guardian::config::GuardianConfig;
use permission_guardian::util::{init_logging, parse_level, LoggingConfig};
use permission_guardian::{GuardianService, VERSION};

use clap::Parser;
use tracing::{debug, error, Level};

fn main() {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version come through here too
            let code = if e.use_stderr() { 1 } else { 0 };
            if let Err(io_err) = e.print() {
                eprintln!("Failed to print usage: {}", io_err);
            }
            std::process::exit(code);
        }
    };

    let mut config = GuardianConfig::default();
    if let Some(level) = &args.log_level {
        config.log_level = level.to_lowercase();
    }

    init_logging_from_args(&args, &config);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    debug!("permission-guardian v{} starting", VERSION);
    debug!("Arguments: {:?}", args);
    debug!("{}", config);

    let service = GuardianService::with_defaults();
    let exit_code = match &args.command {
        Commands::Detect(detect_args) => handle_detect(&service, detect_args, args.quiet),
        Commands::Generate(generate_args) => {
            handle_generate(&service, generate_args, &config, args.quiet)
        }
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs, config: &GuardianConfig) {
    let mut logging = if args.log_level.is_some() {
        LoggingConfig::with_level(parse_level(&config.log_level).unwrap_or(Level::INFO))
    } else if args.verbose {
        LoggingConfig::development()
    } else if args.quiet {
        LoggingConfig::with_level(Level::ERROR)
    } else {
        LoggingConfig::with_level(parse_level(&config.log_level).unwrap_or(Level::INFO))
    };
    logging.use_json = config.log_json;

    init_logging(logging);
}
