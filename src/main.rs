//! image-dims - print image dimensions read from file headers.

use clap::Parser;
use std::io::Read;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_dims::{
    config::{Cli, Command, FormatsConfig, SizeConfig},
    report::{reports_to_json, Report},
    Engine, ImageSizeError,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Size(config) => run_size(config),
        Command::Formats(config) => run_formats(config),
    }
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so they never mix with results on stdout.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "image_dims=debug"
    } else {
        "image_dims=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Size Command
// =============================================================================

fn run_size(config: SizeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let engine = config.engine();
    debug!("Policy: {:?}", engine.policy());

    let reports: Vec<Report> = if config.stdin {
        vec![Report::new("-", size_stdin(&engine))]
    } else {
        config
            .paths
            .iter()
            .map(|path| Report::new(path.display().to_string(), engine.image_size(path)))
            .collect()
    };

    if config.json {
        match reports_to_json(&reports) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize results: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        for report in &reports {
            if report.is_ok() {
                println!("{}", report.to_line());
            } else {
                eprintln!("{}", report.to_line());
            }
        }
    }

    if reports.iter().all(Report::is_ok) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Read at most the configured cap from stdin and size it as a buffer.
fn size_stdin(engine: &Engine) -> Result<image_dims::SizeResult, ImageSizeError> {
    let mut buffer = Vec::new();
    std::io::stdin()
        .lock()
        .take(engine.max_input_size() as u64)
        .read_to_end(&mut buffer)
        .map_err(|source| ImageSizeError::Io {
            path: "-".into(),
            source,
        })?;

    if buffer.is_empty() {
        return Err(ImageSizeError::EmptyInput { path: "-".into() });
    }

    engine.image_size(&buffer)
}

// =============================================================================
// Formats Command
// =============================================================================

fn run_formats(config: FormatsConfig) -> ExitCode {
    let engine = config.engine();
    let formats = engine.registered_formats();

    if config.json {
        let entries: Vec<serde_json::Value> = formats
            .iter()
            .map(|format| {
                serde_json::json!({
                    "format": format,
                    "name": format.name(),
                    "disabled": engine.policy().is_disabled(*format),
                })
            })
            .collect();

        match serde_json::to_string_pretty(&entries) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    for format in formats {
        let marker = if engine.policy().is_disabled(format) {
            " (disabled)"
        } else {
            ""
        };
        println!("{:<12}{}{}", format.as_str(), format.name(), marker);
    }

    ExitCode::SUCCESS
}
