//! pomup - safe, minimal dependency upgrades for Maven pom.xml
//!
//! Exit codes:
//! - 0: success (with or without updates)
//! - 2: partial failure, some packages could not be checked
//! - 1: fatal error (malformed manifest, edit conflict, I/O)

use clap::Parser;
use pomup::cli::CliArgs;
use pomup::config::Settings;
use pomup::logging;
use pomup::orchestrator::Orchestrator;
use pomup::output::{create_formatter, OutputConfig, Verbosity};
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let settings = Settings::load(&args)?;

    if args.verbose {
        eprintln!("pomup v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Manifest: {}", settings.manifest.display());
        if settings.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let orchestrator = Orchestrator::new(settings)?;
    let cancel = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let result = orchestrator.run_until(args.show_progress(), cancel).await?;

    let output_config =
        OutputConfig::from_cli(args.json, args.diff, args.verbose, args.quiet, args.dry_run);
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    if result.is_partial() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
