//! thumbcache - command-line front end for the thumbnail cache.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thumbcache::{
    cache_name, Cli, Command, FlushArgs, FlushReport, OutputFormat, SizeArgs, Thumbnail,
    ThumbnailService,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Err(e) = cli.validate() {
        eprintln!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    match &cli.command {
        // Naming never creates the cache directory
        Command::Name(args) => run_name(&cli.cache_dir, args, cli.format),
        Command::Make(args) => with_service(&cli, |service| run_make(service, args, cli.format)),
        Command::Flush(args) => with_service(&cli, |service| run_flush(service, args, cli.format)),
    }
}

fn with_service(cli: &Cli, run: impl FnOnce(&ThumbnailService) -> ExitCode) -> ExitCode {
    match ThumbnailService::with_default_processor(cli.thumb_config()) {
        Ok(service) => run(&service),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Make Command
// =============================================================================

fn run_make(service: &ThumbnailService, args: &SizeArgs, format: OutputFormat) -> ExitCode {
    match service.make(&args.source, args.width, args.height) {
        Ok(thumb) => {
            print_thumbnail(&thumb, format);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_thumbnail(thumb: &Thumbnail, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", thumb.path.display()),
        OutputFormat::Json => print_json(thumb),
    }
}

// =============================================================================
// Name Command
// =============================================================================

fn run_name(cache_dir: &Path, args: &SizeArgs, format: OutputFormat) -> ExitCode {
    match cache_name(&args.source, args.width, args.height) {
        Ok(name) => {
            match format {
                OutputFormat::Text => println!("{}", name),
                OutputFormat::Json => print_json(&serde_json::json!({
                    "name": name,
                    "path": cache_dir.join(&name),
                })),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Flush Command
// =============================================================================

fn run_flush(service: &ThumbnailService, args: &FlushArgs, format: OutputFormat) -> ExitCode {
    let report = service.flush(args.source.as_deref());

    match format {
        OutputFormat::Text => print_flush_summary(&report),
        OutputFormat::Json => print_json(&report),
    }

    // Deletion failures are reported, not fatal
    ExitCode::SUCCESS
}

fn print_flush_summary(report: &FlushReport) {
    println!(
        "Removed {} file(s), skipped {}, failed {}",
        report.removed.len(),
        report.skipped,
        report.failed.len()
    );
    for failure in &report.failed {
        println!("  {}: {}", failure.path.display(), failure.message);
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to serialize output: {}", e),
    }
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so stdout only carries command output.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "thumbcache=debug"
    } else {
        "thumbcache=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
