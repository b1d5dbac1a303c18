//! Maul - fuzzing wordlists from real-world URLs
//!
//! Main entry point for the command-line application.

use clap::{CommandFactory, Parser};
use std::process;

use maul::cli::Args;
use maul::processor::{Processor, ProcessorConfig};
use maul::progress::{print_banner, print_error, print_header, print_info};
use maul::source::{has_stdin, LineSource};

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if !args.quiet {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    // Nothing to read: show usage and bail
    let stdin = has_stdin();
    if !stdin && args.input.is_none() {
        let _ = Args::command().print_long_help();
        process::exit(1);
    }

    // Run the application
    if let Err(e) = run(args, stdin) {
        print_error(&format!("{}", e));

        // Print chain of errors
        let mut source = e.source();
        while let Some(err) = source {
            print_error(&format!("  Caused by: {}", err));
            source = err.source();
        }

        process::exit(1);
    }
}

fn run(args: Args, stdin: bool) -> anyhow::Result<()> {
    // Print banner unless quiet mode
    if !args.quiet {
        print_banner();
    }

    // Configuration errors stop us before any worker starts
    let config = ProcessorConfig::from_args(&args)?;
    let source = LineSource::open(args.input.as_deref(), stdin)?;

    // Show configuration
    if !args.quiet && args.verbose {
        print_config(&args, &config, stdin);
    }

    let processor = Processor::new(config);
    processor.process(source)?;

    Ok(())
}

/// Print configuration summary
fn print_config(args: &Args, config: &ProcessorConfig, stdin: bool) {
    print_header("Configuration");

    print_info(&format!("Stdin:        {}", stdin));
    print_info(&format!("File:         {:?}", args.input));
    print_info(&format!("Output dir:   {:?}", config.output_dir));
    print_info(&format!("Excluded:     {:?}", config.exclusions.suffixes()));
    print_info(&format!("Workers:      {}", config.worker_count));
    print_info(&format!("Queue size:   {}", config.queue_capacity));
    print_info(&format!("Dry run:      {}", config.dry_run));
}
