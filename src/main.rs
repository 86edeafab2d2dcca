//! hm - HeyMarketers search core CLI
//!
//! Faceted job and marketer search, SEO slug routing and landing-page
//! metadata over a local SQLite database.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use hm::Result;
use hm::app::AppContext;
use hm::cli::output::{error_code, robot_error};
use hm::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.wants_json() {
                // Robot mode: JSON error output to stdout
                let response = robot_error(error_code(&e), e.to_string());
                println!("{}", serde_json::to_string(&response).unwrap_or_default());
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = if let Commands::Init(args) = &cli.command {
        let root = hm::cli::commands::init::prepare_root(args)?;
        AppContext::open(cli, root)?
    } else {
        AppContext::from_cli(cli)?
    };
    hm::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,hm=info",
        1 => "info,hm=debug",
        2 => "debug,hm=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.wants_json() {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Human-readable logging
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
