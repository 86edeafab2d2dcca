//! Command-line interface

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::RobotConfig;
use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "hm", version, about = "HeyMarketers search core")]
pub struct Cli {
    /// Machine-readable JSON output
    #[arg(long, global = true, env = "HM_ROBOT")]
    pub robot: bool,

    /// Explicit output format (overrides --robot)
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Silence all logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file to use instead of the global and project files
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (defaults to <root>/hm.db)
    #[arg(long, global = true, env = "HM_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Output format after `--format`, `--robot` and the `[robot]` config.
    #[must_use]
    pub fn output_format(&self, robot: &RobotConfig) -> OutputFormat {
        match self.format {
            Some(format) => format,
            None if self.robot => OutputFormat::from_robot_config(&robot.format),
            None => OutputFormat::Human,
        }
    }

    /// Whether errors should be reported as JSON.
    #[must_use]
    pub fn wants_json(&self) -> bool {
        self.robot || self.format.is_some_and(|format| format != OutputFormat::Human)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the hm root, config file and database
    Init(commands::init::InitArgs),

    /// Load facets, companies, jobs and marketers from a JSON file
    Seed(commands::seed::SeedArgs),

    /// Search active job listings
    Jobs(commands::jobs::JobsArgs),

    /// Search marketer profiles
    Marketers(commands::marketers::MarketersArgs),

    /// Resolve an SEO landing-page path
    Resolve(commands::resolve::ResolveArgs),

    /// Check whether a marketer profile slug is available
    CheckSlug(commands::check_slug::CheckSlugArgs),
}
