//! hm init - Create the hm root, config file and database

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot};
use crate::config::Config;
use crate::error::{HmError, Result};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Initialize globally (~/.local/share/hm) instead of locally (.hm/)
    #[arg(long)]
    pub global: bool,

    /// Overwrite an existing config.toml with defaults
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitReport {
    root: PathBuf,
    config_path: PathBuf,
    config_written: bool,
    schema_version: u32,
}

/// Directory `init` should create, created if missing.
pub fn prepare_root(args: &InitArgs) -> Result<PathBuf> {
    let root = if args.global {
        dirs::data_dir()
            .ok_or_else(|| HmError::MissingConfig("data directory not found".to_string()))?
            .join("hm")
    } else if let Ok(root) = std::env::var("HM_ROOT") {
        PathBuf::from(root)
    } else {
        std::env::current_dir()?.join(".hm")
    };
    std::fs::create_dir_all(&root)?;
    Ok(root)
}

pub fn run(ctx: &AppContext, args: &InitArgs) -> Result<()> {
    let config_path = ctx.config_path.clone();
    let config_written = args.force || !config_path.exists();
    if config_written {
        let rendered = toml::to_string_pretty(&Config::default())
            .map_err(|err| HmError::Config(format!("render default config: {err}")))?;
        std::fs::write(&config_path, rendered)?;
    }
    info!(target: "storage", root = %ctx.hm_root.display(), config_written, "initialized");

    let report = InitReport {
        root: ctx.hm_root.clone(),
        config_path,
        config_written,
        schema_version: ctx.db.schema_version(),
    };

    if ctx.is_robot() {
        return emit_robot(ctx.output_format, &report);
    }

    let mut layout = HumanLayout::new();
    layout.title("Initialized hm");
    layout.kv("Root", &report.root.display().to_string());
    layout.kv(
        "Config",
        &format!(
            "{}{}",
            report.config_path.display(),
            if report.config_written { "" } else { " (kept)" }
        ),
    );
    layout.kv("Schema version", &report.schema_version.to_string());
    emit_human(layout);
    Ok(())
}
