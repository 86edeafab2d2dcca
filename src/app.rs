use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::Cli;
use crate::cli::output::OutputFormat;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{HmError, Result};
use crate::facets::DimensionRegistry;
use crate::routing::{ReservedPaths, SlugResolver};
use crate::storage::Database;

pub struct AppContext {
    pub hm_root: PathBuf,
    /// `--config` when given, otherwise `<root>/config.toml`.
    pub config_path: PathBuf,
    pub config: Config,
    pub db: Arc<Database>,
    pub registry: DimensionRegistry<Arc<Database>>,
    pub reserved: ReservedPaths,
    pub clock: Box<dyn Clock>,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Self::open(cli, Self::find_hm_root()?)
    }

    /// Context rooted at an explicit directory.
    pub fn open(cli: &Cli, hm_root: PathBuf) -> Result<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| default_config_path(&hm_root));
        let config = Config::load(cli.config.as_deref(), &hm_root)?;

        let db_path = cli
            .db
            .clone()
            .or_else(|| config.database.path.clone())
            .unwrap_or_else(|| hm_root.join("hm.db"));
        let db = Arc::new(Database::open(&db_path)?);
        let registry = DimensionRegistry::from_config(Arc::clone(&db), &config.registry);
        let reserved = ReservedPaths::from_config(&config.routing);

        let output_format = cli.output_format(&config.robot);

        Ok(Self {
            hm_root,
            config_path,
            config,
            db,
            registry,
            reserved,
            clock: Box::new(SystemClock),
            output_format,
        })
    }

    pub const fn is_robot(&self) -> bool {
        !matches!(self.output_format, OutputFormat::Human)
    }

    pub const fn resolver(&self) -> SlugResolver<'_, Arc<Database>> {
        SlugResolver::new(&self.registry, &self.reserved)
    }

    pub(crate) fn find_hm_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("HM_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let cwd = std::env::current_dir()?;
        if let Some(found) = find_upwards(&cwd, ".hm") {
            return Ok(found);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| HmError::MissingConfig("data directory not found".to_string()))?;
        Ok(data_dir.join("hm"))
    }
}

fn default_config_path(hm_root: &Path) -> PathBuf {
    if hm_root.ends_with(".hm") {
        hm_root.join("config.toml")
    } else {
        dirs::config_dir()
            .unwrap_or_else(|| hm_root.to_path_buf())
            .join("hm/config.toml")
    }
}

fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(name);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}
