use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HmError, Result};

/// Path segments that can never be a facet slug or a profile slug.
pub const DEFAULT_RESERVED_PATHS: &[&str] = &[
    "directory",
    "profile",
    "jobs",
    "dashboard",
    "notifications",
    "messages",
    "reviews",
    "skills",
    "admin",
    "api",
    "health",
    "up",
    "new",
    "edit",
    "create",
    "update",
    "destroy",
    "users",
    "accounts",
    "company_profiles",
    "marketer_profiles",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub registry: RegistryConfig,
    pub routing: RoutingConfig,
    pub database: DatabaseConfig,
    pub robot: RobotConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, hm_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("HM_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(hm_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Parse a complete config from TOML text, filling gaps with defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let patch: ConfigPatch =
            toml::from_str(raw).map_err(|err| HmError::Config(format!("parse config: {err}")))?;
        let mut config = Self::default();
        config.merge_patch(patch);
        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("hm/config.toml"))
    }

    fn load_project(hm_root: &Path) -> Result<Option<ConfigPatch>> {
        let path = hm_root.join("config.toml");
        Self::load_patch(&path)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| HmError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| HmError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.registry {
            self.registry.merge(patch);
        }
        if let Some(patch) = patch.routing {
            self.routing.merge(patch);
        }
        if let Some(patch) = patch.database {
            self.database.merge(patch);
        }
        if let Some(patch) = patch.robot {
            self.robot.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_u32("HM_SEARCH_JOB_PER_PAGE")? {
            self.search.job_per_page = value;
        }
        if let Some(value) = env_u32("HM_SEARCH_MARKETER_PER_PAGE")? {
            self.search.marketer_per_page = value;
        }
        if let Some(value) = env_u32("HM_SEARCH_LANDING_PER_PAGE")? {
            self.search.landing_per_page = value;
        }
        if let Some(value) = env_u32("HM_SEARCH_MAX_PER_PAGE")? {
            self.search.max_per_page = value;
        }

        if let Some(value) = env_bool("HM_REGISTRY_CACHE_ENABLED") {
            self.registry.cache_enabled = value;
        }
        if env_bool("HM_CACHE_DISABLED").unwrap_or(false) {
            self.registry.cache_enabled = false;
        }
        if let Some(value) = env_u64("HM_REGISTRY_CACHE_TTL_SECONDS")? {
            self.registry.cache_ttl_seconds = value;
        }
        if let Some(value) = env_usize("HM_REGISTRY_CACHE_CAPACITY")? {
            self.registry.cache_capacity = value;
        }

        if let Some(values) = env_list("HM_ROUTING_RESERVED_PATHS") {
            self.routing.reserved_paths = merge_unique(values, &self.routing.reserved_paths);
        }
        if let Some(value) = env_string("HM_ROUTING_SITE_NAME") {
            self.routing.site_name = value;
        }
        if let Some(value) = env_string("HM_ROUTING_BASE_URL") {
            self.routing.base_url = Some(value);
        }

        if let Some(value) = env_string("HM_DATABASE_PATH") {
            self.database.path = Some(PathBuf::from(value));
        }

        if env_bool("HM_ROBOT").unwrap_or(false) {
            self.robot.format = "json".to_string();
        }
        if let Some(value) = env_string("HM_ROBOT_FORMAT") {
            self.robot.format = value;
        }

        Ok(())
    }
}

/// Page-size policy shared by both search services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub job_per_page: u32,
    pub marketer_per_page: u32,
    pub landing_per_page: u32,
    pub max_per_page: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            job_per_page: 15,
            marketer_per_page: 12,
            landing_per_page: 20,
            max_per_page: 50,
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.job_per_page {
            self.job_per_page = value;
        }
        if let Some(value) = patch.marketer_per_page {
            self.marketer_per_page = value;
        }
        if let Some(value) = patch.landing_per_page {
            self.landing_per_page = value;
        }
        if let Some(value) = patch.max_per_page {
            self.max_per_page = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub cache_enabled: bool,
    pub cache_ttl_seconds: u64,
    pub cache_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_ttl_seconds: 3600,
            cache_capacity: 4096,
        }
    }
}

impl RegistryConfig {
    fn merge(&mut self, patch: RegistryPatch) {
        if let Some(value) = patch.cache_enabled {
            self.cache_enabled = value;
        }
        if let Some(value) = patch.cache_ttl_seconds {
            self.cache_ttl_seconds = value;
        }
        if let Some(value) = patch.cache_capacity {
            self.cache_capacity = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub reserved_paths: Vec<String>,
    pub site_name: String,
    pub base_url: Option<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            reserved_paths: DEFAULT_RESERVED_PATHS
                .iter()
                .map(|path| (*path).to_string())
                .collect(),
            site_name: "HeyMarketers".to_string(),
            base_url: None,
        }
    }
}

impl RoutingConfig {
    fn merge(&mut self, patch: RoutingPatch) {
        if let Some(values) = patch.reserved_paths {
            self.reserved_paths = merge_unique(values, &self.reserved_paths);
        }
        if let Some(value) = patch.site_name {
            self.site_name = value;
        }
        if let Some(value) = patch.base_url {
            self.base_url = Some(value);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    fn merge(&mut self, patch: DatabasePatch) {
        if let Some(value) = patch.path {
            self.path = Some(value);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub format: String,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
        }
    }
}

impl RobotConfig {
    fn merge(&mut self, patch: RobotPatch) {
        if let Some(value) = patch.format {
            self.format = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub search: Option<SearchPatch>,
    pub registry: Option<RegistryPatch>,
    pub routing: Option<RoutingPatch>,
    pub database: Option<DatabasePatch>,
    pub robot: Option<RobotPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub job_per_page: Option<u32>,
    pub marketer_per_page: Option<u32>,
    pub landing_per_page: Option<u32>,
    pub max_per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RegistryPatch {
    pub cache_enabled: Option<bool>,
    pub cache_ttl_seconds: Option<u64>,
    pub cache_capacity: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RoutingPatch {
    pub reserved_paths: Option<Vec<String>>,
    pub site_name: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DatabasePatch {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RobotPatch {
    pub format: Option<String>,
}

fn merge_unique(values: Vec<String>, existing: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values.into_iter().chain(existing.iter().cloned()) {
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|err| HmError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| HmError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|err| HmError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_list(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_deserialize_fills_real_defaults() {
        let config: Config = toml::from_str("[search]\nmarketer_per_page = 24\n").unwrap();
        assert_eq!(config.search.marketer_per_page, 24);
        assert_eq!(config.search.job_per_page, 15);
        assert_eq!(config.search.max_per_page, 50);
        assert!(config.registry.cache_enabled);
        assert_eq!(config.registry.cache_ttl_seconds, 3600);
        assert_eq!(config.routing.site_name, "HeyMarketers");
        assert_eq!(config.routing.reserved_paths.len(), DEFAULT_RESERVED_PATHS.len());
        assert_eq!(config.robot.format, "json");

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty.registry.cache_capacity, 4096);
        assert_eq!(empty.search.landing_per_page, 20);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search.job_per_page, 15);
        assert_eq!(config.search.marketer_per_page, 12);
        assert_eq!(config.search.landing_per_page, 20);
        assert_eq!(config.search.max_per_page, 50);
        assert!(config.registry.cache_enabled);
        assert_eq!(config.registry.cache_ttl_seconds, 3600);
        assert_eq!(config.routing.site_name, "HeyMarketers");
        assert!(config.routing.reserved_paths.iter().any(|p| p == "jobs"));
        assert_eq!(
            config.routing.reserved_paths.len(),
            DEFAULT_RESERVED_PATHS.len()
        );
    }

    #[test]
    fn test_patch_merges_over_defaults() {
        let config = Config::from_toml_str(
            r#"
            [search]
            max_per_page = 40

            [routing]
            reserved_paths = ["blog"]
            site_name = "Acme"
            "#,
        )
        .unwrap();

        assert_eq!(config.search.max_per_page, 40);
        assert_eq!(config.search.job_per_page, 15);
        assert_eq!(config.routing.site_name, "Acme");
        assert_eq!(config.routing.reserved_paths[0], "blog");
        assert!(config.routing.reserved_paths.iter().any(|p| p == "admin"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml_str("[search\nmax_per_page = ").unwrap_err();
        assert!(matches!(err, HmError::Config(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hm.toml");
        std::fs::write(&path, "[registry]\ncache_ttl_seconds = 60\n").unwrap();

        let config = Config::load(Some(&path), dir.path()).unwrap();
        assert_eq!(config.registry.cache_ttl_seconds, 60);
    }

    #[test]
    fn test_merge_unique_preserves_order() {
        let merged = merge_unique(
            vec!["b".to_string(), "a".to_string()],
            &["a".to_string(), "c".to_string()],
        );
        assert_eq!(merged, vec!["b", "a", "c"]);
    }
}
