//! Configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/fino/config.toml), or an
//!    explicit path
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Environment variables are applied last: `FINO_API_URL`,
//! `FINO_CATEGORIZER`, `FINO_CATEGORIZER_URL`, `FINO_CACHE_DIR`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::paginate::DEFAULT_PAGE_SIZE;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/fino.toml");

/// Budget API settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Categorizer settings
#[derive(Debug, Clone)]
pub struct CategorizerConfig {
    /// `http` or `mock`
    pub backend: String,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

/// Where snapshots are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    File,
    Memory,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Snapshot directory for the file backend; platform data dir if unset
    pub dir: Option<PathBuf>,
}

/// Full configuration
#[derive(Debug, Clone)]
pub struct FinoConfig {
    pub api: ApiConfig,
    pub categorizer: CategorizerConfig,
    pub page_size: usize,
    pub cache: CacheConfig,
}

impl Default for FinoConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://127.0.0.1:8000".to_string(),
                timeout: Duration::from_secs(30),
            },
            categorizer: CategorizerConfig {
                backend: "http".to_string(),
                base_url: Some("http://127.0.0.1:8000".to_string()),
                timeout: Duration::from_secs(30),
            },
            page_size: DEFAULT_PAGE_SIZE,
            cache: CacheConfig {
                backend: CacheBackend::File,
                dir: None,
            },
        }
    }
}

impl FinoConfig {
    /// Load config (override first, then default), then apply environment
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut config = load_config(override_path)?;
        config.apply_env();
        Ok(config)
    }

    /// Apply `FINO_*` environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("FINO_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(backend) = std::env::var("FINO_CATEGORIZER") {
            self.categorizer.backend = backend;
        }
        if let Ok(url) = std::env::var("FINO_CATEGORIZER_URL") {
            self.categorizer.base_url = Some(url);
        }
        if let Ok(dir) = std::env::var("FINO_CACHE_DIR") {
            self.cache.dir = Some(PathBuf::from(dir));
        }
    }

    /// Snapshot directory for the file backend
    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.cache
            .dir
            .clone()
            .or_else(crate::cache::FileStore::default_dir)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fino").join("config.toml"))
}

fn load_config(override_path: Option<&Path>) -> Result<FinoConfig> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);

    let content = match path {
        Some(ref p) if p.exists() => fs::read_to_string(p)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", p.display(), e)))?,
        Some(ref p) if override_path.is_some() => {
            return Err(Error::Config(format!("Config file not found: {}", p.display())));
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    api: Option<RawApi>,
    categorizer: Option<RawCategorizer>,
    report: Option<RawReport>,
    cache: Option<RawCache>,
}

#[derive(Debug, Deserialize)]
struct RawApi {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawCategorizer {
    backend: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawReport {
    page_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawCache {
    backend: Option<String>,
    dir: Option<PathBuf>,
}

/// Parse config from TOML content
pub fn parse_config(content: &str) -> Result<FinoConfig> {
    let raw: RawConfig =
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = FinoConfig::default();

    if let Some(api) = raw.api {
        if let Some(url) = api.base_url {
            config.api.base_url = url;
        }
        if let Some(timeout) = api.timeout_secs {
            config.api.timeout = Duration::from_secs(timeout);
        }
    }

    if let Some(categorizer) = raw.categorizer {
        if let Some(backend) = categorizer.backend {
            config.categorizer.backend = backend;
        }
        if categorizer.base_url.is_some() {
            config.categorizer.base_url = categorizer.base_url;
        }
        if let Some(timeout) = categorizer.timeout_secs {
            config.categorizer.timeout = Duration::from_secs(timeout);
        }
    }

    if let Some(report) = raw.report {
        if let Some(page_size) = report.page_size {
            if page_size == 0 {
                return Err(Error::Config("report.page_size must be at least 1".into()));
            }
            config.page_size = page_size;
        }
    }

    if let Some(cache) = raw.cache {
        if let Some(backend) = cache.backend {
            config.cache.backend = match backend.to_lowercase().as_str() {
                "file" => CacheBackend::File,
                "memory" => CacheBackend::Memory,
                other => {
                    return Err(Error::Config(format!("Unknown cache backend: {}", other)));
                }
            };
        }
        if cache.dir.is_some() {
            config.cache.dir = cache.dir;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.page_size, 8);
        assert_eq!(config.categorizer.backend, "http");
        assert!(config.categorizer.base_url.is_some());
        assert_eq!(config.cache.backend, CacheBackend::File);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = parse_config(
            r#"
            [report]
            page_size = 20

            [cache]
            backend = "memory"
            "#,
        )
        .unwrap();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.api.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = parse_config("[report]\npage_size = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_cache_backend_rejected() {
        assert!(parse_config("[cache]\nbackend = \"redis\"\n").is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(parse_config("[api"), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fino.toml");
        fs::write(&path, "[api]\nbase_url = \"http://budget.local\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.api.base_url, "http://budget.local");
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(load_config(Some(&path)).is_err());
    }
}
