use serde::Deserialize;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Sqlite,
    Postgrest,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub kind: StoreKind,
    #[serde(default = "default_store_path")]
    pub path: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Rows returned by an import preview
    pub preview_rows: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { preview_rows: 5 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Stock below this level is reported as Low Stock
    pub low_stock_threshold: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 100,
        }
    }
}

fn default_store_path() -> String {
    "target/db/dashboard.db".to_string()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 3000

[store]
kind = "sqlite"
path = "target/db/dashboard.db"

[import]
preview_rows = 5

[catalog]
low_stock_threshold = 100
"#;

/// Load configuration from config.toml
///
/// Search order:
/// 1. Next to the executable
/// 2. Falls back to the embedded default config
///
/// `DASHBOARD_STORE_URL` and `DASHBOARD_STORE_API_KEY` override the hosted
/// store credentials in both cases.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = read_config_file()?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn read_config_file() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return Ok(toml::from_str(&contents)?);
            }
            tracing::warn!("config.toml not found at: {}", config_path.display());
        }
    }

    tracing::info!("Using default embedded configuration");
    Ok(toml::from_str(DEFAULT_CONFIG)?)
}

fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("DASHBOARD_STORE_URL").filter(|v| !v.is_empty()) {
        config.store.url = url;
    }
    if let Some(key) = lookup("DASHBOARD_STORE_API_KEY").filter(|v| !v.is_empty()) {
        config.store.api_key = key;
    }
}

/// Keeps the loaded configuration for the lifetime of the process
pub fn install(config: Config) -> &'static Config {
    CONFIG.get_or_init(|| config)
}

/// Process configuration; the embedded default until `install` ran
pub fn current() -> &'static Config {
    CONFIG.get_or_init(|| {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|_| Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 3000,
            },
            store: StoreConfig {
                kind: StoreKind::Memory,
                path: default_store_path(),
                url: String::new(),
                api_key: String::new(),
            },
            import: ImportConfig::default(),
            catalog: CatalogConfig::default(),
        })
    })
}

/// Database file path; relative paths resolve against the executable directory
pub fn get_database_path(config: &Config) -> PathBuf {
    let db_path = Path::new(&config.store.path);

    if db_path.is_absolute() {
        return db_path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(db_path);
        }
    }

    PathBuf::from(&config.store.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.store.kind, StoreKind::Sqlite);
        assert_eq!(config.store.path, "target/db/dashboard.db");
        assert_eq!(config.import.preview_rows, 5);
        assert_eq!(config.catalog.low_stock_threshold, 100);
    }

    #[test]
    fn test_optional_sections_default() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [store]
            kind = "postgrest"
            url = "https://example.supabase.co"
            "#,
        )
        .unwrap();
        assert_eq!(config.store.kind, StoreKind::Postgrest);
        assert_eq!(config.import.preview_rows, 5);
        assert_eq!(config.catalog.low_stock_threshold, 100);
    }

    #[test]
    fn test_env_overrides_store_credentials() {
        let mut config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        apply_env_overrides(&mut config, |key| match key {
            "DASHBOARD_STORE_URL" => Some("https://store.example".into()),
            "DASHBOARD_STORE_API_KEY" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.store.url, "https://store.example");
        assert_eq!(config.store.api_key, "");
    }
}
