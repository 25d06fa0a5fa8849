use anyhow::{Context, Result};
use clap::Parser;
use paging_common::retrieve::arrivals_feed::DEFAULT_ARRIVALS_URL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Key the admin pages ship with. A deployment still using it gets a warning.
pub const DEFAULT_API_KEY: &str = "rahasia";
pub const DEFAULT_CONFIG_FILE: &str = "server_paging.conf";

#[derive(Parser, Deserialize, Serialize, Debug, Clone, Default)]
#[clap(about = "Baggage-belt passenger paging server", version)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[clap(long, env = "PAGING_PORT", help = "Port to listen on.")]
    pub port: Option<u16>,

    #[clap(long, env = "PAGING_CONFIG_PATH", help = "Path to the JSON configuration file.")]
    pub config_path: Option<PathBuf>,

    #[clap(long, env = "PAGING_LOG_DIR", help = "Directory for log files.")]
    pub log_dir: Option<PathBuf>,

    #[clap(long, env = "PAGING_LOG_LEVEL", help = "Logging level (trace, debug, info, warn, error).")]
    pub log_level: Option<String>,

    #[clap(long, env = "DATABASE_URL", help = "PostgreSQL URL. Without it the server keeps data in memory.")]
    pub database_url: Option<String>,

    #[clap(long, env = "PAGING_API_KEY", help = "Value expected in the x-api-key header.")]
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    #[clap(long, env = "PAGING_ARRIVALS_URL", help = "Upstream arrivals feed URL.")]
    pub arrivals_url: Option<String>,

    #[clap(long, env = "PAGING_ARRIVALS_USERNAME", help = "Basic auth user for the arrivals feed.")]
    pub arrivals_username: Option<String>,

    #[clap(long, env = "PAGING_ARRIVALS_PASSWORD", help = "Basic auth password for the arrivals feed.")]
    #[serde(skip_serializing)]
    pub arrivals_password: Option<String>,
}

impl Config {
    // Merge two Config structs, where 'other' overrides 'self' for Some values
    fn merge(self, other: Config) -> Config {
        Config {
            port: other.port.or(self.port),
            config_path: other.config_path.or(self.config_path),
            log_dir: other.log_dir.or(self.log_dir),
            log_level: other.log_level.or(self.log_level),
            database_url: other.database_url.or(self.database_url),
            api_key: other.api_key.or(self.api_key),
            arrivals_url: other.arrivals_url.or(self.arrivals_url),
            arrivals_username: other.arrivals_username.or(self.arrivals_username),
            arrivals_password: other.arrivals_password.or(self.arrivals_password),
        }
    }

    fn defaults() -> Config {
        Config {
            port: Some(3000),
            log_dir: Some(PathBuf::from("./logs")),
            log_level: Some("info".to_string()),
            api_key: Some(DEFAULT_API_KEY.to_string()),
            arrivals_url: Some(DEFAULT_ARRIVALS_URL.to_string()),
            ..Default::default()
        }
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub database_url: Option<String>,
    pub api_key: String,
    pub arrivals_url: String,
    /// Both set, or the flight-number lookup is disabled.
    pub arrivals_credentials: Option<(String, String)>,
}

/// Defaults, then the JSON file, then environment and command line.
pub fn load_config() -> Result<Settings> {
    resolve(Config::parse())
}

/// Merges `cli` (already carrying env values) over the file config and defaults.
pub fn resolve(cli: Config) -> Result<Settings> {
    let config_file_path = cli
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut current = Config::defaults();

    if config_file_path.exists() {
        let raw = fs::read_to_string(&config_file_path)
            .with_context(|| format!("failed to read config file {}", config_file_path.display()))?;
        let file_config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", config_file_path.display()))?;
        current = current.merge(file_config);
    }

    let merged = current.merge(cli);
    let filled = |v: Option<String>| v.filter(|s| !s.is_empty());

    Ok(Settings {
        port: merged.port.unwrap_or(3000),
        log_dir: merged.log_dir.unwrap_or_else(|| PathBuf::from("./logs")),
        log_level: merged.log_level.unwrap_or_else(|| "info".to_string()),
        database_url: filled(merged.database_url),
        api_key: filled(merged.api_key).unwrap_or_else(|| DEFAULT_API_KEY.to_string()),
        arrivals_url: filled(merged.arrivals_url).unwrap_or_else(|| DEFAULT_ARRIVALS_URL.to_string()),
        arrivals_credentials: filled(merged.arrivals_username).zip(filled(merged.arrivals_password)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Config {
            config_path: Some(dir.path().join("missing.conf")),
            ..Default::default()
        };
        let settings = resolve(cli).unwrap();
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.api_key, DEFAULT_API_KEY);
        assert!(settings.database_url.is_none());
        assert!(settings.arrivals_credentials.is_none());
    }

    #[test]
    fn test_cli_overrides_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server_paging.conf");
        fs::write(
            &path,
            r#"{"port": 4000, "logLevel": "debug", "apiKey": "from-file",
                "arrivalsUsername": "nexus", "arrivalsPassword": "pw"}"#,
        )
        .unwrap();

        let cli = Config {
            config_path: Some(path),
            api_key: Some("from-cli".into()),
            ..Default::default()
        };
        let settings = resolve(cli).unwrap();
        assert_eq!(settings.port, 4000);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.api_key, "from-cli");
        assert_eq!(settings.arrivals_credentials, Some(("nexus".into(), "pw".into())));
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.conf");
        fs::write(&path, "{ not json").unwrap();
        let cli = Config {
            config_path: Some(path),
            ..Default::default()
        };
        assert!(resolve(cli).is_err());
    }
}
