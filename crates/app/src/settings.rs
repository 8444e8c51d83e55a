//! Process settings, read from an optional `settings.toml` and from
//! `TXSERVICE__*` environment variables (e.g. `TXSERVICE__SERVER__PORT=9000`).

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Where transactions are persisted.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    /// In-process store, lost on exit.
    #[default]
    Memory,
    /// Path of a sqlite file, created when missing.
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Pool {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime_secs: u64,
}

impl Default for Pool {
    fn default() -> Self {
        Self {
            max_connections: 100,
            min_connections: 10,
            max_lifetime_secs: 3600,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
    pub pool: Pool,
    pub shutdown_timeout_secs: u64,
    pub store_timeout_ms: Option<u64>,
    pub serialize_writes: bool,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
            database: Database::default(),
            pool: Pool::default(),
            shutdown_timeout_secs: 30,
            store_timeout_ms: None,
            serialize_writes: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

#[derive(Debug, Parser)]
#[command(name = "txservice", version)]
struct Args {
    /// Optional config file path (TOML), without or with extension.
    #[arg(long)]
    config: Option<String>,
    /// Override the listen address.
    #[arg(long)]
    bind: Option<String>,
    /// Override the listen port.
    #[arg(long)]
    port: Option<u16>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        let mut settings = Self::from_sources(config_path)?;
        if let Some(bind) = args.bind {
            settings.server.bind = bind;
        }
        if let Some(port) = args.port {
            settings.server.port = port;
        }

        Ok(settings)
    }

    fn from_sources(config_path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("TXSERVICE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::from_sources("does/not/exist").unwrap();
        assert_eq!(settings.server.shutdown_timeout_secs, 30);
        assert_eq!(settings.server.pool.max_connections, 100);
        assert_eq!(settings.server.pool.min_connections, 10);
        assert!(!settings.server.serialize_writes);
    }

    #[test]
    fn sqlite_database_and_overrides() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [server]
            port = 9000
            database = { sqlite = "tx.db" }
            store_timeout_ms = 250
            serialize_writes = true

            [server.pool]
            max_connections = 5
            "#,
        );

        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.bind, "0.0.0.0");
        assert_eq!(settings.server.database, Database::Sqlite("tx.db".to_string()));
        assert_eq!(settings.server.store_timeout_ms, Some(250));
        assert!(settings.server.serialize_writes);
        assert_eq!(settings.server.pool.max_connections, 5);
        assert_eq!(settings.server.pool.max_lifetime_secs, 3600);
    }

    #[test]
    fn memory_database_by_name() {
        let settings = parse(
            r#"
            [server]
            database = "memory"
            "#,
        );
        assert_eq!(settings.server.database, Database::Memory);
    }
}
