//! Application settings, layered from built-in defaults, an optional `config.toml`, and the
//! environment.

use crate::error::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// The config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG: &str = "config";
pub const DEFAULT_DATABASE_URL: &str = "data/attendance.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    /// Faculty seeded into the database by the `setup` binary.
    #[serde(default)]
    pub faculty: Vec<FacultySeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Path of the `sqlite3` database file.
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            connection_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// A `tracing` filter directive such as `info` or `class_attendance=debug`. `RUST_LOG` takes
    /// precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily-rotated file at this path.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FacultySeed {
    pub name: String,
    pub subject: String,
}

impl Settings {
    /// Loads settings in increasing order of precedence:
    ///
    /// 1. built-in defaults,
    /// 2. the file at `path`, or `config.toml` in the working directory if it exists,
    /// 3. `ATTENDANCE__SECTION__KEY` environment variables (e.g. `ATTENDANCE__SERVER__PORT`),
    /// 4. `DATABASE_URL`, which may also come from a `.env` file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = DatabaseSettings::default();
        let mut builder = Config::builder()
            .set_default("database.url", defaults.url)?
            .set_default("database.max_connections", i64::from(defaults.max_connections))?
            .set_default(
                "database.connection_timeout_secs",
                defaults.connection_timeout_secs as i64,
            )?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG).required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("ATTENDANCE")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}
