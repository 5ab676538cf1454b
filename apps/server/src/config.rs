//! Server configuration from environment variables.

use std::path::PathBuf;

use quiz_core::ParserConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    /// Root holding one `<topic>/<topic>-quiz.md` per topic.
    pub data_dir: PathBuf,
    /// Path prefix written into image links; also where `data_dir` is served.
    pub asset_prefix: String,
    pub host: String,
    pub port: u16,
    /// Clear and reload the question bank on start-up.
    pub reingest: bool,
    /// Quiz sessions untouched for this many minutes are dropped.
    pub session_idle_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("app.db"),
            data_dir: PathBuf::from("static/data"),
            asset_prefix: "static/data".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            reingest: false,
            session_idle_minutes: 60,
        }
    }
}

impl Config {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT {:?}: {}", port, e))?,
            None => defaults.port,
        };

        let session_idle_minutes = match lookup("SESSION_IDLE_MINUTES") {
            Some(minutes) => match minutes.parse::<i64>() {
                Ok(minutes) if minutes > 0 => minutes,
                _ => anyhow::bail!("invalid SESSION_IDLE_MINUTES {:?}", minutes),
            },
            None => defaults.session_idle_minutes,
        };

        Ok(Self {
            database_path: lookup("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            asset_prefix: lookup("ASSET_PREFIX").unwrap_or(defaults.asset_prefix),
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            reingest: lookup("REINGEST").is_some_and(|v| is_truthy(&v)),
            session_idle_minutes,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL path under which the data directory is served.
    pub fn asset_route(&self) -> String {
        format!("/{}", self.asset_prefix.trim_matches('/'))
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            asset_prefix: self.asset_prefix.clone(),
            ..ParserConfig::default()
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
