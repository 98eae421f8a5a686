use serde::{Deserialize, Serialize};

use crate::store::MEMORY_SCHEME;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub mode: Mode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub connection_string: Option<String>,
    pub max_connections: Option<u32>,
}

/// Controls how much diagnostic detail error responses carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    pub fn is_production(self) -> bool {
        self == Mode::Production
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            max_connections: Some(20),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional config file and the environment
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Add config file if it exists
        config = config.add_source(config::File::with_name("config").required(false));

        // Environment variables, e.g. TASKS__SERVER__PORT=6000
        config = config.add_source(
            config::Environment::with_prefix("TASKS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Get the database URL from config or environment
    pub fn database_url(&self) -> String {
        if let Some(connection_string) = &self.database.connection_string {
            return connection_string.clone();
        }

        // Fall back to environment variable
        if let Ok(url) = std::env::var("DATABASE_URL") {
            return url;
        }

        // No external store configured: keep everything in process
        MEMORY_SCHEME.to_string()
    }

    pub fn max_connections(&self) -> u32 {
        self.database.max_connections.unwrap_or(20)
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server_address(), "127.0.0.1:5000");
        assert_eq!(config.max_connections(), 20);
        assert_eq!(config.mode, Mode::Development);
        assert!(!config.mode.is_production());
    }

    #[test]
    fn explicit_connection_string_wins() {
        let mut config = AppConfig::default();
        config.database.connection_string = Some("postgres://localhost/tasks".to_string());
        assert_eq!(config.database_url(), "postgres://localhost/tasks");
    }

    #[test]
    fn mode_deserializes_lowercase() {
        let mode: Mode = serde_json::from_str(r#""production""#).unwrap();
        assert!(mode.is_production());
    }
}
