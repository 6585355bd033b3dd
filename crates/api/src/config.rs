use tasker_db::DatabaseConfig;

/// A configuration variable held a value that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{var} must be a valid {expected}, got '{value}'")]
pub struct ConfigError {
    pub var: &'static str,
    pub expected: &'static str,
    pub value: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// PostgreSQL connection parameters.
    pub database: DatabaseConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `DB_HOST`              | `127.0.0.1`                |
    /// | `DB_PORT`              | `5432`                     |
    /// | `DB_USER`              | `postgres`                 |
    /// | `DB_PASSWORD`          | (empty)                    |
    /// | `DB_NAME`              | `postgres`                 |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let db_defaults = DatabaseConfig::default();

        let host = var("HOST", "0.0.0.0");
        let port = parse("PORT", "u16", var("PORT", "3000"))?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database = DatabaseConfig {
            host: var("DB_HOST", &db_defaults.host),
            port: parse("DB_PORT", "u16", var("DB_PORT", &db_defaults.port.to_string()))?,
            user: var("DB_USER", &db_defaults.user),
            password: var("DB_PASSWORD", &db_defaults.password),
            database: var("DB_NAME", &db_defaults.database),
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            database,
        })
    }
}

fn parse<T: std::str::FromStr>(
    var: &'static str,
    expected: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError {
        var,
        expected,
        value,
    })
}
