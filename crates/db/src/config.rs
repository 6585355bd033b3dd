use std::fmt;

use sqlx::postgres::PgConnectOptions;

/// Placeholder printed instead of the password in `Debug` output.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Connection parameters for the PostgreSQL server holding the `tasks` table.
///
/// The defaults target a local development server.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Server host (default: `127.0.0.1`).
    pub host: String,
    /// Server port (default: `5432`).
    pub port: u16,
    /// Login role (default: `postgres`).
    pub user: String,
    /// Password for `user` (default: empty).
    pub password: String,
    /// Database name (default: `postgres`).
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "postgres".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Build the sqlx connect options for these parameters.
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &REDACTED_VALUE)
            .field("database", &self.database)
            .finish()
    }
}
