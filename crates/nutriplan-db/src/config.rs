use std::env;

/// Database configuration.
///
/// Reads from the `NUTRIPLAN_DATABASE_URL` environment variable, falling back
/// to `postgresql://localhost:5432/nutriplan` when unset.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full PostgreSQL connection URL.
    pub database_url: String,
}

impl DbConfig {
    /// The default connection URL used when no environment variable is set.
    pub const DEFAULT_URL: &str = "postgresql://localhost:5432/nutriplan";

    /// Environment variable consulted by [`DbConfig::from_env`].
    pub const ENV_VAR: &str = "NUTRIPLAN_DATABASE_URL";

    /// Build a config from the environment.
    pub fn from_env() -> Self {
        let database_url =
            env::var(Self::ENV_VAR).unwrap_or_else(|_| Self::DEFAULT_URL.to_owned());
        Self { database_url }
    }

    /// Build a config from an explicit URL (CLI flags, config file, tests).
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Extract the database name from the URL.
    ///
    /// Returns `None` if the URL has no path component.
    pub fn database_name(&self) -> Option<&str> {
        let without_query = self
            .database_url
            .split('?')
            .next()
            .unwrap_or(&self.database_url);
        without_query.rsplit('/').next().filter(|s| !s.is_empty())
    }

    /// URL of the `postgres` maintenance database on the same server.
    pub fn maintenance_url(&self) -> String {
        match self.database_url.rfind('/') {
            Some(pos) => {
                let mut url = self.database_url[..pos].to_owned();
                url.push_str("/postgres");
                url
            }
            None => self.database_url.clone(),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
