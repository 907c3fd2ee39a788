use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Single salt shared by every account. Legacy scheme carried over
    /// from the stored digests; changing it invalidates all passwords.
    pub password_salt: String,
    /// Account name granted the maintenance operations.
    pub admin_username: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Capacity assigned to every train at import time.
    pub default_seats: i32,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .set_default("database.path", "railbook.db")?
            .set_default("auth.password_salt", "class12csrailway")?
            .set_default("auth.admin_username", "admin")?
            .set_default("catalog.default_seats", 500_i64)?
            // Optional config files layered over the defaults
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `RAILBOOK__DATABASE__PATH=/tmp/railbook.db`
            .add_source(config::Environment::with_prefix("RAILBOOK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
