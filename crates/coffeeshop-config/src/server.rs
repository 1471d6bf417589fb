use std::env;

use crate::parse_bool;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Drop every drink and insert the seed drink before serving.
    pub reset_db_on_startup: bool,
    pub log_dir: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
            reset_db_on_startup: lookup("RESET_DB_ON_STARTUP")
                .map(|s| parse_bool(&s))
                .unwrap_or(false),
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "storage/logs".to_string()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
