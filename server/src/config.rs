use std::env;

/// Server configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub session_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(3000);
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "taskpile.db".to_string()),
            session_secret: env::var("SESSION_SECRET").ok(),
        }
    }
}
