use std::env;

use crate::constants::{DEFAULT_LEADERBOARD_SIZE, MAX_LEADERBOARD_SIZE};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: String,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    /// Shared secret used by the auth layer to sign identity headers
    pub identity_secret_key: String,
    /// Admin endpoints are disabled when unset
    pub admin_secret_key: Option<String>,
    pub log_requests: bool,
    /// Number of rows returned by the leaderboard when no limit is requested
    pub leaderboard_size: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/progress.db".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let identity_secret_key = env::var("IDENTITY_SECRET_KEY")
            .map_err(|_| "IDENTITY_SECRET_KEY must be set to verify identity headers")?;

        let admin_secret_key = env::var("ADMIN_SECRET_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let log_requests = env::var("LOG_REQUESTS")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let leaderboard_size: usize = env::var("LEADERBOARD_SIZE")
            .unwrap_or_else(|_| DEFAULT_LEADERBOARD_SIZE.to_string())
            .parse()
            .map_err(|_| "Invalid LEADERBOARD_SIZE")?;

        if leaderboard_size == 0 || leaderboard_size > MAX_LEADERBOARD_SIZE {
            return Err(format!(
                "LEADERBOARD_SIZE must be between 1 and {}",
                MAX_LEADERBOARD_SIZE
            ));
        }

        Ok(Config {
            server_host,
            server_port,
            database_path,
            allowed_origins,
            environment,
            identity_secret_key,
            admin_secret_key,
            log_requests,
            leaderboard_size,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
