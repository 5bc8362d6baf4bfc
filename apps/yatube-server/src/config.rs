//! Application configuration loaded from environment variables.

use std::env;

use yatube_core::forms::Locale;
use yatube_infra::{DatabaseConfig, JwtConfig};

#[cfg(feature = "rate-limit")]
use yatube_infra::RateLimitConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
    /// Usernames granted the admin role when they sign in.
    pub admin_usernames: Vec<String>,
    pub locale: Locale,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        });

        let locale = match env::var("LANGUAGE_CODE") {
            Ok(code) => code.parse().unwrap_or_else(|e| {
                tracing::warn!("{e}; falling back to ru");
                Locale::default()
            }),
            Err(_) => Locale::default(),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            jwt: JwtConfig::from_env(),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
            admin_usernames: parse_list(&env::var("ADMIN_USERNAMES").unwrap_or_default()),
            locale,
        }
    }
}

/// Split a comma separated list, dropping blanks.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
