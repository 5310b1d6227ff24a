//! Server configuration from environment variables (with `.env` support via
//! dotenvy in `main`).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

use fintrack_core::constants::{DEFAULT_MAX_BUDGET_YEAR, DEFAULT_MIN_BUDGET_YEAR};

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub db_path: String,
    /// HS256 key material for access/refresh tokens.
    pub jwt_secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
    /// Plausible range for budget years.
    pub min_budget_year: i32,
    pub max_budget_year: i32,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let jwt_secret = match std::env::var("FT_JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                // An ephemeral key keeps a dev server usable; sessions die
                // with the process.
                let mut bytes = [0u8; 32];
                OsRng.fill_bytes(&mut bytes);
                let secret = BASE64.encode(bytes);
                tracing::warn!(
                    "FT_JWT_SECRET is not set; generated an ephemeral signing key. \
                     Tokens will not survive a restart."
                );
                secret
            }
        };

        Self {
            listen_addr: env_or("FT_LISTEN_ADDR", "127.0.0.1:8080"),
            db_path: env_or("FT_DB_PATH", "fintrack.db"),
            jwt_secret,
            access_ttl_secs: env_parse("FT_ACCESS_TTL_SECS", 3600),
            refresh_ttl_secs: env_parse("FT_REFRESH_TTL_SECS", 7 * 24 * 3600),
            min_budget_year: env_parse("FT_MIN_BUDGET_YEAR", DEFAULT_MIN_BUDGET_YEAR),
            max_budget_year: env_parse("FT_MAX_BUDGET_YEAR", DEFAULT_MAX_BUDGET_YEAR),
        }
    }
}
