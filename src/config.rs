use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

/// Prefixes of values that are already in hashed-credential format.
/// Argon2 is what the service produces; bcrypt tags cover legacy rows.
pub const DEFAULT_HASH_PREFIXES: &[&str] =
    &["$argon2id$", "$argon2i$", "$argon2d$", "$2a$", "$2b$", "$2y$"];

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub hashed_prefixes: Vec<String>,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            hashed_prefixes: DEFAULT_HASH_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub password: PasswordConfig,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let password = std::env::var("PASSWORD_HASH_PREFIXES")
            .ok()
            .map(|v| parse_prefixes(&v))
            .filter(|prefixes| !prefixes.is_empty())
            .map(|hashed_prefixes| PasswordConfig { hashed_prefixes })
            .unwrap_or_default();
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into());
        let bind_addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid APP_HOST/APP_PORT: {host}:{port}"))?;
        Ok(Self {
            database_url,
            max_connections,
            password,
            bind_addr,
        })
    }
}

fn parse_prefixes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
