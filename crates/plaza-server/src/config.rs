use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::Duration;

/// JWT secrets shipped in sample `.env` files. Refused at startup.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Unset keys fall back to defaults,
    /// except the JWT secret which must be provided.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("PLAZA_JWT_SECRET").unwrap_or_default();
        if jwt_secret.trim().is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("PLAZA_JWT_SECRET is unset or still a placeholder; set it in your .env file");
        }

        let host = lookup("PLAZA_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("PLAZA_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("PLAZA_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let db_path: PathBuf = lookup("PLAZA_DB_PATH").unwrap_or_else(|| "plaza.db".into()).into();

        let ttl_days = match lookup("PLAZA_TOKEN_TTL_DAYS") {
            Some(v) => v.parse::<i64>().context("PLAZA_TOKEN_TTL_DAYS must be a whole number")?,
            None => DEFAULT_TOKEN_TTL_DAYS,
        };
        if ttl_days <= 0 {
            bail!("PLAZA_TOKEN_TTL_DAYS must be positive");
        }

        Ok(Self {
            addr,
            db_path,
            jwt_secret,
            token_ttl: Duration::days(ttl_days),
        })
    }
}
