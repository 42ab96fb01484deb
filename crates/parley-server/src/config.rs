use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use parley_api::HEALTH_PATH;

/// Runtime settings, read from `PARLEY_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Route prefix for the message endpoints, normalized to `/segment[/...]`.
    pub base_path: String,
    /// The single origin browsers may call the API from.
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("PARLEY_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("PARLEY_PORT")
            .unwrap_or_else(|| "8090".into())
            .parse()
            .context("PARLEY_PORT must be a port number")?;
        let db_path: PathBuf = lookup("PARLEY_DB_PATH")
            .unwrap_or_else(|| "parley.db".into())
            .into();
        let base_path = normalize_base_path(
            &lookup("PARLEY_BASE_PATH").unwrap_or_else(|| "/chat".into()),
        )?;
        let cors_origin =
            lookup("PARLEY_CORS_ORIGIN").unwrap_or_else(|| "http://localhost:8081".into());

        Ok(Self {
            host,
            port,
            db_path,
            base_path,
            cors_origin,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

fn normalize_base_path(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !trimmed.starts_with('/') {
        bail!("PARLEY_BASE_PATH must start with '/' and name at least one segment, got '{raw}'");
    }
    if trimmed.contains(['{', '}']) {
        bail!("PARLEY_BASE_PATH cannot contain route parameters, got '{raw}'");
    }
    if trimmed == HEALTH_PATH {
        bail!("PARLEY_BASE_PATH cannot be {HEALTH_PATH}, that route serves the health check");
    }
    Ok(trimmed.to_string())
}
