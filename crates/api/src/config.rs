//! Process configuration, read from the environment (and `.env` via
//! `dotenvy` in `main`).

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use tracing::{info, warn};

use adminhub_infra::DEFAULT_MAX_ATTEMPTS;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: SocketAddr,
    pub jwt_secret: String,
    /// Postgres when set, in-memory store otherwise.
    pub database_url: Option<String>,
    /// Collision-guard bound per create request.
    pub max_allocation_attempts: u32,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind = try_load(&lookup, "ADMINHUB_BIND", DEFAULT_BIND)?;

        let jwt_secret = non_empty(lookup("JWT_SECRET")).unwrap_or_else(|| {
            warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let database_url = non_empty(lookup("DATABASE_URL"));
        if database_url.is_none() {
            info!("DATABASE_URL not set, records are kept in memory");
        }

        let max_allocation_attempts: u32 = try_load(
            &lookup,
            "ALLOCATION_MAX_ATTEMPTS",
            &DEFAULT_MAX_ATTEMPTS.to_string(),
        )?;
        if max_allocation_attempts == 0 {
            bail!("ALLOCATION_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Self {
            bind,
            jwt_secret,
            database_url,
            max_allocation_attempts,
        })
    }

    /// In-memory configuration on an ephemeral local port.
    pub fn in_memory(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            jwt_secret: jwt_secret.into(),
            database_url: None,
            max_allocation_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = non_empty(lookup(key)).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.trim()
        .parse()
        .map_err(|e| anyhow!("invalid {key} value '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.database_url, None);
        assert_eq!(config.max_allocation_attempts, 5);
    }

    #[test]
    fn explicit_values_win() {
        let config = load(&[
            ("ADMINHUB_BIND", "127.0.0.1:9000"),
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_URL", "postgres://localhost/adminhub"),
            ("ALLOCATION_MAX_ATTEMPTS", "8"),
        ])
        .unwrap();
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/adminhub"));
        assert_eq!(config.max_allocation_attempts, 8);
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let config = load(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn invalid_values_are_startup_errors() {
        assert!(load(&[("ADMINHUB_BIND", "not-an-address")]).is_err());
        assert!(load(&[("ALLOCATION_MAX_ATTEMPTS", "many")]).is_err());
        let err = load(&[("ALLOCATION_MAX_ATTEMPTS", "0")]).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }
}
