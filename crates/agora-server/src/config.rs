use std::ops::RangeInclusive;

use anyhow::{Context, Result, bail};

/// Placeholder secret used when none is configured. Fine for local runs only.
pub const DEV_SECRET: &str = "dev-secret-change-me";

/// Accepted values for `AGORA_SESSION_TTL_DAYS`.
pub const SESSION_TTL_DAYS: RangeInclusive<i64> = 1..=3650;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    pub session_secret: String,
    pub session_ttl_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup so parsing is testable without
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("AGORA_PORT") {
            Some(v) => v.parse().with_context(|| format!("AGORA_PORT is not a port: {v}"))?,
            None => 3000,
        };
        let session_ttl_days = match lookup("AGORA_SESSION_TTL_DAYS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("AGORA_SESSION_TTL_DAYS is not a number: {v}"))?,
            None => 30,
        };
        if !SESSION_TTL_DAYS.contains(&session_ttl_days) {
            bail!(
                "AGORA_SESSION_TTL_DAYS must be within {}..={}, got {}",
                SESSION_TTL_DAYS.start(),
                SESSION_TTL_DAYS.end(),
                session_ttl_days
            );
        }

        Ok(Self {
            host: lookup("AGORA_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: lookup("AGORA_DB_PATH").unwrap_or_else(|| "agora.db".into()),
            session_secret: lookup("AGORA_SESSION_SECRET").unwrap_or_else(|| DEV_SECRET.into()),
            session_ttl_days,
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.session_secret.is_empty() || self.session_secret == DEV_SECRET
    }
}
