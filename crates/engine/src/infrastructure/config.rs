//! Engine configuration from the process environment.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 9000;
const DEFAULT_DATABASE_PATH: &str = "rdm.db";
const DEFAULT_MAX_POKEMON_ID: u16 = 493;
const DEFAULT_CATEGORY_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, value: &str, reason: &'static str) -> Self {
        Self::Invalid {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: String,
    pub locale_path: Option<PathBuf>,
    pub time_zone: FixedOffset,
    /// Upper end of the species range for filter metadata rows.
    pub max_pokemon_id: u16,
    pub category_timeout: Duration,
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server_host: DEFAULT_HOST.to_string(),
            server_port: DEFAULT_PORT,
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            locale_path: None,
            time_zone: utc(),
            max_pokemon_id: DEFAULT_MAX_POKEMON_ID,
            category_timeout: Duration::from_millis(DEFAULT_CATEGORY_TIMEOUT_MS),
            cors_allowed_origins: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let port_var = var("SERVER_PORT")
            .map(|v| ("SERVER_PORT", v))
            .or_else(|| var("PORT").map(|v| ("PORT", v)));
        let server_port = match port_var {
            Some((name, raw)) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::invalid(name, &raw, "expected a port number"))?,
            None => defaults.server_port,
        };

        let time_zone = match var("TIME_ZONE") {
            Some(raw) => parse_utc_offset(&raw).ok_or_else(|| {
                ConfigError::invalid("TIME_ZONE", &raw, "expected an offset like +02:00")
            })?,
            None => defaults.time_zone,
        };

        let max_pokemon_id = match var("MAX_POKEMON_ID") {
            Some(raw) => raw
                .parse::<u16>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ConfigError::invalid("MAX_POKEMON_ID", &raw, "expected a positive integer")
                })?,
            None => defaults.max_pokemon_id,
        };

        let category_timeout = match var("CATEGORY_TIMEOUT_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or_else(|| {
                    ConfigError::invalid("CATEGORY_TIMEOUT_MS", &raw, "expected milliseconds > 0")
                })?,
            None => defaults.category_timeout,
        };

        Ok(Self {
            server_host: var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            database_path: var("DATABASE_PATH").unwrap_or(defaults.database_path),
            locale_path: var("LOCALE_PATH").map(PathBuf::from),
            time_zone,
            max_pokemon_id,
            category_timeout,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS"),
        })
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM`, or `Z`.
fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Some(utc());
    }

    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
