//! Configuration management for the seatmap session.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Session loop configuration
    pub session: SessionConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Session loop configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Whether the first input line is the number of commands (default: true)
    pub expect_command_count: bool,
    /// How long to wait for a reply, in milliseconds (default: 1000)
    pub reply_timeout_ms: u64,
    /// Capacity of the store's action broadcast channel (default: 64)
    pub broadcast_capacity: usize,
}

impl SessionConfig {
    /// Reply timeout as a [`Duration`]
    #[must_use]
    pub const fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expect_command_count: true,
            reply_timeout_ms: 1000,
            broadcast_capacity: seatmap_runtime::DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter directive, `RUST_LOG` syntax (default: warn)
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            session: SessionConfig {
                expect_command_count: lookup("SEATMAP_EXPECT_COMMAND_COUNT")
                    .and_then(|s| parse_bool(&s))
                    .unwrap_or(defaults.session.expect_command_count),
                reply_timeout_ms: lookup("SEATMAP_REPLY_TIMEOUT_MS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.session.reply_timeout_ms),
                broadcast_capacity: lookup("SEATMAP_BROADCAST_CAPACITY")
                    .and_then(|s| s.parse::<usize>().ok())
                    .filter(|&capacity| capacity > 0)
                    .unwrap_or(defaults.session.broadcast_capacity),
            },
            logging: LoggingConfig {
                filter: lookup("RUST_LOG").unwrap_or(defaults.logging.filter),
            },
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
