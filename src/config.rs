// ABOUTME: Environment-based configuration for the FormCoach client
// ABOUTME: Reads API base URL, capture interval, and HTTP timeouts once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FormCoach contributors

//! Environment-only configuration, read once at startup.
//!
//! Invalid values fall back to defaults with a warning rather than aborting;
//! only an unparseable base URL is a hard error, since nothing works
//! without it.

use anyhow::Result;
use std::env;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Default coach API endpoint for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default continuous-analysis interval, matching the reference client.
pub const DEFAULT_CAPTURE_INTERVAL_MS: u64 = 2000;

/// Default request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds.
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration for the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the coach API.
    pub api_base_url: Url,
    /// Interval between continuous-analysis cycles.
    pub capture_interval: Duration,
    /// Total request timeout in seconds.
    pub http_timeout_secs: u64,
    /// Connection establishment timeout in seconds.
    pub http_connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            // DEFAULT_API_URL is a valid literal; parsing it cannot fail.
            api_base_url: Url::parse(DEFAULT_API_URL).unwrap_or_else(|_| unreachable!()),
            capture_interval: Duration::from_millis(DEFAULT_CAPTURE_INTERVAL_MS),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            http_connect_timeout_secs: DEFAULT_HTTP_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// Recognized variables:
    /// - `FORMCOACH_API_URL` - coach API base URL
    /// - `FORMCOACH_CAPTURE_INTERVAL_MS` - continuous analysis cadence
    /// - `FORMCOACH_HTTP_TIMEOUT_SECS` - request timeout
    /// - `FORMCOACH_HTTP_CONNECT_TIMEOUT_SECS` - connect timeout
    ///
    /// # Errors
    ///
    /// Returns an error if `FORMCOACH_API_URL` is set but not a valid URL.
    pub fn from_env() -> Result<Self> {
        let api_base_url = match env::var("FORMCOACH_API_URL") {
            Ok(raw) => Url::parse(&raw)
                .map_err(|e| anyhow::anyhow!("FORMCOACH_API_URL '{raw}' is not a valid URL: {e}"))?,
            Err(_) => Url::parse(DEFAULT_API_URL).unwrap_or_else(|_| unreachable!()),
        };

        Ok(Self {
            api_base_url,
            capture_interval: Duration::from_millis(env_u64(
                "FORMCOACH_CAPTURE_INTERVAL_MS",
                DEFAULT_CAPTURE_INTERVAL_MS,
            )),
            http_timeout_secs: env_u64("FORMCOACH_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
            http_connect_timeout_secs: env_u64(
                "FORMCOACH_HTTP_CONNECT_TIMEOUT_SECS",
                DEFAULT_HTTP_CONNECT_TIMEOUT_SECS,
            ),
        })
    }

    /// Override the base URL (used by the CLI `--api-url` flag).
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a valid URL.
    pub fn with_api_url(mut self, raw: &str) -> Result<Self> {
        self.api_base_url =
            Url::parse(raw).map_err(|e| anyhow::anyhow!("'{raw}' is not a valid URL: {e}"))?;
        Ok(self)
    }
}

/// Parse a u64 environment variable, warning and falling back on bad input.
fn env_u64(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{name}='{raw}' is not a valid integer, using default {default}");
            default
        }),
        Err(_) => default,
    }
}
