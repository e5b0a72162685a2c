// ABOUTME: Shared HTTP client construction with connection pooling and timeouts
// ABOUTME: One pooled client per process; timeouts come from ClientConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FormCoach contributors

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

use crate::config::{DEFAULT_HTTP_CONNECT_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS};

/// Global shared HTTP client with default timeouts
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get the process-wide pooled HTTP client with default timeouts.
///
/// Prefer [`create_client_with_timeout`] when the caller has a
/// `ClientConfig` with explicit timeout settings.
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        create_client_with_timeout(DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_HTTP_CONNECT_TIMEOUT_SECS)
    })
}

/// Build an HTTP client with explicit request and connect timeouts.
///
/// The connect timeout bounds TCP establishment; the request timeout bounds
/// the whole exchange, which is also what ends a hung analysis cycle.
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}
