// ABOUTME: Unified error types for capture, transport, and coach service failures
// ABOUTME: Maps every failure onto the user-visible message chain the UI displays
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FormCoach contributors

//! Error handling for the FormCoach client.
//!
//! Three failure kinds exist (capture, transport, service) and all of them
//! are recoverable: they become a user-visible message at the point of the
//! triggering operation and never abort the process.

use thiserror::Error;

/// Fallback message when neither the service nor the transport layer
/// produced anything displayable.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred during analysis";

/// Errors surfaced by the coach API client and the live trainer loop.
#[derive(Debug, Error)]
pub enum CoachError {
    /// The capture source had no frame to offer (device not ready).
    #[error("could not capture image from camera")]
    CaptureUnavailable,

    /// Network-level failure: connection refused, timeout, bad TLS, or an
    /// unreadable response body.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status. `detail` carries the
    /// server-provided explanation when one was present in the body.
    #[error("coach service returned {status}: {detail}")]
    Service {
        /// HTTP status code of the response.
        status: u16,
        /// Server-provided detail, or a fallback derived from the body.
        detail: String,
    },

    /// The configured API base URL could not be parsed or joined.
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl CoachError {
    /// Message shown to the user.
    ///
    /// Preference order matches the reference client: server-provided detail
    /// first, then the transport error text, then a generic fallback.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Service { detail, .. } if !detail.is_empty() => detail.clone(),
            Self::Transport(err) => err.to_string(),
            Self::CaptureUnavailable | Self::InvalidUrl(_) => self.to_string(),
            Self::Service { .. } => GENERIC_ERROR_MESSAGE.to_owned(),
        }
    }

    /// True when the failure happened before any network traffic.
    #[must_use]
    pub fn is_capture_failure(&self) -> bool {
        matches!(self, Self::CaptureUnavailable)
    }
}
