// ABOUTME: Main library entry point for the FormCoach fitness coaching client
// ABOUTME: Live posture-analysis loop, workout planner, and nutrition advisor over the coach API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FormCoach contributors

#![deny(unsafe_code)]

//! # FormCoach client
//!
//! Client-side presentation layer of a fitness-coaching product, as a
//! library plus a CLI. All computed intelligence (posture inference, plan
//! generation) lives in a remote coach service; this crate owns view
//! composition, form state, and the one piece with design substance: the
//! continuous capture-and-analyze control loop.
//!
//! ## Architecture
//!
//! - **capture**: [`capture::FrameSource`] produces a still JPEG on demand
//! - **api**: [`api::CoachApiClient`] performs one HTTP round trip per call
//! - **trainer**: [`trainer::LiveTrainer`] decides when cycles run, keeps at
//!   most one analysis in flight, and suppresses stale deliveries after stop
//! - **planner**: the two form flows (workout plan, nutrition advice)
//! - **report**: terminal renderers for service responses

pub mod api;
pub mod capture;
pub mod config;
pub mod errors;
pub mod http_client;
pub mod logging;
pub mod models;
pub mod planner;
pub mod report;
pub mod trainer;

pub use api::{CoachApiClient, PostureAnalyzer};
pub use capture::FrameSource;
pub use config::ClientConfig;
pub use errors::CoachError;
pub use trainer::{LiveTrainer, TrainerEvent, TrainerMode};
