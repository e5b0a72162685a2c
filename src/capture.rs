// ABOUTME: Frame capture abstraction standing in for the reference client's webcam grabber
// ABOUTME: File-backed and in-memory sources; None means no frame is currently available
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FormCoach contributors

//! Frame capture sources.
//!
//! A [`FrameSource`] produces a still JPEG on demand, synchronously relative
//! to the trainer's tick. It never talks to the network; `None` means the
//! device has nothing to offer right now and the cycle fails with
//! `CaptureUnavailable` without contacting the service.

use bytes::Bytes;
use std::collections::VecDeque;
use std::path::PathBuf;
use tracing::warn;

/// Produce a still image on demand.
pub trait FrameSource: Send {
    /// Grab the current frame, or `None` if no frame is available.
    fn capture(&mut self) -> Option<Bytes>;
}

/// Re-reads a JPEG file on every capture.
///
/// Stand-in for a webcam: an external grabber can keep overwriting the file
/// and each cycle picks up the latest frame. Any read failure yields `None`.
pub struct JpegFileSource {
    path: PathBuf,
}

impl JpegFileSource {
    /// Capture frames from the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FrameSource for JpegFileSource {
    fn capture(&mut self) -> Option<Bytes> {
        match std::fs::read(&self.path) {
            Ok(data) if !data.is_empty() => Some(Bytes::from(data)),
            Ok(_) => {
                warn!("frame file {} is empty", self.path.display());
                None
            }
            Err(e) => {
                warn!("failed to read frame file {}: {e}", self.path.display());
                None
            }
        }
    }
}

/// Serves a fixed sequence of frames, then `None`. For demos and tests.
pub struct FrameSequence {
    frames: VecDeque<Bytes>,
}

impl FrameSequence {
    /// Serve `frames` in order, one per capture.
    #[must_use]
    pub fn new(frames: Vec<Bytes>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    /// A source that never has a frame.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl FrameSource for FrameSequence {
    fn capture(&mut self) -> Option<Bytes> {
        self.frames.pop_front()
    }
}

/// Returns the same frame on every capture. For demos and tests.
pub struct RepeatingFrame {
    frame: Bytes,
}

impl RepeatingFrame {
    /// Always serve `frame`.
    #[must_use]
    pub fn new(frame: Bytes) -> Self {
        Self { frame }
    }
}

impl FrameSource for RepeatingFrame {
    fn capture(&mut self) -> Option<Bytes> {
        Some(self.frame.clone())
    }
}
