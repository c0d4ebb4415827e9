// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the save pipeline.
//!
//! Save is the only fallible operation in the core: geometry and store
//! operations are total, and validation/not-found anomalies degrade
//! silently instead of erroring.

use thiserror::Error;

/// Thumbnail flattening failed.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No usable font for label rasterization
    #[error("annotation font unavailable: {0}")]
    Font(String),

    /// Compositing onto the photo failed
    #[error("thumbnail compositing failed: {0}")]
    Composite(String),
}

/// A save attempt failed; the annotation set stays dirty so the user
/// can retry.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The host's commit callback rejected the set
    #[error("annotation commit failed: {0}")]
    Commit(#[source] anyhow::Error),
}
