// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Farbwerk.

use thiserror::Error;

/// Top-level error type for all Farbwerk operations.
#[derive(Debug, Error)]
pub enum FarbwerkError {
    // -- Surface errors --
    /// The surface's backing memory could not be locked: it is already locked
    /// by another caller, or the surface has been disposed. Never retried
    /// internally — retry policy, if any, belongs to the caller.
    #[error("surface lock acquisition failed: {0}")]
    LockAcquisition(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- PDF errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Passthrough --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FarbwerkError>;
