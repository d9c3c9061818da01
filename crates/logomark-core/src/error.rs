// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Logomark.

use thiserror::Error;

/// Top-level error type for all Logomark operations.
#[derive(Debug, Error)]
pub enum LogomarkError {
    // -- Pipeline errors --
    #[error("failed to decode input image: {0}")]
    Decode(String),

    #[error("failed to write output image: {0}")]
    Encode(String),

    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    // -- Reporting --
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LogomarkError>;
