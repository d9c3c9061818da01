// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::{LogomarkError, Result};

/// Fraction of the source height kept from the top; the rest is the caption.
pub const DEFAULT_CAPTION_KEEP_RATIO: f64 = 0.8;

/// Per-channel value below which a pixel counts as background.
pub const DEFAULT_BACKGROUND_THRESHOLD: u8 = 30;

/// Constants applied by the logo pipeline.
///
/// The command line always runs with [`PipelineConfig::default`]; other values
/// are only reachable from library callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Share of rows retained from the top before keying (0 < ratio <= 1).
    pub caption_keep_ratio: f64,
    /// A pixel is background iff red, green and blue are all strictly below this.
    pub background_threshold: u8,
}

impl PipelineConfig {
    /// Reject ratios the caption cropper cannot apply.
    pub fn validate(&self) -> Result<()> {
        let ratio = self.caption_keep_ratio;
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(LogomarkError::InvalidConfig(format!(
                "caption keep ratio must be in (0, 1], got {ratio}"
            )));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            caption_keep_ratio: DEFAULT_CAPTION_KEEP_RATIO,
            background_threshold: DEFAULT_BACKGROUND_THRESHOLD,
        }
    }
}
