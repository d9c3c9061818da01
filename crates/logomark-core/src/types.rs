// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core value types for the Logomark pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::PipelineConfig;

/// Inclusive pixel rectangle enclosing every foreground pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    /// A box covering exactly one pixel.
    pub fn at(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Grow the box so it also covers `(x, y)`.
    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Fold an optional box with another point; `None` starts a new box.
    pub fn extend(bounds: Option<Self>, x: u32, y: u32) -> Option<Self> {
        match bounds {
            Some(mut bounds) => {
                bounds.include(x, y);
                Some(bounds)
            }
            None => Some(Self::at(x, y)),
        }
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {})..=({}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// Placement of a `width` x `height` image on its square canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareLayout {
    /// Canvas edge length. Never 0, so the encoder always gets a valid image.
    pub side: u32,
    pub x_offset: u32,
    pub y_offset: u32,
}

impl SquareLayout {
    /// Centre the content; odd leftovers go to the bottom/right.
    pub fn for_size(width: u32, height: u32) -> Self {
        let side = width.max(height).max(1);
        Self {
            side,
            x_offset: (side - width) / 2,
            y_offset: (side - height) / 2,
        }
    }
}

/// Summary of one completed pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub source_width: u32,
    pub source_height: u32,
    /// Rows kept after the caption crop.
    pub retained_height: u32,
    /// `None` when every pixel was background and the content crop was skipped.
    pub content_box: Option<BoundingBox>,
    pub side: u32,
    pub config: PipelineConfig,
    /// Size of the encoded PNG.
    pub bytes_written: usize,
    /// SHA-256 of the encoded PNG, lowercase hex.
    pub sha256: String,
}
