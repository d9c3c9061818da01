// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// logomark-image — Turns a captioned logo on a dark background into a square,
// transparent PNG.
//
// Provides the stage-by-stage `LogoProcessor`, the `process_logo` entry point
// that runs the whole pipeline from one file to another, atomic output
// writing, and SHA-256 fingerprints of the written icon.

pub mod image;
pub mod integrity;
pub mod output;
pub mod pipeline;

// Re-export the primary items so callers can use `logomark_image::process_logo` etc.
pub use crate::image::processor::{LogoProcessor, SavedImage};
pub use pipeline::{process_image, process_logo};
