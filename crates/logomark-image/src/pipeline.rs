// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline entry points — run every stage from a file to a file, or on an
// in-memory image.

use std::path::Path;

use image::{DynamicImage, RgbaImage};
use logomark_core::config::PipelineConfig;
use logomark_core::error::Result;
use logomark_core::types::ProcessReport;
use tracing::{info, instrument};

use crate::image::processor::LogoProcessor;

/// Load `input`, run caption crop, background key, content crop and
/// squaring, then write the PNG to `output`.
///
/// Decode failures happen before anything touches `output`; encode failures
/// leave `output` as it was.
#[instrument(skip(config), fields(input = %input.display(), output = %output.display()))]
pub fn process_logo(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> Result<ProcessReport> {
    let loaded = LogoProcessor::open(input)?.with_config(*config)?;
    let (source_width, source_height) = (loaded.width(), loaded.height());

    let cropped = loaded.crop_caption();
    let retained_height = cropped.height();

    let keyed = cropped.key_background();
    let content_box = keyed.content_box();

    let squared = keyed.crop_to_content().square();
    let side = squared.width();
    let saved = squared.save(output)?;

    info!(side, "Logo processed");
    Ok(ProcessReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        source_width,
        source_height,
        retained_height,
        content_box,
        side,
        config: *config,
        bytes_written: saved.bytes_written,
        sha256: saved.sha256,
    })
}

/// Run the full pipeline on an already-decoded image.
pub fn process_image(image: DynamicImage, config: &PipelineConfig) -> Result<RgbaImage> {
    let squared = LogoProcessor::from_dynamic(image)
        .with_config(*config)?
        .crop_caption()
        .key_background()
        .crop_to_content()
        .square();
    Ok(squared.into_rgba())
}
