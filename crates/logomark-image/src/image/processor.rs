// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Logo processor — caption crop, chroma-key to alpha, content crop and square
// compositing. Operates on an in-memory RGBA buffer using the `image` crate.

use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageReader, Rgba, RgbaImage, imageops};
use logomark_core::config::PipelineConfig;
use logomark_core::error::{LogomarkError, Result};
use logomark_core::types::{BoundingBox, SquareLayout};
use tracing::{debug, info, instrument, warn};

use crate::integrity::hash_bytes;
use crate::output::write_atomic;

/// Fully transparent black, used for keyed pixels and canvas fill.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Logo pipeline operating on a single in-memory RGBA image.
///
/// Each stage consumes `self` and returns a new `LogoProcessor`, so the full
/// pipeline reads as a chain:
///
/// ```ignore
/// let png = LogoProcessor::open("logo.jpg")?
///     .crop_caption()
///     .key_background()
///     .crop_to_content()
///     .square()
///     .to_png_bytes()?;
/// ```
pub struct LogoProcessor {
    /// The current working image, always 4-channel.
    image: RgbaImage,
    config: PipelineConfig,
    /// Foreground bounds recorded by the last `key_background`, consumed by
    /// `crop_to_content`.
    content_box: Option<BoundingBox>,
}

/// Result of a successful `save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub bytes_written: usize,
    pub sha256: String,
}

impl LogoProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path, normalising it to RGBA.
    ///
    /// The format is sniffed from the file's leading bytes, so a PNG without
    /// an extension or saved as `.jpg` still decodes.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let decode_error = |err: &dyn std::fmt::Display| {
            LogomarkError::Decode(format!("failed to open {}: {}", path.display(), err))
        };

        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|err| decode_error(&err))?;
        debug!(format = ?reader.format(), "Input format detected");
        let img = reader.decode().map_err(|err| decode_error(&err))?;
        info!(width = img.width(), height = img.height(), "Logo loaded");
        Ok(Self::from_dynamic(img))
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|err| {
            LogomarkError::Decode(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Logo decoded from bytes"
        );
        Ok(Self::from_dynamic(img))
    }

    /// Wrap an already-decoded image. Missing alpha becomes fully opaque.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::from_rgba(image.into_rgba8())
    }

    /// Wrap an RGBA buffer as-is.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            image,
            config: PipelineConfig::default(),
            content_box: None,
        }
    }

    /// Replace the pipeline constants after validating them.
    pub fn with_config(self, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, ..self })
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Foreground bounds found by `key_background`, if any pixel survived.
    pub fn content_box(&self) -> Option<BoundingBox> {
        self.content_box
    }

    /// Borrow the underlying buffer.
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    /// Consume the processor and return the underlying buffer.
    pub fn into_rgba(self) -> RgbaImage {
        self.image
    }

    // -- Stages (consume self, return new Self) --------------------------------

    /// Drop the bottom rows holding the caption, keeping
    /// `floor(height * caption_keep_ratio)` rows from the top.
    #[instrument(skip(self), fields(width = self.width(), height = self.height()))]
    pub fn crop_caption(self) -> Self {
        let (width, height) = self.image.dimensions();
        let keep = caption_crop_height(height, self.config.caption_keep_ratio);
        if keep == 0 {
            warn!(height, "Caption crop leaves no rows");
        }
        info!(keep, dropped = height - keep, "Cropping caption");

        let cropped = imageops::crop_imm(&self.image, 0, 0, width, keep).to_image();
        Self {
            image: cropped,
            content_box: None,
            ..self
        }
    }

    /// Turn near-black pixels fully transparent and record the bounds of
    /// everything that was kept.
    #[instrument(skip(self), fields(width = self.width(), height = self.height()))]
    pub fn key_background(mut self) -> Self {
        let threshold = self.config.background_threshold;
        let mut bounds = None;
        let mut keyed = 0usize;

        for (x, y, pixel) in self.image.enumerate_pixels_mut() {
            if is_background(pixel, threshold) {
                *pixel = TRANSPARENT;
                keyed += 1;
            } else {
                bounds = BoundingBox::extend(bounds, x, y);
            }
        }

        match bounds {
            Some(bounds) => info!(keyed, %bounds, "Background keyed out"),
            None => warn!(keyed, "Every pixel is background"),
        }
        self.content_box = bounds;
        self
    }

    /// Crop to the bounds recorded by `key_background`. A no-op when no
    /// foreground pixel was found.
    #[instrument(skip(self), fields(width = self.width(), height = self.height()))]
    pub fn crop_to_content(mut self) -> Self {
        let Some(bounds) = self.content_box.take() else {
            debug!("No content bounds, skipping content crop");
            return self;
        };
        info!(%bounds, "Cropping to content");

        let cropped = imageops::crop_imm(
            &self.image,
            bounds.min_x,
            bounds.min_y,
            bounds.width(),
            bounds.height(),
        )
        .to_image();
        Self {
            image: cropped,
            ..self
        }
    }

    /// Centre the image on a transparent square canvas of side
    /// `max(width, height)`. Source pixels overwrite the canvas without
    /// blending.
    #[instrument(skip(self), fields(width = self.width(), height = self.height()))]
    pub fn square(self) -> Self {
        let layout = SquareLayout::for_size(self.image.width(), self.image.height());
        info!(
            side = layout.side,
            x_offset = layout.x_offset,
            y_offset = layout.y_offset,
            "Squaring canvas"
        );

        let mut canvas = RgbaImage::from_pixel(layout.side, layout.side, TRANSPARENT);
        imageops::replace(
            &mut canvas,
            &self.image,
            i64::from(layout.x_offset),
            i64::from(layout.y_offset),
        );
        Self {
            image: canvas,
            content_box: None,
            ..self
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.image
            .write_with_encoder(PngEncoder::new(&mut buffer))
            .map_err(|err| LogomarkError::Encode(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Encode as PNG and replace `path` atomically. On error nothing is left
    /// at `path` that was not there before.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<SavedImage> {
        let bytes = self.to_png_bytes()?;
        write_atomic(path.as_ref(), &bytes)?;

        let saved = SavedImage {
            bytes_written: bytes.len(),
            sha256: hash_bytes(&bytes),
        };
        info!(bytes = saved.bytes_written, sha256 = %saved.sha256, "PNG written");
        Ok(saved)
    }
}

/// Number of rows kept from the top: `floor(height * ratio)`, never more than
/// `height`.
pub fn caption_crop_height(height: u32, ratio: f64) -> u32 {
    let keep = (f64::from(height) * ratio).floor();
    if keep <= 0.0 {
        0
    } else {
        (keep as u32).min(height)
    }
}

/// Background iff red, green and blue are all strictly below `threshold`.
/// Alpha is ignored.
pub fn is_background(pixel: &Rgba<u8>, threshold: u8) -> bool {
    let Rgba([r, g, b, _]) = *pixel;
    r < threshold && g < threshold && b < threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn run_all(processor: LogoProcessor) -> RgbaImage {
        processor
            .crop_caption()
            .key_background()
            .crop_to_content()
            .square()
            .into_rgba()
    }

    #[test]
    fn caption_crop_height_floors() {
        assert_eq!(caption_crop_height(100, 0.8), 80);
        assert_eq!(caption_crop_height(101, 0.8), 80);
        assert_eq!(caption_crop_height(5, 0.8), 4);
        assert_eq!(caption_crop_height(1, 0.8), 0);
        assert_eq!(caption_crop_height(0, 0.8), 0);
        assert_eq!(caption_crop_height(37, 1.0), 37);
    }

    #[test]
    fn crop_caption_keeps_top_rows_and_width() {
        let mut img = RgbaImage::from_pixel(7, 101, BLACK);
        img.put_pixel(3, 79, WHITE);
        img.put_pixel(3, 80, Rgba([1, 2, 3, 255]));

        let cropped = LogoProcessor::from_rgba(img).crop_caption();
        assert_eq!((cropped.width(), cropped.height()), (7, 80));
        assert_eq!(*cropped.as_rgba().get_pixel(3, 79), WHITE);
    }

    #[test]
    fn background_threshold_is_strict_per_channel() {
        assert!(is_background(&Rgba([29, 29, 29, 255]), 30));
        assert!(is_background(&Rgba([0, 0, 0, 0]), 30));
        assert!(!is_background(&Rgba([30, 0, 0, 255]), 30));
        assert!(!is_background(&Rgba([0, 30, 0, 255]), 30));
        assert!(!is_background(&Rgba([0, 0, 30, 255]), 30));
        // Sum well above 30 but every channel below: still background.
        assert!(is_background(&Rgba([29, 29, 29, 0]), 30));
    }

    #[test]
    fn key_background_clears_dark_pixels_and_keeps_others() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 29, 255]));
        img.put_pixel(1, 2, Rgba([200, 10, 10, 255]));
        img.put_pixel(2, 1, Rgba([30, 30, 30, 128]));

        let keyed = LogoProcessor::from_rgba(img).key_background();
        let out = keyed.as_rgba();
        assert_eq!(*out.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*out.get_pixel(1, 2), Rgba([200, 10, 10, 255]));
        assert_eq!(*out.get_pixel(2, 1), Rgba([30, 30, 30, 128]));
        assert_eq!(
            keyed.content_box(),
            Some(BoundingBox {
                min_x: 1,
                min_y: 1,
                max_x: 2,
                max_y: 2
            })
        );
    }

    #[test]
    fn crop_to_content_without_key_is_noop() {
        let img = RgbaImage::from_pixel(6, 3, WHITE);
        let out = LogoProcessor::from_rgba(img.clone()).crop_to_content();
        assert_eq!(out.into_rgba(), img);
    }

    #[test]
    fn crop_to_content_uses_inclusive_bounds() {
        let mut img = RgbaImage::from_pixel(10, 10, BLACK);
        img.put_pixel(2, 3, WHITE);
        img.put_pixel(6, 4, WHITE);

        let out = LogoProcessor::from_rgba(img)
            .key_background()
            .crop_to_content();
        assert_eq!((out.width(), out.height()), (5, 2));
        assert_eq!(*out.as_rgba().get_pixel(0, 0), WHITE);
        assert_eq!(*out.as_rgba().get_pixel(4, 1), WHITE);
        assert_eq!(*out.as_rgba().get_pixel(1, 0), TRANSPARENT);
    }

    #[test]
    fn single_foreground_pixel_crops_to_one_by_one() {
        let colour = Rgba([180, 90, 40, 255]);
        let mut img = RgbaImage::from_pixel(20, 20, BLACK);
        img.put_pixel(13, 5, colour);

        let out = LogoProcessor::from_rgba(img)
            .crop_caption()
            .key_background()
            .crop_to_content();
        assert_eq!((out.width(), out.height()), (1, 1));
        assert_eq!(*out.as_rgba().get_pixel(0, 0), colour);
    }

    #[test]
    fn all_black_input_becomes_transparent_square() {
        let img = RgbaImage::from_pixel(30, 50, Rgba([12, 12, 12, 255]));
        let out = run_all(LogoProcessor::from_rgba(img));

        // side = max(30, floor(50 * 0.8)) = 40
        assert_eq!(out.dimensions(), (40, 40));
        assert!(out.pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn all_black_wide_input_keeps_width_as_side() {
        let img = RgbaImage::from_pixel(64, 10, BLACK);
        let out = run_all(LogoProcessor::from_rgba(img));
        assert_eq!(out.dimensions(), (64, 64));
    }

    #[test]
    fn square_centres_narrow_content() {
        let img = RgbaImage::from_pixel(4, 10, WHITE);
        let out = LogoProcessor::from_rgba(img).square().into_rgba();

        assert_eq!(out.dimensions(), (10, 10));
        for y in 0..10 {
            for x in 0..10 {
                let expected = if (3..=6).contains(&x) { WHITE } else { TRANSPARENT };
                assert_eq!(*out.get_pixel(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn square_overwrites_without_blending() {
        let half = Rgba([255, 0, 0, 100]);
        let img = RgbaImage::from_pixel(2, 1, half);
        let out = LogoProcessor::from_rgba(img).square().into_rgba();
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(*out.get_pixel(0, 0), half);
        assert_eq!(*out.get_pixel(1, 0), half);
        assert_eq!(*out.get_pixel(0, 1), TRANSPARENT);
    }

    #[test]
    fn output_is_always_square() {
        for (w, h) in [(1, 1), (3, 17), (17, 3), (8, 8), (9, 2), (1, 100)] {
            let mut img = RgbaImage::from_pixel(w, h, BLACK);
            img.put_pixel(w / 2, 0, WHITE);
            img.put_pixel(w - 1, h.saturating_sub(1) / 2, Rgba([90, 200, 90, 255]));
            let out = run_all(LogoProcessor::from_rgba(img));
            assert_eq!(out.width(), out.height(), "input {w}x{h}");
        }
    }

    #[test]
    fn one_row_input_crops_to_nothing_without_panicking() {
        let img = RgbaImage::from_pixel(5, 1, WHITE);
        let cropped = LogoProcessor::from_rgba(img).crop_caption();
        assert_eq!((cropped.width(), cropped.height()), (5, 0));

        let out = cropped.key_background().crop_to_content().square();
        assert_eq!((out.width(), out.height()), (5, 5));
        assert!(out.as_rgba().pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn empty_buffer_squares_to_single_transparent_pixel() {
        let out = LogoProcessor::from_rgba(RgbaImage::new(0, 0))
            .key_background()
            .crop_to_content()
            .square()
            .into_rgba();
        assert_eq!(out.dimensions(), (1, 1));
        assert_eq!(*out.get_pixel(0, 0), TRANSPARENT);
    }

    #[test]
    fn rgb_input_is_normalised_to_opaque_rgba() {
        let img = RgbImage::from_pixel(2, 2, Rgb([100, 150, 200]));
        let processor = LogoProcessor::from_dynamic(DynamicImage::ImageRgb8(img));
        assert_eq!(*processor.as_rgba().get_pixel(1, 1), Rgba([100, 150, 200, 255]));
    }

    #[test]
    fn custom_threshold_is_applied() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([50, 50, 50, 255]));
        let config = PipelineConfig {
            caption_keep_ratio: 1.0,
            background_threshold: 60,
        };
        let keyed = LogoProcessor::from_rgba(img)
            .with_config(config)
            .unwrap()
            .crop_caption()
            .key_background();
        assert_eq!(keyed.height(), 2);
        assert!(keyed.content_box().is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PipelineConfig {
            caption_keep_ratio: 0.0,
            ..Default::default()
        };
        let result = LogoProcessor::from_rgba(RgbaImage::new(1, 1)).with_config(config);
        assert!(matches!(result, Err(LogomarkError::InvalidConfig(_))));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let result = LogoProcessor::from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(LogomarkError::Decode(_))));
    }

    #[test]
    fn png_bytes_round_trip() {
        let mut img = RgbaImage::from_pixel(3, 3, TRANSPARENT);
        img.put_pixel(1, 1, Rgba([10, 200, 30, 77]));
        let processor = LogoProcessor::from_rgba(img.clone());

        let bytes = processor.to_png_bytes().unwrap();
        let decoded = LogoProcessor::from_bytes(&bytes).unwrap().into_rgba();
        assert_eq!(decoded, img);
    }
}
