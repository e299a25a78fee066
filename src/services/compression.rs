//! Image normalization and compression pipeline.
//!
//! One call decodes an upload, optionally corrects its EXIF orientation,
//! bounds its dimensions and re-encodes it as JPEG. Nothing is shared between
//! calls, so the pipeline can run concurrently without coordination.

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::io::Cursor;
use thiserror::Error;
use tracing::{debug, warn};
use validator::Validate;

use super::encoder::encode_jpeg;
use super::exif::{extract_exif_blob, read_exif};
use super::orientation::Orientation;
use crate::models::{CompressionResult, UploadOptions};
use crate::utils::validation::sniff_image_mime;

/// Client-facing text for every upload that cannot be decoded.
pub const INVALID_IMAGE_MESSAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("Invalid options: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    Decode(String),

    #[error("Image processing failed: {0}")]
    Processing(String),
}

impl CompressionError {
    /// Validation and decode failures are the client's to fix.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CompressionError::Validation(_) | CompressionError::Decode(_)
        )
    }
}

/// A decoded upload. Lives for one pipeline call.
pub struct SourceImage {
    pub pixels: DynamicImage,
    pub exif: Option<Bytes>,
    pub mime_type: &'static str,
}

impl SourceImage {
    pub fn decode(data: &[u8]) -> Result<Self, CompressionError> {
        let mime_type = sniff_image_mime(data)
            .ok_or_else(|| CompressionError::Decode(INVALID_IMAGE_MESSAGE.to_string()))?;

        let pixels = image::io::Reader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| {
                warn!(error = %e, "Could not read upload");
                CompressionError::Decode(INVALID_IMAGE_MESSAGE.to_string())
            })?
            .decode()
            .map_err(|e| {
                warn!(mime_type, error = %e, "Upload failed to decode");
                CompressionError::Decode(INVALID_IMAGE_MESSAGE.to_string())
            })?;

        Ok(Self {
            pixels,
            exif: extract_exif_blob(data),
            mime_type,
        })
    }
}

pub struct ImageCompressor;

impl ImageCompressor {
    /// Runs the full pipeline on raw upload bytes.
    pub fn compress(
        data: &[u8],
        options: &UploadOptions,
    ) -> Result<CompressionResult, CompressionError> {
        options.validate()?;

        let SourceImage {
            pixels,
            exif,
            mime_type,
        } = SourceImage::decode(data)?;

        let (source_width, source_height) = pixels.dimensions();
        debug!(
            mime_type,
            width = source_width,
            height = source_height,
            color = ?pixels.color(),
            has_exif = exif.is_some(),
            "Decoded upload"
        );

        let pixels = if options.auto_rotate {
            Self::correct_orientation(pixels, exif.as_deref())
        } else {
            pixels
        };

        let pixels = Self::fit_within(pixels, options.max_dimension);

        let exif = if options.preserve_exif { exif } else { None };
        let encoded = encode_jpeg(pixels, options.quality, exif.as_deref())
            .map_err(|e| CompressionError::Processing(e.to_string()))?;

        let compressed_size_bytes = encoded.data.len();
        debug!(
            final_width = encoded.width,
            final_height = encoded.height,
            input_size = data.len(),
            compressed_size = compressed_size_bytes,
            quality = options.quality,
            "Compressed upload"
        );

        Ok(CompressionResult {
            data: Bytes::from(encoded.data),
            final_width: encoded.width,
            final_height: encoded.height,
            compressed_size_bytes,
        })
    }

    /// Best-effort rotation: unreadable EXIF leaves the image as decoded.
    fn correct_orientation(img: DynamicImage, exif: Option<&[u8]>) -> DynamicImage {
        let Some(blob) = exif else {
            return img;
        };

        match read_exif(blob) {
            Ok(data) => {
                let orientation = Orientation::from_exif(data.orientation.unwrap_or(1));
                if orientation != Orientation::Upright {
                    debug!(?orientation, "Applying EXIF orientation");
                }
                orientation.apply(img)
            }
            Err(e) => {
                warn!(error = %e, "Error processing image orientation, continuing unrotated");
                img
            }
        }
    }

    /// Uniform factor that brings both sides within `max_dimension`.
    pub fn scale_ratio(width: u32, height: u32, max_dimension: u32) -> f64 {
        let max = f64::from(max_dimension);
        (max / f64::from(width)).min(max / f64::from(height))
    }

    /// Output size for a downscale, or `None` when the image already fits.
    /// Scaled sides are truncated, never rounded, and never drop below 1.
    pub fn target_dimensions(width: u32, height: u32, max_dimension: u32) -> Option<(u32, u32)> {
        let ratio = Self::scale_ratio(width, height, max_dimension);
        if ratio >= 1.0 {
            return None;
        }

        let scale = |side: u32| ((f64::from(side) * ratio) as u32).max(1);
        Some((scale(width), scale(height)))
    }

    fn fit_within(img: DynamicImage, max_dimension: u32) -> DynamicImage {
        let (width, height) = img.dimensions();
        match Self::target_dimensions(width, height, max_dimension) {
            Some((new_width, new_height)) => {
                debug!(
                    from = ?(width, height),
                    to = ?(new_width, new_height),
                    "Downscaling"
                );
                img.resize_exact(new_width, new_height, FilterType::Lanczos3)
            }
            None => img,
        }
    }
}
