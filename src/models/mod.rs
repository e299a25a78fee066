use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Default bound for the longer side of the output image.
pub const DEFAULT_MAX_DIMENSION: u32 = 3000;

/// Per-request compression settings.
///
/// Construct through [`UploadOptions::new`] so the quality range is checked
/// before the pipeline ever sees the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UploadOptions {
    #[validate(range(min = 1, max = 100, message = "Ensure this value is between 1 and 100."))]
    pub quality: u8,
    pub preserve_exif: bool,
    pub auto_rotate: bool,
    #[validate(range(min = 1, message = "Maximum dimension must be at least 1 pixel."))]
    pub max_dimension: u32,
}

impl UploadOptions {
    pub fn new(
        quality: u8,
        preserve_exif: bool,
        auto_rotate: bool,
        max_dimension: u32,
    ) -> Result<Self, validator::ValidationErrors> {
        let options = Self {
            quality,
            preserve_exif,
            auto_rotate,
            max_dimension,
        };
        options.validate()?;
        Ok(options)
    }
}

/// Output of one pipeline run. The encoded data is always JPEG.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    pub data: Bytes,
    pub final_width: u32,
    pub final_height: u32,
    pub compressed_size_bytes: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompressionStats {
    pub final_width: u32,
    pub final_height: u32,
    pub compressed_size: usize,
}

impl From<&CompressionResult> for CompressionStats {
    fn from(result: &CompressionResult) -> Self {
        Self {
            final_width: result.final_width,
            final_height: result.final_height,
            compressed_size: result.compressed_size_bytes,
        }
    }
}
