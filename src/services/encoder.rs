use image::{ColorType, DynamicImage, GenericImageView};
use jpeg_encoder::{ColorType as JpegColorType, Encoder, EncodingError};
use thiserror::Error;

use super::exif::app1_payload;

/// Pixel layouts a baseline JPEG can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegLayout {
    Luma,
    Rgb,
}

/// Decoded layout -> JPEG layout. Anything missing here (alpha, 16-bit or
/// float color, palette images the decoder expanded) becomes 8-bit RGB.
const LAYOUT_TABLE: &[(ColorType, JpegLayout)] = &[
    (ColorType::L8, JpegLayout::Luma),
    (ColorType::L16, JpegLayout::Luma),
    (ColorType::Rgb8, JpegLayout::Rgb),
];

/// Largest EXIF blob that fits a single APP1 segment next to its header.
const MAX_APP1_EXIF_LEN: usize = 65533 - 6;

#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("image of {width}x{height} exceeds the JPEG size limit")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("EXIF block of {0} bytes does not fit a JPEG APP1 segment")]
    ExifTooLarge(usize),

    #[error("JPEG encoding failed: {0}")]
    Jpeg(#[from] EncodingError),
}

pub struct EncodedJpeg {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub fn jpeg_layout(color: ColorType) -> JpegLayout {
    LAYOUT_TABLE
        .iter()
        .find(|(source, _)| *source == color)
        .map(|(_, layout)| *layout)
        .unwrap_or(JpegLayout::Rgb)
}

impl JpegLayout {
    /// The decoded layout the encoder takes as is.
    pub fn native_color(self) -> ColorType {
        match self {
            JpegLayout::Luma => ColorType::L8,
            JpegLayout::Rgb => ColorType::Rgb8,
        }
    }
}

/// Whether the decoded buffer can be handed to the encoder without conversion.
pub fn supports_direct_encode(color: ColorType) -> bool {
    jpeg_layout(color).native_color() == color
}

/// Converts to the layout chosen by [`jpeg_layout`], reusing the buffer when
/// it is already in that form.
fn into_jpeg_pixels(img: DynamicImage) -> (JpegLayout, Vec<u8>) {
    match (jpeg_layout(img.color()), img) {
        (JpegLayout::Luma, DynamicImage::ImageLuma8(buf)) => (JpegLayout::Luma, buf.into_raw()),
        (JpegLayout::Luma, other) => (JpegLayout::Luma, other.to_luma8().into_raw()),
        (JpegLayout::Rgb, DynamicImage::ImageRgb8(buf)) => (JpegLayout::Rgb, buf.into_raw()),
        (JpegLayout::Rgb, other) => (JpegLayout::Rgb, other.to_rgb8().into_raw()),
    }
}

/// Encodes with optimized Huffman tables, embedding `exif` verbatim as APP1
/// when given.
pub fn encode_jpeg(
    img: DynamicImage,
    quality: u8,
    exif: Option<&[u8]>,
) -> Result<EncodedJpeg, EncoderError> {
    let (width, height) = img.dimensions();
    let (w16, h16) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(EncoderError::DimensionsTooLarge { width, height }),
    };

    let source_color = img.color();
    let (layout, pixels) = into_jpeg_pixels(img);
    if !supports_direct_encode(source_color) {
        tracing::debug!(from = ?source_color, to = ?layout, "Converted pixel layout for JPEG");
    }

    let mut data = Vec::new();
    let mut encoder = Encoder::new(&mut data, quality);
    encoder.set_optimized_huffman_tables(true);

    if let Some(blob) = exif {
        if blob.len() > MAX_APP1_EXIF_LEN {
            return Err(EncoderError::ExifTooLarge(blob.len()));
        }
        encoder.add_app_segment(1, &app1_payload(blob))?;
    }

    let color = match layout {
        JpegLayout::Luma => JpegColorType::Luma,
        JpegLayout::Rgb => JpegColorType::Rgb,
    };
    encoder.encode(&pixels, w16, h16, color)?;

    Ok(EncodedJpeg {
        data,
        width,
        height,
    })
}
