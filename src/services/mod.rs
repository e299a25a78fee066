pub mod compression;
pub mod encoder;
pub mod exif;
pub mod orientation;

pub use compression::{CompressionError, ImageCompressor, SourceImage};
