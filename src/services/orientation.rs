use image::DynamicImage;

/// Rotation derived from the EXIF orientation tag.
///
/// Only the pure rotations (3, 6 and 8) are corrected. The mirrored codes
/// 2, 4, 5 and 7 pass through untouched, as do unknown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Upright,
    Rotate180,
    /// Quarter turn clockwise; W×H becomes H×W.
    Rotate90,
    /// Quarter turn counter-clockwise; W×H becomes H×W.
    Rotate270,
}

impl Orientation {
    pub fn from_exif(value: u32) -> Self {
        match value {
            3 => Orientation::Rotate180,
            6 => Orientation::Rotate90,
            8 => Orientation::Rotate270,
            _ => Orientation::Upright,
        }
    }

    /// Rotates with an expanded canvas, so quarter turns swap the dimensions.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Orientation::Upright => img,
            Orientation::Rotate180 => img.rotate180(),
            Orientation::Rotate90 => img.rotate90(),
            Orientation::Rotate270 => img.rotate270(),
        }
    }
}
