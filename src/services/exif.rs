use bytes::Bytes;
use exif::{In, Reader, Tag};
use img_parts::{DynImage, ImageEXIF};
use thiserror::Error;

/// Marker that prefixes EXIF data inside a JPEG APP1 segment.
pub const EXIF_APP1_HEADER: &[u8] = b"Exif\0\0";

#[derive(Debug, Error)]
pub enum ExifReadFailure {
    #[error("malformed EXIF block: {0}")]
    Malformed(#[from] exif::Error),
}

/// The EXIF fields the pipeline acts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExifData {
    pub orientation: Option<u32>,
}

/// Pulls the raw EXIF blob out of a JPEG, PNG or WebP container, exactly as
/// stored. Containers img-parts does not know carry no blob.
pub fn extract_exif_blob(data: &[u8]) -> Option<Bytes> {
    match DynImage::from_bytes(Bytes::copy_from_slice(data)) {
        Ok(Some(container)) => container.exif(),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable image container, ignoring embedded EXIF");
            None
        }
    }
}

/// Parses a raw EXIF blob.
pub fn read_exif(blob: &[u8]) -> Result<ExifData, ExifReadFailure> {
    let exif = Reader::new().read_raw(blob.to_vec())?;
    let orientation = exif
        .get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0));

    Ok(ExifData { orientation })
}

/// Wraps a raw blob into an APP1 segment payload.
pub fn app1_payload(blob: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(EXIF_APP1_HEADER.len() + blob.len());
    payload.extend_from_slice(EXIF_APP1_HEADER);
    payload.extend_from_slice(blob);
    payload
}

#[cfg(test)]
#[path = "../../tests/helpers/exif_fixture.rs"]
pub(crate) mod test_fixture;
