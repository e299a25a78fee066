/// Little-endian TIFF block holding a single Orientation entry.
pub fn orientation_blob(orientation: u16) -> Vec<u8> {
    let mut blob = vec![b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
    blob.extend_from_slice(&1u16.to_le_bytes());
    blob.extend_from_slice(&0x0112u16.to_le_bytes());
    blob.extend_from_slice(&3u16.to_le_bytes());
    blob.extend_from_slice(&1u32.to_le_bytes());
    blob.extend_from_slice(&orientation.to_le_bytes());
    blob.extend_from_slice(&[0, 0]);
    blob.extend_from_slice(&0u32.to_le_bytes());
    blob
}
