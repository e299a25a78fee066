mod helpers;

use helpers::*;
use image::{ColorType, GenericImageView, RgbaImage};
use image_compressor::models::{DEFAULT_MAX_DIMENSION, UploadOptions};
use image_compressor::services::exif::extract_exif_blob;
use image_compressor::services::{CompressionError, ImageCompressor};

fn options(quality: u8, preserve_exif: bool, auto_rotate: bool) -> UploadOptions {
    UploadOptions::new(quality, preserve_exif, auto_rotate, DEFAULT_MAX_DIMENSION).unwrap()
}

fn decode(data: &[u8]) -> image::DynamicImage {
    image::load_from_memory(data).unwrap()
}

#[test]
fn test_small_image_keeps_dimensions() {
    let result = ImageCompressor::compress(&gradient_png(640, 480), &options(80, false, false))
        .unwrap();

    assert_eq!((result.final_width, result.final_height), (640, 480));
    assert_eq!(result.compressed_size_bytes, result.data.len());
    assert_eq!(decode(&result.data).dimensions(), (640, 480));
}

#[test]
fn test_downscale_bounds_longest_side_and_keeps_aspect() {
    let opts = UploadOptions::new(75, false, false, 100).unwrap();
    let result = ImageCompressor::compress(&gradient_png(400, 150), &opts).unwrap();

    assert_eq!((result.final_width, result.final_height), (100, 37));
    assert!(result.final_width.max(result.final_height) <= 100);
}

#[test]
fn test_large_rgba_scenario() {
    let img = RgbaImage::from_pixel(6000, 4000, image::Rgba([200, 100, 50, 77]));
    let data = encode(image::DynamicImage::ImageRgba8(img), image::ImageFormat::Png);

    let result = ImageCompressor::compress(&data, &options(80, false, true)).unwrap();

    assert_eq!((result.final_width, result.final_height), (3000, 2000));
    assert!(result.compressed_size_bytes > 0);
    assert_eq!(result.compressed_size_bytes, result.data.len());
    let decoded = decode(&result.data);
    assert_eq!(decoded.color(), ColorType::Rgb8);
    assert!(extract_exif_blob(&result.data).is_none());
}

#[test]
fn test_orientation_6_rotates_clockwise() {
    let data = jpeg_with_exif(&split_image(40, 20), &orientation_blob(6));
    let result = ImageCompressor::compress(&data, &options(95, false, true)).unwrap();

    assert_eq!((result.final_width, result.final_height), (20, 40));
    let rgb = decode(&result.data).to_rgb8();
    assert!(is_red(*rgb.get_pixel(10, 8)), "top should hold the old left side");
    assert!(is_blue(*rgb.get_pixel(10, 32)));
}

#[test]
fn test_orientation_8_rotates_counter_clockwise() {
    let data = jpeg_with_exif(&split_image(40, 20), &orientation_blob(8));
    let result = ImageCompressor::compress(&data, &options(95, false, true)).unwrap();

    assert_eq!((result.final_width, result.final_height), (20, 40));
    let rgb = decode(&result.data).to_rgb8();
    assert!(is_blue(*rgb.get_pixel(10, 8)));
    assert!(is_red(*rgb.get_pixel(10, 32)));
}

#[test]
fn test_orientation_3_rotates_half_turn() {
    let data = jpeg_with_exif(&split_image(40, 20), &orientation_blob(3));
    let result = ImageCompressor::compress(&data, &options(95, false, true)).unwrap();

    assert_eq!((result.final_width, result.final_height), (40, 20));
    let rgb = decode(&result.data).to_rgb8();
    assert!(is_blue(*rgb.get_pixel(8, 10)));
    assert!(is_red(*rgb.get_pixel(32, 10)));
}

#[test]
fn test_rotation_applies_before_downscale() {
    let data = jpeg_with_exif(&split_image(400, 200), &orientation_blob(6));
    let opts = UploadOptions::new(90, false, true, 100).unwrap();
    let result = ImageCompressor::compress(&data, &opts).unwrap();

    assert_eq!((result.final_width, result.final_height), (50, 100));
    let rgb = decode(&result.data).to_rgb8();
    assert!(is_red(*rgb.get_pixel(25, 20)));
    assert!(is_blue(*rgb.get_pixel(25, 80)));
}

#[test]
fn test_png_exif_is_rotated_and_preserved() {
    let blob = orientation_blob(6);
    let data = png_with_exif(&split_image(40, 20), &blob);
    let result = ImageCompressor::compress(&data, &options(90, true, true)).unwrap();

    assert_eq!((result.final_width, result.final_height), (20, 40));
    let rgb = decode(&result.data).to_rgb8();
    assert!(is_red(*rgb.get_pixel(10, 8)));
    assert_eq!(extract_exif_blob(&result.data).as_deref(), Some(&blob[..]));
}

#[test]
fn test_mirrored_orientation_is_left_alone() {
    for code in [2u16, 4, 5, 7] {
        let data = jpeg_with_exif(&split_image(40, 20), &orientation_blob(code));
        let result = ImageCompressor::compress(&data, &options(95, false, true)).unwrap();

        assert_eq!((result.final_width, result.final_height), (40, 20));
        let rgb = decode(&result.data).to_rgb8();
        assert!(is_red(*rgb.get_pixel(8, 10)), "orientation {} moved pixels", code);
    }
}

#[test]
fn test_auto_rotate_off_ignores_orientation() {
    let data = jpeg_with_exif(&split_image(40, 20), &orientation_blob(6));
    let result = ImageCompressor::compress(&data, &options(95, false, false)).unwrap();

    assert_eq!((result.final_width, result.final_height), (40, 20));
}

#[test]
fn test_malformed_exif_continues_unrotated() {
    let data = jpeg_with_exif(&split_image(40, 20), b"definitely not a tiff header");
    let result = ImageCompressor::compress(&data, &options(90, false, true)).unwrap();

    assert_eq!((result.final_width, result.final_height), (40, 20));
}

#[test]
fn test_preserve_exif_copies_block_verbatim() {
    let blob = orientation_blob(1);
    let data = jpeg_with_exif(&split_image(40, 20), &blob);

    let kept = ImageCompressor::compress(&data, &options(80, true, false)).unwrap();
    assert_eq!(extract_exif_blob(&kept.data).as_deref(), Some(&blob[..]));

    let stripped = ImageCompressor::compress(&data, &options(80, false, false)).unwrap();
    assert!(extract_exif_blob(&stripped.data).is_none());
}

#[test]
fn test_preserve_exif_without_source_exif() {
    let result = ImageCompressor::compress(&gradient_png(32, 32), &options(80, true, true)).unwrap();
    assert!(extract_exif_blob(&result.data).is_none());
}

#[test]
fn test_lower_quality_produces_smaller_output() {
    let data = noisy_png(128, 128);
    let low = ImageCompressor::compress(&data, &options(10, false, false)).unwrap();
    let high = ImageCompressor::compress(&data, &options(95, false, false)).unwrap();

    assert!(
        low.compressed_size_bytes < high.compressed_size_bytes,
        "q10={} q95={}",
        low.compressed_size_bytes,
        high.compressed_size_bytes
    );
}

#[test]
fn test_alpha_and_palette_inputs_become_rgb() {
    for data in [rgba_png(30, 20), palette_gif(30, 20)] {
        let result = ImageCompressor::compress(&data, &options(80, false, false)).unwrap();
        assert_eq!(decode(&result.data).color(), ColorType::Rgb8);
    }
}

#[test]
fn test_grayscale_input_stays_grayscale() {
    let result = ImageCompressor::compress(&gray_png(30, 20), &options(80, false, false)).unwrap();
    assert_eq!(decode(&result.data).color(), ColorType::L8);
}

#[test]
fn test_non_image_is_decode_error() {
    let err = ImageCompressor::compress(b"%PDF-1.5 this is a document", &options(80, false, false))
        .unwrap_err();
    assert!(matches!(err, CompressionError::Decode(_)));
}

#[test]
fn test_same_input_same_output() {
    let data = gradient_png(50, 50);
    let first = ImageCompressor::compress(&data, &options(60, false, false)).unwrap();
    let second = ImageCompressor::compress(&data, &options(60, false, false)).unwrap();
    assert_eq!(first.data, second.data);
}
