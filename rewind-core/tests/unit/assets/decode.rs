use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn same_size_decode_keeps_pixels_and_premultiplies() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let prepared = decode_image_resized(&png_bytes(img), 1, 1).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn transparent_pixels_become_zero() {
    let img = image::RgbaImage::from_raw(1, 1, vec![255u8, 255, 255, 0]).unwrap();
    let prepared = decode_image_resized(&png_bytes(img), 1, 1).unwrap();
    assert_eq!(prepared.rgba8_premul.as_slice(), &[0, 0, 0, 0]);
}

#[test]
fn resized_decode_hits_exact_target_size() {
    let img = image::RgbaImage::from_pixel(200, 100, image::Rgba([10, 20, 30, 255]));
    let prepared = decode_image_resized(&png_bytes(img), 70, 70).unwrap();
    assert_eq!((prepared.width, prepared.height), (70, 70));
    assert_eq!(prepared.rgba8_premul.len(), 70 * 70 * 4);
    // A flat opaque image stays flat after Lanczos resampling.
    assert_eq!(&prepared.rgba8_premul[0..4], &[10, 20, 30, 255]);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image_resized(b"not an image", 10, 10).is_err());
}

#[test]
fn zero_resize_target_is_rejected() {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
    let err = decode_image_resized(&png_bytes(img), 0, 10).unwrap_err();
    assert!(matches!(err, RewindError::Validation(_)));
}
