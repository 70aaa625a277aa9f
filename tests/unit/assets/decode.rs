use std::io::Cursor;

use super::*;

fn encode_png(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_keeps_straight_alpha() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let tex = decode_texture(&encode_png(img)).unwrap();
    assert_eq!((tex.width, tex.height), (1, 1));
    assert_eq!(tex.rgba8.as_slice(), &[100, 50, 200, 128]);
}

#[test]
fn decode_rejects_garbage() {
    let err = decode_texture(b"definitely not an image").unwrap_err();
    assert!(matches!(err, PrismError::Other(_)));
}

#[test]
fn from_rgba8_checks_length() {
    assert!(Texture::from_rgba8(2, 2, vec![0; 16]).is_ok());
    assert!(Texture::from_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(Texture::from_rgba8(0, 2, Vec::new()).is_err());
}

#[test]
fn texel_indexes_row_major() {
    let data = (0u8..16).collect::<Vec<_>>();
    let tex = Texture::from_rgba8(2, 2, data).unwrap();
    assert_eq!(tex.texel(1, 0), [4, 5, 6, 7]);
    assert_eq!(tex.texel(0, 1), [8, 9, 10, 11]);
}

#[test]
fn test_card_is_opaque_and_sized() {
    let tex = Texture::test_card(16, 8);
    assert_eq!(tex.rgba8.len(), 16 * 8 * 4);
    assert!(tex.rgba8.chunks_exact(4).all(|px| px[3] == 255));
}
