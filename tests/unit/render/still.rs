use super::*;

#[test]
fn still_is_rendered_at_the_high_res_multiplier() {
    let preset = Preset::default()
        .with_value("rec.highResScale", 3.into())
        .unwrap();
    let tex = Texture::test_card(8, 8);
    let art = export_still(&tex, &preset, Canvas::new(10, 6).unwrap(), Duration::ZERO).unwrap();

    assert_eq!(art.kind, ArtifactKind::Still);
    assert_eq!(art.mime, "image/png");
    assert!(art.filename.starts_with("refract-render-"));

    let decoded = image::load_from_memory(&art.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (30, 18));
}
