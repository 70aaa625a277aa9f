use super::*;

#[test]
fn every_factory_preset_validates() {
    for name in factory_names() {
        let p = factory_preset(name).unwrap_or_else(|| panic!("missing factory preset {name}"));
        p.validate().unwrap();
    }
    Preset::default().validate().unwrap();
}

#[test]
fn lookup_is_case_insensitive_and_rejects_unknown() {
    let p = factory_preset("BLACK HOLE").unwrap();
    assert_eq!(p.displace.kind, DisplaceType::Whirl);
    assert_eq!(p.displace.whirl.radius, 0.8);
    assert_eq!(p.refract.kind, RefractType::None);
    assert!(factory_preset("nope").is_none());
}

#[test]
fn named_presets_only_override_their_own_blocks() {
    let base = Preset::default();
    let p = factory_preset("Obsidian Flow").unwrap();
    assert_eq!(p.displace.flow.octaves, 4);
    assert_eq!(p.displace.box_, base.displace.box_);
    assert_eq!(p.rec, base.rec);
    assert_eq!(p.seed, base.seed);
}
