use super::*;

#[test]
fn default_preset_compiles_to_grid_and_box() {
    let plan = TransformPlan::from_preset(&Preset::default());
    assert!((plan.seed - 0.79).abs() < 1e-12);
    assert_eq!(plan.wrap, WrapMode::Mirror);
    assert_eq!(
        plan.refraction,
        Refraction::Grid {
            level: Vec2::new(0.25, 0.25),
            cells: Vec2::new(16.0, 16.0),
        }
    );
    assert!(matches!(plan.displacement, Displacement::Box(_)));
    assert_eq!(plan.channel_split(), None);
}

#[test]
fn flow_octaves_are_clamped_at_compile_time() {
    let p = Preset::default()
        .with_value("displace.type", "flow".into())
        .unwrap()
        .with_value("displace.flow.octaves", 20.into())
        .unwrap();
    let Displacement::Flow(flow) = TransformPlan::from_preset(&p).displacement else {
        panic!("expected flow");
    };
    assert_eq!(flow.octaves, 8);
}

#[test]
fn zero_grid_count_collapses_to_one_tile() {
    let p = Preset::default()
        .with_value("refract.grid.x", 0.into())
        .unwrap();
    let Refraction::Grid { cells, .. } = TransformPlan::from_preset(&p).refraction else {
        panic!("expected grid");
    };
    assert_eq!(cells, Vec2::new(1.0, 16.0));
}

#[test]
fn glitch_split_is_exposed_only_when_positive() {
    let p = crate::preset::factory::factory_preset("Cyber Prism").unwrap();
    assert_eq!(TransformPlan::from_preset(&p).channel_split(), Some(0.05));

    let p = p.with_value("displace.glitch.split", 0.into()).unwrap();
    assert_eq!(TransformPlan::from_preset(&p).channel_split(), None);
}

#[test]
fn liquid_compiles_to_reserved_variant() {
    let p = Preset::default()
        .with_value("displace.type", "liquid".into())
        .unwrap();
    assert_eq!(TransformPlan::from_preset(&p).displacement, Displacement::Liquid);
}
