use super::*;
use crate::preset::model::Preset;

#[test]
fn none_refraction_with_liquid_is_a_pure_identity() {
    let p = Preset::default()
        .with_value("refract.type", "none".into())
        .unwrap()
        .with_value("displace.type", "liquid".into())
        .unwrap()
        .with_value("cnv.wrap", "CLAMP".into())
        .unwrap();
    let plan = TransformPlan::from_preset(&p);
    for t in [0.0, 0.5, 13.0] {
        for i in 0..=8 {
            let uv = Vec2::new(f64::from(i) / 8.0, 1.0 - f64::from(i) / 8.0);
            let s = evaluate(uv, t, &plan);
            assert_eq!(s.refracted, uv);
            assert_eq!(s.offset, Vec2::ZERO);
            assert_eq!(s.final_uv(&plan), Some(uv));
        }
    }
}

#[test]
fn displacement_is_applied_to_the_refracted_coordinate() {
    let p = Preset::default()
        .with_value("displace.type", "pinch".into())
        .unwrap();
    let plan = TransformPlan::from_preset(&p);
    let uv = Vec2::new(0.52, 0.47);
    let s = evaluate(uv, 1.0, &plan);
    let expected = displace(s.refracted, 1.0, &plan.displacement, plan.seed);
    assert_eq!(s.offset, expected);
}

#[test]
fn evaluation_is_deterministic_for_equal_seed_and_time() {
    let plan = TransformPlan::from_preset(
        &crate::preset::factory::factory_preset("Voronoi Glass").unwrap(),
    );
    let uv = Vec2::new(0.123, 0.456);
    assert_eq!(evaluate(uv, 2.5, &plan), evaluate(uv, 2.5, &plan));
}

#[test]
fn split_is_carried_for_glitch() {
    let plan = TransformPlan::from_preset(
        &crate::preset::factory::factory_preset("Cyber Prism").unwrap(),
    );
    assert_eq!(evaluate(Vec2::new(0.5, 0.5), 0.0, &plan).split, Some(0.05));
}
