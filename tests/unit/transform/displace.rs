use super::*;

fn radial(radius: f64, strength: f64) -> RadialParams {
    RadialParams {
        radius,
        strength,
        speed: 1.0,
    }
}

// sin(t * speed) is non-zero here so any in-radius offset is visible.
const T: f64 = 1.0;

#[test]
fn whirl_and_pinch_are_zero_at_and_beyond_the_radius() {
    let whirl = Displacement::Whirl(radial(0.25, 5.0));
    let pinch = Displacement::Pinch(radial(0.25, 0.5));
    for uv in [
        Vec2::new(0.75, 0.5),
        Vec2::new(0.5, 0.25),
        Vec2::new(0.9, 0.9),
        Vec2::new(0.0, 0.0),
    ] {
        assert_eq!(displace(uv, T, &whirl, 0.0), Vec2::ZERO, "{uv:?}");
        assert_eq!(displace(uv, T, &pinch, 0.0), Vec2::ZERO, "{uv:?}");
    }
}

#[test]
fn whirl_and_pinch_are_active_inside_the_radius() {
    let uv = Vec2::new(0.6, 0.5);
    assert_ne!(displace(uv, T, &Displacement::Whirl(radial(0.5, 5.0)), 0.0), Vec2::ZERO);
    assert_ne!(displace(uv, T, &Displacement::Pinch(radial(0.5, 0.5)), 0.0), Vec2::ZERO);
}

#[test]
fn non_positive_radius_never_divides() {
    let uv = Vec2::new(0.5, 0.5);
    assert_eq!(displace(uv, T, &Displacement::Whirl(radial(0.0, 5.0)), 0.0), Vec2::ZERO);
    assert_eq!(displace(uv, T, &Displacement::Pinch(radial(0.0, 5.0)), 0.0), Vec2::ZERO);
}

#[test]
fn whirl_offset_preserves_distance_to_center() {
    let uv = Vec2::new(0.6, 0.55);
    let rel = uv - CENTER;
    let off = displace(uv, T, &Displacement::Whirl(radial(0.5, 3.0)), 0.0);
    assert!(((rel + off).hypot() - rel.hypot()).abs() < 1e-12);
}

#[test]
fn pinch_offset_is_radial() {
    let uv = Vec2::new(0.6, 0.55);
    let rel = uv - CENTER;
    let off = displace(uv, T, &Displacement::Pinch(radial(0.5, 0.5)), 0.0);
    assert!(rel.cross(off).abs() < 1e-12);
}

#[test]
fn box_offset_matches_stepped_formula() {
    let p = BoxParams {
        amp: Vec2::new(80.0, 20.0),
        freq: Vec2::new(8.5, 20.0),
        speed: Vec2::new(10.0, 10.0),
    };
    let uv = Vec2::new(0.3, 0.72);
    let t = 2.0;
    let bx = (0.3f64 * 8.5 + 2.0).floor();
    let by = (0.72f64 * 20.0 + 2.0).floor();
    let expected = Vec2::new(bx.sin() * 0.08, by.cos() * 0.02);
    let got = displace(uv, t, &Displacement::Box(p), 0.0);
    assert!((got - expected).hypot() < 1e-12);
}

#[test]
fn sine_uses_the_opposite_axis() {
    let p = SineParams {
        amp: Vec2::new(30.0, 30.0),
        freq: Vec2::new(25.0, 25.0),
        cycle: Vec2::new(0.0, 0.0),
    };
    let a = displace(Vec2::new(0.1, 0.4), 0.0, &Displacement::Sine(p), 0.0);
    let b = displace(Vec2::new(0.9, 0.4), 0.0, &Displacement::Sine(p), 0.0);
    // Same y => same x offset.
    assert_eq!(a.x, b.x);
    assert_ne!(a.y, b.y);
}

#[test]
fn flow_octave_clamping_is_observable() {
    let base = FlowParams {
        octaves: 1,
        freq: 21.6,
        amp: Vec2::new(20.7, 14.1),
        speed: Vec2::new(23.0, 15.0),
    };
    let uv = Vec2::new(0.4, 0.2);
    let zero = displace(uv, 1.5, &Displacement::Flow(FlowParams { octaves: 0, ..base }), 0.0);
    let one = displace(uv, 1.5, &Displacement::Flow(base), 0.0);
    assert_eq!(zero, one);
    let twenty = displace(uv, 1.5, &Displacement::Flow(FlowParams { octaves: 20, ..base }), 0.0);
    let eight = displace(uv, 1.5, &Displacement::Flow(FlowParams { octaves: 8, ..base }), 0.0);
    assert_eq!(twenty, eight);
}

#[test]
fn flow_axes_are_decorrelated() {
    let p = FlowParams {
        octaves: 4,
        freq: 15.0,
        amp: Vec2::new(40.0, 40.0),
        speed: Vec2::new(5.0, 5.0),
    };
    let off = displace(Vec2::new(0.33, 0.61), 0.0, &Displacement::Flow(p), 0.0);
    assert_ne!(off.x, off.y);
    assert!(off.x.abs() <= 0.2 && off.y.abs() <= 0.2);
}

#[test]
fn glitch_only_moves_horizontally_and_within_amount() {
    let p = GlitchParams {
        frequency: 15.0,
        amount: 0.1,
        split: 0.05,
    };
    for i in 0..200 {
        let t = f64::from(i) * 0.037;
        let off = displace(Vec2::new(0.5, f64::from(i % 50) / 50.0), t, &Displacement::Glitch(p), 0.0);
        assert_eq!(off.y, 0.0);
        assert!(off.x.abs() <= 0.05);
    }
}

#[test]
fn voronoi_is_seeded_and_bounded() {
    let p = VoronoiParams {
        scale: 12.0,
        jitter: 1.0,
        speed: 2.0,
    };
    let uv = Vec2::new(0.27, 0.81);
    let a = displace(uv, 0.5, &Displacement::Voronoi(p), 0.79);
    assert_eq!(a, displace(uv, 0.5, &Displacement::Voronoi(p), 0.79));
    assert!(a.x.abs() <= 0.05 + 1e-12 && a.y.abs() <= 0.05 + 1e-12);
}

#[test]
fn liquid_is_identity() {
    for i in 0..10 {
        let uv = Vec2::new(f64::from(i) / 10.0, 0.3);
        assert_eq!(displace(uv, f64::from(i), &Displacement::Liquid, 0.5), Vec2::ZERO);
    }
}
