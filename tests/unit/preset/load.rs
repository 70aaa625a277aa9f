use super::*;
use crate::preset::model::{DisplaceType, RefractType, ValueDef, WrapMode};

const DEFAULT_JSON: &str = r#"
{
  "seed": { "value": 790 },
  "cnv": { "frame": 238, "wrap": "MIRROR", "scale": { "x": 1, "y": 1 } },
  "refract": { "type": "grid", "level": { "x": 0.25, "y": 0.25 }, "grid": { "x": 16, "y": 16 } },
  "displace": {
    "type": "box",
    "box": { "amp": { "x": 80, "y": 20 }, "freq": { "x": 8.5, "y": 20 }, "speed": { "x": 10, "y": 10 } },
    "flow": { "octaves": 1, "freq": 21.6, "amp": { "x": 20.7, "y": 14.1 }, "speed": { "x": 23, "y": 15 } },
    "sine": { "amp": { "x": 30, "y": 30 }, "freq": { "x": 25, "y": 25 }, "cycle": { "x": 0, "y": 1 } },
    "whirl": { "radius": 0.5, "angle": 5.0, "speed": 1.0 },
    "pinch": { "radius": 0.5, "amount": 0.5, "speed": 1.0 },
    "glitch": { "frequency": 10.0, "amount": 0.05, "split": 0.02 },
    "voronoi": { "scale": 5.0, "jitter": 1.0, "speed": 1.0 }
  },
  "rec": { "length": { "value": 7 }, "highResScale": 2 }
}
"#;

fn json_without(pointer_parent: &str, key: &str) -> Vec<u8> {
    let mut v: serde_json::Value = serde_json::from_str(DEFAULT_JSON).unwrap();
    v.pointer_mut(pointer_parent)
        .and_then(|p| p.as_object_mut())
        .unwrap()
        .remove(key);
    serde_json::to_vec(&v).unwrap()
}

#[test]
fn loads_the_reference_file_format() {
    let p = Preset::load(DEFAULT_JSON.as_bytes()).unwrap();
    assert_eq!(p, Preset::default());
    assert_eq!(p.cnv.wrap, WrapMode::Mirror);
    assert_eq!(p.refract.kind, RefractType::Grid);
    assert_eq!(p.displace.kind, DisplaceType::Box);
    assert_eq!(p.rec.high_res_scale, 2);
}

#[test]
fn roundtrip_is_lossless_for_every_factory_preset() {
    for name in crate::preset::factory::factory_names() {
        let p = crate::preset::factory::factory_preset(name).unwrap();
        let bytes = p.to_json_bytes().unwrap();
        assert_eq!(Preset::load(&bytes).unwrap(), p, "{name}");
    }
}

#[test]
fn missing_seed_value_is_malformed() {
    let err = Preset::load(&json_without("/seed", "value")).unwrap_err();
    assert!(matches!(err, PrismError::MalformedConfig(_)), "{err}");
}

#[test]
fn missing_nested_family_field_is_malformed() {
    let err = Preset::load(&json_without("/displace/whirl", "radius")).unwrap_err();
    assert!(matches!(err, PrismError::MalformedConfig(_)), "{err}");
}

#[test]
fn unknown_fields_are_ignored() {
    let mut v: serde_json::Value = serde_json::from_str(DEFAULT_JSON).unwrap();
    v["extra"] = serde_json::json!({ "anything": true });
    v["displace"]["liquid"] = serde_json::json!({ "viscosity": 3 });
    let p = Preset::load(&serde_json::to_vec(&v).unwrap()).unwrap();
    assert_eq!(p, Preset::default());
}

#[test]
fn vec2_accepts_array_form() {
    let mut v: serde_json::Value = serde_json::from_str(DEFAULT_JSON).unwrap();
    v["refract"]["grid"] = serde_json::json!([8, 4]);
    let p = Preset::load(&serde_json::to_vec(&v).unwrap()).unwrap();
    assert_eq!(p.refract.grid.x, 8.0);
    assert_eq!(p.refract.grid.y, 4.0);
}

#[test]
fn out_of_range_values_are_malformed() {
    let p = Preset::default();
    assert!(matches!(
        p.with_value("seed.value", 1000.5.into()),
        Err(PrismError::MalformedConfig(_))
    ));
    assert!(matches!(
        p.with_value("rec.length.value", 0.into()),
        Err(PrismError::MalformedConfig(_))
    ));
    assert!(matches!(
        p.with_value("displace.pinch.radius", (-0.1).into()),
        Err(PrismError::MalformedConfig(_))
    ));
    assert!(matches!(
        p.with_value("displace.type", "plasma".into()),
        Err(PrismError::MalformedConfig(_))
    ));
    // Angle and cycle may be negative.
    assert!(p.with_value("displace.whirl.angle", (-3.0).into()).is_ok());
    assert!(p.with_value("displace.sine.cycle.x", (-1.0).into()).is_ok());
}

#[test]
fn with_value_returns_a_new_preset() {
    let p = Preset::default();
    let q = p.with_value("refract.type", "hex".into()).unwrap();
    assert_eq!(q.refract.kind, RefractType::Hex);
    assert_eq!(p.refract.kind, RefractType::Grid);
    assert!(p.with_value("refract.nope", 1.into()).is_err());
}

#[test]
fn capture_length_reads_rec_length() {
    let p = Preset::default()
        .with_value("rec.length.value", 5.into())
        .unwrap();
    assert_eq!(p.capture_length(), Duration::from_secs(5));
}

/// xorshift64*; uniform in `[0, 1)`.
struct Rng(u64);

impl Rng {
    fn unit(&mut self) -> f64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        let bits = self.0.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 11;
        bits as f64 / (1u64 << 53) as f64
    }

    fn pos(&mut self) -> f64 {
        self.unit() * 1000.0
    }

    fn signed(&mut self) -> f64 {
        self.unit() * 2000.0 - 1000.0
    }

    fn pos_vec(&mut self) -> Vec2Def {
        Vec2Def::new(self.pos(), self.pos())
    }

    fn signed_vec(&mut self) -> Vec2Def {
        Vec2Def::new(self.signed(), self.signed())
    }
}

fn random_preset(rng: &mut Rng) -> Preset {
    let mut p = Preset::default();
    p.seed.value = rng.unit() * SEED_MAX;
    p.cnv.frame = rng.signed();
    p.cnv.scale = rng.signed_vec();
    p.refract.level = rng.pos_vec();
    p.refract.grid = rng.pos_vec();

    let d = &mut p.displace;
    d.box_.amp = rng.pos_vec();
    d.box_.freq = rng.pos_vec();
    d.box_.speed = rng.pos_vec();
    d.flow.freq = rng.pos();
    d.flow.amp = rng.pos_vec();
    d.flow.speed = rng.pos_vec();
    d.sine.amp = rng.pos_vec();
    d.sine.freq = rng.pos_vec();
    d.sine.cycle = rng.signed_vec();
    d.whirl.radius = rng.pos();
    d.whirl.angle = rng.signed();
    d.whirl.speed = rng.pos();
    d.pinch.radius = rng.pos();
    d.pinch.amount = rng.pos();
    d.pinch.speed = rng.pos();
    d.glitch.frequency = rng.pos();
    d.glitch.amount = rng.pos();
    d.glitch.split = rng.pos();
    d.voronoi.scale = rng.pos();
    d.voronoi.jitter = rng.pos();
    d.voronoi.speed = rng.pos();

    p.rec.length.value = rng.pos() + f64::MIN_POSITIVE;
    p
}

#[test]
fn roundtrip_is_exact_for_arbitrary_doubles() {
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    for i in 0..5_000 {
        let p = random_preset(&mut rng);
        p.validate().unwrap();
        let back = Preset::load(&p.to_json_bytes().unwrap()).unwrap();
        assert_eq!(back, p, "iteration {i}");
    }
}

#[test]
fn roundtrip_is_exact_for_arbitrary_seeds() {
    let mut rng = Rng(0xD1B5_4A32_D192_ED03);
    for _ in 0..50_000 {
        let p = Preset {
            seed: ValueDef {
                value: rng.unit() * SEED_MAX,
            },
            ..Preset::default()
        };
        let back = Preset::load(&p.to_json_bytes().unwrap()).unwrap();
        assert_eq!(back.seed.value.to_bits(), p.seed.value.to_bits());
    }
}
