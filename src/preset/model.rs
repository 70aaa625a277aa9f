//! Preset schema.
//!
//! Field names follow the on-disk JSON format (`highResScale`, `type`, `box`, ...). Every numeric
//! field is required: a missing number is a [`crate::PrismError::MalformedConfig`], never a silent
//! zero. Unknown fields are ignored.
use serde::{Deserialize, Serialize};

/// Plain 2D number pair as stored in preset files.
///
/// Accepts either `{ "x": .., "y": .. }` or `[x, y]` on input; always serializes as an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vec2Def {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vec2Def {
    /// Construct from components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same value in both components.
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v }
    }

    /// Convert to the evaluator's vector type.
    pub fn to_vec2(self) -> kurbo::Vec2 {
        kurbo::Vec2::new(self.x, self.y)
    }
}

impl<'de> Deserialize<'de> for Vec2Def {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 2]),
            Obj { x: f64, y: f64 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y]) => Ok(Self { x, y }),
            Repr::Obj { x, y } => Ok(Self { x, y }),
        }
    }
}

/// A single scalar wrapped in `{ "value": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueDef {
    /// Wrapped number.
    pub value: f64,
}

/// Policy for resolving sample coordinates outside the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WrapMode {
    /// Reflect every other period.
    Mirror,
    /// Fractional repeat.
    Repeat,
    /// Clamp to the edge texel.
    Clamp,
    /// Fractional repeat (tile lattice).
    Tile,
    /// Transparent black outside the unit square.
    Border,
}

/// Canvas block (`cnv`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasDef {
    /// Decorative frame width; carried for file compatibility.
    pub frame: f64,
    /// Out-of-range sample policy.
    pub wrap: WrapMode,
    /// Canvas scale; carried for file compatibility.
    pub scale: Vec2Def,
}

/// Refraction family tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefractType {
    /// Identity.
    None,
    /// Rectangular lattice.
    Grid,
    /// Hexagonal lattice.
    Hex,
    /// Concentric rings about the center.
    Radial,
    /// L1 (diamond) bands about the center.
    Diamond,
}

/// Refraction block (`refract`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefractDef {
    /// Active family.
    #[serde(rename = "type")]
    pub kind: RefractType,
    /// Displacement magnitude.
    pub level: Vec2Def,
    /// Tile counts.
    pub grid: Vec2Def,
}

/// Displacement family tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplaceType {
    /// Stepped sin/cos offsets.
    Box,
    /// Fractal noise flow.
    Flow,
    /// Cross-axis sinusoids.
    Sine,
    /// Rotation about the center.
    Whirl,
    /// Radial scaling about the center.
    Pinch,
    /// Scanline jitter and channel split.
    Glitch,
    /// Cellular feature points.
    Voronoi,
    /// Reserved; evaluates to no displacement.
    Liquid,
}

/// `displace.box` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDef {
    /// Offset amplitude per axis.
    pub amp: Vec2Def,
    /// Spatial frequency per axis.
    pub freq: Vec2Def,
    /// Scroll rate per axis.
    pub speed: Vec2Def,
}

/// `displace.flow` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowDef {
    /// Requested fBm octaves; the evaluator clamps to `[1, 8]`.
    pub octaves: i64,
    /// Spatial frequency.
    pub freq: f64,
    /// Offset amplitude per axis.
    pub amp: Vec2Def,
    /// Scroll rate per axis.
    pub speed: Vec2Def,
}

/// `displace.sine` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SineDef {
    /// Offset amplitude per axis.
    pub amp: Vec2Def,
    /// Spatial frequency per axis.
    pub freq: Vec2Def,
    /// Phase rate per axis; may be negative.
    pub cycle: Vec2Def,
}

/// `displace.whirl` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhirlDef {
    /// Effect radius about the center, in uv units.
    pub radius: f64,
    /// Peak twist; may be negative.
    pub angle: f64,
    /// Oscillation rate.
    pub speed: f64,
}

/// `displace.pinch` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinchDef {
    /// Effect radius about the center, in uv units.
    pub radius: f64,
    /// Effect strength.
    pub amount: f64,
    /// Oscillation rate.
    pub speed: f64,
}

/// `displace.glitch` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlitchDef {
    /// Gate sampling rate.
    pub frequency: f64,
    /// Effect strength.
    pub amount: f64,
    /// Horizontal channel split distance.
    pub split: f64,
}

/// `displace.voronoi` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoronoiDef {
    /// Cell count per uv unit.
    pub scale: f64,
    /// Feature point jitter factor.
    pub jitter: f64,
    /// Oscillation rate.
    pub speed: f64,
}

/// Displacement block (`displace`): the active family plus every family's parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaceDef {
    /// Active family.
    #[serde(rename = "type")]
    pub kind: DisplaceType,
    /// Box parameters.
    #[serde(rename = "box")]
    pub box_: BoxDef,
    /// Flow parameters.
    pub flow: FlowDef,
    /// Sine parameters.
    pub sine: SineDef,
    /// Whirl parameters.
    pub whirl: WhirlDef,
    /// Pinch parameters.
    pub pinch: PinchDef,
    /// Glitch parameters.
    pub glitch: GlitchDef,
    /// Voronoi parameters.
    pub voronoi: VoronoiDef,
}

/// Recording block (`rec`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecDef {
    /// Capture duration in seconds.
    pub length: ValueDef,
    /// Resolution multiplier for still export.
    #[serde(rename = "highResScale")]
    pub high_res_scale: u32,
}

/// The complete serializable parameter set.
///
/// A `Preset` is a value: updates go through [`Preset::with_value`] and produce a new preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Determinism seed in `[0, 1000]`.
    pub seed: ValueDef,
    /// Canvas settings.
    pub cnv: CanvasDef,
    /// Refraction settings.
    pub refract: RefractDef,
    /// Displacement settings.
    pub displace: DisplaceDef,
    /// Recording settings.
    pub rec: RecDef,
}
