use crate::foundation::core::Vec2;
use crate::preset::model::{DisplaceType, Preset, RefractType, WrapMode};
use crate::preset::load::SEED_MAX;
use crate::transform::noise::clamp_octaves;

/// Refraction stage with only the active family's parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Refraction {
    /// Identity.
    None,
    /// Rectangular lattice of `cells` tiles, pushed from each tile center by `level`.
    Grid {
        /// Push strength per axis.
        level: Vec2,
        /// Tile count per axis, always positive.
        cells: Vec2,
    },
    /// Hexagonal lattice evaluated at `uv * cells`.
    Hex {
        /// Push strength per axis.
        level: Vec2,
        /// Lattice scale per axis.
        cells: Vec2,
    },
    /// Rings about the center.
    Radial {
        /// Push strength.
        level: f64,
        /// Ring count.
        rings: f64,
    },
    /// L1 bands about the center.
    Diamond {
        /// Push strength.
        level: f64,
        /// Band count.
        bands: f64,
    },
}

/// `box` family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxParams {
    /// Amplitude per axis.
    pub amp: Vec2,
    /// Frequency per axis.
    pub freq: Vec2,
    /// Scroll speed per axis.
    pub speed: Vec2,
}

/// `flow` family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowParams {
    /// Octaves, already clamped into `[1, 8]`.
    pub octaves: u32,
    /// Spatial frequency.
    pub freq: f64,
    /// Amplitude per axis.
    pub amp: Vec2,
    /// Scroll speed per axis.
    pub speed: Vec2,
}

/// `sine` family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SineParams {
    /// Amplitude per axis.
    pub amp: Vec2,
    /// Frequency per axis.
    pub freq: Vec2,
    /// Phase rate per axis.
    pub cycle: Vec2,
}

/// Shared parameters of the center-radius families (`whirl`, `pinch`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialParams {
    /// Radius about the center.
    pub radius: f64,
    /// Twist angle (whirl) or scale amount (pinch).
    pub strength: f64,
    /// Oscillation rate.
    pub speed: f64,
}

/// `glitch` family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlitchParams {
    /// Gate rate.
    pub frequency: f64,
    /// Jitter amount.
    pub amount: f64,
    /// Channel split distance; zero disables the split.
    pub split: f64,
}

/// `voronoi` family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoronoiParams {
    /// Cells per uv unit.
    pub scale: f64,
    /// Feature point jitter factor.
    pub jitter: f64,
    /// Animation rate.
    pub speed: f64,
}

/// Displacement stage with only the active family's parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Displacement {
    /// Stepped sin/cos.
    Box(BoxParams),
    /// Two decorrelated fBm fields.
    Flow(FlowParams),
    /// Cross-axis sinusoids.
    Sine(SineParams),
    /// Rotation inside a radius.
    Whirl(RadialParams),
    /// Radial scaling inside a radius.
    Pinch(RadialParams),
    /// Gated scanline jitter plus optional channel split.
    Glitch(GlitchParams),
    /// Animated cellular feature points.
    Voronoi(VoronoiParams),
    /// Reserved family; no displacement.
    Liquid,
}

/// Per-tick evaluation parameters compiled from a [`Preset`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformPlan {
    /// Seed normalized into `[0, 1]`.
    pub seed: f64,
    /// Out-of-range sample policy.
    pub wrap: WrapMode,
    /// Stage 1.
    pub refraction: Refraction,
    /// Stage 2.
    pub displacement: Displacement,
}

impl TransformPlan {
    /// Select the active families and drop every inactive parameter block.
    pub fn from_preset(preset: &Preset) -> Self {
        let r = &preset.refract;
        let level = r.level.to_vec2();
        let refraction = match r.kind {
            RefractType::None => Refraction::None,
            RefractType::Grid => Refraction::Grid {
                level,
                cells: positive_cells(r.grid.to_vec2()),
            },
            RefractType::Hex => Refraction::Hex {
                level,
                cells: r.grid.to_vec2(),
            },
            RefractType::Radial => Refraction::Radial {
                level: level.x,
                rings: r.grid.x,
            },
            RefractType::Diamond => Refraction::Diamond {
                level: level.x,
                bands: r.grid.x,
            },
        };

        let d = &preset.displace;
        let displacement = match d.kind {
            DisplaceType::Box => Displacement::Box(BoxParams {
                amp: d.box_.amp.to_vec2(),
                freq: d.box_.freq.to_vec2(),
                speed: d.box_.speed.to_vec2(),
            }),
            DisplaceType::Flow => Displacement::Flow(FlowParams {
                octaves: clamp_octaves(d.flow.octaves),
                freq: d.flow.freq,
                amp: d.flow.amp.to_vec2(),
                speed: d.flow.speed.to_vec2(),
            }),
            DisplaceType::Sine => Displacement::Sine(SineParams {
                amp: d.sine.amp.to_vec2(),
                freq: d.sine.freq.to_vec2(),
                cycle: d.sine.cycle.to_vec2(),
            }),
            DisplaceType::Whirl => Displacement::Whirl(RadialParams {
                radius: d.whirl.radius,
                strength: d.whirl.angle,
                speed: d.whirl.speed,
            }),
            DisplaceType::Pinch => Displacement::Pinch(RadialParams {
                radius: d.pinch.radius,
                strength: d.pinch.amount,
                speed: d.pinch.speed,
            }),
            DisplaceType::Glitch => Displacement::Glitch(GlitchParams {
                frequency: d.glitch.frequency,
                amount: d.glitch.amount,
                split: d.glitch.split,
            }),
            DisplaceType::Voronoi => Displacement::Voronoi(VoronoiParams {
                scale: d.voronoi.scale,
                jitter: d.voronoi.jitter,
                speed: d.voronoi.speed,
            }),
            DisplaceType::Liquid => Displacement::Liquid,
        };

        Self {
            seed: preset.seed.value / SEED_MAX,
            wrap: preset.cnv.wrap,
            refraction,
            displacement,
        }
    }

    /// Channel split distance when the glitch family requests one.
    pub fn channel_split(&self) -> Option<f64> {
        match self.displacement {
            Displacement::Glitch(g) if g.split > 0.0 => Some(g.split),
            _ => None,
        }
    }
}

// A zero tile count would divide by zero; it collapses to a single tile instead.
fn positive_cells(v: Vec2) -> Vec2 {
    Vec2::new(
        if v.x > 0.0 { v.x } else { 1.0 },
        if v.y > 0.0 { v.y } else { 1.0 },
    )
}

#[cfg(test)]
#[path = "../../tests/unit/transform/plan.rs"]
mod tests;
