//! Factory bank: the default preset and a few named looks derived from it.
use crate::preset::model::{
    BoxDef, CanvasDef, DisplaceDef, DisplaceType, FlowDef, GlitchDef, PinchDef, Preset, RecDef,
    RefractDef, RefractType, SineDef, ValueDef, Vec2Def, VoronoiDef, WhirlDef, WrapMode,
};

impl Default for Preset {
    fn default() -> Self {
        Self {
            seed: ValueDef { value: 790.0 },
            cnv: CanvasDef {
                frame: 238.0,
                wrap: WrapMode::Mirror,
                scale: Vec2Def::splat(1.0),
            },
            refract: RefractDef {
                kind: RefractType::Grid,
                level: Vec2Def::splat(0.25),
                grid: Vec2Def::splat(16.0),
            },
            displace: DisplaceDef {
                kind: DisplaceType::Box,
                box_: BoxDef {
                    amp: Vec2Def::new(80.0, 20.0),
                    freq: Vec2Def::new(8.5, 20.0),
                    speed: Vec2Def::splat(10.0),
                },
                flow: FlowDef {
                    octaves: 1,
                    freq: 21.6,
                    amp: Vec2Def::new(20.7, 14.1),
                    speed: Vec2Def::new(23.0, 15.0),
                },
                sine: SineDef {
                    amp: Vec2Def::splat(30.0),
                    freq: Vec2Def::splat(25.0),
                    cycle: Vec2Def::new(0.0, 1.0),
                },
                whirl: WhirlDef {
                    radius: 0.5,
                    angle: 5.0,
                    speed: 1.0,
                },
                pinch: PinchDef {
                    radius: 0.5,
                    amount: 0.5,
                    speed: 1.0,
                },
                glitch: GlitchDef {
                    frequency: 10.0,
                    amount: 0.05,
                    split: 0.02,
                },
                voronoi: VoronoiDef {
                    scale: 5.0,
                    jitter: 1.0,
                    speed: 1.0,
                },
            },
            rec: RecDef {
                length: ValueDef { value: 7.0 },
                high_res_scale: 2,
            },
        }
    }
}

const FACTORY_NAMES: [&str; 4] = ["Cyber Prism", "Obsidian Flow", "Voronoi Glass", "Black Hole"];

/// Names accepted by [`factory_preset`], in display order.
pub fn factory_names() -> &'static [&'static str] {
    &FACTORY_NAMES
}

/// Look up a named factory preset (case-insensitive).
pub fn factory_preset(name: &str) -> Option<Preset> {
    let base = Preset::default();
    let name = name.trim().to_ascii_lowercase();
    let preset = match name.as_str() {
        "default" => base,
        "cyber prism" => Preset {
            refract: RefractDef {
                kind: RefractType::Hex,
                level: Vec2Def::splat(0.3),
                grid: Vec2Def::splat(12.0),
            },
            displace: DisplaceDef {
                kind: DisplaceType::Glitch,
                glitch: GlitchDef {
                    frequency: 15.0,
                    amount: 0.1,
                    split: 0.05,
                },
                ..base.displace
            },
            ..base
        },
        "obsidian flow" => Preset {
            refract: RefractDef {
                kind: RefractType::Radial,
                level: Vec2Def::splat(0.2),
                grid: Vec2Def::splat(8.0),
            },
            displace: DisplaceDef {
                kind: DisplaceType::Flow,
                flow: FlowDef {
                    octaves: 4,
                    freq: 15.0,
                    amp: Vec2Def::splat(40.0),
                    speed: Vec2Def::splat(5.0),
                },
                ..base.displace
            },
            ..base
        },
        "voronoi glass" => Preset {
            refract: RefractDef {
                kind: RefractType::Grid,
                level: Vec2Def::splat(0.1),
                grid: Vec2Def::splat(24.0),
            },
            displace: DisplaceDef {
                kind: DisplaceType::Voronoi,
                voronoi: VoronoiDef {
                    scale: 12.0,
                    jitter: 1.0,
                    speed: 2.0,
                },
                ..base.displace
            },
            ..base
        },
        "black hole" => Preset {
            refract: RefractDef {
                kind: RefractType::None,
                level: Vec2Def::splat(0.0),
                grid: Vec2Def::splat(1.0),
            },
            displace: DisplaceDef {
                kind: DisplaceType::Whirl,
                whirl: WhirlDef {
                    radius: 0.8,
                    angle: 12.0,
                    speed: 2.0,
                },
                ..base.displace
            },
            ..base
        },
        _ => return None,
    };
    Some(preset)
}

#[cfg(test)]
#[path = "../../tests/unit/preset/factory.rs"]
mod tests;
