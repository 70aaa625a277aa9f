use crate::foundation::core::Vec2;
use crate::transform::displace::displace;
use crate::transform::plan::TransformPlan;
use crate::transform::refract::refract;
use crate::transform::wrap::wrap_uv;

/// Result of evaluating the two-stage transform for one output pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleCoord {
    /// Refracted coordinate (`uv'`).
    pub refracted: Vec2,
    /// Displacement offset (`Δ`).
    pub offset: Vec2,
    /// Horizontal channel split applied at sampling time, if any.
    pub split: Option<f64>,
}

impl SampleCoord {
    /// `uv' + Δ` before wrapping.
    pub fn unwrapped(&self) -> Vec2 {
        self.refracted + self.offset
    }

    /// Final sample coordinate after the wrap policy, `None` on the border.
    pub fn final_uv(&self, plan: &TransformPlan) -> Option<Vec2> {
        wrap_uv(self.unwrapped(), plan.wrap)
    }
}

/// Evaluate refraction then displacement for normalized coordinate `uv` at `t` seconds.
///
/// Pure; safe to call from any thread for any pixel.
pub fn evaluate(uv: Vec2, t: f64, plan: &TransformPlan) -> SampleCoord {
    let refracted = refract(uv, &plan.refraction);
    let offset = displace(refracted, t, &plan.displacement, plan.seed);
    SampleCoord {
        refracted,
        offset,
        split: plan.channel_split(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/evaluator.rs"]
mod tests;
