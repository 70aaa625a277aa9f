use crate::foundation::error::{PrismError, PrismResult};
use crate::preset::model::{Preset, Vec2Def};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// Inclusive upper bound of `seed.value`.
pub const SEED_MAX: f64 = 1000.0;

impl Preset {
    /// Parse and validate a preset from JSON bytes.
    #[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn load(bytes: &[u8]) -> PrismResult<Self> {
        let preset: Preset = serde_json::from_slice(bytes)
            .map_err(|e| PrismError::malformed(format!("parse preset JSON: {e}")))?;
        preset.validate()?;
        Ok(preset)
    }

    /// Parse and validate a preset from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PrismResult<Self> {
        let preset: Preset = serde_json::from_reader(r)
            .map_err(|e| PrismError::malformed(format!("parse preset JSON: {e}")))?;
        preset.validate()?;
        Ok(preset)
    }

    /// Parse and validate a preset from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PrismResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PrismError::malformed(format!("open preset JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize to pretty-printed JSON bytes. `Preset::load(&p.to_json_bytes()?)` yields `p`.
    pub fn to_json_bytes(&self) -> PrismResult<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| PrismError::Other(anyhow::Error::new(e).context("serialize preset")))
    }

    /// Return a copy of this preset with the dotted `path` replaced by `value`.
    ///
    /// The result is re-validated; `self` is never modified.
    ///
    /// ```
    /// # use prismwarp::Preset;
    /// let p = Preset::default();
    /// let q = p.with_value("displace.whirl.radius", 0.25.into()).unwrap();
    /// assert_eq!(q.displace.whirl.radius, 0.25);
    /// assert_eq!(p, Preset::default());
    /// ```
    pub fn with_value(&self, path: &str, value: serde_json::Value) -> PrismResult<Self> {
        let mut doc = serde_json::to_value(self)
            .map_err(|e| PrismError::Other(anyhow::Error::new(e).context("serialize preset")))?;

        let mut slot = &mut doc;
        for key in path.split('.') {
            slot = slot
                .as_object_mut()
                .and_then(|obj| obj.get_mut(key))
                .ok_or_else(|| PrismError::malformed(format!("unknown preset path '{path}'")))?;
        }
        *slot = value;

        let next: Preset = serde_json::from_value(doc)
            .map_err(|e| PrismError::malformed(format!("update '{path}': {e}")))?;
        next.validate()?;
        Ok(next)
    }

    /// `rec.length.value` as a capture duration.
    pub fn capture_length(&self) -> Duration {
        Duration::try_from_secs_f64(self.rec.length.value.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// Check value ranges that the JSON types alone cannot express.
    pub fn validate(&self) -> PrismResult<()> {
        let seed = self.seed.value;
        if !seed.is_finite() || !(0.0..=SEED_MAX).contains(&seed) {
            return Err(PrismError::malformed(format!(
                "seed.value must be within [0, {SEED_MAX}], got {seed}"
            )));
        }

        finite("cnv.frame", self.cnv.frame)?;
        finite_vec("cnv.scale", self.cnv.scale)?;

        non_negative_vec("refract.level", self.refract.level)?;
        non_negative_vec("refract.grid", self.refract.grid)?;

        let d = &self.displace;
        non_negative_vec("displace.box.amp", d.box_.amp)?;
        non_negative_vec("displace.box.freq", d.box_.freq)?;
        non_negative_vec("displace.box.speed", d.box_.speed)?;
        non_negative("displace.flow.freq", d.flow.freq)?;
        non_negative_vec("displace.flow.amp", d.flow.amp)?;
        non_negative_vec("displace.flow.speed", d.flow.speed)?;
        non_negative_vec("displace.sine.amp", d.sine.amp)?;
        non_negative_vec("displace.sine.freq", d.sine.freq)?;
        finite_vec("displace.sine.cycle", d.sine.cycle)?;
        non_negative("displace.whirl.radius", d.whirl.radius)?;
        finite("displace.whirl.angle", d.whirl.angle)?;
        non_negative("displace.whirl.speed", d.whirl.speed)?;
        non_negative("displace.pinch.radius", d.pinch.radius)?;
        non_negative("displace.pinch.amount", d.pinch.amount)?;
        non_negative("displace.pinch.speed", d.pinch.speed)?;
        non_negative("displace.glitch.frequency", d.glitch.frequency)?;
        non_negative("displace.glitch.amount", d.glitch.amount)?;
        non_negative("displace.glitch.split", d.glitch.split)?;
        non_negative("displace.voronoi.scale", d.voronoi.scale)?;
        non_negative("displace.voronoi.jitter", d.voronoi.jitter)?;
        non_negative("displace.voronoi.speed", d.voronoi.speed)?;

        let length = self.rec.length.value;
        if !length.is_finite() || length <= 0.0 {
            return Err(PrismError::malformed(format!(
                "rec.length.value must be a positive number of seconds, got {length}"
            )));
        }
        if self.rec.high_res_scale == 0 {
            return Err(PrismError::malformed("rec.highResScale must be >= 1"));
        }
        Ok(())
    }
}

fn finite(path: &str, v: f64) -> PrismResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(PrismError::malformed(format!("{path} must be finite")))
    }
}

fn finite_vec(path: &str, v: Vec2Def) -> PrismResult<()> {
    finite(path, v.x)?;
    finite(path, v.y)
}

fn non_negative(path: &str, v: f64) -> PrismResult<()> {
    finite(path, v)?;
    if v < 0.0 {
        return Err(PrismError::malformed(format!(
            "{path} must be non-negative, got {v}"
        )));
    }
    Ok(())
}

fn non_negative_vec(path: &str, v: Vec2Def) -> PrismResult<()> {
    non_negative(path, v.x)?;
    non_negative(path, v.y)
}

#[cfg(test)]
#[path = "../../tests/unit/preset/load.rs"]
mod tests;
