// config.rs - Tuning parameters
//
// Every constant of the motion model, sampler and renderer lives here so a
// host can retune the field from JSON without rebuilding.

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    // Motion
    pub spring: f32,
    pub damping: f32,
    pub repulsion: f32,
    pub repulsion_cap: f32,
    /// Repulsion multiplier while reduced motion is in effect
    pub reduced_motion_repulsion: f32,

    // Rendering
    pub connection_distance: f32,
    pub connection_window: usize,
    pub particle_radius: f32,

    // Word rotation, in frames
    pub rotation_frames: u32,

    // Sampling
    pub density: f32,
    pub alpha_threshold: u8,
    /// Jitter amplitude as a fraction of the shorter buffer side
    pub jitter: f32,
    /// Spawn area for new particles as a fraction of the shorter buffer side
    pub spawn_spread: f32,
    pub min_font_px: f32,
    pub max_font_px: f32,

    /// Fixed RNG seed; entropy when absent
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            spring: 0.02,
            damping: 0.88,
            repulsion: 2400.0,
            repulsion_cap: 6.0,
            reduced_motion_repulsion: 0.35,
            connection_distance: 38.0,
            connection_window: 12,
            particle_radius: 1.6,
            rotation_frames: 240,
            density: 1.0,
            alpha_threshold: 128,
            jitter: 0.04,
            spawn_spread: 0.2,
            min_font_px: 24.0,
            max_font_px: 220.0,
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Parse a (possibly partial) JSON object; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, msg: &str) -> Result<()> {
            if ok { Ok(()) } else { Err(FieldError::InvalidConfig(msg.to_string())) }
        }

        check(self.spring.is_finite() && self.spring >= 0.0, "spring must be >= 0")?;
        check(self.damping > 0.0 && self.damping < 1.0, "damping must be in (0, 1)")?;
        check(self.repulsion.is_finite() && self.repulsion >= 0.0, "repulsion must be >= 0")?;
        check(self.repulsion_cap.is_finite() && self.repulsion_cap >= 0.0, "repulsion_cap must be >= 0")?;
        check(
            self.reduced_motion_repulsion > 0.0 && self.reduced_motion_repulsion <= 1.0,
            "reduced_motion_repulsion must be in (0, 1]",
        )?;
        check(self.connection_distance.is_finite() && self.connection_distance >= 0.0, "connection_distance must be >= 0")?;
        check(self.particle_radius.is_finite() && self.particle_radius > 0.0, "particle_radius must be > 0")?;
        check(self.rotation_frames > 0, "rotation_frames must be > 0")?;
        check(self.density.is_finite() && self.density > 0.0, "density must be > 0")?;
        check(self.jitter.is_finite() && self.jitter >= 0.0, "jitter must be >= 0")?;
        check(self.spawn_spread.is_finite() && self.spawn_spread >= 0.0, "spawn_spread must be >= 0")?;
        check(self.min_font_px >= 1.0, "min_font_px must be >= 1")?;
        check(self.max_font_px >= self.min_font_px, "max_font_px must be >= min_font_px")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        assert!(FieldConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = FieldConfig::from_json(r#"{ "rotation_frames": 10, "seed": 7 }"#).unwrap();
        assert_eq!(config.rotation_frames, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.damping, FieldConfig::default().damping);
    }

    #[test]
    fn rejects_undamped_motion() {
        let err = FieldConfig::from_json(r#"{ "damping": 1.0 }"#).unwrap_err();
        assert!(matches!(err, FieldError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = FieldConfig::from_json("{ damping: ").unwrap_err();
        assert!(matches!(err, FieldError::Json(_)));
    }

    #[test]
    fn rejects_zero_density() {
        let config = FieldConfig { density: 0.0, ..FieldConfig::default() };
        assert!(config.validate().is_err());
    }
}
