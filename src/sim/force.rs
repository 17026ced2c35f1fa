// force.rs - Per-frame integration
//
// Spring toward target, capped inverse-square repulsion from the pointer,
// damping, then explicit Euler with one implicit time unit per frame.

use super::{Particles, Pointer};
use crate::config::FieldConfig;
use crate::error::{FieldError, Result};

// Below this squared distance the pointer direction is undefined
const REPULSION_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceParams {
    pub spring: f32,
    pub damping: f32,
    pub repulsion: f32,
    pub repulsion_cap: f32,
    /// 1.0 normally, attenuated under reduced motion
    pub repulsion_scale: f32,
}

impl ForceParams {
    pub fn from_config(config: &FieldConfig, reduced_motion: bool) -> Self {
        Self {
            spring: config.spring,
            damping: config.damping,
            repulsion: config.repulsion,
            repulsion_cap: config.repulsion_cap,
            repulsion_scale: if reduced_motion { config.reduced_motion_repulsion } else { 1.0 },
        }
    }

    /// Magnitude of the pointer push at squared distance `d2`
    #[inline]
    pub fn repulsion_at(&self, d2: f32) -> f32 {
        (self.repulsion / d2).min(self.repulsion_cap) * self.repulsion_scale
    }
}

/// Advance every particle by one frame
pub fn step(particles: &mut Particles, pointer: &Pointer, params: &ForceParams) -> Result<()> {
    let Particles { x, y, tx, ty, vx, vy } = particles;

    for i in 0..x.len() {
        let mut ax = (tx[i] - x[i]) * params.spring;
        let mut ay = (ty[i] - y[i]) * params.spring;

        if pointer.active {
            let dx = x[i] - pointer.x;
            let dy = y[i] - pointer.y;
            let d2 = dx * dx + dy * dy;
            if d2 > REPULSION_EPSILON {
                let f = params.repulsion_at(d2);
                let inv = 1.0 / d2.sqrt();
                ax += dx * inv * f;
                ay += dy * inv * f;
            }
        }

        vx[i] = (vx[i] + ax) * params.damping;
        vy[i] = (vy[i] + ay) * params.damping;
        x[i] += vx[i];
        y[i] += vy[i];

        if !(x[i].is_finite() && y[i].is_finite()) {
            return Err(FieldError::Diverged { index: i });
        }
    }

    Ok(())
}
