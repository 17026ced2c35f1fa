// particle.rs - Particle store and reconciliation
//
// Structure-of-Arrays layout, grown and truncated to match each new glyph
// cloud. Retained particles keep position and velocity; only targets move.

use log::debug;
use rand::Rng;

use crate::glyph::GlyphCloud;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Particles {
    // Position
    pub x: Vec<f32>,
    pub y: Vec<f32>,

    // Target
    pub tx: Vec<f32>,
    pub ty: Vec<f32>,

    // Velocity
    pub vx: Vec<f32>,
    pub vy: Vec<f32>,
}

impl Particles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize { self.x.len() }
    pub fn is_empty(&self) -> bool { self.x.is_empty() }

    /// Add a particle at rest
    pub fn push(&mut self, x: f32, y: f32, tx: f32, ty: f32) {
        self.x.push(x);
        self.y.push(y);
        self.tx.push(tx);
        self.ty.push(ty);
        self.vx.push(0.0);
        self.vy.push(0.0);
    }

    pub fn truncate(&mut self, n: usize) {
        self.x.truncate(n);
        self.y.truncate(n);
        self.tx.truncate(n);
        self.ty.truncate(n);
        self.vx.truncate(n);
        self.vy.truncate(n);
    }

    #[inline]
    pub fn speed(&self, i: usize) -> f32 {
        self.vx[i].hypot(self.vy[i])
    }
}

/// Map `particles` onto `cloud` in index order.
///
/// Overwrites targets of the first min(n, m) particles, appends new ones
/// near the cloud center within `spread` px, or truncates the excess.
pub fn reconcile<R: Rng + ?Sized>(
    particles: &mut Particles,
    cloud: &GlyphCloud,
    spread: f32,
    rng: &mut R,
) {
    let before = particles.len();
    let keep = before.min(cloud.len());

    for (i, &(tx, ty)) in cloud.points[..keep].iter().enumerate() {
        particles.tx[i] = tx;
        particles.ty[i] = ty;
    }

    particles.truncate(cloud.len());

    let (cx, cy) = cloud.center();
    for &(tx, ty) in &cloud.points[keep..] {
        let x = cx + (rng.random::<f32>() - 0.5) * spread;
        let y = cy + (rng.random::<f32>() - 0.5) * spread;
        particles.push(x, y, tx, ty);
    }

    debug!("reconciled {} -> {} particles", before, particles.len());
}
