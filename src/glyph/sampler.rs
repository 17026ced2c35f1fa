// sampler.rs - Word -> target point cloud
//
// Rasterizes a word into the offscreen buffer and walks it on a grid,
// keeping cells whose alpha clears the threshold. Each kept point gets a
// little jitter so the cloud doesn't read as a lattice.

use log::{debug, warn};
use rand::Rng;

use super::raster::{text_cells, GlyphBuffer};
use super::font::GLYPH_ROWS;
use crate::config::FieldConfig;

// Font size relative to buffer width, before fitting
const FONT_WIDTH_RATIO: f32 = 0.22;
// Share of the buffer the text may occupy
const FIT_W: f32 = 0.9;
const FIT_H: f32 = 0.8;
// Grid step = sqrt(font_px) * STEP_SCALE / density
const STEP_SCALE: f32 = 0.6;

/// Target points sampled from one word
#[derive(Debug, Clone, Default)]
pub struct GlyphCloud {
    pub points: Vec<(f32, f32)>,
    /// Buffer size the points were sampled against
    pub w: u32,
    pub h: u32,
}

impl GlyphCloud {
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    pub fn center(&self) -> (f32, f32) {
        (self.w as f32 * 0.5, self.h as f32 * 0.5)
    }
}

/// Font size (cap height, px) for `chars` glyphs in a w x h buffer
pub fn font_size(chars: usize, w: u32, h: u32, config: &FieldConfig) -> f32 {
    let px = (w as f32 * FONT_WIDTH_RATIO).clamp(config.min_font_px, config.max_font_px);
    let cells = text_cells(chars).max(1) as f32;
    let fit_w = w as f32 * FIT_W * GLYPH_ROWS as f32 / cells;
    let fit_h = h as f32 * FIT_H;
    px.min(fit_w).min(fit_h)
}

/// Sampling grid step for a font size
pub fn grid_step(font_px: f32, density: f32) -> u32 {
    (font_px.sqrt() * STEP_SCALE / density).round().max(1.0) as u32
}

/// Owns the offscreen buffer; one per field instance
pub struct GlyphSampler {
    buffer: GlyphBuffer,
}

impl GlyphSampler {
    pub fn new() -> Self {
        Self { buffer: GlyphBuffer::new(0, 0) }
    }

    /// Sample `word` into a target cloud for a w x h surface.
    ///
    /// Returns an empty cloud only for an empty word or a zero-sized surface.
    pub fn sample<R: Rng + ?Sized>(
        &mut self,
        word: &str,
        w: u32,
        h: u32,
        density: f32,
        config: &FieldConfig,
        rng: &mut R,
    ) -> GlyphCloud {
        let mut cloud = GlyphCloud { points: Vec::new(), w, h };
        if word.is_empty() || w == 0 || h == 0 { return cloud; }

        if self.buffer.width() != w || self.buffer.height() != h {
            self.buffer.resize(w, h);
        }

        let font_px = font_size(word.chars().count(), w, h, config);
        let step = grid_step(font_px, density) as usize;
        let layout = self.buffer.rasterize(word, font_px);

        let amp = config.jitter * w.min(h) as f32;

        for y in (0..h).step_by(step) {
            for x in (0..w).step_by(step) {
                if self.buffer.alpha(x, y) > config.alpha_threshold {
                    let jx = (rng.random::<f32>() - 0.5) * amp;
                    let jy = (rng.random::<f32>() - 0.5) * amp;
                    cloud.points.push((x as f32 + jx, y as f32 + jy));
                }
            }
        }

        // Strokes thinner than the grid: fall back to glyph cell centers
        if cloud.is_empty() {
            warn!("'{}' produced no samples at {}x{}, using cell centers", word, w, h);
            cloud.points.extend(layout.lit_centers());
        }
        // Nothing lit at all (whitespace)
        if cloud.is_empty() {
            let center = cloud.center();
            cloud.points.push(center);
        }

        debug!(
            "sampled '{}' at {}x{}: font {:.1}px, step {}, {} points",
            word, w, h, font_px, step, cloud.len()
        );
        cloud
    }
}

impl Default for GlyphSampler {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const VOCABULARY: &[&str] = &[
        "A", "i", "RUST", "Systems", "WEB", "Design", "ML/AI", "C++", "INFRASTRUCTURE", " ", "~",
    ];

    fn sample(word: &str, w: u32, h: u32, seed: u64) -> GlyphCloud {
        let mut rng = SmallRng::seed_from_u64(seed);
        GlyphSampler::new().sample(word, w, h, 1.0, &FieldConfig::default(), &mut rng)
    }

    #[test]
    fn same_seed_same_cloud() {
        let a = sample("RUST", 300, 200, 9);
        let b = sample("RUST", 300, 200, 9);
        assert_eq!(a.points, b.points);
    }

    #[test]
    fn larger_surface_is_denser() {
        let small = sample("RUST", 300, 300, 1);
        let large = sample("RUST", 600, 600, 1);
        assert!(large.len() > small.len(), "{} vs {}", large.len(), small.len());
    }

    #[test]
    fn higher_density_gives_more_points() {
        let config = FieldConfig::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut sampler = GlyphSampler::new();
        let coarse = sampler.sample("WEB", 400, 300, 0.5, &config, &mut rng);
        let fine = sampler.sample("WEB", 400, 300, 2.0, &config, &mut rng);
        assert!(fine.len() > coarse.len());
    }

    #[test]
    fn points_stay_near_the_text() {
        let cloud = sample("HI", 400, 300, 5);
        for &(x, y) in &cloud.points {
            assert!(x > 0.0 && x < 400.0 && y > 0.0 && y < 300.0);
        }
    }

    #[test]
    fn jitter_spans_a_few_percent_of_the_short_side() {
        let mut sampler = GlyphSampler::new();
        let still = FieldConfig { jitter: 0.0, ..FieldConfig::default() };
        let plain = sampler.sample("WEB", 400, 300, 1.0, &still, &mut SmallRng::seed_from_u64(4));
        let jittered = sampler.sample("WEB", 400, 300, 1.0, &FieldConfig::default(), &mut SmallRng::seed_from_u64(4));
        assert_eq!(plain.len(), jittered.len());

        let half = FieldConfig::default().jitter * 0.5 * 300.0;
        let mut widest = 0.0f32;
        for (&(px, py), &(jx, jy)) in plain.points.iter().zip(&jittered.points) {
            let (dx, dy) = ((jx - px).abs(), (jy - py).abs());
            assert!(dx <= half + 1e-3 && dy <= half + 1e-3);
            widest = widest.max(dx).max(dy);
        }
        assert!(widest > 0.01 * 300.0, "widest offset {widest}");
    }

    #[test]
    fn zero_size_yields_empty_cloud() {
        assert!(sample("RUST", 0, 300, 1).is_empty());
        assert!(sample("RUST", 300, 0, 1).is_empty());
        assert!(sample("", 300, 300, 1).is_empty());
    }

    #[test]
    fn whitespace_yields_center_point() {
        let cloud = sample("   ", 120, 80, 1);
        assert_eq!(cloud.points, vec![(60.0, 40.0)]);
    }

    #[test]
    fn long_words_fit_the_width() {
        let config = FieldConfig::default();
        let px = font_size(14, 600, 400, &config);
        let cells = text_cells(14) as f32;
        assert!(px / GLYPH_ROWS as f32 * cells <= 600.0 * FIT_W + 0.01);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn never_empty_for_nonempty_word(
            word in prop::sample::select(VOCABULARY),
            w in 1u32..1400,
            h in 1u32..1000,
            seed in any::<u64>(),
        ) {
            let cloud = sample(word, w, h, seed);
            prop_assert!(!cloud.is_empty());
        }
    }
}
