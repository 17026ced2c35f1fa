// sim/ - Constellation simulation
//
// One owned instance per mounted field: particles, rotation clock, pointer,
// offscreen glyph buffer and framebuffer. The host calls `tick` once per
// display frame; input and resize arrive between frames.

mod clock;
mod force;
mod particle;
mod pointer;

pub use clock::SimClock;
pub use force::{step, ForceParams};
pub use particle::{reconcile, Particles};
pub use pointer::Pointer;

use log::{debug, error, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::FieldConfig;
use crate::error::Result;
use crate::glyph::GlyphSampler;
use crate::render::{Renderer, Style, Theme};

// fps smoothing factor
const FPS_BLEND: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not started, or stopped by the host
    Idle,
    Running,
    /// A frame failed; ticks are ignored from here on
    Stopped,
}

/// Motion preference reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Motion {
    /// Host can't tell; treated as reduced
    #[default]
    Unknown,
    Full,
    Reduced,
}

impl Motion {
    pub fn from_reduced(reduced: bool) -> Self {
        if reduced { Motion::Reduced } else { Motion::Full }
    }

    pub fn reduced(self) -> bool {
        self != Motion::Full
    }
}

/// Text-driven particle field
pub struct Constellation {
    // Surface dimensions
    w: u32,
    h: u32,

    // Words and the active index
    words: Vec<String>,
    word: usize,

    config: FieldConfig,

    // Simulation
    particles: Particles,
    sampler: GlyphSampler,
    clock: SimClock,
    pointer: Pointer,

    // Output
    renderer: Renderer,

    // Host signals
    motion: Motion,
    visible: bool,
    state: RunState,
    pending_sample: bool,

    // Frame timing
    last_now: Option<f64>,
    fps: f32,

    rng: SmallRng,
}

impl Constellation {
    pub fn new(w: u32, h: u32, words: Vec<String>, config: FieldConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(entropy_seed);
        debug!("new field {}x{}, {} words, seed {:#x}", w, h, words.len(), seed);

        Ok(Self {
            w,
            h,
            words,
            word: 0,
            particles: Particles::new(),
            sampler: GlyphSampler::new(),
            clock: SimClock::new(config.rotation_frames),
            pointer: Pointer::default(),
            renderer: Renderer::new(w, h, Style::from(&config)),
            motion: Motion::default(),
            visible: true,
            state: RunState::Idle,
            pending_sample: true,
            last_now: None,
            fps: 0.0,
            rng: SmallRng::seed_from_u64(seed),
            config,
        })
    }

    /// Mount: sample the active word and begin accepting ticks
    pub fn start(&mut self) {
        if self.state == RunState::Running { return; }
        info!("starting field with {} words", self.words.len());
        self.state = RunState::Running;
        self.clock.reset();
        self.resample();
        self.renderer.draw(&self.particles);
    }

    /// Unmount: ignore ticks until started again
    pub fn stop(&mut self) {
        if self.state == RunState::Running {
            info!("stopping field");
        }
        self.state = RunState::Idle;
        self.pointer.clear();
        self.last_now = None;
    }

    /// One display frame. `now` is the host timestamp in milliseconds.
    pub fn tick(&mut self, now: f64) {
        if self.state != RunState::Running || !self.visible { return; }
        self.track_fps(now);

        if let Err(err) = self.frame() {
            error!("frame failed, stopping field: {}", err);
            self.state = RunState::Stopped;
        }
    }

    fn frame(&mut self) -> Result<()> {
        if self.w == 0 || self.h == 0 { return Ok(()); }

        if self.pending_sample {
            self.resample();
        }

        if !self.motion.reduced() && self.clock.advance() {
            self.next_word();
        }

        let params = ForceParams::from_config(&self.config, self.motion.reduced());
        step(&mut self.particles, &self.pointer, &params)?;
        self.renderer.draw(&self.particles);
        Ok(())
    }

    fn next_word(&mut self) {
        if self.words.len() < 2 { return; }
        self.word = (self.word + 1) % self.words.len();
        info!("rotating to '{}'", self.words[self.word]);
        self.resample();
    }

    /// Sample the active word at the current size and reconcile.
    /// Deferred while the surface has no area.
    fn resample(&mut self) {
        if self.words.is_empty() {
            self.pending_sample = false;
            return;
        }
        if self.w == 0 || self.h == 0 {
            debug!("surface is empty, deferring sample");
            self.pending_sample = true;
            return;
        }

        let word = &self.words[self.word];
        let cloud = self.sampler.sample(word, self.w, self.h, self.config.density, &self.config, &mut self.rng);
        let spread = self.config.spawn_spread * self.w.min(self.h) as f32;
        reconcile(&mut self.particles, &cloud, spread, &mut self.rng);
        self.pending_sample = false;
    }

    /// New surface size; re-targets the current word, positions stay put
    pub fn resize(&mut self, w: u32, h: u32) {
        if w == self.w && h == self.h { return; }
        debug!("resize {}x{} -> {}x{}", self.w, self.h, w, h);
        self.w = w;
        self.h = h;
        self.renderer.resize(w, h);

        if self.state == RunState::Running {
            self.resample();
        } else {
            self.pending_sample = true;
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer.move_to(x, y);
    }

    pub fn pointer_leave(&mut self) {
        self.pointer.clear();
    }

    pub fn set_visible(&mut self, visible: bool) {
        if !visible {
            self.last_now = None;
        }
        self.visible = visible;
    }

    pub fn set_motion(&mut self, motion: Motion) {
        self.motion = motion;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.renderer.theme() == theme { return; }
        debug!("theme {:?} -> {:?}", self.renderer.theme(), theme);
        self.renderer.set_theme(theme);
    }

    fn track_fps(&mut self, now: f64) {
        if let Some(prev) = self.last_now {
            let dt = now - prev;
            if dt > 0.0 {
                let inst = (1000.0 / dt) as f32;
                self.fps = if self.fps == 0.0 { inst } else { self.fps + (inst - self.fps) * FPS_BLEND };
            }
        }
        self.last_now = Some(now);
    }

    // Accessors
    pub fn width(&self) -> u32 { self.w }
    pub fn height(&self) -> u32 { self.h }
    pub fn state(&self) -> RunState { self.state }
    pub fn is_running(&self) -> bool { self.state == RunState::Running }
    pub fn motion(&self) -> Motion { self.motion }
    pub fn is_visible(&self) -> bool { self.visible }
    pub fn fps(&self) -> f32 { self.fps }
    pub fn config(&self) -> &FieldConfig { &self.config }
    pub fn particles(&self) -> &Particles { &self.particles }
    pub fn pointer(&self) -> &Pointer { &self.pointer }
    pub fn renderer(&self) -> &Renderer { &self.renderer }
    pub fn theme(&self) -> Theme { self.renderer.theme() }
    pub fn word_index(&self) -> usize { self.word }

    pub fn active_word(&self) -> Option<&str> {
        self.words.get(self.word).map(String::as_str)
    }
}

#[cfg(target_arch = "wasm32")]
fn entropy_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn entropy_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0xDEAD_BEEF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(words: &[&str]) -> Constellation {
        let config = FieldConfig { seed: Some(11), rotation_frames: 10, ..FieldConfig::default() };
        let words = words.iter().map(|w| w.to_string()).collect();
        let mut f = Constellation::new(200, 120, words, config).unwrap();
        f.set_motion(Motion::Full);
        f
    }

    #[test]
    fn unknown_motion_is_treated_as_reduced() {
        assert!(Motion::default().reduced());
        assert!(Motion::Reduced.reduced());
        assert!(!Motion::Full.reduced());
    }

    #[test]
    fn start_samples_first_word() {
        let mut f = field(&["HI", "YO"]);
        assert!(f.particles().is_empty());
        f.start();
        assert!(f.is_running());
        assert!(!f.particles().is_empty());
        assert_eq!(f.active_word(), Some("HI"));
    }

    #[test]
    fn ticks_before_start_do_nothing() {
        let mut f = field(&["A", "B"]);
        for i in 0..30 {
            f.tick(i as f64 * 16.0);
        }
        assert_eq!(f.word_index(), 0);
        assert!(f.particles().is_empty());
    }

    #[test]
    fn hidden_field_is_frozen() {
        let mut f = field(&["A", "B"]);
        f.start();
        let before = f.particles().clone();
        f.set_visible(false);
        for i in 0..25 {
            f.tick(i as f64 * 16.0);
        }
        assert_eq!(f.word_index(), 0);
        assert_eq!(f.particles(), &before);

        f.set_visible(true);
        f.tick(500.0);
        assert_ne!(f.particles(), &before);
    }

    #[test]
    fn empty_word_list_renders_background_only() {
        let mut f = field(&[]);
        f.start();
        for i in 0..20 {
            f.tick(i as f64);
        }
        assert!(f.is_running());
        assert!(f.particles().is_empty());
        assert_eq!(f.active_word(), None);
    }

    #[test]
    fn zero_size_defers_sampling() {
        let mut f = field(&["RUST"]);
        f.resize(0, 0);
        f.start();
        f.tick(0.0);
        assert!(f.particles().is_empty());

        f.resize(300, 200);
        assert!(!f.particles().is_empty());
    }

    #[test]
    fn failed_frame_stops_the_loop() {
        let mut f = field(&["A", "B"]);
        f.start();
        f.particles.x[0] = f32::NAN;
        f.tick(0.0);
        assert_eq!(f.state(), RunState::Stopped);

        let frozen = f.particles().len();
        for i in 0..30 {
            f.tick(i as f64);
        }
        assert_eq!(f.particles().len(), frozen);
        assert_eq!(f.word_index(), 0);

        // start() from Stopped resumes
        f.particles.x[0] = 0.0;
        f.start();
        assert!(f.is_running());
    }

    #[test]
    fn stop_clears_pointer() {
        let mut f = field(&["A"]);
        f.start();
        f.pointer_move(10.0, 10.0);
        assert!(f.pointer().active);
        f.stop();
        assert!(!f.pointer().active);
        assert_eq!(f.state(), RunState::Idle);
    }

    #[test]
    fn fps_follows_frame_interval() {
        let mut f = field(&["A"]);
        f.start();
        for i in 0..120 {
            f.tick(i as f64 * 20.0);
        }
        assert!((f.fps() - 50.0).abs() < 0.5);
    }

    #[test]
    fn theme_defaults_dark_and_switches() {
        let mut f = field(&["A"]);
        assert_eq!(f.theme(), Theme::Dark);
        f.set_theme(Theme::Light);
        assert_eq!(f.theme(), Theme::Light);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn huge_connection_window_still_draws() {
        let config = FieldConfig::from_json(r#"{"connection_window":18446744073709551615,"seed":1}"#).unwrap();
        let mut f = Constellation::new(200, 120, vec!["HI".into()], config).unwrap();
        f.set_motion(Motion::Full);
        f.start();
        f.tick(0.0);
        assert!(f.is_running());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = FieldConfig { damping: 2.0, ..FieldConfig::default() };
        assert!(Constellation::new(10, 10, vec![], config).is_err());
    }
}
