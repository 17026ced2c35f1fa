// Frame scheduler scenarios, driven through the public API with a manual clock.

use constellation_engine::glyph::GlyphSampler;
use constellation_engine::sim::{reconcile, Particles};
use constellation_engine::{Constellation, FieldConfig, Motion, RunState};
use pretty_assertions::assert_eq;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn config(rotation_frames: u32) -> FieldConfig {
    FieldConfig { rotation_frames, seed: Some(42), ..FieldConfig::default() }
}

fn field(words: &[&str], rotation_frames: u32, motion: Motion) -> Constellation {
    let words = words.iter().map(|w| w.to_string()).collect();
    let mut f = Constellation::new(320, 200, words, config(rotation_frames)).unwrap();
    f.set_motion(motion);
    f.start();
    f
}

fn run(f: &mut Constellation, ticks: u32) {
    for _ in 0..ticks {
        f.tick(0.0);
    }
}

#[test]
fn words_rotate_and_wrap() {
    let mut f = field(&["A", "B"], 10, Motion::Full);
    assert_eq!(f.active_word(), Some("A"));

    run(&mut f, 9);
    assert_eq!(f.active_word(), Some("A"));
    run(&mut f, 1);
    assert_eq!(f.active_word(), Some("B"));
    run(&mut f, 10);
    assert_eq!(f.active_word(), Some("A"));
}

#[test]
fn reduced_motion_holds_the_first_word() {
    let mut f = field(&["A", "B"], 10, Motion::Reduced);
    run(&mut f, 110);
    assert_eq!(f.active_word(), Some("A"));
    assert!(f.is_running());
}

#[test]
fn unknown_motion_preference_holds_the_first_word() {
    let mut f = field(&["A", "B"], 10, Motion::Unknown);
    run(&mut f, 110);
    assert_eq!(f.active_word(), Some("A"));
}

#[test]
fn particle_count_tracks_each_word() {
    let mut f = field(&["I", "WWW"], 5, Motion::Full);
    let narrow = f.particles().len();
    run(&mut f, 5);
    let wide = f.particles().len();
    assert_ne!(narrow, wide);

    let p = f.particles();
    assert_eq!(p.x.len(), wide);
    assert_eq!(p.tx.len(), wide);
    assert_eq!(p.vy.len(), wide);
}

#[test]
fn word_change_keeps_positions_continuous() {
    let mut f = field(&["ONE", "TWO"], 30, Motion::Full);
    run(&mut f, 29);
    let before = f.particles().clone();
    run(&mut f, 1);
    assert_eq!(f.active_word(), Some("TWO"));

    // One integration step after the switch: retained particles move by
    // exactly one frame of velocity, never teleport.
    let after = f.particles();
    let damping = f.config().damping;
    let cap = f.config().repulsion_cap;
    for i in 0..before.len().min(after.len()) {
        let dx = (after.x[i] - before.x[i]).abs();
        let dy = (after.y[i] - before.y[i]).abs();
        let v = before.speed(i);
        let jump = (after.tx[i] - before.x[i]).hypot(after.ty[i] - before.y[i]);
        let bound = (v + jump * f.config().spring + cap) * damping + 1e-3;
        assert!(dx.hypot(dy) <= bound, "particle {i} jumped");
    }
}

#[test]
fn resize_retargets_without_moving_particles() {
    let mut f = Constellation::new(300, 300, vec!["RUST".into()], config(240)).unwrap();
    f.set_motion(Motion::Full);
    f.start();
    run(&mut f, 20);

    let small = f.particles().len();
    let before = f.particles().clone();
    f.resize(600, 600);
    let after = f.particles();

    assert_ne!(after.len(), small, "denser raster should change the count");
    for i in 0..small.min(after.len()) {
        assert_eq!(after.x[i].to_bits(), before.x[i].to_bits());
        assert_eq!(after.y[i].to_bits(), before.y[i].to_bits());
        assert_eq!(after.vx[i].to_bits(), before.vx[i].to_bits());
    }
    assert_eq!(f.width(), 600);
    assert_eq!(f.renderer().len(), 600 * 600 * 4);
}

#[test]
fn resized_clouds_differ_in_size() {
    let config = config(240);
    let mut rng = SmallRng::seed_from_u64(7);
    let mut sampler = GlyphSampler::new();
    let small = sampler.sample("RUST", 300, 300, 1.0, &config, &mut rng);
    let large = sampler.sample("RUST", 600, 600, 1.0, &config, &mut rng);
    assert_ne!(small.len(), large.len());

    let mut particles = Particles::new();
    reconcile(&mut particles, &small, 40.0, &mut rng);
    assert_eq!(particles.len(), small.len());
    reconcile(&mut particles, &large, 40.0, &mut rng);
    assert_eq!(particles.len(), large.len());
}

#[test]
fn pointer_pushes_particles_away() {
    let mut calm = field(&["O"], 1000, Motion::Full);
    let mut pushed = field(&["O"], 1000, Motion::Full);
    run(&mut calm, 200);
    run(&mut pushed, 200);

    let (cx, cy) = (160.0, 100.0);
    pushed.pointer_move(cx, cy);
    run(&mut calm, 30);
    run(&mut pushed, 30);

    let min_dist = |f: &Constellation| {
        let p = f.particles();
        (0..p.len())
            .map(|i| (p.x[i] - cx).hypot(p.y[i] - cy))
            .fold(f32::MAX, f32::min)
    };
    assert!(min_dist(&pushed) > min_dist(&calm));

    pushed.pointer_leave();
    assert!(!pushed.pointer().active);
}

#[test]
fn field_settles_into_the_word() {
    let mut f = field(&["HI"], 1000, Motion::Full);
    run(&mut f, 600);
    let p = f.particles();
    for i in 0..p.len() {
        assert!((p.x[i] - p.tx[i]).abs() < 0.05);
        assert!((p.y[i] - p.ty[i]).abs() < 0.05);
    }
}

#[test]
fn stop_then_start_resumes() {
    let mut f = field(&["A", "B"], 10, Motion::Full);
    run(&mut f, 5);
    f.stop();
    assert_eq!(f.state(), RunState::Idle);
    run(&mut f, 50);
    assert_eq!(f.active_word(), Some("A"));

    f.start();
    run(&mut f, 10);
    assert_eq!(f.active_word(), Some("B"));
}
