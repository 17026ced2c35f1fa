use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod glyph;
pub mod render;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::FieldConfig;
pub use error::FieldError;
pub use render::Theme;
pub use sim::{Constellation, Motion, RunState};

// ============================================================================
// CONSTELLATION FIELD - Words as settling particle clouds
// ============================================================================

/// Accessible description of the raster output
pub const ARIA_LABEL: &str = "An animated constellation forming words describing expertise";

#[wasm_bindgen]
pub fn aria_label() -> String {
    ARIA_LABEL.to_string()
}

/// Host-driven field: JS calls `tick` from its own frame loop and blits
/// `output_ptr()` (RGBA8, width x height) into an ImageData.
#[wasm_bindgen]
pub struct ConstellationField {
    inner: Constellation,
}

#[wasm_bindgen]
impl ConstellationField {
    #[wasm_bindgen(constructor)]
    pub fn new(w: u32, h: u32, words: js_sys::Array, density: f32) -> Result<ConstellationField, JsError> {
        let config = FieldConfig { density, ..FieldConfig::default() };
        Ok(Self { inner: Constellation::new(w, h, words_from(&words), config)? })
    }

    /// Same as the constructor, tuned by a JSON object of `FieldConfig` keys
    pub fn with_config(w: u32, h: u32, words: js_sys::Array, config_json: &str) -> Result<ConstellationField, JsError> {
        let config = FieldConfig::from_json(config_json)?;
        Ok(Self { inner: Constellation::new(w, h, words_from(&words), config)? })
    }

    pub fn start(&mut self) { self.inner.start(); }
    pub fn stop(&mut self) { self.inner.stop(); }
    pub fn tick(&mut self, now: f64) { self.inner.tick(now); }
    pub fn resize(&mut self, w: u32, h: u32) { self.inner.resize(w, h); }

    pub fn pointer_move(&mut self, x: f32, y: f32) { self.inner.pointer_move(x, y); }
    pub fn pointer_leave(&mut self) { self.inner.pointer_leave(); }

    pub fn set_visible(&mut self, visible: bool) { self.inner.set_visible(visible); }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.inner.set_motion(Motion::from_reduced(reduced));
    }

    pub fn set_dark_theme(&mut self, dark: bool) {
        self.inner.set_theme(if dark { Theme::Dark } else { Theme::Light });
    }

    // Accessors for WASM
    pub fn output_ptr(&self) -> *const u8 { self.inner.renderer().ptr() }
    pub fn output_len(&self) -> usize { self.inner.renderer().len() }
    pub fn width(&self) -> u32 { self.inner.width() }
    pub fn height(&self) -> u32 { self.inner.height() }
    pub fn active_word(&self) -> Option<String> { self.inner.active_word().map(str::to_string) }
    pub fn particle_count(&self) -> usize { self.inner.particles().len() }
    pub fn is_running(&self) -> bool { self.inner.is_running() }
    pub fn fps(&self) -> f32 { self.inner.fps() }
}

/// String entries of a JS array; anything else is skipped
pub(crate) fn words_from(words: &js_sys::Array) -> Vec<String> {
    words.iter().filter_map(|v| v.as_string()).collect()
}
