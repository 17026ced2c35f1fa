// glyph/ - Text to target points
//
// Baked bitmap font, offscreen rasterizer and grid sampler.
// No simulation state here, only what one word change needs.

pub mod font;
mod raster;
mod sampler;

pub use raster::{GlyphBuffer, TextLayout};
pub use sampler::{font_size, grid_step, GlyphCloud, GlyphSampler};
