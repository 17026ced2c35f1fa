// raster.rs - Offscreen glyph buffer
//
// Renders a word, centered, into an 8-bit alpha buffer. Coverage is
// supersampled so stroke edges come out partially transparent and the
// sampler's threshold can tell stroke interiors from antialiased edges.

use super::font::{self, Glyph, ADVANCE, GLYPH_ROWS};

const SUPERSAMPLE: usize = 4;

/// Placement of a word inside the buffer, in pixels
pub struct TextLayout {
    pub glyphs: Vec<Glyph>,
    pub x0: f32,
    pub y0: f32,
    /// Edge length of one font cell
    pub cell: f32,
}

impl TextLayout {
    pub fn new(word: &str, w: u32, h: u32, font_px: f32) -> Self {
        let glyphs: Vec<Glyph> = word.chars().map(font::glyph).collect();
        let cell = font_px / GLYPH_ROWS as f32;
        let text_w = text_cells(glyphs.len()) as f32 * cell;
        Self {
            glyphs,
            x0: (w as f32 - text_w) * 0.5,
            y0: (h as f32 - font_px) * 0.5,
            cell,
        }
    }

    /// Is the point (in pixels) inside a lit cell
    #[inline]
    pub fn covers(&self, px: f32, py: f32) -> bool {
        let u = (px - self.x0) / self.cell;
        let v = (py - self.y0) / self.cell;
        if u < 0.0 || v < 0.0 { return false; }

        let (col, row) = (u as usize, v as usize);
        let (gi, gc) = (col / ADVANCE, col % ADVANCE);
        match self.glyphs.get(gi) {
            Some(g) => font::lit(g, gc, row),
            None => false,
        }
    }

    /// Centers of all lit cells, in pixels
    pub fn lit_centers(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.glyphs.iter().enumerate().flat_map(move |(gi, g)| {
            (0..GLYPH_ROWS).flat_map(move |row| {
                (0..ADVANCE).filter_map(move |col| {
                    font::lit(g, col, row).then(|| {
                        (
                            self.x0 + ((gi * ADVANCE + col) as f32 + 0.5) * self.cell,
                            self.y0 + (row as f32 + 0.5) * self.cell,
                        )
                    })
                })
            })
        })
    }

    /// Pixel bounds (x_min, y_min, x_max, y_max), exclusive max
    fn bounds(&self, w: u32, h: u32) -> (u32, u32, u32, u32) {
        let text_w = text_cells(self.glyphs.len()) as f32 * self.cell;
        let text_h = GLYPH_ROWS as f32 * self.cell;
        let clamp_x = |v: f32| v.clamp(0.0, w as f32) as u32;
        let clamp_y = |v: f32| v.clamp(0.0, h as f32) as u32;
        (
            clamp_x(self.x0.floor()),
            clamp_y(self.y0.floor()),
            clamp_x((self.x0 + text_w).ceil()),
            clamp_y((self.y0 + text_h).ceil()),
        )
    }
}

/// Width of `n` glyphs in cells, without trailing spacing
#[inline]
pub fn text_cells(n: usize) -> usize {
    (n * ADVANCE).saturating_sub(1)
}

/// Row-major offset of (x, y) in a buffer `w` wide, computed in usize
#[inline]
fn cell_index(w: u32, x: u32, y: u32) -> usize {
    y as usize * w as usize + x as usize
}

pub struct GlyphBuffer {
    alpha: Vec<u8>,
    w: u32,
    h: u32,
}

impl GlyphBuffer {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            alpha: vec![0; cell_index(w, 0, h)],
            w,
            h,
        }
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.w = w;
        self.h = h;
        self.alpha.resize(cell_index(w, 0, h), 0);
    }

    pub fn clear(&mut self) {
        self.alpha.fill(0);
    }

    pub fn width(&self) -> u32 { self.w }
    pub fn height(&self) -> u32 { self.h }

    #[inline]
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        if x >= self.w || y >= self.h { return 0; }
        self.alpha[cell_index(self.w, x, y)]
    }

    /// Render `word` centered with cap height `font_px`
    pub fn rasterize(&mut self, word: &str, font_px: f32) -> TextLayout {
        self.clear();
        let layout = TextLayout::new(word, self.w, self.h, font_px);
        let (x_min, y_min, x_max, y_max) = layout.bounds(self.w, self.h);

        let step = 1.0 / SUPERSAMPLE as f32;
        let full = (SUPERSAMPLE * SUPERSAMPLE) as u32;

        for y in y_min..y_max {
            for x in x_min..x_max {
                let mut hits = 0u32;
                for sy in 0..SUPERSAMPLE {
                    for sx in 0..SUPERSAMPLE {
                        let px = x as f32 + (sx as f32 + 0.5) * step;
                        let py = y as f32 + (sy as f32 + 0.5) * step;
                        if layout.covers(px, py) { hits += 1; }
                    }
                }
                if hits > 0 {
                    self.alpha[cell_index(self.w, x, y)] = (hits * 255 / full) as u8;
                }
            }
        }

        layout
    }
}
