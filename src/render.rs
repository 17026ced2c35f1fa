// render.rs - Draw simulation state to an RGBA framebuffer
//
// Output layout (for canvas ImageData): w * h * 4 bytes, RGBA8, row-major.
//
// Per frame: copy the cached background, connection lines between nearby
// list neighbors, then particle discs on top.

use crate::config::FieldConfig;
use crate::sim::Particles;

const CHANNELS: usize = 4;

// Peak opacity of a connection line at zero distance
const LINE_ALPHA: f32 = 0.45;

pub type Rgb = [u8; 3];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

struct Palette {
    inner: Rgb,
    outer: Rgb,
    line: Rgb,
    particle: Rgb,
}

impl Theme {
    fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                inner: [22, 28, 48],
                outer: [6, 8, 16],
                line: [120, 150, 255],
                particle: [200, 215, 255],
            },
            Theme::Light => Palette {
                inner: [252, 252, 255],
                outer: [222, 228, 240],
                line: [70, 90, 170],
                particle: [35, 50, 120],
            },
        }
    }
}

/// Line and particle styling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub connection_distance: f32,
    pub connection_window: usize,
    pub particle_radius: f32,
}

impl From<&FieldConfig> for Style {
    fn from(config: &FieldConfig) -> Self {
        Self {
            connection_distance: config.connection_distance,
            connection_window: config.connection_window,
            particle_radius: config.particle_radius,
        }
    }
}

pub struct Renderer {
    out: Vec<u8>,
    background: Vec<u8>,
    w: u32,
    h: u32,
    theme: Theme,
    style: Style,
}

impl Renderer {
    pub fn new(w: u32, h: u32, style: Style) -> Self {
        let mut r = Self {
            out: Vec::new(),
            background: Vec::new(),
            w,
            h,
            theme: Theme::default(),
            style,
        };
        r.resize(w, h);
        r
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.w = w;
        self.h = h;
        let len = w as usize * h as usize * CHANNELS;
        self.out.resize(len, 0);
        self.background.resize(len, 0);
        self.paint_background();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            self.theme = theme;
            self.paint_background();
        }
    }

    pub fn theme(&self) -> Theme { self.theme }

    pub fn ptr(&self) -> *const u8 { self.out.as_ptr() }
    pub fn len(&self) -> usize { self.out.len() }
    pub fn is_empty(&self) -> bool { self.out.is_empty() }
    pub fn pixels(&self) -> &[u8] { &self.out }

    /// RGB at (x, y), for inspection
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.w || y >= self.h { return None; }
        let i = (y as usize * self.w as usize + x as usize) * CHANNELS;
        Some([self.out[i], self.out[i + 1], self.out[i + 2]])
    }

    /// Background only
    pub fn clear(&mut self) {
        self.out.copy_from_slice(&self.background);
    }

    pub fn draw(&mut self, particles: &Particles) {
        self.clear();
        if self.w == 0 || self.h == 0 { return; }
        self.draw_connections(particles);
        self.draw_particles(particles);
    }

    /// Radial gradient, center to corners
    fn paint_background(&mut self) {
        let pal = self.theme.palette();
        let (cx, cy) = (self.w as f32 * 0.5, self.h as f32 * 0.5);
        let max_d = cx.hypot(cy).max(1.0);

        for y in 0..self.h {
            for x in 0..self.w {
                let t = ((x as f32 + 0.5 - cx).hypot(y as f32 + 0.5 - cy) / max_d).min(1.0);
                let i = (y as usize * self.w as usize + x as usize) * CHANNELS;
                for c in 0..3 {
                    self.background[i + c] = lerp(pal.inner[c] as f32, pal.outer[c] as f32, t) as u8;
                }
                self.background[i + 3] = 255;
            }
        }
    }

    /// Lines between each particle and its next few list neighbors
    fn draw_connections(&mut self, p: &Particles) {
        let color = self.theme.palette().line;
        let max_d = self.style.connection_distance;
        if max_d <= 0.0 { return; }
        let max_d2 = max_d * max_d;
        let n = p.len();

        for i in 0..n {
            let end = i.saturating_add(1).saturating_add(self.style.connection_window).min(n);
            for j in i + 1..end {
                let dx = p.x[j] - p.x[i];
                let dy = p.y[j] - p.y[i];
                let d2 = dx * dx + dy * dy;
                if d2 >= max_d2 { continue; }

                let alpha = (1.0 - d2.sqrt() / max_d) * LINE_ALPHA;
                self.line(p.x[i], p.y[i], p.x[j], p.y[j], color, alpha);
            }
        }
    }

    fn draw_particles(&mut self, p: &Particles) {
        let color = self.theme.palette().particle;
        let r = self.style.particle_radius;
        for i in 0..p.len() {
            self.disc(p.x[i], p.y[i], r, color);
        }
    }

    /// DDA line, one blended sample per major-axis pixel
    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb, alpha: f32) {
        let (dx, dy) = (x1 - x0, y1 - y0);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        let (sx, sy) = (dx / steps as f32, dy / steps as f32);

        let (mut x, mut y) = (x0, y0);
        for _ in 0..=steps {
            self.blend(x as i32, y as i32, color, alpha);
            x += sx;
            y += sy;
        }
    }

    /// Filled disc with a one-pixel soft edge
    fn disc(&mut self, cx: f32, cy: f32, r: f32, color: Rgb) {
        let reach = r + 0.5;
        let (x_min, x_max) = ((cx - reach).floor() as i32, (cx + reach).ceil() as i32);
        let (y_min, y_max) = ((cy - reach).floor() as i32, (cy + reach).ceil() as i32);

        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let d = (x as f32 + 0.5 - cx).hypot(y as f32 + 0.5 - cy);
                let coverage = (reach - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    #[inline]
    fn blend(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if (x as u32) >= self.w || (y as u32) >= self.h { return; }
        let i = (y as usize * self.w as usize + x as usize) * CHANNELS;
        for c in 0..3 {
            let dst = self.out[i + c] as f32;
            self.out[i + c] = lerp(dst, color[c] as f32, alpha).round() as u8;
        }
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 { a + (b - a) * t }
