// pointer.rs - Pointer / touch state
//
// Written by input handlers between frames, read by the integrator.

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    pub active: bool,
}

impl Pointer {
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.active = true;
    }

    /// Pointer left the surface or touch ended
    pub fn clear(&mut self) {
        self.active = false;
    }
}
