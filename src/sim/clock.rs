// clock.rs - Word rotation clock
//
// Counts frames since the last word change.

#[derive(Debug, Clone)]
pub struct SimClock {
    frames: u32,
    threshold: u32,
}

impl SimClock {
    pub fn new(threshold: u32) -> Self {
        Self { frames: 0, threshold: threshold.max(1) }
    }

    /// Count one frame; true (and reset) when the threshold is reached
    pub fn advance(&mut self) -> bool {
        self.frames += 1;
        if self.frames >= self.threshold {
            self.frames = 0;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.frames = 0;
    }

    pub fn frames(&self) -> u32 { self.frames }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_threshold_and_resets() {
        let mut clock = SimClock::new(3);
        assert!(!clock.advance());
        assert!(!clock.advance());
        assert!(clock.advance());
        assert_eq!(clock.frames(), 0);
        assert!(!clock.advance());
    }

    #[test]
    fn zero_threshold_fires_every_frame() {
        let mut clock = SimClock::new(0);
        assert!(clock.advance());
        assert!(clock.advance());
    }
}
