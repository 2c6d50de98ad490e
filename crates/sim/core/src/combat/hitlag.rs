//! Hit-lag bookkeeping.
//!
//! Halts are declared in fractional frames (`seconds × 60`). The controller
//! keeps the fractional remainder and only ever releases whole frames; the
//! engine forwards those to [`Scheduler::delay_all`].
//!
//! [`Scheduler::delay_all`]: crate::engine::Scheduler::delay_all

use tracing::trace;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HitlagController {
    carry: f64,
    total_frames: u64,
    events: u32,
    last_factor: f64,
}

impl HitlagController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freeze and returns the whole frames to apply now.
    ///
    /// `factor` is the damping the reference engine uses for the attacker's
    /// own animation; it is kept for reporting only.
    pub fn apply(&mut self, halt_frames: f64, factor: f64) -> u64 {
        if halt_frames <= 0.0 || !halt_frames.is_finite() {
            return 0;
        }
        self.events += 1;
        self.last_factor = factor;

        self.carry += halt_frames;
        let whole = self.carry.floor();
        self.carry -= whole;

        let frames = whole as u64;
        self.total_frames += frames;
        trace!(halt_frames, frames, carry = self.carry, "hitlag");
        frames
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn events(&self) -> u32 {
        self.events
    }

    pub fn last_factor(&self) -> f64 {
        self.last_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractional_halts_carry_over() {
        let mut hitlag = HitlagController::new();
        assert_eq!(hitlag.apply(3.6, 0.01), 3);
        assert_eq!(hitlag.apply(3.6, 0.01), 4);
        assert_eq!(hitlag.total_frames(), 7);
        assert_eq!(hitlag.events(), 2);
    }

    #[test]
    fn zero_halt_is_a_no_op() {
        let mut hitlag = HitlagController::new();
        assert_eq!(hitlag.apply(0.0, 0.01), 0);
        assert_eq!(hitlag.events(), 0);
    }
}
