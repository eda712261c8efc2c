/// A value that walks back and forth between 0.0 and 1.0 in fixed increments.
///
/// Stored as an integer step so the bounds are hit exactly, no matter how many
/// times it has bounced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Oscillator {
    step: u32,
    steps: u32,
    rising: bool,
}

impl Oscillator {
    /// Increment used by the color-pulse lessons.
    pub const DEFAULT_INCREMENT: f32 = 0.05;

    /// Oscillator starting at 0.0 that takes `steps` frames to reach 1.0.
    ///
    /// # Panics
    /// Panics if `steps` is zero.
    pub fn new(steps: u32) -> Self {
        assert!(steps > 0, "an oscillator needs at least one step");
        Self {
            step: 0,
            steps,
            rising: true,
        }
    }

    /// Oscillator moving by roughly `increment` per frame.
    ///
    /// The increment is rounded so that 1.0 is a whole number of steps away.
    pub fn with_increment(increment: f32) -> Self {
        let steps = (1.0 / increment.abs()).round().max(1.0) as u32;
        Self::new(steps)
    }

    /// Current value in `[0.0, 1.0]`.
    pub fn value(&self) -> f32 {
        self.step as f32 / self.steps as f32
    }

    /// Signed amount the next call to [`advance`](Self::advance) adds.
    pub fn increment(&self) -> f32 {
        let magnitude = 1.0 / self.steps as f32;
        if self.rising {
            magnitude
        } else {
            -magnitude
        }
    }

    /// Move one step, turning around when a bound is reached.
    pub fn advance(&mut self) -> f32 {
        if self.rising {
            self.step += 1;
            if self.step >= self.steps {
                self.rising = false;
            }
        } else {
            self.step -= 1;
            if self.step == 0 {
                self.rising = true;
            }
        }
        self.value()
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::with_increment(Self::DEFAULT_INCREMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_one_after_twenty_frames_then_reverses() {
        let mut osc = Oscillator::default();
        assert_eq!(osc.value(), 0.0);
        assert_eq!(osc.increment(), 0.05);

        for _ in 0..19 {
            osc.advance();
            assert!(osc.increment() > 0.0);
        }
        assert_eq!(osc.advance(), 1.0);
        assert_eq!(osc.increment(), -0.05);

        osc.advance();
        assert_eq!(osc.value(), 0.95);
    }

    #[test]
    fn bounces_off_zero_too() {
        let mut osc = Oscillator::new(4);
        let seen: Vec<f32> = (0..9).map(|_| osc.advance()).collect();
        assert_eq!(seen, vec![0.25, 0.5, 0.75, 1.0, 0.75, 0.5, 0.25, 0.0, 0.25]);
        assert!(seen.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn increment_is_rounded_to_whole_steps() {
        assert_eq!(Oscillator::with_increment(0.3), Oscillator::new(3));
        assert_eq!(Oscillator::with_increment(-0.05), Oscillator::new(20));
    }
}
