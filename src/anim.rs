use crate::core::TIME_STEP;

/// Monotonically advancing animation clock.
///
/// Every pulse quantity derived from it goes through `sin`, so the scalar is
/// allowed to grow without bound; there is no wrap-around handling.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PulseClock {
    time: f64,
}

impl PulseClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(time: f64) -> Self {
        Self { time }
    }

    pub fn time(self) -> f64 {
        self.time
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.time += TIME_STEP;
    }

    fn phase(self, marker_index: usize) -> f64 {
        (self.time * 2.0 + marker_index as f64).sin()
    }

    /// Pulsing ring radius for a marker of the given base size.
    ///
    /// The marker index offsets the phase so adjacent markers do not pulse in
    /// lockstep.
    pub fn ring_radius(self, marker_size: f64, marker_index: usize) -> f64 {
        marker_size * 10.0 + self.phase(marker_index) * 2.0 + 5.0
    }

    /// Pulsing ring stroke opacity, oscillating in counter-phase with the
    /// radius: the ring is faintest when largest.
    pub fn ring_alpha(self, marker_index: usize) -> f64 {
        0.5 - self.phase(marker_index) * 0.3
    }
}
