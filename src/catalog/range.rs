// src/catalog/range.rs
// Dual-range selector: two step-snapped values over [min, max] with low <= high at all times.

use super::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    Low,
    High,
}

impl Handle {
    pub fn other(self) -> Self {
        match self {
            Handle::Low => Handle::High,
            Handle::High => Handle::Low,
        }
    }
}

/// Every setter commits immediately and returns the full `(low, high)` pair for the owner.
/// There is no preview phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DualRange {
    min: i64,
    max: i64,
    step: i64,
    low: i64,
    high: i64,
}

impl DualRange {
    pub fn new(min: i64, max: i64, step: i64, value: Range) -> Self {
        let mut range = DualRange {
            min,
            max: max.max(min),
            step: step.max(1),
            low: min,
            high: max,
        };
        range.sync(min, max, value);
        range
    }

    /// Out-of-band update from the owner (e.g. bounds recomputed). Replaces state
    /// unconditionally; the relative handle position is not preserved.
    pub fn sync(&mut self, min: i64, max: i64, (low, high): Range) {
        self.min = min;
        self.max = max.max(min);
        self.low = low.clamp(self.min, self.max);
        self.high = high.clamp(self.low, self.max);
    }

    pub fn value(&self) -> Range {
        (self.low, self.high)
    }

    pub fn get(&self, handle: Handle) -> i64 {
        match handle {
            Handle::Low => self.low,
            Handle::High => self.high,
        }
    }

    /// Snaps to the step grid anchored at `min`; the endpoints themselves are always reachable.
    fn snap(&self, value: i64) -> i64 {
        if value <= self.min {
            return self.min;
        }
        if value >= self.max {
            return self.max;
        }
        let steps = (value - self.min + self.step / 2).div_euclid(self.step);
        (self.min + steps * self.step).min(self.max)
    }

    pub fn set_low(&mut self, value: i64) -> Range {
        self.low = self.snap(value).min(self.high);
        self.value()
    }

    pub fn set_high(&mut self, value: i64) -> Range {
        self.high = self.snap(value).max(self.low);
        self.value()
    }

    pub fn set(&mut self, handle: Handle, value: i64) -> Range {
        match handle {
            Handle::Low => self.set_low(value),
            Handle::High => self.set_high(value),
        }
    }

    /// Moves a handle by whole steps, as arrow keys do on a native range input.
    pub fn nudge(&mut self, handle: Handle, steps: i64) -> Range {
        let target = self.get(handle).saturating_add(steps.saturating_mul(self.step));
        self.set(handle, target)
    }

    /// Position of `value` along the track, 0..=100. Zero when the domain is a single point.
    pub fn percent(&self, value: i64) -> u8 {
        if self.max == self.min {
            return 0;
        }
        let fraction = (value - self.min) as f64 / (self.max - self.min) as f64;
        (fraction * 100.0).round().clamp(0.0, 100.0) as u8
    }

    pub fn low_percent(&self) -> u8 {
        self.percent(self.low)
    }

    pub fn high_percent(&self) -> u8 {
        self.percent(self.high)
    }
}
