/// Ticks replayed at most per `advance`; a longer pause (for instance a
/// backgrounded browser tab) drops the excess time.
pub const MAX_CATCH_UP_TICKS: u32 = 4;

/// Fixed-period gravity timer fed with elapsed host time.
#[derive(Clone, Debug, PartialEq)]
pub struct GravityClock {
    interval_ms: f32,
    accumulated_ms: f32,
}

impl GravityClock {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            interval_ms: interval_ms.max(1.0),
            accumulated_ms: 0.0,
        }
    }

    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    /// Adds `dt_ms` and returns how many ticks are due.
    pub fn advance(&mut self, dt_ms: f32) -> u32 {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.accumulated_ms += dt_ms;
        }
        let mut due = 0;
        while self.accumulated_ms >= self.interval_ms {
            self.accumulated_ms -= self.interval_ms;
            due += 1;
            if due == MAX_CATCH_UP_TICKS {
                self.accumulated_ms = 0.0;
                break;
            }
        }
        due
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0.0;
    }
}
