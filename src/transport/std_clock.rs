use core::time::Duration;

use std::time::Instant;

use super::traits::Clock;

/// Host clock backed by [`Instant`]
///
/// The yield point hands the rest of the time slice back to the OS
/// scheduler.
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    /// Create a clock whose origin is now
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }

    fn yield_now(&mut self) {
        std::thread::yield_now();
    }
}
