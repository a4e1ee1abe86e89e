/// Monotonic system clock interface

/// Millisecond clock used to timestamp sensor samples
///
/// Values must never decrease. Wrapping after ~49 days is tolerated by
/// callers that only compare recent timestamps.
pub trait Clock {
    /// Get the time since boot in milliseconds
    fn now_ms(&self) -> u32;
}

/// Clock backed by `std::time::Instant`, counting from construction
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

/// Clock backed by the embassy time driver
#[cfg(feature = "embassy")]
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyClock;

#[cfg(feature = "embassy")]
impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        embassy_time::Instant::now().as_millis() as u32
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_std_clock_is_monotonic() {
        let clock = StdClock::new();
        let first = clock.now_ms();
        let second = clock.now_ms();
        assert!(second >= first, "clock went backwards: {} -> {}", first, second);
    }
}
