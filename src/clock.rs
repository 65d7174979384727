use std::time::Instant;

/// Elapsed-time source for a typing session.
///
/// A clock starts armed: `elapsed()` is zero until `start()` is called. After `stop()`
/// the last measured value is frozen. Scheduling the periodic refresh is the host's job;
/// the clock is only ever queried.
pub trait Clock {
    fn start(&mut self);
    fn stop(&mut self);
    /// Back to the armed state with zero elapsed time.
    fn reset(&mut self);
    fn is_running(&self) -> bool;
    /// Seconds since `start()`, or the frozen value once stopped.
    fn elapsed(&self) -> f64;
}

/// Wall clock backed by the monotonic `Instant`.
#[derive(Debug, Default, Clone)]
pub struct SystemClock {
    started_at: Option<Instant>,
    frozen: Option<f64>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn start(&mut self) {
        self.started_at = Some(Instant::now());
        self.frozen = None;
    }

    fn stop(&mut self) {
        if self.is_running() {
            self.frozen = Some(self.elapsed());
        }
    }

    fn reset(&mut self) {
        self.started_at = None;
        self.frozen = None;
    }

    fn is_running(&self) -> bool {
        self.started_at.is_some() && self.frozen.is_none()
    }

    fn elapsed(&self) -> f64 {
        match (self.frozen, self.started_at) {
            (Some(frozen), _) => frozen,
            (None, Some(started_at)) => started_at.elapsed().as_secs_f64(),
            (None, None) => 0.0,
        }
    }
}

/// Hand-driven clock for deterministic tests and headless hosts.
///
/// Time only moves when `advance()` is called, and only while the clock is running.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ManualClock {
    elapsed: f64,
    running: bool,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, secs: f64) {
        if self.running {
            self.elapsed += secs.max(0.0);
        }
    }
}

impl Clock for ManualClock {
    fn start(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_system_clock_armed_until_started() {
        let clock = SystemClock::new();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_system_clock_measures_and_freezes() {
        let mut clock = SystemClock::new();
        clock.start();
        thread::sleep(Duration::from_millis(10));
        assert!(clock.is_running());
        assert!(clock.elapsed() >= 0.01);

        clock.stop();
        let frozen = clock.elapsed();
        thread::sleep(Duration::from_millis(10));
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(), frozen);
    }

    #[test]
    fn test_system_clock_stop_is_idempotent() {
        let mut clock = SystemClock::new();
        clock.start();
        clock.stop();
        let frozen = clock.elapsed();
        thread::sleep(Duration::from_millis(5));
        clock.stop();
        assert_eq!(clock.elapsed(), frozen);
    }

    #[test]
    fn test_system_clock_reset() {
        let mut clock = SystemClock::new();
        clock.start();
        clock.stop();
        clock.reset();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_manual_clock_only_advances_while_running() {
        let mut clock = ManualClock::new();
        clock.advance(5.0);
        assert_eq!(clock.elapsed(), 0.0);

        clock.start();
        clock.advance(1.5);
        clock.advance(1.5);
        assert_eq!(clock.elapsed(), 3.0);

        clock.stop();
        clock.advance(10.0);
        assert_eq!(clock.elapsed(), 3.0);
    }

    #[test]
    fn test_manual_clock_ignores_negative_steps() {
        let mut clock = ManualClock::new();
        clock.start();
        clock.advance(2.0);
        clock.advance(-1.0);
        assert_eq!(clock.elapsed(), 2.0);
    }
}
