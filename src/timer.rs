//! One-per-second countdown used in timed mode.
//!
//! The countdown does not own a clock. Whoever drives it (the browser
//! interval in the game, a loop in tests) calls [`Countdown::tick`] once per
//! second.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Not running; the tick is ignored.
    Idle,
    Running(u32),
    /// Reached zero on this tick. Reported exactly once.
    Expired,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    running: bool,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start from `seconds`. A zero start expires on the first tick.
    pub fn start(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.running = true;
    }

    /// Cancel and zero. Safe to call when not running.
    pub fn stop(&mut self) {
        self.remaining = 0;
        self.running = false;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_exactly_once() {
        let mut c = Countdown::new();
        c.start(3);
        assert_eq!(c.tick(), Tick::Running(2));
        assert_eq!(c.tick(), Tick::Running(1));
        assert_eq!(c.tick(), Tick::Expired);
        assert_eq!(c.tick(), Tick::Idle);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn stop_is_idempotent_and_zeroes() {
        let mut c = Countdown::new();
        c.stop();
        c.start(10);
        c.tick();
        c.stop();
        c.stop();
        assert_eq!(c.remaining(), 0);
        assert!(!c.is_running());
        assert_eq!(c.tick(), Tick::Idle);
    }

    #[test]
    fn restart_replaces_remaining_time() {
        let mut c = Countdown::new();
        c.start(2);
        c.tick();
        c.start(5);
        assert_eq!(c.remaining(), 5);
        assert_eq!(c.tick(), Tick::Running(4));
    }
}
