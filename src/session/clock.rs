pub const DEFAULT_DURATION_SECS: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockSignal {
    /// The clock was not armed; the tick had no effect.
    Ignored,
    Remaining(u32),
    /// Fired once, on the tick that reaches zero.
    Expired,
}

/// Whole-second countdown. Ticks are delivered by the host; the clock only counts them
/// while armed, so a tick that was already queued when `stop` ran is dropped here.
#[derive(Clone, Debug)]
pub struct SessionClock {
    duration_secs: u32,
    remaining: u32,
    armed: bool,
}

impl SessionClock {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining: duration_secs,
            armed: false,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn start(&mut self) {
        self.remaining = self.duration_secs;
        self.armed = true;
    }

    pub fn stop(&mut self) {
        self.armed = false;
    }

    pub fn on_tick(&mut self) -> ClockSignal {
        if !self.armed {
            return ClockSignal::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.armed = false;
            ClockSignal::Expired
        } else {
            ClockSignal::Remaining(self.remaining)
        }
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}
