//! Per-player countdown clock.
//!
//! The timer only does the bookkeeping. Scheduling the one-second ticks is the
//! session actor's job; every tick carries the epoch it was armed for, so a
//! tick from a disarmed period never counts.

/// Result of arming a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arm {
    /// Newly armed: the caller must schedule ticks for this epoch.
    Scheduled,
    /// Already armed for this epoch; nothing to schedule.
    AlreadyArmed,
    /// The clock was already at zero. Reported once.
    Expired,
    /// The clock expired earlier; it never runs again.
    Spent,
}

/// Result of one elapsed second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Ignored,
    Counted(u32),
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnTimer {
    seconds_remaining: u32,
    armed_epoch: Option<u64>,
    expired: bool,
}

impl TurnTimer {
    pub fn new(seconds: u32) -> Self {
        Self {
            seconds_remaining: seconds,
            armed_epoch: None,
            expired: false,
        }
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn is_armed(&self) -> bool {
        self.armed_epoch.is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Start counting for `epoch`.
    pub fn arm(&mut self, epoch: u64) -> Arm {
        if self.expired {
            return Arm::Spent;
        }
        if self.seconds_remaining == 0 {
            self.expired = true;
            self.armed_epoch = None;
            return Arm::Expired;
        }
        if self.armed_epoch == Some(epoch) {
            return Arm::AlreadyArmed;
        }
        self.armed_epoch = Some(epoch);
        Arm::Scheduled
    }

    /// Stop counting. Returns whether the timer was armed.
    pub fn disarm(&mut self) -> bool {
        self.armed_epoch.take().is_some()
    }

    /// Apply one elapsed second scheduled for `epoch`.
    pub fn tick(&mut self, epoch: u64) -> Tick {
        if self.expired || self.armed_epoch != Some(epoch) {
            return Tick::Ignored;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.expired = true;
            self.armed_epoch = None;
            Tick::Expired
        } else {
            Tick::Counted(self.seconds_remaining)
        }
    }
}
