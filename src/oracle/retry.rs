use std::thread;
use std::time::Duration;

const MAX_BACKOFF: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Growth {
    Exponential,
    Fixed,
}

/// Attempt budget plus the pause taken after each failed attempt.
///
/// `max_attempts == None` never runs out. Attempts are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: Option<u32>,
    base_delay: Duration,
    growth: Growth,
}

impl RetryPolicy {
    /// `base_delay * 2^(attempt-1)`, capped at one minute.
    pub fn exponential(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
            base_delay,
            growth: Growth::Exponential,
        }
    }

    pub fn fixed(max_attempts: Option<u32>, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.map(|max| max.max(1)),
            base_delay: delay,
            growth: Growth::Fixed,
        }
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn allows_another(&self, attempts_made: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempts_made < max)
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.growth {
            Growth::Fixed => self.base_delay,
            Growth::Exponential => {
                let exponent = attempt.saturating_sub(1).min(16);
                self.base_delay
                    .saturating_mul(1_u32 << exponent)
                    .min(MAX_BACKOFF.max(self.base_delay))
            }
        }
    }
}

pub fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
