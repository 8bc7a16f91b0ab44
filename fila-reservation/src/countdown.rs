use chrono::{DateTime, Utc};

/// Remaining-time arithmetic for a seat hold. Always recomputed from the
/// wall clock against `expires_at`, never from accumulated ticks, so the
/// display self-corrects after tab suspension.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    expires_at: DateTime<Utc>,
    urgency_threshold_seconds: i64,
}

impl Countdown {
    pub fn new(expires_at: DateTime<Utc>) -> Self {
        Self {
            expires_at,
            urgency_threshold_seconds: 60,
        }
    }

    pub fn with_urgency_threshold(mut self, seconds: i64) -> Self {
        self.urgency_threshold_seconds = seconds;
        self
    }

    /// Whole seconds left, clamped at zero.
    pub fn time_left(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.time_left(now) == 0
    }

    pub fn is_urgent(&self, now: DateTime<Utc>) -> bool {
        self.time_left(now) < self.urgency_threshold_seconds
    }

    /// mm:ss with zero-padded seconds, e.g. 299 s -> "4:59".
    pub fn format_mmss(&self, now: DateTime<Utc>) -> String {
        let left = self.time_left(now);
        format!("{}:{:02}", left / 60, left % 60)
    }
}
