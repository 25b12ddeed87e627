//! School opening hours.
//!
//! Students may only work on tests while school is open; teachers are never
//! restricted.

use std::fmt;

use chrono::{Duration, NaiveTime};

use crate::model::Role;

/// Daily window during which students can take tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchoolHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl Default for SchoolHours {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(22, 45, 0).unwrap_or_default(),
        }
    }
}

/// Whether a user may work right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Open; `until_close` is `None` for users without a deadline.
    Open { until_close: Option<Duration> },
    Closed,
}

impl Availability {
    pub fn is_open(&self) -> bool {
        matches!(self, Availability::Open { .. })
    }
}

impl SchoolHours {
    /// Parse `HH:MM` open and close times.
    pub fn parse(open: &str, close: &str) -> anyhow::Result<Self> {
        let parse = |s: &str| {
            NaiveTime::parse_from_str(s.trim(), "%H:%M")
                .map_err(|e| anyhow::anyhow!("invalid time '{s}' (expected HH:MM): {e}"))
        };
        let hours = Self {
            open: parse(open)?,
            close: parse(close)?,
        };
        anyhow::ensure!(
            hours.open < hours.close,
            "school opens at {} but closes at {}",
            hours.open.format("%H:%M"),
            hours.close.format("%H:%M")
        );
        Ok(hours)
    }

    /// Availability for `role` at wall-clock time `now`, at minute precision.
    pub fn availability(&self, role: Role, now: NaiveTime) -> Availability {
        if role == Role::Teacher {
            return Availability::Open { until_close: None };
        }

        let minutes = |t: NaiveTime| {
            use chrono::Timelike;
            i64::from(t.hour()) * 60 + i64::from(t.minute())
        };
        let current = minutes(now);
        let open = minutes(self.open);
        let close = minutes(self.close);

        if current >= open && current < close {
            Availability::Open {
                until_close: Some(Duration::minutes(close - current)),
            }
        } else {
            Availability::Closed
        }
    }
}

impl fmt::Display for SchoolHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.open.format("%H:%M"),
            self.close.format("%H:%M")
        )
    }
}

/// Render a remaining duration as `"<h>h <m>m"`.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_minutes().max(0);
    format!("{}h {}m", total / 60, total % 60)
}
