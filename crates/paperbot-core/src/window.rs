//! Submission window for one run.
//!
//! The search API only returns results within an explicit submission-date
//! range, so each run asks for "everything since the last announcement cut".
//! Mondays reach back over the weekend, when no run happens.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};

use crate::{domain::TimeWindow, errors::Error};

/// Hour (UTC) at which the lookback starts.
const CUTOFF_HOUR: u32 = 18;

/// How the window start is derived from the current time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindowPolicy {
    /// 18:00 two days ago; four days ago on Mondays.
    #[default]
    Weekday,
    /// The last 24 hours.
    Rolling,
}

impl FromStr for WindowPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekday" => Ok(WindowPolicy::Weekday),
            "rolling" => Ok(WindowPolicy::Rolling),
            other => Err(Error::Config(format!(
                "unknown window policy: {other} (expected weekday or rolling)"
            ))),
        }
    }
}

impl WindowPolicy {
    pub fn window(self, now: DateTime<Utc>) -> TimeWindow {
        match self {
            WindowPolicy::Weekday => weekday_window(now),
            WindowPolicy::Rolling => TimeWindow {
                start: now - Duration::days(1),
                end: now,
            },
        }
    }
}

/// `[start, now)` where start is 18:00 on `today - 2` (or `today - 4` on Monday).
pub fn weekday_window(now: DateTime<Utc>) -> TimeWindow {
    let days_back = if now.weekday() == Weekday::Mon { 4 } else { 2 };
    let day = now.date_naive() - Duration::days(days_back);
    let cutoff = NaiveTime::from_hms_opt(CUTOFF_HOUR, 0, 0).unwrap_or_default();
    TimeWindow {
        start: Utc.from_utc_datetime(&day.and_time(cutoff)),
        end: now,
    }
}

/// Render a timestamp the way `submittedDate:[.. TO ..]` expects it.
pub fn arxiv_timestamp(t: DateTime<Utc>) -> String {
    t.format("%Y%m%d%H%M%S").to_string()
}
