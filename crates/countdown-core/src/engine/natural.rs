//! Natural time: closed-form decomposition of the raw difference.

use chrono::{DateTime, Utc};

use crate::domain::TimeRemaining;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Remaining wall-clock time, days always 24h.
pub fn remaining(now: DateTime<Utc>, target: DateTime<Utc>) -> TimeRemaining {
    if now >= target {
        return TimeRemaining::EXPIRED;
    }
    let diff = (target - now).num_milliseconds();

    TimeRemaining::new(
        (diff / MS_PER_DAY) as u64,
        ((diff % MS_PER_DAY) / MS_PER_HOUR) as u64,
        ((diff % MS_PER_HOUR) / MS_PER_MINUTE) as u64,
        ((diff % MS_PER_MINUTE) / MS_PER_SECOND) as u64,
    )
}
