//! Working time: minutes inside the daily window, optionally skipping weekends.
//!
//! 基準となる動作は「1 分ずつ進めて窓の中なら数える」走査です：
//! - サンプル時刻は `now, now+1m, now+2m, ...`（`target` 未満の間）
//! - ローカル時刻の分が `[start, end)` に入れば 1 分として数える
//! - 週末を除外する場合、土日に入ったら翌日のローカル 0 時へジャンプする
//!   （ジャンプ後はサンプルの位相が 0 秒にそろう）
//!
//! 実装は 1 日単位の閉形式（O(日数)）で、結果は走査と分単位で一致します。
//! UTC オフセットが日中に変わる日（DST）だけは、その日を走査で数えます。

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveTime, Offset, TimeZone, Timelike, Utc, Weekday,
};

use super::natural;
use crate::domain::{TimeRemaining, WorkingHours};

/// Above this many counted minutes the working computation is abandoned.
pub const WORKING_MINUTE_CEILING: u64 = 1_000_000;

/// A working "day" is 8 hours.
pub const MINUTES_PER_WORKING_DAY: u64 = 8 * 60;

const NANOS_PER_MINUTE: i64 = 60_000_000_000;

/// Remaining working time, falling back to natural time past the ceiling.
pub fn remaining<Tz: TimeZone>(
    now: DateTime<Utc>,
    target: DateTime<Utc>,
    hours: &WorkingHours,
    tz: &Tz,
) -> TimeRemaining {
    let Some(total) = working_minutes(now, target, hours, tz) else {
        tracing::debug!(%now, %target, "working minutes exceed ceiling, using natural time");
        return natural::remaining(now, target);
    };

    if total == 0 {
        return TimeRemaining::EXPIRED;
    }

    TimeRemaining::new(
        total / MINUTES_PER_WORKING_DAY,
        (total % MINUTES_PER_WORKING_DAY) / 60,
        total % 60,
        0,
    )
}

/// Count working minutes in `[now, target)`.
///
/// Returns `None` once the count passes [`WORKING_MINUTE_CEILING`].
pub fn working_minutes<Tz: TimeZone>(
    now: DateTime<Utc>,
    target: DateTime<Utc>,
    hours: &WorkingHours,
    tz: &Tz,
) -> Option<u64> {
    let window = Window::new(hours);
    if window.is_empty() {
        return Some(0);
    }

    let mut cur = now;
    let mut total: u64 = 0;

    while cur < target {
        let local = cur.with_timezone(tz);
        let date = local.date_naive();
        let day_end = next_day_start(tz, date, cur);

        if hours.exclude_weekends && is_weekend(date) {
            cur = day_end;
            continue;
        }

        let stop = day_end.min(target);
        let offset_at_start = local.offset().fix();
        let offset_at_stop = tz
            .offset_from_utc_datetime(&(stop - Duration::nanoseconds(1)).naive_utc())
            .fix();

        if offset_at_start == offset_at_stop {
            let samples = ceil_div(nanos_between(cur, stop), NANOS_PER_MINUTE);
            let since_midnight = nanos_since_midnight(local.time());
            total += window.count_samples(since_midnight, samples);
            cur += Duration::nanoseconds(samples * NANOS_PER_MINUTE);
        } else {
            // offset change inside the day
            while cur < stop {
                let (next, counted) = step(cur, &window, hours.exclude_weekends, tz);
                total += u64::from(counted);
                cur = next;
            }
        }

        if total > WORKING_MINUTE_CEILING {
            return None;
        }
    }

    Some(total)
}

/// `[start, end)` in nanoseconds since local midnight.
#[derive(Debug, Clone, Copy)]
struct Window {
    start: i64,
    end: i64,
}

impl Window {
    fn new(hours: &WorkingHours) -> Self {
        Self {
            start: i64::from(hours.start_minute()) * NANOS_PER_MINUTE,
            end: i64::from(hours.end_minute()) * NANOS_PER_MINUTE,
        }
    }

    fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    fn contains_minute(&self, minute_of_day: u32) -> bool {
        let at = i64::from(minute_of_day) * NANOS_PER_MINUTE;
        self.start <= at && at < self.end
    }

    /// Samples `first + k·1min` for `k < samples` falling inside the window.
    fn count_samples(&self, first: i64, samples: i64) -> u64 {
        let lo = ceil_div(self.start - first, NANOS_PER_MINUTE).max(0);
        let hi = ceil_div(self.end - first, NANOS_PER_MINUTE).min(samples);
        (hi - lo).max(0) as u64
    }
}

/// One step of the minute walk: where it goes next and whether `cur` counted.
fn step<Tz: TimeZone>(
    cur: DateTime<Utc>,
    window: &Window,
    exclude_weekends: bool,
    tz: &Tz,
) -> (DateTime<Utc>, bool) {
    let local = cur.with_timezone(tz);
    let date = local.date_naive();
    if exclude_weekends && is_weekend(date) {
        return (next_day_start(tz, date, cur), false);
    }

    let minute_of_day = local.hour() * 60 + local.minute();
    (cur + Duration::minutes(1), window.contains_minute(minute_of_day))
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// First instant of the local day after `date`, always later than `cur`.
fn next_day_start<Tz: TimeZone>(tz: &Tz, date: NaiveDate, cur: DateTime<Utc>) -> DateTime<Utc> {
    let Some(next) = date.succ_opt() else {
        return DateTime::<Utc>::MAX_UTC;
    };
    let start = local_day_start(tz, next);
    if start > cur {
        start
    } else {
        // fold across midnight
        cur + Duration::minutes(1)
    }
}

/// Local midnight of `date`, or the first valid local time when midnight
/// falls into a DST gap.
fn local_day_start<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    let mut probe = midnight;
    for _ in 0..=24 * 60 {
        if let Some(start) = tz.from_local_datetime(&probe).earliest() {
            return start.with_timezone(&Utc);
        }
        probe += Duration::minutes(1);
    }
    Utc.from_utc_datetime(&midnight)
}

fn nanos_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    // a local day is at most ~26h, far inside i64 nanoseconds
    (to - from).num_nanoseconds().unwrap_or(i64::MAX)
}

fn nanos_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight()) * 1_000_000_000 + i64::from(time.nanosecond())
}

fn ceil_div(a: i64, b: i64) -> i64 {
    a.div_euclid(b) + i64::from(a.rem_euclid(b) != 0)
}
