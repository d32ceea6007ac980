//! Time engine - 残り時間の計算
//!
//! 純粋関数のみ（I/O なし、状態なし）。どのスレッドから何回呼んでも干渉しません。
//! 表示側は 1 秒ごとなどの tick で [`compute_remaining`] を呼び直します。
//!
//! # モード
//! - **natural**: `target - now` をそのまま日/時/分/秒に分解
//! - **working**: 稼働時間帯の分だけを数え、8 時間を 1 日として分解
//!
//! 不正・欠落した設定（working hours なし、未知のタイムゾーン）は
//! エラーにせず natural にフォールバックします。

pub mod natural;
pub mod working;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::{CountType, Countdown, TimeRemaining};

/// Remaining time of `countdown` as seen at `now`.
pub fn compute_remaining(now: DateTime<Utc>, countdown: &Countdown) -> TimeRemaining {
    let target = countdown.target_date;
    if now >= target {
        return TimeRemaining::EXPIRED;
    }

    match (countdown.count_type, countdown.working_hours.as_ref()) {
        (CountType::Natural, _) => natural::remaining(now, target),
        (CountType::Working, None) => {
            tracing::debug!(id = %countdown.id, "working countdown without working hours");
            natural::remaining(now, target)
        }
        (CountType::Working, Some(hours)) => match countdown.timezone.parse::<Tz>() {
            Ok(tz) => working::remaining(now, target, hours, &tz),
            Err(_) => {
                tracing::debug!(
                    id = %countdown.id,
                    timezone = %countdown.timezone,
                    "unknown timezone, using natural time"
                );
                natural::remaining(now, target)
            }
        },
    }
}
