//! Usage quota records and results.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Quota limits applied by the usage tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageLimits {
    /// Free uses per UTC day
    pub daily_free: u32,
    /// Extra uses granted by claiming the daily bonus
    pub share_bonus: u32,
    /// How long the store keeps a record; unrelated to the daily reset
    pub record_ttl: Duration,
}

impl UsageLimits {
    /// Base daily allowance.
    pub const DAILY_FREE: u32 = 3;
    /// One-time extra allowance per day.
    pub const SHARE_BONUS: u32 = 1;
    /// Record retention in days.
    pub const RECORD_TTL_DAYS: i64 = 7;

    /// Total allowance for a day, given whether the bonus was claimed.
    #[must_use]
    pub const fn total(&self, bonus_used: bool) -> u32 {
        if bonus_used {
            self.daily_free + self.share_bonus
        } else {
            self.daily_free
        }
    }
}

impl Default for UsageLimits {
    fn default() -> Self {
        Self {
            daily_free: Self::DAILY_FREE,
            share_bonus: Self::SHARE_BONUS,
            record_ttl: Duration::days(Self::RECORD_TTL_DAYS),
        }
    }
}

/// Stored per-identifier usage for one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// UTC day this record applies to
    pub date: NaiveDate,
    /// Uses consumed that day
    pub used: u32,
    /// Whether the share bonus was claimed that day
    pub bonus_used: bool,
}

impl UsageRecord {
    /// An untouched record for `date`.
    #[must_use]
    pub const fn fresh(date: NaiveDate) -> Self {
        Self {
            date,
            used: 0,
            bonus_used: false,
        }
    }

    /// Whether this record belongs to the UTC day of `now`.
    #[must_use]
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.date == today_utc(now)
    }
}

/// Quota status reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStatus {
    /// Uses left today
    pub remaining: u32,
    /// Total allowance today
    pub total: u32,
    /// Whether the share bonus can still be claimed
    pub can_use_bonus: bool,
    /// Next UTC midnight, ISO 8601
    pub reset_at: String,
}

/// Result of consuming one use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsumeOutcome {
    /// Whether a use was granted
    pub success: bool,
    /// Uses left after this call
    pub remaining: u32,
}

/// Result of claiming the share bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BonusOutcome {
    /// Whether the bonus was granted
    pub success: bool,
    /// Message suitable for the end user
    pub message: String,
}

/// The UTC calendar day of `now`.
#[must_use]
pub fn today_utc(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// The first UTC midnight strictly after `now`.
#[must_use]
pub fn next_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = today_utc(now).succ_opt().unwrap_or(NaiveDate::MAX);
    tomorrow.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

/// `next_reset` formatted like JavaScript's `toISOString` (millisecond precision, `Z`).
#[must_use]
pub fn next_reset_iso(now: DateTime<Utc>) -> String {
    next_reset(now).to_rfc3339_opts(SecondsFormat::Millis, true)
}
