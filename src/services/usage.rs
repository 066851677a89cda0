//! Daily usage quota tracking.
//!
//! Each identifier (normally the caller's IP address) gets `daily_free` uses
//! per UTC day, plus `share_bonus` more once the daily bonus is claimed. One
//! record per identifier is kept in a [`KvStore`] and overwritten on every
//! change; a record dated any other day is ignored, which is how quotas reset
//! at midnight UTC.
//!
//! The tracker fails open. With no store, or a store that errors, callers get
//! the default allowance and nothing is persisted. The quota is a soft limit,
//! not a security boundary: concurrent requests for the same identifier race
//! on a plain read-then-write and may slip one extra use through.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use super::kv::KvStore;
use crate::models::usage::{next_reset_iso, today_utc};
use crate::models::{BonusOutcome, ConsumeOutcome, UsageLimits, UsageRecord, UsageStatus};

/// Default key namespace for usage records.
pub const DEFAULT_KEY_PREFIX: &str = "ip:";

/// Message returned when the bonus is granted.
pub const BONUS_CLAIMED_MESSAGE: &str = "Successfully claimed +1 quota!";

/// Message returned when the bonus was already taken today.
pub const BONUS_ALREADY_CLAIMED_MESSAGE: &str = "Share bonus already claimed today";

/// Message returned when the bonus is granted without a store.
pub const BONUS_FALLBACK_MESSAGE: &str = "Successfully claimed +1 quota! (Fallback)";

/// Outcome of reading a record from the store.
enum Loaded {
    /// The store answered; the record is today's or a fresh one.
    Record(UsageRecord),
    /// No store, or the store failed.
    Unavailable,
}

/// Per-identifier daily quota tracker.
#[derive(Clone)]
pub struct UsageTracker {
    store: Option<Arc<dyn KvStore>>,
    limits: UsageLimits,
    key_prefix: String,
}

impl UsageTracker {
    /// Creates a tracker. `store` is `None` when no storage is configured.
    #[must_use]
    pub fn new(store: Option<Arc<dyn KvStore>>, limits: UsageLimits) -> Self {
        Self {
            store,
            limits,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    /// Uses a different key namespace.
    #[must_use]
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Limits in force.
    #[must_use]
    pub const fn limits(&self) -> &UsageLimits {
        &self.limits
    }

    /// Whether a store is configured at all.
    #[must_use]
    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    fn key(&self, identifier: &str) -> String {
        format!("{}{}", self.key_prefix, identifier)
    }

    /// Loads today's record, synthesizing a fresh one when absent or stale.
    fn load(&self, identifier: &str, now: DateTime<Utc>) -> Loaded {
        let Some(store) = &self.store else {
            warn!("Usage store not configured, falling back to default quota");
            return Loaded::Unavailable;
        };

        let key = self.key(identifier);
        let value = match store.get(&key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Usage store read failed for {key}, falling back to default quota: {e:#}");
                return Loaded::Unavailable;
            }
        };

        let record = value.and_then(|value| match serde_json::from_value::<UsageRecord>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Ignoring malformed usage record for {key}: {e}");
                None
            }
        });

        match record {
            Some(record) if record.is_current(now) => Loaded::Record(record),
            _ => Loaded::Record(UsageRecord::fresh(today_utc(now))),
        }
    }

    /// Persists a record. Returns false if the write failed.
    fn save(&self, identifier: &str, record: &UsageRecord) -> bool {
        let Some(store) = &self.store else {
            return false;
        };

        let key = self.key(identifier);
        let result = serde_json::to_value(record)
            .map_err(anyhow::Error::from)
            .and_then(|value| store.put(&key, value, self.limits.record_ttl));

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("Usage store write failed for {key}: {e:#}");
                false
            }
        }
    }

    /// Reports the quota for `identifier` without changing anything.
    pub fn check(&self, identifier: &str, now: DateTime<Utc>) -> UsageStatus {
        let record = match self.load(identifier, now) {
            Loaded::Record(record) => record,
            Loaded::Unavailable => UsageRecord::fresh(today_utc(now)),
        };

        let total = self.limits.total(record.bonus_used);
        UsageStatus {
            remaining: total.saturating_sub(record.used),
            total,
            can_use_bonus: !record.bonus_used,
            reset_at: next_reset_iso(now),
        }
    }

    /// Spends one use if any are left.
    pub fn consume(&self, identifier: &str, now: DateTime<Utc>) -> ConsumeOutcome {
        let mut record = match self.load(identifier, now) {
            Loaded::Record(record) => record,
            Loaded::Unavailable => {
                return ConsumeOutcome {
                    success: true,
                    remaining: self.limits.daily_free.saturating_sub(1),
                };
            }
        };

        let total = self.limits.total(record.bonus_used);
        if record.used >= total {
            debug!(identifier, used = record.used, total, "Usage quota exhausted");
            return ConsumeOutcome {
                success: false,
                remaining: 0,
            };
        }

        record.used += 1;
        // A failed write still grants the use: fail open.
        self.save(identifier, &record);

        debug!(identifier, used = record.used, total, "Usage consumed");
        ConsumeOutcome {
            success: true,
            remaining: total.saturating_sub(record.used),
        }
    }

    /// Claims the once-a-day share bonus.
    ///
    /// Only raises the ceiling `consume` checks against; `used` is untouched.
    pub fn claim_bonus(&self, identifier: &str, now: DateTime<Utc>) -> BonusOutcome {
        let mut record = match self.load(identifier, now) {
            Loaded::Record(record) => record,
            Loaded::Unavailable => {
                return BonusOutcome {
                    success: true,
                    message: BONUS_FALLBACK_MESSAGE.to_string(),
                };
            }
        };

        if record.bonus_used {
            return BonusOutcome {
                success: false,
                message: BONUS_ALREADY_CLAIMED_MESSAGE.to_string(),
            };
        }

        record.bonus_used = true;
        self.save(identifier, &record);

        debug!(identifier, "Share bonus claimed");
        BonusOutcome {
            success: true,
            message: BONUS_CLAIMED_MESSAGE.to_string(),
        }
    }
}
