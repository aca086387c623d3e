#![allow(dead_code)]

use astra_mentor::ledger::Ledger;
use chrono::{DateTime, Duration, TimeZone, Utc};

pub const FIXED_TIMESTAMP: i64 = 1_700_000_000;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_opt(FIXED_TIMESTAMP, 0).unwrap()
}

/// Three points with some history: one mastered, one in progress, one fresh.
pub fn sample_ledger() -> Ledger {
    let now = fixed_now();
    let mut ledger = Ledger::new();

    ledger.upsert_at("ownership", 0.8, "core idea", 0.0, now);
    ledger.record_update_at("ownership", 0.24, 1.0, "solid start", now + Duration::hours(1));
    ledger.record_update_at("ownership", 0.85, 0.95, "excellent", now + Duration::days(2));

    ledger.upsert_at("lifetimes", 0.9, "", 0.1, now);
    ledger.record_update_at("lifetimes", 0.1333, 0.3, "needs work", now + Duration::days(1));

    ledger.upsert_at("unsafe", 0.6, "later", 0.0, now);

    ledger
}
