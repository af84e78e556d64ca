//! Timestamps carried by readings.

use chrono::{DateTime, Utc};

/// UTC timestamp attached to fixes, headings, beacons and visits.
pub type Timestamp = DateTime<Utc>;

/// Wall-clock time used to stamp synthesized readings.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}
