use crate::pipeline::normalize::ProductionRecord;
use serde::{Deserialize, Serialize};

pub const GRID_START_HOUR: u32 = 6;
pub const GRID_END_HOUR: u32 = 23;

/// Half-hour slots from 06:00 to 23:30 inclusive.
pub const SLOT_COUNT: usize = 36;

/// A record matches a slot when its time of day lies within this distance
/// of the slot boundary.
pub const SLOT_TOLERANCE_MS: i64 = 15 * 60 * 1000;

/// Fixed shift-boundary annotation; not derived from any record.
pub const SHIFT_CHANGE_SLOT: &str = "14:00";

/// One plotted point. `value: None` renders as a visual gap, never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub slot: String,
    pub value: Option<u32>,
}

/// The 36 slot labels in ascending order, independent of any input.
pub fn slot_labels() -> Vec<String> {
    let mut labels = Vec::with_capacity(SLOT_COUNT);
    for hour in GRID_START_HOUR..=GRID_END_HOUR {
        labels.push(format!("{:02}:00", hour));
        labels.push(format!("{:02}:30", hour));
    }
    labels
}

/// Milliseconds since midnight for a strict `HH:MM:SS` string. Values out of
/// clock range are kept as-is; they simply never land near a slot boundary.
pub fn time_of_day_millis(time: &str) -> Option<i64> {
    let mut parts = time.split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((hours * 3600 + minutes * 60 + seconds) * 1000)
}

/// Stable chronological ordering; records with equal or unparseable times
/// keep their input order.
pub fn chronological(records: &[ProductionRecord]) -> Vec<ProductionRecord> {
    let mut ordered = records.to_vec();
    ordered.sort_by_key(|record| time_of_day_millis(&record.time_of_day).unwrap_or(0));
    ordered
}

/// Projects the records onto the fixed grid. For each slot the first record
/// (in the given order) within tolerance wins; a record near two adjacent
/// boundaries may satisfy both slots. A zero or unset rate is treated the
/// same as no data.
pub fn reconcile(records: &[ProductionRecord]) -> Vec<GraphPoint> {
    let mut points = Vec::with_capacity(SLOT_COUNT);
    for hour in GRID_START_HOUR..=GRID_END_HOUR {
        for minute in [0u32, 30] {
            let slot_ms = i64::from(hour * 3600 + minute * 60) * 1000;
            let matched = records.iter().find(|record| {
                time_of_day_millis(&record.time_of_day)
                    .map(|record_ms| (record_ms - slot_ms).abs() <= SLOT_TOLERANCE_MS)
                    .unwrap_or(false)
            });
            let value = matched.and_then(|record| {
                if record.parts_per_hour > 0.0 {
                    Some(record.parts_per_hour.round() as u32)
                } else {
                    None
                }
            });
            points.push(GraphPoint {
                slot: format!("{:02}:{:02}", hour, minute),
                value,
            });
        }
    }
    points
}
