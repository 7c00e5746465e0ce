use crate::ingest::row::{self, RawRow};
use crate::telemetry::LogManager;
use chrono::{DateTime, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fallback time of day when a cell is missing or unparseable.
pub const DEFAULT_TIME_OF_DAY: &str = "06:00:00";

const SECONDS_PER_DAY: f64 = 86_400.0;

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

const TIME_ONLY_FORMATS: [&str; 2] = ["%H:%M", "%I:%M %p"];

/// Canonical observation produced by the normalizer. Every field has a total
/// default; no field is ever left undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub part_number: String,
    pub part_name: String,
    pub quantity: u32,
    pub date: String,
    pub shift: String,
    pub operator: String,
    pub line_id: String,
    pub total_quantity_per_shift: String,
    pub parts_per_hour: f64,
    pub time_of_day: String,
    pub total_scrap: u32,
    pub scrap_rate_percent: String,
}

impl Default for ProductionRecord {
    fn default() -> Self {
        Self {
            part_number: String::new(),
            part_name: String::new(),
            quantity: 0,
            date: String::new(),
            shift: String::new(),
            operator: String::new(),
            line_id: String::new(),
            total_quantity_per_shift: "0".to_string(),
            parts_per_hour: 0.0,
            time_of_day: DEFAULT_TIME_OF_DAY.to_string(),
            total_scrap: 0,
            scrap_rate_percent: "0.0".to_string(),
        }
    }
}

/// Total time normalization: any scalar in, always `HH:MM:SS` out.
///
/// Numbers are spreadsheet time encoding (fraction of a 24-hour day);
/// `HH:MM:SS`-shaped strings are re-padded and returned as-is; anything else
/// goes through a generic date-time parse before degrading to the default.
pub fn normalize_time(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::Number(number)) => number
            .as_f64()
            .map(fraction_to_time)
            .unwrap_or_else(|| DEFAULT_TIME_OF_DAY.to_string()),
        Some(Value::String(text)) => string_to_time(text),
        _ => DEFAULT_TIME_OF_DAY.to_string(),
    }
}

fn fraction_to_time(raw: f64) -> String {
    if !raw.is_finite() {
        return DEFAULT_TIME_OF_DAY.to_string();
    }
    let total_seconds = ((raw * SECONDS_PER_DAY).round() as i64).rem_euclid(86_400);
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

fn string_to_time(text: &str) -> String {
    let trimmed = text.trim();
    if let Some((hours, minutes, seconds)) = split_hms(trimmed) {
        return format!("{:0>2}:{}:{}", hours, minutes, seconds);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return parsed.time().format("%H:%M:%S").to_string();
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return parsed.time().format("%H:%M:%S").to_string();
        }
    }
    for format in TIME_ONLY_FORMATS {
        if let Ok(parsed) = NaiveTime::parse_from_str(trimmed, format) {
            return parsed.format("%H:%M:%S").to_string();
        }
    }

    DEFAULT_TIME_OF_DAY.to_string()
}

// `\d{1,2}:\d{2}:\d{2}` — digit-shape only, no range check; an out-of-range
// value passes through re-padded and simply never matches a grid slot.
fn split_hms(text: &str) -> Option<(&str, &str, &str)> {
    let mut parts = text.split(':');
    let hours = parts.next()?;
    let minutes = parts.next()?;
    let seconds = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let digits = |part: &str, min: usize, max: usize| {
        part.len() >= min && part.len() <= max && part.bytes().all(|b| b.is_ascii_digit())
    };
    if digits(hours, 1, 2) && digits(minutes, 2, 2) && digits(seconds, 2, 2) {
        Some((hours, minutes, seconds))
    } else {
        None
    }
}

/// Maps one raw row onto the canonical record. A malformed cell degrades
/// that field to its default; it never aborts the row or the batch.
pub fn normalize_record(row: &RawRow) -> ProductionRecord {
    let scrap_fraction = float_field(row.get(row::COL_SCRAP_PERCENT));

    ProductionRecord {
        part_number: string_field(row.get(row::COL_PART_NUMBER)),
        part_name: string_field(row.get(row::COL_PART_NAME)),
        quantity: int_field(row.get(row::COL_QUANTITY)),
        date: string_field(row.get(row::COL_DATE)),
        shift: string_field(row.get(row::COL_SHIFT)),
        operator: string_field(row.get(row::COL_OPERATOR)),
        line_id: string_field(row.get(row::COL_LINE)),
        total_quantity_per_shift: passthrough_or(
            row.get(row::COL_TOTAL_QUANTITY_PER_SHIFT),
            "0",
        ),
        parts_per_hour: float_field(row.get(row::COL_PARTS_PER_HOUR)).max(0.0),
        time_of_day: normalize_time(row.get(row::COL_TIME)),
        total_scrap: int_field(row.get(row::COL_SCRAP_QUANTITY)),
        // Verbatim from the sheet's percentage column, independent of the
        // quantity and scrap-quantity cells.
        scrap_rate_percent: format!("{:.1}", scrap_fraction * 100.0),
    }
}

pub fn normalize_rows(rows: &[RawRow]) -> Vec<ProductionRecord> {
    let records: Vec<ProductionRecord> = rows.iter().map(normalize_record).collect();
    LogManager::new("normalizer").record(&format!("normalized {} rows", records.len()));
    records
}

// Any scalar coerces to its display string; absent and null cells are empty.
fn string_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

fn passthrough_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => default.to_string(),
    }
}

fn int_field(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64))
            .unwrap_or(0),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|float| float as i64))
                .unwrap_or(0)
        }
        _ => 0,
    };
    parsed.max(0) as u32
}

fn float_field(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}
