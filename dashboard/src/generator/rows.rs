use anyhow::Context;
use linecore::ingest::row::{self, RawRow};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Configuration for generating a synthetic demo shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub lines: Vec<String>,
    pub rows_per_line: usize,
    pub start_hour: u32,
    pub step_minutes: u32,
    pub base_rate: f64,
    pub rate_jitter: f64,
    pub scrap_fraction: f64,
    pub seed: u64,
    pub part_number: String,
    pub part_name: String,
    pub operator: String,
    pub shift: String,
    pub date: String,
    pub description: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            lines: vec!["1".to_string(), "2".to_string()],
            rows_per_line: 8,
            start_hour: 6,
            step_minutes: 30,
            base_rate: 120.0,
            rate_jitter: 15.0,
            scrap_fraction: 0.03,
            seed: 0,
            part_number: "PN-1001".to_string(),
            part_name: "Bracket Assembly".to_string(),
            operator: "R. Alvarez".to_string(),
            shift: "1".to_string(),
            date: "2024-03-18".to_string(),
            description: None,
        }
    }
}

/// Builds schema-keyed rows with spreadsheet-fraction time cells so the demo
/// path exercises the numeric time decoding.
pub fn build_rows_from_config(config: &GeneratorConfig) -> anyhow::Result<Vec<RawRow>> {
    let row_count = config
        .rows_per_line
        .checked_mul(config.lines.len())
        .context("overflow computing generated row count")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut rows = Vec::with_capacity(row_count);
    let mut cumulative = vec![0i64; config.lines.len()];

    for step in 0..config.rows_per_line {
        for (line_index, line) in config.lines.iter().enumerate() {
            let minutes = config.start_hour * 60 + step as u32 * config.step_minutes;
            let day_fraction = f64::from(minutes) * 60.0 / 86_400.0;

            let jitter = if config.rate_jitter > 0.0 {
                rng.gen_range(-config.rate_jitter..config.rate_jitter)
            } else {
                0.0
            };
            let rate = (config.base_rate + jitter).max(0.0);
            let produced = (rate * f64::from(config.step_minutes) / 60.0).round() as i64;
            cumulative[line_index] += produced;
            let scrap = (produced as f64 * config.scrap_fraction).round() as i64;

            let mut row = RawRow::new();
            row.insert(row::COL_PART_NUMBER.into(), json!(config.part_number));
            row.insert(row::COL_PART_NAME.into(), json!(config.part_name));
            row.insert(row::COL_QUANTITY.into(), json!(produced));
            row.insert(row::COL_DATE.into(), json!(config.date));
            row.insert(row::COL_SHIFT.into(), json!(config.shift));
            row.insert(row::COL_OPERATOR.into(), json!(config.operator));
            row.insert(row::COL_LINE.into(), json!(line));
            row.insert(
                row::COL_TOTAL_QUANTITY_PER_SHIFT.into(),
                json!(cumulative[line_index].to_string()),
            );
            row.insert(row::COL_PARTS_PER_HOUR.into(), json!(rate));
            row.insert(row::COL_TIME.into(), json!(day_fraction));
            row.insert(row::COL_SCRAP_QUANTITY.into(), json!(scrap));
            row.insert(row::COL_SCRAP_PERCENT.into(), json!(config.scrap_fraction));
            rows.push(row);
        }
    }

    Ok(rows)
}

pub fn build_rows(lines: &[&str], rows_per_line: usize) -> anyhow::Result<Vec<RawRow>> {
    let config = GeneratorConfig {
        lines: lines.iter().map(|line| line.to_string()).collect(),
        rows_per_line,
        ..Default::default()
    };
    build_rows_from_config(&config)
}

/// Serializes a row batch into the bridge wire format understood by
/// [`crate::decoder::JsonRowsDecoder`].
pub fn to_json_bytes(rows: &[RawRow]) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec(rows).context("serializing generated rows")
}
