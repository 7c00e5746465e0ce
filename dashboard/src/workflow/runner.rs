use linecore::pipeline::{aggregate, grid, normalize, partition};
use linecore::prelude::{DashboardTotals, GraphPoint, LineStatus, RawRow, ScrapSeverity};
use serde::Serialize;

/// Status, severity, and reconciled series for one line.
#[derive(Debug, Clone, Serialize)]
pub struct LineReport {
    pub line_id: String,
    pub status: LineStatus,
    pub severity: ScrapSeverity,
    pub series: Vec<GraphPoint>,
}

/// Result of one full pipeline pass over a decoded row batch.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub lines: Vec<LineReport>,
    pub totals: DashboardTotals,
    pub record_count: usize,
}

/// Chains the core stages: normalize, partition per line, reduce to the
/// current status, and project onto the display grid.
#[derive(Clone, Default)]
pub struct Runner;

impl Runner {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, rows: &[RawRow]) -> PipelineOutcome {
        let records = normalize::normalize_rows(rows);
        let groups = partition::partition(&records);

        let mut lines = Vec::with_capacity(groups.len());
        for group in &groups {
            if let Some(status) = partition::current_status(&group.records) {
                // The grid sees the records in chronological order; the
                // status reduction above sees them in original row order.
                let ordered = grid::chronological(&group.records);
                let severity = ScrapSeverity::from_rate(&status.scrap_rate_percent);
                lines.push(LineReport {
                    line_id: group.line_id.clone(),
                    status,
                    severity,
                    series: grid::reconcile(&ordered),
                });
            }
        }

        let statuses: Vec<LineStatus> = lines.iter().map(|line| line.status.clone()).collect();
        let totals = aggregate::totals(&statuses);

        PipelineOutcome {
            lines,
            totals,
            record_count: records.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linecore::ingest::row;
    use serde_json::{json, Value};

    fn raw_row(line: &str, parts_per_hour: f64, time: &str) -> RawRow {
        match json!({
            row::COL_PART_NUMBER: format!("PN-{}", line),
            row::COL_LINE: line,
            row::COL_PARTS_PER_HOUR: parts_per_hour,
            row::COL_TIME: time,
            row::COL_TOTAL_QUANTITY_PER_SHIFT: "100",
            row::COL_SCRAP_QUANTITY: 2,
            row::COL_SCRAP_PERCENT: 0.02
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn two_lines_land_on_their_shared_slot() {
        let rows = vec![
            raw_row("1", 120.0, "09:00:00"),
            raw_row("2", 80.0, "09:05:00"),
        ];

        let outcome = Runner::new().execute(&rows);
        assert_eq!(outcome.record_count, 2);
        assert_eq!(outcome.lines.len(), 2);

        for (line, expected) in outcome.lines.iter().zip([120u32, 80u32]) {
            let at_nine = line
                .series
                .iter()
                .find(|point| point.slot == "09:00")
                .unwrap();
            assert_eq!(at_nine.value, Some(expected));
            let populated = line.series.iter().filter(|p| p.value.is_some()).count();
            assert_eq!(populated, 1);
            assert_eq!(line.series.len(), linecore::prelude::SLOT_COUNT);
        }

        assert_eq!(outcome.totals.total_quantity, 200);
        assert_eq!(outcome.totals.total_scrap, 4);
        assert_eq!(outcome.totals.average_scrap_rate_percent, "2.0");
    }

    #[test]
    fn status_reflects_last_row_even_when_grid_is_time_sorted() {
        let rows = vec![
            raw_row("1", 120.0, "15:00:00"),
            raw_row("1", 90.0, "07:00:00"),
        ];

        let outcome = Runner::new().execute(&rows);
        let line = &outcome.lines[0];
        // Last row in input order wins the status panel.
        assert_eq!(line.status.parts_per_hour, 90);
        // Both rows still land on their own grid slots.
        let at_seven = line.series.iter().find(|p| p.slot == "07:00").unwrap();
        let at_fifteen = line.series.iter().find(|p| p.slot == "15:00").unwrap();
        assert_eq!(at_seven.value, Some(90));
        assert_eq!(at_fifteen.value, Some(120));
    }

    #[test]
    fn empty_batch_produces_no_lines() {
        let outcome = Runner::new().execute(&[]);
        assert!(outcome.lines.is_empty());
        assert_eq!(outcome.totals, DashboardTotals::default());
    }
}
