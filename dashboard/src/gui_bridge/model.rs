use crate::workflow::runner::{LineReport, PipelineOutcome};
use linecore::prelude::{DashboardTotals, ScrapSeverity};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Published snapshot consumed by the presentation layer. Replaced wholesale
/// on every successful refresh; survives a controller teardown so the last
/// rendered data stays visible until the next upload.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DashboardModel {
    pub file_name: Option<String>,
    pub last_refresh_epoch_ms: Option<u64>,
    pub error: Option<String>,
    pub record_count: usize,
    pub lines: Vec<LineReport>,
    pub totals: DashboardTotals,
    pub overall_severity: ScrapSeverity,
}

impl DashboardModel {
    pub fn from_outcome(outcome: PipelineOutcome, file_name: Option<String>) -> Self {
        let overall_severity = ScrapSeverity::from_rate(&outcome.totals.average_scrap_rate_percent);
        Self {
            file_name,
            last_refresh_epoch_ms: Some(epoch_millis()),
            error: None,
            record_count: outcome.record_count,
            lines: outcome.lines,
            totals: outcome.totals,
            overall_severity,
        }
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
