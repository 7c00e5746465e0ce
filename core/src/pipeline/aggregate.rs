use crate::pipeline::partition::LineStatus;
use serde::{Deserialize, Serialize};

/// Cross-line aggregates shown on the summary panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardTotals {
    pub total_quantity: i64,
    pub total_scrap: u64,
    pub average_scrap_rate_percent: String,
}

impl Default for DashboardTotals {
    fn default() -> Self {
        Self {
            total_quantity: 0,
            total_scrap: 0,
            average_scrap_rate_percent: "0.0".to_string(),
        }
    }
}

/// Scrap-rate classification driving the panel coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScrapSeverity {
    #[default]
    Normal,
    Elevated,
    Critical,
}

impl ScrapSeverity {
    pub fn from_rate(rate_percent: &str) -> Self {
        let rate = parse_float(rate_percent);
        if rate < 3.0 {
            ScrapSeverity::Normal
        } else if rate <= 5.0 {
            ScrapSeverity::Elevated
        } else {
            ScrapSeverity::Critical
        }
    }
}

/// Sums quantities and scrap across the line statuses and averages their
/// scrap rates, formatted to one decimal.
pub fn totals(statuses: &[LineStatus]) -> DashboardTotals {
    let total_quantity = statuses
        .iter()
        .map(|status| parse_int(&status.total_quantity_per_shift))
        .sum();
    let total_scrap = statuses
        .iter()
        .map(|status| u64::from(status.total_scrap))
        .sum();
    let average = if statuses.is_empty() {
        0.0
    } else {
        statuses
            .iter()
            .map(|status| parse_float(&status.scrap_rate_percent))
            .sum::<f64>()
            / statuses.len() as f64
    };

    DashboardTotals {
        total_quantity,
        total_scrap,
        average_scrap_rate_percent: format!("{:.1}", average),
    }
}

fn parse_int(text: &str) -> i64 {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(|float| float as i64))
        .unwrap_or(0)
}

fn parse_float(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(total_quantity_per_shift: &str, total_scrap: u32, scrap_rate: &str) -> LineStatus {
        LineStatus {
            part_number: String::new(),
            part_name: String::new(),
            total_quantity_per_shift: total_quantity_per_shift.to_string(),
            parts_per_hour: 0,
            total_scrap,
            scrap_rate_percent: scrap_rate.to_string(),
        }
    }

    #[test]
    fn totals_sum_quantities_and_average_scrap() {
        let totals = totals(&[status("384", 12, "3.1"), status("260", 4, "1.5")]);
        assert_eq!(totals.total_quantity, 644);
        assert_eq!(totals.total_scrap, 16);
        assert_eq!(totals.average_scrap_rate_percent, "2.3");
    }

    #[test]
    fn malformed_quantity_strings_count_as_zero() {
        let totals = totals(&[status("not a number", 2, "oops"), status("100", 1, "2.0")]);
        assert_eq!(totals.total_quantity, 100);
        assert_eq!(totals.average_scrap_rate_percent, "1.0");
    }

    #[test]
    fn empty_input_yields_zeroed_totals() {
        assert_eq!(totals(&[]), DashboardTotals::default());
    }

    #[test]
    fn severity_thresholds() {
        assert_eq!(ScrapSeverity::from_rate("2.9"), ScrapSeverity::Normal);
        assert_eq!(ScrapSeverity::from_rate("3.0"), ScrapSeverity::Elevated);
        assert_eq!(ScrapSeverity::from_rate("5.0"), ScrapSeverity::Elevated);
        assert_eq!(ScrapSeverity::from_rate("5.1"), ScrapSeverity::Critical);
    }
}
