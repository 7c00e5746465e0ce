use crate::pipeline::normalize::ProductionRecord;
use serde::{Deserialize, Serialize};

/// Records for one production line, in original row order.
#[derive(Debug, Clone)]
pub struct LineGroup {
    pub line_id: String,
    pub records: Vec<ProductionRecord>,
}

/// Current-status snapshot for one line, shown on the dashboard panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStatus {
    pub part_number: String,
    pub part_name: String,
    pub total_quantity_per_shift: String,
    pub parts_per_hour: u32,
    pub total_scrap: u32,
    pub scrap_rate_percent: String,
}

/// Stable grouping by exact string equality of `line_id`. Group order
/// follows first occurrence, member order follows input order.
pub fn partition(records: &[ProductionRecord]) -> Vec<LineGroup> {
    let mut groups: Vec<LineGroup> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|group| group.line_id == record.line_id) {
            Some(group) => group.records.push(record.clone()),
            None => groups.push(LineGroup {
                line_id: record.line_id.clone(),
                records: vec![record.clone()],
            }),
        }
    }
    groups
}

/// The snapshot comes from the last record in original row order, not the
/// chronologically latest one. Parts/hour is rounded up for display; every
/// other field passes through unmodified.
pub fn current_status(records: &[ProductionRecord]) -> Option<LineStatus> {
    let last = records.last()?;
    Some(LineStatus {
        part_number: last.part_number.clone(),
        part_name: last.part_name.clone(),
        total_quantity_per_shift: last.total_quantity_per_shift.clone(),
        parts_per_hour: last.parts_per_hour.ceil() as u32,
        total_scrap: last.total_scrap,
        scrap_rate_percent: last.scrap_rate_percent.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line_id: &str, part_number: &str, time_of_day: &str) -> ProductionRecord {
        ProductionRecord {
            line_id: line_id.to_string(),
            part_number: part_number.to_string(),
            time_of_day: time_of_day.to_string(),
            ..ProductionRecord::default()
        }
    }

    #[test]
    fn groups_follow_first_occurrence_order() {
        let records = vec![
            record("2", "a", "08:00:00"),
            record("1", "b", "08:15:00"),
            record("2", "c", "08:30:00"),
            record("3", "d", "08:45:00"),
        ];

        let groups = partition(&records);
        let ids: Vec<&str> = groups.iter().map(|g| g.line_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
        let members: Vec<&str> = groups[0]
            .records
            .iter()
            .map(|r| r.part_number.as_str())
            .collect();
        assert_eq!(members, vec!["a", "c"]);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(partition(&[]).is_empty());
    }

    #[test]
    fn status_takes_last_record_in_input_order() {
        // The second record is chronologically earlier; input order wins.
        let records = vec![
            record("1", "late-shift", "15:00:00"),
            record("1", "early-shift", "07:00:00"),
        ];

        let status = current_status(&records).unwrap();
        assert_eq!(status.part_number, "early-shift");
    }

    #[test]
    fn status_rounds_parts_per_hour_up() {
        let mut single = record("1", "a", "08:00:00");
        single.parts_per_hour = 117.2;
        let status = current_status(&[single]).unwrap();
        assert_eq!(status.parts_per_hour, 118);
    }

    #[test]
    fn status_of_empty_group_is_none() {
        assert!(current_status(&[]).is_none());
    }
}
