pub mod aggregate;
pub mod grid;
pub mod normalize;
pub mod partition;

pub use aggregate::{totals, DashboardTotals, ScrapSeverity};
pub use grid::{chronological, reconcile, slot_labels, GraphPoint};
pub use normalize::{normalize_record, normalize_rows, normalize_time, ProductionRecord};
pub use partition::{current_status, partition, LineGroup, LineStatus};
