pub use crate::ingest::decoder::{DecodeError, DecodeResult, TabularDecoder};
pub use crate::ingest::row::RawRow;
pub use crate::ingest::upload::{FileCache, UploadError, MAX_UPLOAD_BYTES};
pub use crate::pipeline::aggregate::{DashboardTotals, ScrapSeverity};
pub use crate::pipeline::grid::{GraphPoint, SHIFT_CHANGE_SLOT, SLOT_COUNT};
pub use crate::pipeline::normalize::{ProductionRecord, DEFAULT_TIME_OF_DAY};
pub use crate::pipeline::partition::{LineGroup, LineStatus};
