//! Ingestion, normalization, and reconciliation core for the production-line
//! telemetry dashboard.
//!
//! The modules cover the upload-to-display pipeline: total field
//! normalization of decoded worksheet rows, stable per-line partitioning
//! with a current-status reduction, and projection onto the fixed half-hour
//! display grid. The binary workbook decoder stays behind the
//! [`TabularDecoder`] trait; this crate never performs I/O.

pub mod ingest;
pub mod pipeline;
pub mod prelude;
pub mod telemetry;

pub use prelude::{GraphPoint, LineStatus, ProductionRecord, TabularDecoder};
