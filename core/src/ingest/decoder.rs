use crate::ingest::row::RawRow;

/// Errors surfaced by a tabular decoder. A structurally empty workbook is a
/// checked error, never a panic.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("no sheets found in the workbook")]
    NoSheets,
    #[error("sheet is empty")]
    EmptySheet,
    #[error("no data rows found in the workbook")]
    NoRows,
    #[error("corrupt workbook: {0}")]
    Corrupt(String),
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Opaque tabular-decoder capability: raw workbook bytes in, ordered row
/// mappings out. Implementations may consume their input destructively; the
/// refresh controller always hands them an independent copy of the cached
/// buffer.
pub trait TabularDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> DecodeResult<Vec<RawRow>>;
}
