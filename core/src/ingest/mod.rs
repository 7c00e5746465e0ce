//! External interface contract: the decoded row schema, the opaque tabular
//! decoder capability, and the upload validation rules.

pub mod decoder;
pub mod row;
pub mod upload;

pub use decoder::{DecodeError, DecodeResult, TabularDecoder};
pub use row::RawRow;
pub use upload::{validate_upload, FileCache, UploadError, MAX_UPLOAD_BYTES};
