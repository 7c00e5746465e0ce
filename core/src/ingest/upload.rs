use crate::telemetry::LogManager;
use std::path::Path;
use std::time::SystemTime;

/// Hard cap on the staged source buffer.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const ACCEPTED_EXTENSIONS: [&str; 2] = ["xls", "xlsx"];

// Some systems report .xlsx files as octet-stream.
const ACCEPTED_MIME_TYPES: [&str; 3] = [
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/octet-stream",
];

/// Validation failures rejected before any decode attempt.
#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    #[error("please upload a valid Excel file (.xls or .xlsx)")]
    UnsupportedExtension,
    #[error("the selected file is empty")]
    EmptyFile,
    #[error("file size exceeds the 10 MiB limit")]
    Oversized,
}

/// Checks extension and size; the MIME type is logged when unexpected but
/// never rejected.
pub fn validate_upload(
    file_name: &str,
    size: u64,
    mime: Option<&str>,
) -> Result<(), UploadError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension {
        Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => return Err(UploadError::UnsupportedExtension),
    }

    if let Some(mime) = mime {
        if !ACCEPTED_MIME_TYPES.contains(&mime) {
            LogManager::new("upload")
                .advisory(&format!("unexpected MIME type for workbook: {}", mime));
        }
    }

    if size == 0 {
        return Err(UploadError::EmptyFile);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::Oversized);
    }

    Ok(())
}

/// Immutable snapshot of an uploaded source file.
#[derive(Debug, Clone)]
pub struct FileCache {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub captured_at: SystemTime,
}

impl FileCache {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            captured_at: SystemTime::now(),
        }
    }

    /// Independent copy for the decoder; the canonical buffer is never
    /// handed out directly because decoding may be destructive to its input.
    pub fn decode_copy(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_xls_and_xlsx_extensions() {
        assert!(validate_upload("shift_report.xlsx", 512, None).is_ok());
        assert!(validate_upload("shift_report.xls", 512, None).is_ok());
        assert!(validate_upload("SHIFT_REPORT.XLSX", 512, None).is_ok());
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(matches!(
            validate_upload("shift_report.csv", 512, None),
            Err(UploadError::UnsupportedExtension)
        ));
        assert!(matches!(
            validate_upload("no_extension", 512, None),
            Err(UploadError::UnsupportedExtension)
        ));
    }

    #[test]
    fn rejects_empty_and_oversized_files() {
        assert!(matches!(
            validate_upload("report.xlsx", 0, None),
            Err(UploadError::EmptyFile)
        ));
        assert!(matches!(
            validate_upload("report.xlsx", MAX_UPLOAD_BYTES + 1, None),
            Err(UploadError::Oversized)
        ));
        assert!(validate_upload("report.xlsx", MAX_UPLOAD_BYTES, None).is_ok());
    }

    #[test]
    fn mime_mismatch_is_advisory_only() {
        assert!(validate_upload("report.xlsx", 512, Some("text/plain")).is_ok());
    }

    #[test]
    fn decode_copy_leaves_cache_intact() {
        let cache = FileCache::new("report.xlsx", vec![1, 2, 3]);
        let mut copy = cache.decode_copy();
        copy.clear();
        assert_eq!(cache.bytes, vec![1, 2, 3]);
    }
}
