use linecore::prelude::{DecodeError, DecodeResult, RawRow, TabularDecoder};
use serde_json::Value;

/// Decoder for the bridge's row wire format: a JSON array of row objects
/// keyed by the worksheet schema. A real workbook decoder slots in behind
/// the same trait.
pub struct JsonRowsDecoder;

impl TabularDecoder for JsonRowsDecoder {
    fn decode(&self, bytes: &[u8]) -> DecodeResult<Vec<RawRow>> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|err| DecodeError::Corrupt(err.to_string()))?;
        let items = match value {
            Value::Array(items) => items,
            _ => return Err(DecodeError::Corrupt("expected an array of row objects".into())),
        };
        if items.is_empty() {
            return Err(DecodeError::NoRows);
        }
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(DecodeError::Corrupt(format!("row is not an object: {}", other))),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_rows_in_order() {
        let bytes = br#"[{"Line": "1"}, {"Line": "2"}]"#;
        let rows = JsonRowsDecoder.decode(bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Line").unwrap(), "1");
        assert_eq!(rows[1].get("Line").unwrap(), "2");
    }

    #[test]
    fn corrupt_payload_is_a_checked_error() {
        assert!(matches!(
            JsonRowsDecoder.decode(b"\x00\x01\x02"),
            Err(DecodeError::Corrupt(_))
        ));
        assert!(matches!(
            JsonRowsDecoder.decode(br#"{"not": "an array"}"#),
            Err(DecodeError::Corrupt(_))
        ));
        assert!(matches!(
            JsonRowsDecoder.decode(br#"[1, 2, 3]"#),
            Err(DecodeError::Corrupt(_))
        ));
    }

    #[test]
    fn empty_array_reports_no_rows() {
        assert!(matches!(
            JsonRowsDecoder.decode(b"[]"),
            Err(DecodeError::NoRows)
        ));
    }
}
