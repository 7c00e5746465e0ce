use serde_json::{Map, Value};

/// One decoded worksheet row: case-sensitive column header mapped to a
/// scalar cell value. A missing key degrades to the field's default during
/// normalization.
pub type RawRow = Map<String, Value>;

pub const COL_PART_NUMBER: &str = "Part Number";
pub const COL_PART_NAME: &str = "Part Name";
pub const COL_QUANTITY: &str = "Quantity";
pub const COL_DATE: &str = "Date";
pub const COL_SHIFT: &str = "Shift";
pub const COL_OPERATOR: &str = "Operator";
pub const COL_LINE: &str = "Line";
pub const COL_TOTAL_QUANTITY_PER_SHIFT: &str = "Total Quantity/Shift";
pub const COL_PARTS_PER_HOUR: &str = "Parts/Hour";
pub const COL_TIME: &str = "Time";
pub const COL_SCRAP_QUANTITY: &str = "Scrap Quantity";
pub const COL_SCRAP_PERCENT: &str = "Scrap %";

/// Every schema column, in sheet order.
pub const SCHEMA_COLUMNS: [&str; 12] = [
    COL_PART_NUMBER,
    COL_PART_NAME,
    COL_QUANTITY,
    COL_DATE,
    COL_SHIFT,
    COL_OPERATOR,
    COL_LINE,
    COL_TOTAL_QUANTITY_PER_SHIFT,
    COL_PARTS_PER_HOUR,
    COL_TIME,
    COL_SCRAP_QUANTITY,
    COL_SCRAP_PERCENT,
];
