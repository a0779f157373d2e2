use google_sheets4::api::ValueRange;
use serde_json::Value;

pub trait ValueRangeFactory {
    fn from_grid(rows: &[Vec<String>]) -> Self;
}

fn grid_to_values(rows: &[Vec<String>]) -> Vec<Vec<Value>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| Value::String(cell.clone())).collect())
        .collect()
}

impl ValueRangeFactory for ValueRange {
    fn from_grid(rows: &[Vec<String>]) -> Self {
        Self {
            major_dimension: Some("ROWS".to_string()),
            range: None,
            values: Some(grid_to_values(rows)),
        }
    }
}
