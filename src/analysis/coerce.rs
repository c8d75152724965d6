use std::sync::OnceLock;

use regex::Regex;

use crate::data::model::{Column, DType, Dataset, Value};

use super::{CLASS_NUM_COLUMN, CLASS_SCALE};

fn non_numeric_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9.\-]").expect("constant pattern"))
}

/// Strip everything but digits, `.` and `-`, then parse what is left.
/// Anything unparseable is a missing value, never an error.
pub fn coerce_cell(raw: &str) -> Option<f64> {
    let cleaned = non_numeric_chars().replace_all(raw, "");
    cleaned.parse::<f64>().ok()
}

/// Convert every text column not named in `skip` into a float column.
///
/// Returns the number of columns converted. A second pass finds no text
/// columns left, so the operation is idempotent.
pub fn coerce_text_columns(dataset: &mut Dataset, skip: &[&str]) -> usize {
    let mut converted = 0;
    for column in dataset
        .columns
        .iter_mut()
        .filter(|c| c.dtype == DType::Text && !skip.contains(&c.name.as_str()))
    {
        let values = column
            .values
            .iter()
            .map(|v| {
                v.as_str()
                    .and_then(coerce_cell)
                    .map_or(Value::Null, Value::Float)
            })
            .collect();
        *column = Column::new(column.name.clone(), DType::Float, values);
        converted += 1;
    }
    if converted > 0 {
        log::debug!("Coerced {converted} text column(s) to numeric");
    }
    converted
}

/// Map a label column onto the ordinal class scale as `class_num`.
/// Labels outside the scale (case-sensitive) become missing.
pub fn map_classes(dataset: &Dataset, column: &str) -> Option<Column> {
    let labels = dataset.column(column)?;
    let values = labels
        .values
        .iter()
        .map(|v| {
            let label = match v {
                Value::Text(s) => s.as_str(),
                _ => return Value::Null,
            };
            CLASS_SCALE
                .iter()
                .find(|(name, _)| *name == label)
                .map_or(Value::Null, |(_, rank)| Value::Float(*rank))
        })
        .collect();
    Some(Column::new(CLASS_NUM_COLUMN, DType::Float, values))
}
