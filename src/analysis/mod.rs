//! Statistics over a loaded [`Dataset`](crate::data::model::Dataset).
//!
//! Every function here is pure: it reads a dataset (or a slice of values)
//! and returns a freshly computed table. Only [`coerce`] mutates, and only
//! the working copy it is handed.

pub mod coerce;
pub mod correlation;
pub mod describe;
pub mod distribution;
pub mod missing;

/// Optional categorical column holding the air-quality label.
pub const QUALITY_COLUMN: &str = "Qualite_air";

/// Derived ordinal column used by the correlation view.
pub const CLASS_NUM_COLUMN: &str = "class_num";

/// Ordinal scale of the air-quality labels, best to worst.
pub const CLASS_SCALE: [(&str, f64); 4] = [
    ("bon", 0.0),
    ("moyen", 1.0),
    ("mauvais", 2.0),
    ("dangereuse", 3.0),
];
