/// Data layer: core types, loading, and caching.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (or LoadError)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  path → Arc<Dataset>, loaded once per process
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  named, typed columns of equal length
///   └──────────┘
/// ```

pub mod cache;
pub mod loader;
pub mod model;
