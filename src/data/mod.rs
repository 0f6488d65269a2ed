/// Data layer: core types, loading, and record matching.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (+ SearchConfig for bundles)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Schema, Vec<Record>, reserved targets
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply a description → matching / non-matching indices
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
