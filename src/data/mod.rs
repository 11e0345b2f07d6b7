/// Data layer: core types, loading, aggregation, filtering, prediction.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate file → SalaryDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SalaryDataset │  Vec<SalaryRecord>, unique-value indices
///   └──────────────┘
///        │
///        ├──────────────┬───────────────┐
///        ▼              ▼               ▼
///   ┌──────────┐  ┌───────────┐  ┌──────────┐
///   │  filter   │  │ aggregate │  │ predict   │
///   │ selections│  │ group/top │  │ one-hot + │
///   │ → indices │  │ pivot/find│  │ forest    │
///   └──────────┘  └───────────┘  └──────────┘
/// ```
pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod predict;
