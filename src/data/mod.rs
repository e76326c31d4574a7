/// Data layer: tables, samples, and the stages that turn one into the other.
///
/// Architecture:
/// ```text
///  grampa .csv/.json/.parquet        negatives .csv
///        │                                 │
///        ▼                                 ▼
///   ┌──────────┐                     ┌──────────┐
///   │  loader   │  parse → Table     │  loader   │
///   └──────────┘                     └──────────┘
///        │                                 │
///        ▼                                 ▼
///   ┌──────────┐                     ┌──────────┐
///   │  filter   │  organism subset   │ negative  │  residue filter, 8196
///   └──────────┘                     └──────────┘
///        │                                 │
///        ▼                                 │
///   ┌───────────┐                          │
///   │ aggregate  │  mean of 10^value       │
///   └───────────┘                          │
///        └──────────────┬──────────────────┘
///                       ▼
///                 ┌──────────┐
///                 │ assemble  │  concat + shuffle
///                 └──────────┘
///                       │
///                       ▼
///                 ┌──────────┐
///                 │  split    │  positional train/test → writer
///                 └──────────┘
/// ```

pub mod aggregate;
pub mod assemble;
pub mod filter;
pub mod loader;
pub mod model;
pub mod negative;
pub mod split;
pub mod writer;
