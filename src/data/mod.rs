/// Data layer: table loading, searching, grouping and statistics.
///
/// Architecture:
/// ```text
///  sample attributes .txt      gene reads .gct.gz
///        │                           │
///        ▼                           ▼
///   ┌──────────┐               ┌──────────┐
///   │  loader   │  parse file → Table (header + rows)
///   └──────────┘               └──────────┘
///        │                           │
///        ▼                           ▼
///   ┌──────────┐               ┌──────────┐
///   │  group    │  first-seen  │  search   │  linear / indexed binary
///   └──────────┘   groups      └──────────┘
///        │                           │
///        └─────────────┬─────────────┘
///                      ▼
///               ┌──────────────┐
///               │ stats/filter  │  mean, box summary, threshold
///               └──────────────┘
/// ```

pub mod filter;
pub mod group;
pub mod loader;
pub mod model;
pub mod search;
pub mod stats;
