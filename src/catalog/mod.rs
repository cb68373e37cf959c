/// Catalog layer: record model, parsing, unit normalization, selection,
/// and the normalized on-disk store.
///
/// Architecture:
/// ```text
///  raw ';'-delimited blob
///        │
///        ▼
///   ┌──────────┐
///   │  parser   │  header-indexed fields → CatalogRecord
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  fixed unit conversions, all-or-nothing missing triple
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐       ┌──────────┐
///   │  store    │ ────► │  select   │  data.csv round-trip → accept/reject
///   └──────────┘       └──────────┘
/// ```

pub mod model;
pub mod normalize;
pub mod parser;
pub mod select;
pub mod store;
