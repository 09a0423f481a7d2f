/// Data layer: locating, reading and reshaping sample files.
///
/// Architecture:
/// ```text
///  (network, datatype, size, version)
///        │
///        ▼
///   ┌──────────┐
///   │ locator  │  filename template / largest file on disk → path
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  projected parquet read → RecordBatch
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ reconcile │  replicate / subsample to n, binary → 0x hex, shape
///   └───────────┘
///        │
///        ▼
///     Samples
/// ```

pub mod fixtures;
pub mod loader;
pub mod locator;
pub mod model;
pub mod reconcile;
