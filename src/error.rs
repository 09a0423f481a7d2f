use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

pub type Result<T, E = SampleError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("no raw samples found to load")]
    NotFound,

    #[error("unknown sample datatype '{0}' (expected contracts, eoa, transactions or slots)")]
    UnknownDatatype(String),

    #[error("sample file {} has no rows to draw from", .0.display())]
    EmptySamples(PathBuf),

    #[error("sample file {} has no column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parquet(#[from] ParquetError),

    #[error(transparent)]
    Arrow(#[from] ArrowError),
}
