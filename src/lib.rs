//! Locate and load the pre-generated sample datasets (contract addresses,
//! EOAs, transaction hashes, storage slots) that flood uses as benchmark
//! inputs.

pub mod config;
pub mod data;
pub mod error;

pub use config::SamplesConfig;
pub use data::loader::{load_raw_samples, load_samples, SampleRequest};
pub use data::locator::{
    list_available, resolve_path, AvailableSample, FILE_TEMPLATE, SAMPLES_VERSION,
};
pub use data::model::{Datatype, SampleValue, Samples, SizeSpec, LARGEST_AVAILABLE};
pub use error::{Result, SampleError};
