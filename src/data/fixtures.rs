//! Synthetic sample files, for local runs without real chain data and for
//! tests. Layout matches what the upstream generator writes: one binary
//! column per datatype column.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BinaryArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::Rng;

use super::model::Datatype;
use crate::error::{Result, SampleError};

const ADDRESS_BYTES: usize = 20;
const HASH_BYTES: usize = 32;

/// A batch of random fixtures for `datatype`.
pub fn datatype_batch<R: Rng + ?Sized>(
    datatype: Datatype,
    rows: usize,
    rng: &mut R,
) -> Result<RecordBatch> {
    match datatype {
        Datatype::Contracts => address_batch("contract_address", rows, ADDRESS_BYTES, rng),
        Datatype::Eoa => address_batch("eoas", rows, ADDRESS_BYTES, rng),
        Datatype::Transactions => address_batch("transaction_hash", rows, HASH_BYTES, rng),
        Datatype::Slots => slots_batch(rows, rng),
    }
}

/// One binary column of `rows` random values, `width` bytes each.
pub fn address_batch<R: Rng + ?Sized>(
    column: &str,
    rows: usize,
    width: usize,
    rng: &mut R,
) -> Result<RecordBatch> {
    binary_batch(&[(column, width)], rows, rng)
}

/// `contract_address` / `slot` pairs.
pub fn slots_batch<R: Rng + ?Sized>(rows: usize, rng: &mut R) -> Result<RecordBatch> {
    binary_batch(
        &[("contract_address", ADDRESS_BYTES), ("slot", HASH_BYTES)],
        rows,
        rng,
    )
}

fn binary_batch<R: Rng + ?Sized>(
    columns: &[(&str, usize)],
    rows: usize,
    rng: &mut R,
) -> Result<RecordBatch> {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, _)| Field::new(*name, DataType::Binary, false))
        .collect();

    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|&(_, width)| {
            let values: Vec<Vec<u8>> = (0..rows)
                .map(|_| (0..width).map(|_| rng.gen::<u8>()).collect())
                .collect();
            Arc::new(BinaryArray::from_iter_values(values)) as ArrayRef
        })
        .collect();

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// Write `batch` as a single-row-group parquet file.
pub fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path).map_err(|source| SampleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}
