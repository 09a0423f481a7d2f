use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, StringArray, UInt64Array};
use arrow::compute::{concat_batches, take_record_batch};
use arrow::datatypes::{
    DataType, Field, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    Schema, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use log::debug;
use rand::Rng;

use super::model::{SampleValue, Samples};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Row-count reconciliation
// ---------------------------------------------------------------------------

/// Bring `batch` to exactly `n` rows.
///
/// * `n` above the row count: the whole table is first repeated
///   `ceil(n / rows)` times, then cut down like the case below.
/// * `n` below the row count: `n` rows drawn uniformly without replacement,
///   kept in source order.
/// * otherwise the batch is returned as is.
///
/// An empty batch has nothing to repeat and comes back unchanged.
pub fn reconcile_rows<R: Rng + ?Sized>(
    batch: &RecordBatch,
    n: usize,
    rng: &mut R,
) -> Result<RecordBatch> {
    let rows = batch.num_rows();
    if rows == 0 {
        return Ok(batch.clone());
    }

    let replicated;
    let batch = if n > rows {
        let copies = n.div_ceil(rows);
        debug!("replicating {rows} rows {copies} times to cover {n}");
        replicated = concat_batches(&batch.schema(), std::iter::repeat(batch).take(copies))?;
        &replicated
    } else {
        batch
    };

    let rows = batch.num_rows();
    if n < rows {
        debug!("subsampling {n} of {rows} rows");
        let mut picked = rand::seq::index::sample(rng, rows, n).into_vec();
        picked.sort_unstable();
        let indices = UInt64Array::from_iter_values(picked.into_iter().map(|i| i as u64));
        return Ok(take_record_batch(batch, &indices)?);
    }

    Ok(batch.clone())
}

// ---------------------------------------------------------------------------
// Binary → hex
// ---------------------------------------------------------------------------

/// Whether a column's storage type holds raw bytes.
pub fn is_binary(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Binary
            | DataType::LargeBinary
            | DataType::BinaryView
            | DataType::FixedSizeBinary(_)
    )
}

/// Rewrite every binary column as `0x`-prefixed lowercase hex strings.
/// Nulls stay null; non-binary columns are untouched.
pub fn encode_binary_columns(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    if !schema.fields().iter().any(|f| is_binary(f.data_type())) {
        return Ok(batch.clone());
    }

    let mut fields = Vec::with_capacity(schema.fields().len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());

    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        if is_binary(field.data_type()) {
            fields.push(Field::new(field.name(), DataType::Utf8, field.is_nullable()));
            columns.push(Arc::new(hex_column(column)));
        } else {
            fields.push(field.as_ref().clone());
            columns.push(Arc::clone(column));
        }
    }

    let schema = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));
    Ok(RecordBatch::try_new(schema, columns)?)
}

fn hex_column(column: &ArrayRef) -> StringArray {
    fn to_hex(bytes: &[u8]) -> String {
        format!("0x{}", hex::encode(bytes))
    }

    match column.data_type() {
        DataType::Binary => column
            .as_binary::<i32>()
            .iter()
            .map(|v| v.map(to_hex))
            .collect(),
        DataType::LargeBinary => column
            .as_binary::<i64>()
            .iter()
            .map(|v| v.map(to_hex))
            .collect(),
        DataType::BinaryView => column
            .as_binary_view()
            .iter()
            .map(|v| v.map(to_hex))
            .collect(),
        DataType::FixedSizeBinary(_) => column
            .as_fixed_size_binary()
            .iter()
            .map(|v| v.map(to_hex))
            .collect(),
        _ => unreachable!("hex_column called on non-binary column"),
    }
}

// ---------------------------------------------------------------------------
// Output shaping
// ---------------------------------------------------------------------------

/// Turn the reconciled batch into a flat list (one column) or row tuples
/// (several columns). Columns are taken in batch order.
pub fn to_samples(batch: &RecordBatch) -> Result<Samples> {
    let n_rows = batch.num_rows();
    let columns = batch.columns();

    if let [column] = columns {
        let values = (0..n_rows)
            .map(|row| cell_value(column, row))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Samples::Flat(values));
    }

    let rows = (0..n_rows)
        .map(|row| {
            columns
                .iter()
                .map(|col| cell_value(col, row))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Samples::Rows(rows))
}

/// Extract a single value from an Arrow column at a given row. Types without
/// a dedicated variant are rendered with Arrow's display formatting.
fn cell_value(col: &ArrayRef, row: usize) -> Result<SampleValue> {
    if col.is_null(row) {
        return Ok(SampleValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => SampleValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => SampleValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Utf8View => SampleValue::String(col.as_string_view().value(row).to_string()),
        DataType::Int8 => SampleValue::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => SampleValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => SampleValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => SampleValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => SampleValue::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => {
            SampleValue::Integer(col.as_primitive::<UInt16Type>().value(row).into())
        }
        DataType::UInt32 => {
            SampleValue::Integer(col.as_primitive::<UInt32Type>().value(row).into())
        }
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v)
                .map(SampleValue::Integer)
                .unwrap_or_else(|_| SampleValue::String(v.to_string()))
        }
        DataType::Float32 => SampleValue::Float(col.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => SampleValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => SampleValue::Bool(col.as_boolean().value(row)),
        DataType::Binary => SampleValue::Binary(col.as_binary::<i32>().value(row).to_vec()),
        DataType::LargeBinary => SampleValue::Binary(col.as_binary::<i64>().value(row).to_vec()),
        DataType::BinaryView => SampleValue::Binary(col.as_binary_view().value(row).to_vec()),
        DataType::FixedSizeBinary(_) => {
            SampleValue::Binary(col.as_fixed_size_binary().value(row).to_vec())
        }
        _ => {
            let formatter = ArrayFormatter::try_new(col.as_ref(), &FormatOptions::default())?;
            SampleValue::String(formatter.value(row).to_string())
        }
    };
    Ok(value)
}
