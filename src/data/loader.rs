use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::compute::concat_batches;
use arrow::record_batch::{RecordBatch, RecordBatchReader};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ProjectionMask;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::locator::resolve_path;
use super::model::{Datatype, Samples, SizeSpec};
use super::reconcile::{encode_binary_columns, reconcile_rows, to_samples};
use crate::error::{Result, SampleError};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a whole sample file: every column, every row, no reconciliation.
pub fn load_raw_samples(
    network: &str,
    datatype: &str,
    size: &SizeSpec,
    version: Option<&str>,
    samples_dir: Option<&Path>,
) -> Result<RecordBatch> {
    let path =
        resolve_path(network, datatype, size, version, samples_dir).ok_or(SampleError::NotFound)?;
    info!("loading raw samples from {}", path.display());
    read_parquet(&path, None)
}

/// Load `n` samples of `datatype` for `network` with default options.
/// See [`SampleRequest`] for the knobs.
pub fn load_samples(
    network: &str,
    datatype: &str,
    n: usize,
    size: &SizeSpec,
    version: Option<&str>,
    samples_dir: Option<&Path>,
) -> Result<Samples> {
    let mut request = SampleRequest::new(network, datatype, n).size(size.clone());
    if let Some(version) = version {
        request = request.version(version);
    }
    if let Some(dir) = samples_dir {
        request = request.samples_dir(dir);
    }
    request.load()
}

// ---------------------------------------------------------------------------
// SampleRequest
// ---------------------------------------------------------------------------

/// A sized load with all of its options.
///
/// ```no_run
/// use flood_samples::SampleRequest;
///
/// let slots = SampleRequest::new("ethereum", "slots", 1_000).seed(7).load()?;
/// assert_eq!(slots.len(), 1_000);
/// # Ok::<(), flood_samples::SampleError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SampleRequest {
    network: String,
    datatype: String,
    n: usize,
    size: SizeSpec,
    version: Option<String>,
    samples_dir: Option<PathBuf>,
    binary_convert: bool,
    seed: Option<u64>,
}

impl SampleRequest {
    pub fn new(network: impl Into<String>, datatype: impl Into<String>, n: usize) -> Self {
        Self {
            network: network.into(),
            datatype: datatype.into(),
            n,
            size: SizeSpec::default(),
            version: None,
            samples_dir: None,
            binary_convert: true,
            seed: None,
        }
    }

    pub fn size(mut self, size: SizeSpec) -> Self {
        self.size = size;
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn samples_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.samples_dir = Some(dir.into());
        self
    }

    /// Keep binary columns as raw bytes instead of `0x…` strings.
    pub fn binary_convert(mut self, convert: bool) -> Self {
        self.binary_convert = convert;
        self
    }

    /// Make subsampling reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Resolve, read, reconcile, encode and shape.
    ///
    /// The path is resolved before the datatype is looked up, so a missing
    /// file reports [`SampleError::NotFound`] even for an unknown datatype.
    pub fn load(&self) -> Result<Samples> {
        let path = resolve_path(
            &self.network,
            &self.datatype,
            &self.size,
            self.version.as_deref(),
            self.samples_dir.as_deref(),
        )
        .ok_or(SampleError::NotFound)?;

        if !path.exists() {
            // Fetching missing samples is not supported; the read below fails.
            debug!("{} is not on disk, no download attempted", path.display());
        }

        let datatype: Datatype = self.datatype.parse()?;
        let columns = datatype.columns();

        let table = read_parquet(&path, Some(columns))?;
        if table.num_rows() == 0 && self.n > 0 {
            return Err(SampleError::EmptySamples(path));
        }
        info!(
            "loaded {} {} rows from {}, {} requested",
            table.num_rows(),
            datatype,
            path.display(),
            self.n
        );

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut table = reconcile_rows(&table, self.n, &mut rng)?;
        if self.binary_convert {
            table = encode_binary_columns(&table)?;
        }
        to_samples(&table)
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Read a parquet file into one batch. With `columns`, only those root
/// columns are decoded and the result is ordered like `columns`.
fn read_parquet(path: &Path, columns: Option<&[&str]>) -> Result<RecordBatch> {
    let file = File::open(path).map_err(|source| SampleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    if let Some(columns) = columns {
        let file_schema = builder.schema().clone();
        let roots = columns
            .iter()
            .map(|name| {
                file_schema
                    .index_of(name)
                    .map_err(|_| SampleError::MissingColumn {
                        path: path.to_path_buf(),
                        column: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let mask = ProjectionMask::roots(builder.parquet_schema(), roots);
        builder = builder.with_projection(mask);
    }

    let reader = builder.build()?;
    let schema = reader.schema();
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    let table = concat_batches(&schema, &batches)?;

    match columns {
        // The projection keeps file order; put columns back in requested order.
        Some(columns) => {
            let order = columns
                .iter()
                .map(|name| table.schema().index_of(name))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(table.project(&order)?)
        }
        None => Ok(table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{address_batch, slots_batch, write_parquet};
    use crate::config;
    use crate::data::locator::format_filename;
    use crate::data::model::SampleValue;
    use std::sync::Arc;

    use arrow::array::{BinaryArray, Int64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use tempfile::TempDir;

    fn sample_path(dir: &Path, datatype: &str, size: &str) -> PathBuf {
        dir.join(format_filename("ethereum", datatype, size, config::global().version()))
    }

    fn write_contracts(dir: &Path, rows: usize) {
        let mut rng = StdRng::seed_from_u64(11);
        let batch = address_batch("contract_address", rows, 20, &mut rng).unwrap();
        write_parquet(&sample_path(dir, "contracts", "1k"), &batch).unwrap();
    }

    fn is_hex(value: &SampleValue) -> bool {
        value.as_str().is_some_and(|s| {
            s.strip_prefix("0x")
                .is_some_and(|h| h.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')))
        })
    }

    fn load(dir: &Path, datatype: &str, n: usize) -> Result<Samples> {
        load_samples("ethereum", datatype, n, &SizeSpec::LargestAvailable, None, Some(dir))
    }

    #[test]
    fn contracts_load_as_flat_hex_addresses() {
        let dir = TempDir::new().unwrap();
        write_contracts(dir.path(), 5);

        let values = load(dir.path(), "contracts", 5).unwrap().into_flat().unwrap();
        assert_eq!(values.len(), 5);
        for value in &values {
            assert!(is_hex(value), "{value} is not 0x hex");
            assert_eq!(value.as_str().unwrap().len(), 2 + 40);
        }
    }

    #[test]
    fn slots_load_as_address_slot_tuples() {
        let dir = TempDir::new().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let batch = slots_batch(8, &mut rng).unwrap();
        write_parquet(&sample_path(dir.path(), "slots", "1k"), &batch).unwrap();

        let rows = load(dir.path(), "slots", 3).unwrap().into_rows().unwrap();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.len(), 2);
            assert!(row.iter().all(is_hex));
            assert_eq!(row[0].as_str().unwrap().len(), 2 + 40);
            assert_eq!(row[1].as_str().unwrap().len(), 2 + 64);
        }
    }

    #[test]
    fn subsampling_returns_exactly_n() {
        let dir = TempDir::new().unwrap();
        write_contracts(dir.path(), 20);

        for n in [0, 1, 7, 19, 20] {
            assert_eq!(load(dir.path(), "contracts", n).unwrap().len(), n);
        }
    }

    #[test]
    fn replication_returns_exactly_n() {
        let dir = TempDir::new().unwrap();
        write_contracts(dir.path(), 4);

        let values = load(dir.path(), "contracts", 9).unwrap().into_flat().unwrap();
        assert_eq!(values.len(), 9);
        assert!(values.iter().all(is_hex));
    }

    #[test]
    fn slots_replicate_into_exactly_n_tuples() {
        let dir = TempDir::new().unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let batch = slots_batch(3, &mut rng).unwrap();
        write_parquet(&sample_path(dir.path(), "slots", "1k"), &batch).unwrap();

        let rows = load(dir.path(), "slots", 10).unwrap().into_rows().unwrap();
        assert_eq!(rows.len(), 10);
        for row in &rows {
            assert_eq!(row.len(), 2);
            assert_eq!(row[0].as_str().unwrap().len(), 2 + 40);
            assert_eq!(row[1].as_str().unwrap().len(), 2 + 64);
        }
    }

    #[test]
    fn seeded_requests_are_reproducible() {
        let dir = TempDir::new().unwrap();
        write_contracts(dir.path(), 50);

        let request = SampleRequest::new("ethereum", "contracts", 10)
            .samples_dir(dir.path())
            .seed(42);
        assert_eq!(request.load().unwrap(), request.load().unwrap());
    }

    #[test]
    fn binary_convert_off_keeps_bytes() {
        let dir = TempDir::new().unwrap();
        write_contracts(dir.path(), 3);

        let values = SampleRequest::new("ethereum", "contracts", 3)
            .samples_dir(dir.path())
            .binary_convert(false)
            .load()
            .unwrap()
            .into_flat()
            .unwrap();
        assert!(values
            .iter()
            .all(|v| matches!(v, SampleValue::Binary(bytes) if bytes.len() == 20)));
    }

    #[test]
    fn missing_file_is_not_found_even_for_unknown_datatype() {
        let dir = TempDir::new().unwrap();
        let err = load(dir.path(), "unknown_type", 5).unwrap_err();
        assert!(matches!(err, SampleError::NotFound));

        let raw = load_raw_samples(
            "ethereum",
            "contracts",
            &SizeSpec::LargestAvailable,
            None,
            Some(dir.path()),
        )
        .unwrap_err();
        assert_eq!(raw.to_string(), "no raw samples found to load");
    }

    #[test]
    fn unknown_datatype_fails_after_resolution() {
        let dir = TempDir::new().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let batch = address_batch("contract_address", 5, 20, &mut rng).unwrap();
        write_parquet(&sample_path(dir.path(), "unknown_type", "1k"), &batch).unwrap();

        let err = load(dir.path(), "unknown_type", 5).unwrap_err();
        assert!(matches!(err, SampleError::UnknownDatatype(name) if name == "unknown_type"));
    }

    #[test]
    fn exact_size_that_does_not_exist_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let err = load_samples(
            "ethereum",
            "contracts",
            5,
            &SizeSpec::Exact("1m".into()),
            None,
            Some(dir.path()),
        )
        .unwrap_err();
        assert!(matches!(err, SampleError::Io { .. }));
    }

    #[test]
    fn empty_file_cannot_satisfy_a_request() {
        let dir = TempDir::new().unwrap();
        write_contracts(dir.path(), 0);

        let err = load(dir.path(), "contracts", 3).unwrap_err();
        assert!(matches!(err, SampleError::EmptySamples(_)));
        assert!(load(dir.path(), "contracts", 0).unwrap().is_empty());
    }

    #[test]
    fn rows_follow_datatype_column_order_and_keep_non_binary_values() {
        let dir = TempDir::new().unwrap();
        let schema = Arc::new(Schema::new(vec![
            Field::new("slot", DataType::Int64, false),
            Field::new("block_number", DataType::Int64, false),
            Field::new("contract_address", DataType::Binary, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![7, 8])),
                Arc::new(Int64Array::from(vec![100, 200])),
                Arc::new(BinaryArray::from_vec(vec![&[0x0a][..], &[0x0b][..]])),
            ],
        )
        .unwrap();
        write_parquet(&sample_path(dir.path(), "slots", "tiny"), &batch).unwrap();

        let rows = load(dir.path(), "slots", 2).unwrap().into_rows().unwrap();
        assert_eq!(
            rows,
            vec![
                vec![SampleValue::String("0x0a".into()), SampleValue::Integer(7)],
                vec![SampleValue::String("0x0b".into()), SampleValue::Integer(8)],
            ]
        );
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let batch = address_batch("address", 3, 20, &mut rng).unwrap();
        write_parquet(&sample_path(dir.path(), "eoa", "1k"), &batch).unwrap();

        let err = load(dir.path(), "eoa", 3).unwrap_err();
        assert!(matches!(err, SampleError::MissingColumn { column, .. } if column == "eoas"));
    }

    #[test]
    fn raw_load_reads_every_column() {
        let dir = TempDir::new().unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let batch = slots_batch(6, &mut rng).unwrap();
        write_parquet(&sample_path(dir.path(), "slots", "1k"), &batch).unwrap();

        let table = load_raw_samples(
            "ethereum",
            "slots",
            &SizeSpec::Exact("1k".into()),
            None,
            Some(dir.path()),
        )
        .unwrap();
        assert_eq!(table.num_rows(), 6);
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.schema().field(1).data_type(), &DataType::Binary);
    }
}
