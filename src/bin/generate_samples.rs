use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use flood_samples::config::{self, SAMPLES_DIR_ENV, SAMPLES_VERSION_ENV};
use flood_samples::data::fixtures::{datatype_batch, write_parquet};
use flood_samples::data::locator::format_filename;
use flood_samples::Datatype;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Write synthetic sample files (random addresses, hashes and slots) so
/// flood can run without real chain data.
#[derive(Parser, Debug)]
#[command(name = "generate-samples")]
struct Args {
    /// Network name used in the filenames.
    #[arg(long, default_value = "ethereum")]
    network: String,

    /// Datatypes to generate; all of them when omitted.
    #[arg(long, value_delimiter = ',')]
    datatypes: Vec<String>,

    /// Rows per file.
    #[arg(long, default_value_t = 1000)]
    rows: usize,

    /// Size-tag used in the filenames; defaults to the row count.
    #[arg(long)]
    size: Option<String>,

    /// Sample format version used in the filenames.
    #[arg(long = "samples-version", env = SAMPLES_VERSION_ENV)]
    samples_version: Option<String>,

    /// Output directory.
    #[arg(long, env = SAMPLES_DIR_ENV)]
    samples_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let datatypes = if args.datatypes.is_empty() {
        Datatype::ALL.to_vec()
    } else {
        args.datatypes
            .iter()
            .map(|d| d.parse::<Datatype>())
            .collect::<Result<Vec<_>, _>>()?
    };
    if args.rows == 0 {
        bail!("--rows must be positive");
    }

    let defaults = config::global();
    let samples_dir = args
        .samples_dir
        .unwrap_or_else(|| defaults.samples_dir().to_path_buf());
    let version = args
        .samples_version
        .unwrap_or_else(|| defaults.version().to_string());
    std::fs::create_dir_all(&samples_dir)
        .with_context(|| format!("creating {}", samples_dir.display()))?;

    let size = args.size.unwrap_or_else(|| args.rows.to_string());
    let mut rng = StdRng::seed_from_u64(args.seed);

    for datatype in datatypes {
        let batch = datatype_batch(datatype, args.rows, &mut rng)?;
        let filename = format_filename(&args.network, datatype.as_str(), &size, &version);
        let path = samples_dir.join(filename);
        write_parquet(&path, &batch).with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {} {datatype} rows to {}", args.rows, path.display());
        println!("{}", path.display());
    }
    Ok(())
}
