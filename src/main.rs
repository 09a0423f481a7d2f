use std::path::PathBuf;

use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use clap::Parser;
use flood_samples::config::{self, SAMPLES_DIR_ENV, SAMPLES_VERSION_ENV};
use flood_samples::{list_available, load_raw_samples, SampleRequest, Samples, SizeSpec};

/// Print flood benchmark samples from the local samples directory.
#[derive(Parser, Debug)]
#[command(name = "flood-samples", version)]
struct Cli {
    /// Network the samples were taken from, e.g. `ethereum`.
    network: String,

    /// One of `contracts`, `eoa`, `transactions`, `slots`.
    datatype: String,

    /// Number of samples to draw.
    #[arg(default_value_t = 10)]
    n: usize,

    /// Size-tag of the sample file, or `largest_available`.
    #[arg(short, long, default_value = flood_samples::LARGEST_AVAILABLE)]
    size: SizeSpec,

    /// Sample format version.
    #[arg(long = "samples-version", env = SAMPLES_VERSION_ENV)]
    samples_version: Option<String>,

    /// Directory holding the sample files.
    #[arg(long, env = SAMPLES_DIR_ENV)]
    samples_dir: Option<PathBuf>,

    /// Seed for reproducible subsampling.
    #[arg(long)]
    seed: Option<u64>,

    /// Print binary columns as byte arrays instead of 0x hex.
    #[arg(long)]
    no_hex: bool,

    /// Print the whole file as a table instead of drawing samples.
    #[arg(long, conflicts_with_all = ["list", "json"])]
    raw: bool,

    /// List the size-tags available on disk.
    #[arg(long)]
    list: bool,

    /// Print samples as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let defaults = config::global();
    let samples_dir = cli.samples_dir.as_deref().unwrap_or(defaults.samples_dir());
    let version = cli.samples_version.as_deref().unwrap_or(defaults.version());

    if cli.list {
        let available = list_available(
            &cli.network,
            &cli.datatype,
            Some(version),
            Some(samples_dir),
        );
        if available.is_empty() {
            println!(
                "no {} {} samples in {}",
                cli.network,
                cli.datatype,
                samples_dir.display()
            );
        }
        for sample in available {
            println!(
                "{:>12} bytes  {:<10}  {}",
                sample.bytes,
                sample.size,
                sample.path.display()
            );
        }
        return Ok(());
    }

    if cli.raw {
        let table = load_raw_samples(
            &cli.network,
            &cli.datatype,
            &cli.size,
            Some(version),
            Some(samples_dir),
        )
        .context("loading raw samples")?;
        println!("{}", pretty_format_batches(&[table]).context("formatting table")?);
        return Ok(());
    }

    let mut request = SampleRequest::new(&cli.network, &cli.datatype, cli.n)
        .size(cli.size.clone())
        .version(version)
        .samples_dir(samples_dir)
        .binary_convert(!cli.no_hex);
    if let Some(seed) = cli.seed {
        request = request.seed(seed);
    }
    let samples = request
        .load()
        .with_context(|| format!("loading {} {} samples", cli.network, cli.datatype))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&samples)?);
        return Ok(());
    }

    match samples {
        Samples::Flat(values) => {
            for value in values {
                println!("{value}");
            }
        }
        Samples::Rows(rows) => {
            for row in rows {
                let fields: Vec<String> = row.iter().map(ToString::to_string).collect();
                println!("{}", fields.join(","));
            }
        }
    }
    Ok(())
}
