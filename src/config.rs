use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::debug;
use once_cell::sync::OnceCell;

/// Environment variable that overrides the default samples directory.
pub const SAMPLES_DIR_ENV: &str = "FLOOD_SAMPLES_DIR";

/// Environment variable that overrides the default sample format version.
pub const SAMPLES_VERSION_ENV: &str = "FLOOD_SAMPLES_VERSION";

/// Format version of the sample files this crate knows how to read.
pub const SAMPLES_VERSION: &str = "v1_0_0";

static GLOBAL: OnceCell<SamplesConfig> = OnceCell::new();

/// Where sample files live on disk and which format version to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplesConfig {
    pub samples_dir: PathBuf,
    pub version: String,
}

impl SamplesConfig {
    pub fn new(samples_dir: impl Into<PathBuf>) -> Self {
        Self {
            samples_dir: samples_dir.into(),
            version: SAMPLES_VERSION.to_string(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Read the process environment, see [`SamplesConfig::from_lookup`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Build from a variable lookup:
    /// * samples dir: `$FLOOD_SAMPLES_DIR`, otherwise `$HOME/.flood/samples`
    ///   (`./.flood/samples` without `HOME`);
    /// * version: `$FLOOD_SAMPLES_VERSION`, otherwise [`SAMPLES_VERSION`].
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let samples_dir = match var(SAMPLES_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".flood")
                .join("samples"),
        };
        let config = Self::new(samples_dir);

        match var(SAMPLES_VERSION_ENV).and_then(|v| v.into_string().ok()) {
            Some(version) => config.with_version(version),
            None => config,
        }
    }

    pub fn samples_dir(&self) -> &Path {
        &self.samples_dir
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Install the process-wide default. Must happen before the first call to
/// [`global`]; a second install hands the rejected config back.
pub fn init_global(config: SamplesConfig) -> Result<(), SamplesConfig> {
    debug!(
        "samples dir set to {} (version {})",
        config.samples_dir.display(),
        config.version
    );
    GLOBAL.set(config)
}

/// The process-wide default, resolved from the environment on first use if
/// nothing was installed.
pub fn global() -> &'static SamplesConfig {
    GLOBAL.get_or_init(SamplesConfig::from_env)
}
