//! Error type shared by the library.
//!
//! Configuration problems are surfaced before any window is screened; a window
//! that fails the arm screen is never an error, it is simply left out of the
//! candidate list.
use std::path::Path;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Unknown chemistry, empty barcode list, unknown template slot or an
    /// out-of-range configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Every barcode produced a scaffold with a poly-G run.
    #[error("polyG in scaffold for all {tried} barcodes; supply additional barcodes")]
    NoViableBarcode { tried: usize },

    #[error("Error reading or writing \"{file}\": {source}")]
    FileIo {
        file: String,
        source: std::io::Error,
    },

    #[error("Could not parse \"{file}\": {source}")]
    ParseConfig {
        file: String,
        source: serde_yaml::Error,
    },

    #[error("Error writing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }

    pub(crate) fn file_io(path: &Path, source: std::io::Error) -> Self {
        Error::FileIo { file: path.display().to_string(), source }
    }

    /// `true` for the configuration-class errors raised before screening starts.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::InvalidConfiguration(_) | Error::ParseConfig { .. })
    }
}
