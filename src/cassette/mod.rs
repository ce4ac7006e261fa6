//! Cassette format for recording and replaying git runs.

pub mod format;
pub mod recorder;
pub mod replayer;

use std::path::{Path, PathBuf};

use thiserror::Error;

use self::format::Cassette;

/// Errors reading or writing cassette files.
#[derive(Debug, Error)]
pub enum CassetteError {
    /// The cassette file could not be read.
    #[error("failed to read cassette file {path}: {source}")]
    Read {
        /// Cassette path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The cassette file is not valid cassette YAML.
    #[error("failed to parse cassette file {path}: {source}")]
    Parse {
        /// Cassette path.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The cassette could not be serialized or written.
    #[error("failed to write cassette file {path}: {source}")]
    Write {
        /// Cassette path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Load a cassette file from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load(path: &Path) -> Result<Cassette, CassetteError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| CassetteError::Read { path: path.to_path_buf(), source })?;
    serde_yaml::from_str(&content)
        .map_err(|source| CassetteError::Parse { path: path.to_path_buf(), source })
}
