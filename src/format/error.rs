// Wed Feb 4 2026 - Alex

use crate::interface::FileType;
use crate::target::TargetError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("malformed file: {0}")]
    Malformed(String),
    #[error("unsupported file type")]
    UnsupportedFileType,
    #[error("unsupported tapi file type '{0}' in YAML")]
    UnsupportedTapiFileType(String),
    #[error("no writer can emit {0} for this file")]
    UnsupportedWrite(FileType),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write failed: {0}")]
    Write(#[from] io::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl FormatError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        FormatError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        FormatError::Malformed(message.into())
    }
}

impl From<serde_yaml::Error> for FormatError {
    fn from(e: serde_yaml::Error) -> Self {
        FormatError::Malformed(e.to_string())
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(e: serde_json::Error) -> Self {
        FormatError::Malformed(e.to_string())
    }
}

impl From<TargetError> for FormatError {
    fn from(e: TargetError) -> Self {
        FormatError::Malformed(e.to_string())
    }
}

impl From<goblin::error::Error> for FormatError {
    fn from(e: goblin::error::Error) -> Self {
        FormatError::Malformed(format!("failed to parse Mach-O: {}", e))
    }
}
