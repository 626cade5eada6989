// Mon Feb 2 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid packed version '{0}'")]
    Invalid(String),
    #[error("version component out of range in '{0}'")]
    OutOfRange(String),
}
