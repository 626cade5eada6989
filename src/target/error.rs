// Mon Feb 2 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("unknown architecture '{0}'")]
    UnknownArchitecture(String),
    #[error("unknown platform '{0}'")]
    UnknownPlatform(String),
    #[error("malformed target '{0}'")]
    MalformedTarget(String),
}
