// Mon Feb 2 2026 - Alex

pub mod packed;
pub mod availability;
pub mod error;

pub use packed::PackedVersion;
pub use availability::AvailabilityInfo;
pub use error::VersionError;
