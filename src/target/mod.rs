// Mon Feb 2 2026 - Alex

pub mod architecture;
pub mod platform;
pub mod triple;
pub mod error;

pub use architecture::{Architecture, ArchitectureSet};
pub use platform::Platform;
pub use triple::Target;
pub use error::TargetError;
