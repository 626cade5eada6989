// Tue Feb 10 2026 - Alex

pub mod version;
pub mod target;
pub mod symbol;
pub mod record;
pub mod encoder;
pub mod interface;
pub mod format;
pub mod registry;
pub mod reexport;
pub mod config;
pub mod utils;

pub use config::Config;
pub use format::{FormatError, MemoryBuffer, ReadFlags};
pub use interface::{FileType, InterfaceFile};
pub use record::Api;
pub use registry::Registry;
pub use reexport::ReexportFileWriter;
