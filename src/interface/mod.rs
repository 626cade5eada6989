// Wed Feb 4 2026 - Alex

pub mod file_type;
pub mod file;
pub mod replay;

pub use file_type::FileType;
pub use file::{InterfaceFile, InterfaceFileRef};
