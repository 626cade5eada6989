// Tue Feb 3 2026 - Alex

pub mod flags;
pub mod converter;

pub use flags::compute_flags;
pub use converter::{convert_api, SymbolConverter};
