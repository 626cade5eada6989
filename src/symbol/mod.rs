// Mon Feb 2 2026 - Alex

pub mod kind;
pub mod flags;
pub mod name;
pub mod symbol_info;
pub mod table;

pub use kind::EncodeKind;
pub use flags::SymbolFlags;
pub use name::ObjCLinkerName;
pub use symbol_info::Symbol;
pub use table::SymbolSet;
