// Mon Feb 2 2026 - Alex

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SymbolFlags: u8 {
        const THREAD_LOCAL_VALUE = 1 << 0;
        const WEAK_DEFINED = 1 << 1;
        const WEAK_REFERENCED = 1 << 2;
        const UNDEFINED = 1 << 3;
        const REXPORTED = 1 << 4;
        const DATA = 1 << 5;
        const TEXT = 1 << 6;
    }
}

impl SymbolFlags {
    pub const KIND_MASK: SymbolFlags = SymbolFlags::DATA.union(SymbolFlags::TEXT);
}
