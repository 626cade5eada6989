// Tue Feb 3 2026 - Alex

use crate::record::SymbolAttributes;
use crate::symbol::SymbolFlags;

/// Encodes a record's linker attributes. Every bit maps to exactly one
/// attribute, and exactly one of `TEXT`/`DATA` is always set.
pub fn compute_flags(attrs: &SymbolAttributes) -> SymbolFlags {
    let mut flags = SymbolFlags::empty();

    if attrs.weak_defined {
        flags |= SymbolFlags::WEAK_DEFINED;
    }
    if attrs.thread_local {
        flags |= SymbolFlags::THREAD_LOCAL_VALUE;
    }
    if attrs.reexported {
        flags |= SymbolFlags::REXPORTED;
    }
    if attrs.external {
        flags |= SymbolFlags::UNDEFINED;
    }
    if attrs.weak_referenced {
        flags |= SymbolFlags::WEAK_REFERENCED;
    }

    if attrs.text {
        flags |= SymbolFlags::TEXT;
    } else {
        flags |= SymbolFlags::DATA;
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_attribute_combination() {
        for bits in 0u8..64 {
            let attrs = SymbolAttributes {
                exported: true,
                weak_defined: bits & 1 != 0,
                thread_local: bits & 2 != 0,
                reexported: bits & 4 != 0,
                external: bits & 8 != 0,
                weak_referenced: bits & 16 != 0,
                text: bits & 32 != 0,
            };

            let mut expected = SymbolFlags::empty();
            expected.set(SymbolFlags::WEAK_DEFINED, attrs.weak_defined);
            expected.set(SymbolFlags::THREAD_LOCAL_VALUE, attrs.thread_local);
            expected.set(SymbolFlags::REXPORTED, attrs.reexported);
            expected.set(SymbolFlags::UNDEFINED, attrs.external);
            expected.set(SymbolFlags::WEAK_REFERENCED, attrs.weak_referenced);
            expected.set(SymbolFlags::TEXT, attrs.text);
            expected.set(SymbolFlags::DATA, !attrs.text);

            let flags = compute_flags(&attrs);
            assert_eq!(flags, expected, "combination {:06b}", bits);
            assert_eq!((flags & SymbolFlags::KIND_MASK).bits().count_ones(), 1);
        }
    }

    #[test]
    fn test_exported_bit_is_not_encoded() {
        let hidden = SymbolAttributes::default();
        let visible = SymbolAttributes::exported();
        assert_eq!(compute_flags(&hidden), compute_flags(&visible));
    }
}
