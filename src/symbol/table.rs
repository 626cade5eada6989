// Mon Feb 2 2026 - Alex

use crate::symbol::{EncodeKind, Symbol, SymbolFlags};
use crate::target::Target;
use indexmap::IndexMap;

/// Insertion-ordered set of symbols keyed by `(kind, name)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSet {
    symbols: IndexMap<(EncodeKind, String), Symbol>,
}

impl SymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` on `target`. The same `(kind, name)` always resolves
    /// to one symbol; further targets accumulate on it.
    pub fn add_global(
        &mut self,
        kind: EncodeKind,
        name: &str,
        flags: SymbolFlags,
        target: Target,
    ) -> &mut Symbol {
        let symbol = self.entry(kind, name, flags);
        symbol.add_target(target);
        symbol
    }

    pub fn add_global_for_targets<'a, I>(
        &mut self,
        kind: EncodeKind,
        name: &str,
        flags: SymbolFlags,
        targets: I,
    ) -> &mut Symbol
    where
        I: IntoIterator<Item = &'a Target>,
    {
        let symbol = self.entry(kind, name, flags);
        for target in targets {
            symbol.add_target(*target);
        }
        symbol
    }

    fn entry(&mut self, kind: EncodeKind, name: &str, flags: SymbolFlags) -> &mut Symbol {
        let symbol = self
            .symbols
            .entry((kind, name.to_string()))
            .or_insert_with(|| Symbol::new(kind, name, flags));
        symbol.merge_flags(flags);
        symbol
    }

    pub fn find(&self, kind: EncodeKind, name: &str) -> Option<&Symbol> {
        self.symbols.get(&(kind, name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    /// Symbols ordered by kind, then name.
    pub fn sorted(&self) -> Vec<&Symbol> {
        let mut symbols: Vec<&Symbol> = self.symbols.values().collect();
        symbols.sort();
        symbols
    }

    pub fn exports(&self) -> impl Iterator<Item = &Symbol> {
        self.iter().filter(|s| !s.is_undefined() && !s.is_reexported())
    }

    pub fn reexports(&self) -> impl Iterator<Item = &Symbol> {
        self.iter().filter(|s| s.is_reexported())
    }

    pub fn undefineds(&self) -> impl Iterator<Item = &Symbol> {
        self.iter().filter(|s| s.is_undefined())
    }

    /// Drops targets rejected by `keep` and any symbol left without one.
    pub fn retain_targets<F: FnMut(&Target) -> bool>(&mut self, mut keep: F) {
        for symbol in self.symbols.values_mut() {
            symbol.retain_targets(&mut keep);
        }
        self.symbols.retain(|_, s| !s.targets().is_empty());
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{Architecture, Platform};

    fn macos(arch: Architecture) -> Target {
        Target::new(arch, Platform::MacOS)
    }

    #[test]
    fn test_add_global_is_idempotent() {
        let mut set = SymbolSet::new();
        set.add_global(EncodeKind::GlobalSymbol, "_foo", SymbolFlags::DATA, macos(Architecture::X86_64));
        set.add_global(EncodeKind::GlobalSymbol, "_foo", SymbolFlags::DATA, macos(Architecture::X86_64));
        set.add_global(EncodeKind::GlobalSymbol, "_foo", SymbolFlags::DATA, macos(Architecture::Arm64));
        assert_eq!(set.len(), 1);

        let sym = set.find(EncodeKind::GlobalSymbol, "_foo").unwrap();
        assert_eq!(sym.targets().len(), 2);
    }

    #[test]
    fn test_kind_distinguishes_symbols() {
        let mut set = SymbolSet::new();
        let t = macos(Architecture::Arm64);
        set.add_global(EncodeKind::ObjectiveCClass, "Foo", SymbolFlags::DATA, t);
        set.add_global(EncodeKind::ObjectiveCClassEHType, "Foo", SymbolFlags::DATA, t);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_linkage_views() {
        let mut set = SymbolSet::new();
        let t = macos(Architecture::Arm64);
        set.add_global(EncodeKind::GlobalSymbol, "_a", SymbolFlags::DATA, t);
        set.add_global(EncodeKind::GlobalSymbol, "_b", SymbolFlags::DATA | SymbolFlags::REXPORTED, t);
        set.add_global(EncodeKind::GlobalSymbol, "_c", SymbolFlags::DATA | SymbolFlags::UNDEFINED, t);
        assert_eq!(set.exports().count(), 1);
        assert_eq!(set.reexports().count(), 1);
        assert_eq!(set.undefineds().count(), 1);
    }

    #[test]
    fn test_retain_targets_drops_orphans() {
        let mut set = SymbolSet::new();
        set.add_global(EncodeKind::GlobalSymbol, "_intel", SymbolFlags::DATA, macos(Architecture::X86_64));
        set.add_global(EncodeKind::GlobalSymbol, "_both", SymbolFlags::DATA, macos(Architecture::X86_64));
        set.add_global(EncodeKind::GlobalSymbol, "_both", SymbolFlags::DATA, macos(Architecture::Arm64));
        set.retain_targets(|t| t.arch == Architecture::Arm64);
        assert_eq!(set.len(), 1);
        assert!(set.find(EncodeKind::GlobalSymbol, "_both").is_some());
    }
}
