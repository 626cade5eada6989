// Mon Feb 2 2026 - Alex

use crate::symbol::{EncodeKind, SymbolFlags};
use crate::target::{ArchitectureSet, Target};
use std::cmp::Ordering;
use std::fmt;

/// One logical symbol of a stub together with every target it exists on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    kind: EncodeKind,
    name: String,
    targets: Vec<Target>,
    flags: SymbolFlags,
}

impl Symbol {
    pub fn new(kind: EncodeKind, name: impl Into<String>, flags: SymbolFlags) -> Self {
        Self {
            kind,
            name: name.into(),
            targets: Vec::new(),
            flags,
        }
    }

    pub fn kind(&self) -> EncodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> SymbolFlags {
        self.flags
    }

    /// Targets in sorted order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn add_target(&mut self, target: Target) {
        if let Err(pos) = self.targets.binary_search(&target) {
            self.targets.insert(pos, target);
        }
    }

    pub fn has_target(&self, target: &Target) -> bool {
        self.targets.binary_search(target).is_ok()
    }

    pub fn retain_targets<F: FnMut(&Target) -> bool>(&mut self, f: F) {
        self.targets.retain(f);
    }

    pub fn architectures(&self) -> ArchitectureSet {
        self.targets.iter().map(|t| t.arch).collect()
    }

    /// Adds flag bits, keeping the text/data classification the symbol
    /// was created with.
    pub(crate) fn merge_flags(&mut self, flags: SymbolFlags) {
        let kind = self.flags & SymbolFlags::KIND_MASK;
        self.flags |= flags - SymbolFlags::KIND_MASK;
        if kind.is_empty() {
            self.flags |= flags & SymbolFlags::KIND_MASK;
        }
    }

    pub fn is_weak_defined(&self) -> bool {
        self.flags.contains(SymbolFlags::WEAK_DEFINED)
    }

    pub fn is_weak_referenced(&self) -> bool {
        self.flags.contains(SymbolFlags::WEAK_REFERENCED)
    }

    pub fn is_thread_local_value(&self) -> bool {
        self.flags.contains(SymbolFlags::THREAD_LOCAL_VALUE)
    }

    pub fn is_undefined(&self) -> bool {
        self.flags.contains(SymbolFlags::UNDEFINED)
    }

    pub fn is_reexported(&self) -> bool {
        self.flags.contains(SymbolFlags::REXPORTED)
    }

    pub fn is_exported(&self) -> bool {
        !self.is_undefined()
    }

    pub fn is_text(&self) -> bool {
        self.flags.contains(SymbolFlags::TEXT)
    }

    pub fn is_data(&self) -> bool {
        self.flags.contains(SymbolFlags::DATA)
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.kind, &self.name)
            .cmp(&(other.kind, &other.name))
            .then_with(|| self.targets.cmp(&other.targets))
            .then_with(|| self.flags.bits().cmp(&other.flags.bits()))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)?;
        if !self.targets.is_empty() {
            let targets: Vec<String> = self.targets.iter().map(|t| t.to_string()).collect();
            write!(f, " [{}]", targets.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{Architecture, Platform};

    #[test]
    fn test_targets_stay_sorted_and_unique() {
        let mut sym = Symbol::new(EncodeKind::GlobalSymbol, "_foo", SymbolFlags::DATA);
        let arm = Target::new(Architecture::Arm64, Platform::MacOS);
        let intel = Target::new(Architecture::X86_64, Platform::MacOS);
        sym.add_target(arm);
        sym.add_target(intel);
        sym.add_target(arm);
        assert_eq!(sym.targets(), &[intel, arm]);
        assert!(sym.has_target(&arm));
    }

    #[test]
    fn test_merge_flags_keeps_classification() {
        let mut sym = Symbol::new(EncodeKind::GlobalSymbol, "_foo", SymbolFlags::TEXT);
        sym.merge_flags(SymbolFlags::DATA | SymbolFlags::WEAK_DEFINED);
        assert!(sym.is_text());
        assert!(!sym.is_data());
        assert!(sym.is_weak_defined());
    }

    #[test]
    fn test_ordering_by_kind_then_name() {
        let ivar = Symbol::new(EncodeKind::ObjectiveCInstanceVariable, "A.b", SymbolFlags::DATA);
        let class = Symbol::new(EncodeKind::ObjectiveCClass, "Z", SymbolFlags::DATA);
        let global = Symbol::new(EncodeKind::GlobalSymbol, "_zzz", SymbolFlags::DATA);
        let mut all = vec![ivar.clone(), class.clone(), global.clone()];
        all.sort();
        assert_eq!(all, vec![global, class, ivar]);
    }
}
