// Wed Feb 4 2026 - Alex

//! Symbol lists as the text formats lay them out: one bucket of names per
//! list key, one bucket set per target or architecture group.

use crate::symbol::name::{ehtype_symbol, OBJC2_EHTYPE_NAME_PREFIX};
use crate::symbol::{EncodeKind, Symbol, SymbolFlags, SymbolSet};
use crate::target::Target;

/// v1 and v2 spell class and ivar names with a leading underscore and
/// carry EH types as plain globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObjCNaming {
    Decorated,
    Plain,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SymbolBuckets {
    pub globals: Vec<String>,
    pub objc_classes: Vec<String>,
    pub objc_eh_types: Vec<String>,
    pub objc_ivars: Vec<String>,
    pub weak: Vec<String>,
    pub thread_local: Vec<String>,
}

impl SymbolBuckets {
    pub fn push(&mut self, symbol: &Symbol, naming: ObjCNaming) {
        let name = symbol.name();
        match symbol.kind() {
            EncodeKind::GlobalSymbol => {
                if symbol.is_weak_defined() || symbol.is_weak_referenced() {
                    self.weak.push(name.to_string());
                } else if symbol.is_thread_local_value() {
                    self.thread_local.push(name.to_string());
                } else {
                    self.globals.push(name.to_string());
                }
            }
            EncodeKind::ObjectiveCClass => self.objc_classes.push(decorate(name, naming)),
            EncodeKind::ObjectiveCClassEHType => match naming {
                ObjCNaming::Decorated => self.globals.push(ehtype_symbol(name)),
                ObjCNaming::Plain => self.objc_eh_types.push(name.to_string()),
            },
            EncodeKind::ObjectiveCInstanceVariable => self.objc_ivars.push(decorate(name, naming)),
        }
    }

    /// Sorts every list by name and drops duplicates.
    pub fn finish(&mut self) {
        for list in self.lists_mut() {
            list.sort();
            list.dedup();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.globals.is_empty()
            && self.objc_classes.is_empty()
            && self.objc_eh_types.is_empty()
            && self.objc_ivars.is_empty()
            && self.weak.is_empty()
            && self.thread_local.is_empty()
    }

    fn lists_mut(&mut self) -> [&mut Vec<String>; 6] {
        [
            &mut self.globals,
            &mut self.objc_classes,
            &mut self.objc_eh_types,
            &mut self.objc_ivars,
            &mut self.weak,
            &mut self.thread_local,
        ]
    }

    /// Adds every listed name to `symbols` on `targets`. `flags` carries the
    /// linkage and text/data bits; `weak` is the bit the weak list stands for.
    pub fn insert_into(
        &self,
        symbols: &mut SymbolSet,
        targets: &[Target],
        flags: SymbolFlags,
        weak: SymbolFlags,
        naming: ObjCNaming,
    ) {
        for name in &self.globals {
            let ehtype = name
                .strip_prefix(OBJC2_EHTYPE_NAME_PREFIX)
                .filter(|_| naming == ObjCNaming::Decorated);
            match ehtype {
                Some(class) => symbols.add_global_for_targets(EncodeKind::ObjectiveCClassEHType, class, flags, targets),
                None => symbols.add_global_for_targets(EncodeKind::GlobalSymbol, name, flags, targets),
            };
        }
        for name in &self.objc_classes {
            symbols.add_global_for_targets(EncodeKind::ObjectiveCClass, undecorate(name, naming), flags, targets);
        }
        for name in &self.objc_eh_types {
            symbols.add_global_for_targets(EncodeKind::ObjectiveCClassEHType, name, flags, targets);
        }
        for name in &self.objc_ivars {
            symbols.add_global_for_targets(
                EncodeKind::ObjectiveCInstanceVariable,
                undecorate(name, naming),
                flags,
                targets,
            );
        }
        for name in &self.weak {
            symbols.add_global_for_targets(EncodeKind::GlobalSymbol, name, flags | weak, targets);
        }
        for name in &self.thread_local {
            symbols.add_global_for_targets(
                EncodeKind::GlobalSymbol,
                name,
                flags | SymbolFlags::THREAD_LOCAL_VALUE,
                targets,
            );
        }
    }
}

fn decorate(name: &str, naming: ObjCNaming) -> String {
    match naming {
        ObjCNaming::Decorated => format!("_{}", name),
        ObjCNaming::Plain => name.to_string(),
    }
}

fn undecorate(name: &str, naming: ObjCNaming) -> &str {
    match naming {
        ObjCNaming::Decorated => name.strip_prefix('_').unwrap_or(name),
        ObjCNaming::Plain => name,
    }
}
