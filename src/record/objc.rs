// Tue Feb 3 2026 - Alex

use crate::record::{RecordBase, SymbolAttributes};
use crate::symbol::name::qualified_ivar_name;
use bitflags::bitflags;

bitflags! {
    /// Which of a class's linker symbols are present.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ObjCIFSymbolKind: u8 {
        const CLASS = 1 << 0;
        const METACLASS = 1 << 1;
        const EHTYPE = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjCAccessControl {
    Public,
    #[default]
    Protected,
    Private,
    Package,
}

impl ObjCAccessControl {
    /// Private and package ivars never get a linker symbol.
    pub fn is_linkable(&self) -> bool {
        matches!(self, ObjCAccessControl::Public | ObjCAccessControl::Protected)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjCInstanceVariableRecord {
    pub base: RecordBase,
    pub access_control: ObjCAccessControl,
}

impl ObjCInstanceVariableRecord {
    pub fn new(name: impl Into<String>, access_control: ObjCAccessControl, attributes: SymbolAttributes) -> Self {
        Self {
            base: RecordBase::new(name, attributes),
            access_control,
        }
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn qualified_name(&self, container: &str) -> String {
        qualified_ivar_name(container, &self.base.name)
    }

    /// Exported and not hidden by its access control.
    pub fn is_linkable(&self) -> bool {
        self.base.is_exported() && self.access_control.is_linkable()
    }
}

/// Common part of classes and categories: a name and the ivars it declares.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjCContainerRecord {
    pub base: RecordBase,
    pub ivars: Vec<ObjCInstanceVariableRecord>,
}

impl ObjCContainerRecord {
    pub fn new(name: impl Into<String>, attributes: SymbolAttributes) -> Self {
        Self {
            base: RecordBase::new(name, attributes),
            ivars: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    /// Adds an ivar, or updates the one already declared under that name.
    pub fn add_ivar(&mut self, ivar: ObjCInstanceVariableRecord) -> &mut ObjCInstanceVariableRecord {
        match self.ivars.iter().position(|i| i.name() == ivar.name()) {
            Some(pos) => {
                let existing = &mut self.ivars[pos];
                existing.base.availability.merge(&ivar.base.availability);
                existing.base.attributes = ivar.base.attributes;
                existing.access_control = ivar.access_control;
                existing
            }
            None => {
                self.ivars.push(ivar);
                let last = self.ivars.len() - 1;
                &mut self.ivars[last]
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjCInterfaceRecord {
    pub container: ObjCContainerRecord,
    pub super_class: Option<String>,
    pub has_exception_attribute: bool,
    exported_symbols: ObjCIFSymbolKind,
    /// Names of categories extending this class, in declaration order.
    pub categories: Vec<String>,
}

impl ObjCInterfaceRecord {
    /// A complete interface: class and metaclass are both present.
    pub fn new(name: impl Into<String>, attributes: SymbolAttributes) -> Self {
        Self {
            container: ObjCContainerRecord::new(name, attributes),
            super_class: None,
            has_exception_attribute: false,
            exported_symbols: ObjCIFSymbolKind::CLASS | ObjCIFSymbolKind::METACLASS,
            categories: Vec::new(),
        }
    }

    pub fn with_exception_attribute(mut self, has: bool) -> Self {
        self.has_exception_attribute = has;
        self
    }

    /// Restricts the interface to the given sub-symbols. Anything short of
    /// class plus metaclass makes the interface incomplete.
    pub fn with_exported_symbols(mut self, symbols: ObjCIFSymbolKind) -> Self {
        self.exported_symbols = symbols;
        self
    }

    pub fn name(&self) -> &str {
        self.container.name()
    }

    pub fn base(&self) -> &RecordBase {
        &self.container.base
    }

    pub fn ivars(&self) -> &[ObjCInstanceVariableRecord] {
        &self.container.ivars
    }

    pub fn exported_symbols(&self) -> ObjCIFSymbolKind {
        self.exported_symbols
    }

    pub fn is_complete(&self) -> bool {
        self.exported_symbols
            .contains(ObjCIFSymbolKind::CLASS | ObjCIFSymbolKind::METACLASS)
    }

    pub fn mark_exception_attribute(&mut self) {
        self.has_exception_attribute = true;
        self.exported_symbols |= ObjCIFSymbolKind::EHTYPE;
    }

    pub(crate) fn add_exported_symbols(&mut self, symbols: ObjCIFSymbolKind) {
        self.exported_symbols |= symbols;
    }

    /// Whether the EH type symbol is emitted.
    pub fn exports_ehtype(&self) -> bool {
        self.has_exception_attribute || self.exported_symbols.contains(ObjCIFSymbolKind::EHTYPE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjCCategoryRecord {
    /// The container is named after the category; anonymous categories and
    /// class extensions use an empty name.
    pub container: ObjCContainerRecord,
    pub interface_name: String,
}

impl ObjCCategoryRecord {
    pub fn new(interface_name: impl Into<String>, category_name: impl Into<String>, attributes: SymbolAttributes) -> Self {
        Self {
            container: ObjCContainerRecord::new(category_name, attributes),
            interface_name: interface_name.into(),
        }
    }

    pub fn name(&self) -> &str {
        self.container.name()
    }

    pub fn ivars(&self) -> &[ObjCInstanceVariableRecord] {
        &self.container.ivars
    }
}
