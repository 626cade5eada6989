// Tue Feb 3 2026 - Alex

use crate::record::{RecordBase, SymbolAttributes};
use crate::version::AvailabilityInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlobalKind {
    #[default]
    Unknown,
    Function,
    Variable,
}

/// A C-level global: function or variable, named by its linker name.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalRecord {
    pub base: RecordBase,
    pub kind: GlobalKind,
}

impl GlobalRecord {
    pub fn new(name: impl Into<String>, kind: GlobalKind, attributes: SymbolAttributes) -> Self {
        Self {
            base: RecordBase::new(name, attributes),
            kind,
        }
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self::new(name, GlobalKind::Function, SymbolAttributes::exported().with_text(true))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(name, GlobalKind::Variable, SymbolAttributes::exported())
    }

    pub fn with_availability(mut self, availability: AvailabilityInfo) -> Self {
        self.base.availability = availability;
        self
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }
}
