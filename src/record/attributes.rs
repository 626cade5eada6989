// Tue Feb 3 2026 - Alex

use crate::encoder;
use crate::symbol::SymbolFlags;
use crate::version::AvailabilityInfo;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Header visibility of the declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessLevel {
    #[default]
    Public,
    Private,
    Project,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Linkage {
    Internal,
    Exported,
    Reexported,
    External,
}

/// Linker-facing facts about a declaration, decided by whoever built the
/// record. Symbol flags are derived from these and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SymbolAttributes {
    pub exported: bool,
    pub weak_defined: bool,
    pub thread_local: bool,
    pub reexported: bool,
    pub external: bool,
    pub weak_referenced: bool,
    pub text: bool,
}

impl SymbolAttributes {
    pub fn exported() -> Self {
        Self {
            exported: true,
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: bool) -> Self {
        self.text = text;
        self
    }

    pub fn with_weak_defined(mut self, weak: bool) -> Self {
        self.weak_defined = weak;
        self
    }

    pub fn with_thread_local(mut self, tlv: bool) -> Self {
        self.thread_local = tlv;
        self
    }

    /// Inverse of the flag encoding for symbols read from a stub. A stub
    /// can only say exported, reexported or undefined.
    pub fn from_flags(flags: SymbolFlags) -> Self {
        let external = flags.contains(SymbolFlags::UNDEFINED);
        Self {
            exported: !external,
            weak_defined: flags.contains(SymbolFlags::WEAK_DEFINED),
            thread_local: flags.contains(SymbolFlags::THREAD_LOCAL_VALUE),
            reexported: flags.contains(SymbolFlags::REXPORTED),
            external,
            weak_referenced: flags.contains(SymbolFlags::WEAK_REFERENCED),
            text: flags.contains(SymbolFlags::TEXT),
        }
    }
}

/// State shared by every record kind.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBase {
    pub name: String,
    pub location: Option<SourceLocation>,
    pub availability: AvailabilityInfo,
    pub access: AccessLevel,
    pub attributes: SymbolAttributes,
}

impl RecordBase {
    pub fn new(name: impl Into<String>, attributes: SymbolAttributes) -> Self {
        Self {
            name: name.into(),
            location: None,
            availability: AvailabilityInfo::default(),
            access: AccessLevel::Public,
            attributes,
        }
    }

    pub fn with_availability(mut self, availability: AvailabilityInfo) -> Self {
        self.availability = availability;
        self
    }

    pub fn flags(&self) -> SymbolFlags {
        encoder::compute_flags(&self.attributes)
    }

    pub fn linkage(&self) -> Linkage {
        let attrs = &self.attributes;
        if attrs.reexported {
            Linkage::Reexported
        } else if attrs.external {
            Linkage::External
        } else if attrs.exported {
            Linkage::Exported
        } else {
            Linkage::Internal
        }
    }

    pub fn is_exported(&self) -> bool {
        self.attributes.exported
    }

    pub fn is_external(&self) -> bool {
        self.attributes.external
    }

    pub fn is_available(&self) -> bool {
        !self.availability.unavailable
    }
}
