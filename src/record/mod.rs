// Tue Feb 3 2026 - Alex

pub mod attributes;
pub mod global;
pub mod objc;
pub mod api;

pub use attributes::{AccessLevel, Linkage, RecordBase, SourceLocation, SymbolAttributes};
pub use global::{GlobalKind, GlobalRecord};
pub use objc::{
    ObjCAccessControl, ObjCCategoryRecord, ObjCContainerRecord, ObjCIFSymbolKind,
    ObjCInstanceVariableRecord, ObjCInterfaceRecord,
};
pub use api::{Api, BinaryInfo};

/// One declaration handed over by a header scanner or rebuilt from a stub.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRecord {
    Global(GlobalRecord),
    ObjCInterface(ObjCInterfaceRecord),
    ObjCCategory(ObjCCategoryRecord),
    /// An instance variable together with the name of the class or
    /// category interface that declares it.
    ObjCInstanceVariable {
        container: String,
        ivar: ObjCInstanceVariableRecord,
    },
}

impl ApiRecord {
    pub fn base(&self) -> &RecordBase {
        match self {
            ApiRecord::Global(record) => &record.base,
            ApiRecord::ObjCInterface(record) => &record.container.base,
            ApiRecord::ObjCCategory(record) => &record.container.base,
            ApiRecord::ObjCInstanceVariable { ivar, .. } => &ivar.base,
        }
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }
}
