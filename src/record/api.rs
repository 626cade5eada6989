// Tue Feb 3 2026 - Alex

use crate::interface::FileType;
use crate::record::{
    ApiRecord, GlobalKind, GlobalRecord, ObjCCategoryRecord, ObjCContainerRecord,
    ObjCInterfaceRecord, SymbolAttributes,
};
use crate::target::Target;
use crate::version::{AvailabilityInfo, PackedVersion};
use indexmap::IndexMap;

/// Library-level facts that accompany the records of one target.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryInfo {
    pub file_type: FileType,
    pub install_name: String,
    pub current_version: PackedVersion,
    pub compatibility_version: PackedVersion,
    pub swift_abi_version: u8,
    pub two_level_namespace: bool,
    pub application_extension_safe: bool,
    pub install_api: bool,
    pub parent_umbrella: Option<String>,
    pub allowable_clients: Vec<String>,
    pub reexported_libraries: Vec<String>,
    pub uuid: Option<String>,
}

impl Default for BinaryInfo {
    fn default() -> Self {
        Self {
            file_type: FileType::INVALID,
            install_name: String::new(),
            current_version: PackedVersion::new(1, 0, 0),
            compatibility_version: PackedVersion::new(1, 0, 0),
            swift_abi_version: 0,
            two_level_namespace: true,
            application_extension_safe: true,
            install_api: false,
            parent_umbrella: None,
            allowable_clients: Vec::new(),
            reexported_libraries: Vec::new(),
            uuid: None,
        }
    }
}

/// The API surface of one library on one target.
#[derive(Debug, Clone, PartialEq)]
pub struct Api {
    target: Target,
    pub binary: BinaryInfo,
    globals: IndexMap<String, GlobalRecord>,
    interfaces: IndexMap<String, ObjCInterfaceRecord>,
    categories: IndexMap<(String, String), ObjCCategoryRecord>,
}

impl Api {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            binary: BinaryInfo::default(),
            globals: IndexMap::new(),
            interfaces: IndexMap::new(),
            categories: IndexMap::new(),
        }
    }

    pub fn with_binary_info(mut self, binary: BinaryInfo) -> Self {
        self.binary = binary;
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn add_global(
        &mut self,
        name: &str,
        kind: GlobalKind,
        attributes: SymbolAttributes,
        availability: AvailabilityInfo,
    ) -> &mut GlobalRecord {
        let record = self
            .globals
            .entry(name.to_string())
            .or_insert_with(|| GlobalRecord::new(name, kind, attributes).with_availability(availability));
        record.base.attributes = attributes;
        record.base.availability.merge(&availability);
        if record.kind == GlobalKind::Unknown {
            record.kind = kind;
        }
        record
    }

    /// Returns the class named `name`, creating a complete, exported one
    /// if it is not known yet.
    pub fn add_objc_interface(&mut self, name: &str, attributes: SymbolAttributes) -> &mut ObjCInterfaceRecord {
        self.interfaces
            .entry(name.to_string())
            .or_insert_with(|| ObjCInterfaceRecord::new(name, attributes))
    }

    pub fn add_objc_category(
        &mut self,
        interface: &str,
        category: &str,
        attributes: SymbolAttributes,
    ) -> &mut ObjCCategoryRecord {
        if let Some(iface) = self.interfaces.get_mut(interface) {
            if !iface.categories.iter().any(|c| c == category) {
                iface.categories.push(category.to_string());
            }
        }
        self.categories
            .entry((interface.to_string(), category.to_string()))
            .or_insert_with(|| ObjCCategoryRecord::new(interface, category, attributes))
    }

    /// Ingests a record, merging with what is already known by name.
    pub fn add_record(&mut self, record: ApiRecord) {
        match record {
            ApiRecord::Global(global) => {
                let kind = global.kind;
                let location = global.base.location.clone();
                let entry = self.add_global(
                    &global.base.name,
                    kind,
                    global.base.attributes,
                    global.base.availability,
                );
                entry.base.access = global.base.access;
                if entry.base.location.is_none() {
                    entry.base.location = location;
                }
            }
            ApiRecord::ObjCInterface(iface) => {
                let name = iface.name().to_string();
                match self.interfaces.get_mut(&name) {
                    Some(existing) => {
                        existing.container.base.availability.merge(&iface.base().availability);
                        existing.container.base.attributes = iface.base().attributes;
                        existing.has_exception_attribute |= iface.has_exception_attribute;
                        existing.add_exported_symbols(iface.exported_symbols());
                        if existing.super_class.is_none() {
                            existing.super_class = iface.super_class.clone();
                        }
                        for ivar in iface.container.ivars {
                            existing.container.add_ivar(ivar);
                        }
                    }
                    None => {
                        let categories: Vec<String> = self
                            .categories
                            .keys()
                            .filter(|(owner, _)| *owner == name)
                            .map(|(_, category)| category.clone())
                            .collect();
                        let mut iface = iface;
                        for category in categories {
                            if !iface.categories.contains(&category) {
                                iface.categories.push(category);
                            }
                        }
                        self.interfaces.insert(name, iface);
                    }
                }
            }
            ApiRecord::ObjCCategory(category) => {
                let attributes = category.container.base.attributes;
                let entry = self.add_objc_category(&category.interface_name, category.name(), attributes);
                entry.container.base.availability.merge(&category.container.base.availability);
                for ivar in category.container.ivars {
                    entry.container.add_ivar(ivar);
                }
            }
            ApiRecord::ObjCInstanceVariable { container, ivar } => match self.find_container_mut(&container) {
                Some(owner) => {
                    owner.add_ivar(ivar);
                }
                None => {
                    let attributes = ivar.base.attributes;
                    self.add_objc_category(&container, "", attributes)
                        .container
                        .add_ivar(ivar);
                }
            },
        }
    }

    /// The class named `name`, or failing that the first category
    /// extending a class of that name.
    pub fn find_container_mut(&mut self, name: &str) -> Option<&mut ObjCContainerRecord> {
        if let Some(iface) = self.interfaces.get_mut(name) {
            return Some(&mut iface.container);
        }
        self.categories
            .iter_mut()
            .find(|((owner, _), _)| owner == name)
            .map(|(_, category)| &mut category.container)
    }

    pub fn find_global(&self, name: &str) -> Option<&GlobalRecord> {
        self.globals.get(name)
    }

    pub fn find_interface(&self, name: &str) -> Option<&ObjCInterfaceRecord> {
        self.interfaces.get(name)
    }

    pub fn find_category(&self, interface: &str, category: &str) -> Option<&ObjCCategoryRecord> {
        self.categories.get(&(interface.to_string(), category.to_string()))
    }

    pub fn globals(&self) -> impl Iterator<Item = &GlobalRecord> {
        self.globals.values()
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &ObjCInterfaceRecord> {
        self.interfaces.values()
    }

    pub fn categories(&self) -> impl Iterator<Item = &ObjCCategoryRecord> {
        self.categories.values()
    }

    pub fn record_count(&self) -> usize {
        self.globals.len() + self.interfaces.len() + self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}
