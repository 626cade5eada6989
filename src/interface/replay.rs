// Wed Feb 4 2026 - Alex

//! Rebuilds per-target record models from the flat symbol lists stubs
//! carry.

use crate::interface::InterfaceFile;
use crate::record::{
    Api, ApiRecord, BinaryInfo, GlobalKind, ObjCAccessControl, ObjCIFSymbolKind,
    ObjCInstanceVariableRecord, ObjCInterfaceRecord, SymbolAttributes,
};
use crate::symbol::{EncodeKind, Symbol};
use crate::target::Target;
use crate::version::AvailabilityInfo;
use log::{trace, warn};

impl InterfaceFile {
    /// One API per target, symbols replayed in sorted order.
    pub fn to_apis(&self) -> Vec<Api> {
        self.targets()
            .iter()
            .map(|target| {
                let mut api = Api::new(*target).with_binary_info(self.binary_info_for(target));
                replay_symbols(&mut api, self.symbols.iter().filter(|s| s.has_target(target)));
                api
            })
            .collect()
    }

    pub fn binary_info_for(&self, target: &Target) -> BinaryInfo {
        BinaryInfo {
            file_type: self.file_type,
            install_name: self.install_name.clone(),
            current_version: self.current_version,
            compatibility_version: self.compatibility_version,
            swift_abi_version: self.swift_abi_version,
            two_level_namespace: self.two_level_namespace,
            application_extension_safe: self.application_extension_safe,
            install_api: self.install_api,
            parent_umbrella: self
                .parent_umbrellas()
                .iter()
                .find(|(t, _)| t == target)
                .map(|(_, u)| u.clone()),
            allowable_clients: self
                .allowable_clients()
                .iter()
                .filter(|c| c.has_target(target))
                .map(|c| c.install_name().to_string())
                .collect(),
            reexported_libraries: self
                .reexported_libraries()
                .iter()
                .filter(|l| l.has_target(target))
                .map(|l| l.install_name().to_string())
                .collect(),
            uuid: self
                .uuids()
                .iter()
                .find(|(t, _)| t == target)
                .map(|(_, u)| u.clone()),
        }
    }
}

/// Replays `symbols` into `api`. Sorting puts every class ahead of the
/// instance variables, so an ivar finds its class if the stub has one.
pub fn replay_symbols<'a, I>(api: &mut Api, symbols: I)
where
    I: IntoIterator<Item = &'a Symbol>,
{
    let mut symbols: Vec<&Symbol> = symbols.into_iter().collect();
    symbols.sort();

    for symbol in symbols {
        let attributes = SymbolAttributes::from_flags(symbol.flags());
        let availability = AvailabilityInfo::default();
        trace!("replaying {} on {}", symbol, api.target());

        match symbol.kind() {
            EncodeKind::GlobalSymbol => {
                let kind = if attributes.text {
                    GlobalKind::Function
                } else {
                    GlobalKind::Variable
                };
                api.add_global(symbol.name(), kind, attributes, availability);
            }
            EncodeKind::ObjectiveCClass => {
                let iface = api.add_objc_interface(symbol.name(), attributes);
                iface.container.base.attributes = attributes;
            }
            EncodeKind::ObjectiveCClassEHType => {
                if api.find_interface(symbol.name()).is_some() {
                    api.add_objc_interface(symbol.name(), attributes)
                        .mark_exception_attribute();
                } else {
                    // No class symbol on this target: the interface only
                    // carries its EH type.
                    api.add_record(ApiRecord::ObjCInterface(
                        ObjCInterfaceRecord::new(symbol.name(), attributes)
                            .with_exported_symbols(ObjCIFSymbolKind::EHTYPE)
                            .with_exception_attribute(true),
                    ));
                }
            }
            EncodeKind::ObjectiveCInstanceVariable => {
                let Some((container, ivar_name)) = symbol.name().split_once('.') else {
                    warn!("ignoring instance variable '{}' without a container", symbol.name());
                    continue;
                };
                let ivar = ObjCInstanceVariableRecord::new(ivar_name, ObjCAccessControl::Public, attributes);
                match api.find_container_mut(container) {
                    Some(owner) => {
                        owner.add_ivar(ivar);
                    }
                    None => {
                        trace!("no class '{}' for ivar '{}', synthesizing a category", container, ivar_name);
                        api.add_objc_category(container, "", attributes)
                            .container
                            .add_ivar(ivar);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{SymbolFlags, SymbolSet};
    use crate::target::{Architecture, Platform};

    fn target() -> Target {
        Target::new(Architecture::Arm64, Platform::MacOS)
    }

    fn symbols(list: &[(EncodeKind, &str)]) -> SymbolSet {
        let mut set = SymbolSet::new();
        for (kind, name) in list {
            set.add_global(*kind, name, SymbolFlags::DATA, target());
        }
        set
    }

    #[test]
    fn test_ivar_attributed_to_class() {
        // listed out of order on purpose; replay sorts
        let set = symbols(&[
            (EncodeKind::ObjectiveCInstanceVariable, "Foo.bar"),
            (EncodeKind::ObjectiveCClass, "Foo"),
        ]);
        let mut api = Api::new(target());
        replay_symbols(&mut api, set.iter());

        let foo = api.find_interface("Foo").unwrap();
        assert_eq!(foo.ivars().len(), 1);
        assert_eq!(foo.ivars()[0].name(), "bar");
        assert_eq!(api.categories().count(), 0);
    }

    #[test]
    fn test_orphan_ivar_synthesizes_category() {
        let set = symbols(&[(EncodeKind::ObjectiveCInstanceVariable, "Baz.qux")]);
        let mut api = Api::new(target());
        replay_symbols(&mut api, set.iter());

        assert!(api.find_interface("Baz").is_none());
        let category = api.find_category("Baz", "").unwrap();
        assert_eq!(category.interface_name, "Baz");
        assert_eq!(category.ivars().len(), 1);
        assert_eq!(category.ivars()[0].name(), "qux");
    }

    #[test]
    fn test_ivar_name_splits_on_first_dot() {
        let set = symbols(&[
            (EncodeKind::ObjectiveCClass, "Foo"),
            (EncodeKind::ObjectiveCInstanceVariable, "Foo.a.b"),
        ]);
        let mut api = Api::new(target());
        replay_symbols(&mut api, set.iter());
        assert_eq!(api.find_interface("Foo").unwrap().ivars()[0].name(), "a.b");
    }

    #[test]
    fn test_linkage_classification() {
        let mut set = SymbolSet::new();
        set.add_global(EncodeKind::GlobalSymbol, "_re", SymbolFlags::DATA | SymbolFlags::REXPORTED, target());
        set.add_global(EncodeKind::GlobalSymbol, "_undef", SymbolFlags::DATA | SymbolFlags::UNDEFINED, target());
        set.add_global(EncodeKind::GlobalSymbol, "_mine", SymbolFlags::TEXT, target());
        let mut api = Api::new(target());
        replay_symbols(&mut api, set.iter());

        use crate::record::Linkage;
        assert_eq!(api.find_global("_re").unwrap().base.linkage(), Linkage::Reexported);
        assert_eq!(api.find_global("_undef").unwrap().base.linkage(), Linkage::External);
        let mine = api.find_global("_mine").unwrap();
        assert_eq!(mine.base.linkage(), Linkage::Exported);
        assert_eq!(mine.kind, GlobalKind::Function);
    }

    #[test]
    fn test_round_trip_through_apis() {
        let intel = Target::new(Architecture::X86_64, Platform::MacOS);
        let arm = target();
        let mut file = InterfaceFile::new("/usr/lib/libobjc-user.dylib");
        file.add_target(intel);
        file.add_target(arm);
        file.add_symbol(EncodeKind::GlobalSymbol, "_shared", SymbolFlags::TEXT, &[intel, arm]);
        file.add_symbol(EncodeKind::GlobalSymbol, "_imported", SymbolFlags::DATA | SymbolFlags::UNDEFINED, &[arm]);
        file.add_symbol(EncodeKind::ObjectiveCClass, "Foo", SymbolFlags::DATA, &[intel, arm]);
        file.add_symbol(EncodeKind::ObjectiveCClassEHType, "Foo", SymbolFlags::DATA, &[arm]);
        file.add_symbol(EncodeKind::ObjectiveCInstanceVariable, "Foo.ivar", SymbolFlags::DATA, &[intel, arm]);

        let apis = file.to_apis();
        assert_eq!(apis.len(), 2);

        let rebuilt = InterfaceFile::from_apis(&apis, true).unwrap();
        assert_eq!(rebuilt.targets(), file.targets());
        assert_eq!(rebuilt.symbols.sorted(), file.symbols.sorted());
    }

    #[test]
    fn test_ehtype_only_round_trip_through_apis() {
        let arm = target();
        let mut file = InterfaceFile::new("/usr/lib/liberrors.dylib");
        file.add_target(arm);
        file.add_symbol(EncodeKind::ObjectiveCClassEHType, "AError", SymbolFlags::DATA, &[arm]);

        let apis = file.to_apis();
        let iface = apis[0].find_interface("AError").unwrap();
        assert!(!iface.is_complete());
        assert_eq!(iface.exported_symbols(), ObjCIFSymbolKind::EHTYPE);

        let rebuilt = InterfaceFile::from_apis(&apis, false).unwrap();
        assert_eq!(rebuilt.symbols.sorted(), file.symbols.sorted());
        assert!(rebuilt.symbols.find(EncodeKind::ObjectiveCClass, "AError").is_none());
    }
}
