// Tue Feb 3 2026 - Alex

use crate::record::{
    Api, ApiRecord, GlobalRecord, ObjCCategoryRecord, ObjCIFSymbolKind, ObjCInstanceVariableRecord,
    ObjCInterfaceRecord, RecordBase,
};
use crate::symbol::name::{class_symbol, ehtype_symbol, metaclass_symbol};
use crate::symbol::{EncodeKind, SymbolSet};
use crate::target::Target;
use log::trace;

/// Walks records of one target and adds their linker symbols to a set.
pub struct SymbolConverter<'a> {
    symbols: &'a mut SymbolSet,
    target: Target,
    record_undefined: bool,
}

impl<'a> SymbolConverter<'a> {
    /// With `record_undefined`, records that are not exported but are
    /// external are kept as undefined symbols (flat namespace imports).
    pub fn new(symbols: &'a mut SymbolSet, target: Target, record_undefined: bool) -> Self {
        Self {
            symbols,
            target,
            record_undefined,
        }
    }

    pub fn visit_api(&mut self, api: &Api) {
        for global in api.globals() {
            self.visit_global(global);
        }
        for iface in api.interfaces() {
            self.visit_objc_interface(iface);
        }
        for category in api.categories() {
            self.visit_objc_category(category);
        }
    }

    pub fn visit_record(&mut self, record: &ApiRecord) {
        match record {
            ApiRecord::Global(global) => self.visit_global(global),
            ApiRecord::ObjCInterface(iface) => self.visit_objc_interface(iface),
            ApiRecord::ObjCCategory(category) => self.visit_objc_category(category),
            ApiRecord::ObjCInstanceVariable { container, ivar } => self.visit_ivar(container, ivar),
        }
    }

    fn should_emit(&self, base: &RecordBase) -> bool {
        base.is_exported() || (self.record_undefined && base.is_external())
    }

    fn add(&mut self, kind: EncodeKind, name: &str, base: &RecordBase) {
        trace!("encoding {} {} for {}", kind, name, self.target);
        self.symbols.add_global(kind, name, base.flags(), self.target);
    }

    pub fn visit_global(&mut self, record: &GlobalRecord) {
        if !self.should_emit(&record.base) {
            return;
        }
        self.add(EncodeKind::GlobalSymbol, record.name(), &record.base);
    }

    pub fn visit_objc_interface(&mut self, record: &ObjCInterfaceRecord) {
        let base = record.base();
        if self.should_emit(base) {
            let name = record.name();
            let present = record.exported_symbols();
            if record.is_complete() {
                self.add(EncodeKind::ObjectiveCClass, name, base);
                if record.exports_ehtype() {
                    self.add(EncodeKind::ObjectiveCClassEHType, name, base);
                }
            } else if present == ObjCIFSymbolKind::EHTYPE {
                self.add(EncodeKind::ObjectiveCClassEHType, name, base);
            } else {
                if record.exports_ehtype() {
                    self.add(EncodeKind::GlobalSymbol, &ehtype_symbol(name), base);
                }
                if present.contains(ObjCIFSymbolKind::CLASS) {
                    self.add(EncodeKind::GlobalSymbol, &class_symbol(name), base);
                }
                if present.contains(ObjCIFSymbolKind::METACLASS) {
                    self.add(EncodeKind::GlobalSymbol, &metaclass_symbol(name), base);
                }
            }
        }

        for ivar in record.ivars() {
            self.visit_ivar(record.name(), ivar);
        }
    }

    pub fn visit_objc_category(&mut self, record: &ObjCCategoryRecord) {
        for ivar in record.ivars() {
            self.visit_ivar(&record.interface_name, ivar);
        }
    }

    fn visit_ivar(&mut self, container: &str, ivar: &ObjCInstanceVariableRecord) {
        if !ivar.access_control.is_linkable() || !self.should_emit(&ivar.base) {
            return;
        }
        self.add(
            EncodeKind::ObjectiveCInstanceVariable,
            &ivar.qualified_name(container),
            &ivar.base,
        );
    }
}

/// Encodes every record of `api` into `symbols` on the API's target.
pub fn convert_api(api: &Api, symbols: &mut SymbolSet, record_undefined: bool) {
    SymbolConverter::new(symbols, *api.target(), record_undefined).visit_api(api);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{GlobalKind, ObjCAccessControl, SymbolAttributes};
    use crate::symbol::SymbolFlags;
    use crate::target::{Architecture, Platform};
    use crate::version::AvailabilityInfo;

    fn target() -> Target {
        Target::new(Architecture::X86_64, Platform::MacOS)
    }

    fn encode(api: &Api, record_undefined: bool) -> SymbolSet {
        let mut set = SymbolSet::new();
        convert_api(api, &mut set, record_undefined);
        set
    }

    #[test]
    fn test_complete_class_with_ehtype() {
        let mut api = Api::new(target());
        api.add_objc_interface("Foo", SymbolAttributes::exported())
            .has_exception_attribute = true;
        let set = encode(&api, false);
        assert!(set.find(EncodeKind::ObjectiveCClass, "Foo").is_some());
        assert!(set.find(EncodeKind::ObjectiveCClassEHType, "Foo").is_some());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_incomplete_class_emits_prefixed_globals() {
        let mut api = Api::new(target());
        api.add_record(ApiRecord::ObjCInterface(
            ObjCInterfaceRecord::new("Foo", SymbolAttributes::exported())
                .with_exported_symbols(ObjCIFSymbolKind::METACLASS | ObjCIFSymbolKind::EHTYPE),
        ));
        let set = encode(&api, false);
        let names: Vec<&str> = set.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["_OBJC_EHTYPE_$_Foo", "_OBJC_METACLASS_$_Foo"]);
        assert!(set.iter().all(|s| s.kind() == EncodeKind::GlobalSymbol));
    }

    #[test]
    fn test_ehtype_only_class_keeps_its_kind() {
        let mut api = Api::new(target());
        api.add_record(ApiRecord::ObjCInterface(
            ObjCInterfaceRecord::new("AError", SymbolAttributes::exported())
                .with_exported_symbols(ObjCIFSymbolKind::EHTYPE),
        ));
        let set = encode(&api, false);
        assert_eq!(set.len(), 1);
        assert!(set.find(EncodeKind::ObjectiveCClassEHType, "AError").is_some());
    }

    #[test]
    fn test_hidden_ivars_never_emitted() {
        for exported in [true, false] {
            let mut api = Api::new(target());
            let attrs = SymbolAttributes {
                exported,
                ..SymbolAttributes::default()
            };
            let iface = api.add_objc_interface("Foo", SymbolAttributes::exported());
            for (name, access) in [("priv", ObjCAccessControl::Private), ("pkg", ObjCAccessControl::Package)] {
                iface.container.add_ivar(ObjCInstanceVariableRecord::new(name, access, attrs));
            }
            let set = encode(&api, true);
            assert_eq!(set.iter().filter(|s| s.kind() == EncodeKind::ObjectiveCInstanceVariable).count(), 0);
        }
    }

    #[test]
    fn test_category_ivar_uses_class_name() {
        let mut api = Api::new(target());
        api.add_objc_category("Foo", "Bar", SymbolAttributes::exported())
            .container
            .add_ivar(ObjCInstanceVariableRecord::new("x", ObjCAccessControl::Public, SymbolAttributes::exported()));
        let set = encode(&api, false);
        assert!(set.find(EncodeKind::ObjectiveCInstanceVariable, "Foo.x").is_some());
    }

    #[test]
    fn test_undefined_globals_need_flat_mode() {
        let mut api = Api::new(target());
        let external = SymbolAttributes {
            external: true,
            ..SymbolAttributes::default()
        };
        api.add_global("_imported", GlobalKind::Function, external, AvailabilityInfo::default());
        api.add_global("_private", GlobalKind::Function, SymbolAttributes::default(), AvailabilityInfo::default());

        assert!(encode(&api, false).is_empty());

        let flat = encode(&api, true);
        assert_eq!(flat.len(), 1);
        let sym = flat.find(EncodeKind::GlobalSymbol, "_imported").unwrap();
        assert!(sym.flags().contains(SymbolFlags::UNDEFINED));
    }
}
