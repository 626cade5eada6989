// Tue Feb 10 2026 - Alex

//! Flat symbol lists for the linker's re-export files.

use crate::record::{
    Api, ApiRecord, GlobalRecord, ObjCCategoryRecord, ObjCIFSymbolKind, ObjCInstanceVariableRecord,
    ObjCInterfaceRecord, RecordBase,
};
use crate::symbol::name::{class_symbol, ehtype_symbol, ivar_symbol, metaclass_symbol, objc1_class_symbol};
use crate::target::Target;
use log::trace;
use std::io::{self, Write};

/// Collects the exported linker names of one target in visitation order.
pub struct ReexportFileWriter {
    target: Target,
    symbols: Vec<String>,
}

impl ReexportFileWriter {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            symbols: Vec::new(),
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
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

    fn is_listed(base: &RecordBase) -> bool {
        base.is_exported() && base.is_available()
    }

    fn push(&mut self, name: String) {
        trace!("reexport {} for {}", name, self.target);
        self.symbols.push(name);
    }

    fn visit_global(&mut self, record: &GlobalRecord) {
        if Self::is_listed(&record.base) {
            self.push(record.name().to_string());
        }
    }

    fn visit_objc_interface(&mut self, record: &ObjCInterfaceRecord) {
        if !Self::is_listed(record.base()) {
            return;
        }
        let name = record.name();
        let present = record.exported_symbols();

        if self.target.uses_fragile_objc_abi() {
            if present.contains(ObjCIFSymbolKind::CLASS) {
                self.push(objc1_class_symbol(name));
            }
        } else {
            if present.contains(ObjCIFSymbolKind::CLASS) {
                self.push(class_symbol(name));
            }
            if present.contains(ObjCIFSymbolKind::METACLASS) {
                self.push(metaclass_symbol(name));
            }
        }
        if record.exports_ehtype() {
            self.push(ehtype_symbol(name));
        }
        for ivar in record.ivars() {
            self.visit_ivar(name, ivar);
        }
    }

    fn visit_objc_category(&mut self, record: &ObjCCategoryRecord) {
        if !record.container.base.is_available() {
            return;
        }
        for ivar in record.ivars() {
            self.visit_ivar(&record.interface_name, ivar);
        }
    }

    fn visit_ivar(&mut self, container: &str, ivar: &ObjCInstanceVariableRecord) {
        if !ivar.is_linkable() || !ivar.base.is_available() {
            return;
        }
        self.push(ivar_symbol(&ivar.qualified_name(container)));
    }

    pub fn write_to_stream(&self, out: &mut dyn Write) -> io::Result<()> {
        for symbol in &self.symbols {
            writeln!(out, "{}", symbol)?;
        }
        Ok(())
    }
}

/// Lists the exported names of `api` on its own target.
pub fn reexport_symbols(api: &Api) -> ReexportFileWriter {
    let mut writer = ReexportFileWriter::new(*api.target());
    writer.visit_api(api);
    writer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{GlobalKind, ObjCAccessControl, SymbolAttributes};
    use crate::target::{Architecture, Platform};
    use crate::version::AvailabilityInfo;

    fn api_for(arch: Architecture) -> Api {
        let mut api = Api::new(Target::new(arch, Platform::MacOS));
        api.add_global("_zeta", GlobalKind::Function, SymbolAttributes::exported(), AvailabilityInfo::default());
        api.add_global("_alpha", GlobalKind::Variable, SymbolAttributes::exported(), AvailabilityInfo::default());
        api.add_global("_hidden", GlobalKind::Function, SymbolAttributes::default(), AvailabilityInfo::default());

        let gone = AvailabilityInfo {
            unavailable: true,
            ..Default::default()
        };
        api.add_global("_gone", GlobalKind::Function, SymbolAttributes::exported(), gone);

        let iface = api.add_objc_interface("Foo", SymbolAttributes::exported());
        iface.mark_exception_attribute();
        for (name, access) in [
            ("_pub", ObjCAccessControl::Public),
            ("_priv", ObjCAccessControl::Private),
            ("_pkg", ObjCAccessControl::Package),
            ("_prot", ObjCAccessControl::Protected),
        ] {
            iface
                .container
                .add_ivar(ObjCInstanceVariableRecord::new(name, access, SymbolAttributes::exported()));
        }
        api
    }

    #[test]
    fn test_modern_abi_listing() {
        let writer = reexport_symbols(&api_for(Architecture::X86_64));
        assert_eq!(
            writer.symbols(),
            [
                "_zeta",
                "_alpha",
                "_OBJC_CLASS_$_Foo",
                "_OBJC_METACLASS_$_Foo",
                "_OBJC_EHTYPE_$_Foo",
                "_OBJC_IVAR_$_Foo._pub",
                "_OBJC_IVAR_$_Foo._prot",
            ]
        );
    }

    #[test]
    fn test_fragile_abi_listing() {
        let writer = reexport_symbols(&api_for(Architecture::I386));
        assert_eq!(
            writer.symbols(),
            [
                "_zeta",
                "_alpha",
                ".objc_class_name_Foo",
                "_OBJC_EHTYPE_$_Foo",
                "_OBJC_IVAR_$_Foo._pub",
                "_OBJC_IVAR_$_Foo._prot",
            ]
        );
    }

    #[test]
    fn test_write_to_stream() {
        let mut writer = ReexportFileWriter::new(Target::new(Architecture::Arm64, Platform::IOS));
        writer.visit_record(&ApiRecord::Global(GlobalRecord::function("_b")));
        writer.visit_record(&ApiRecord::Global(GlobalRecord::function("_a")));
        writer.visit_record(&ApiRecord::ObjCInstanceVariable {
            container: "Bar".to_string(),
            ivar: ObjCInstanceVariableRecord::new("_x", ObjCAccessControl::Package, SymbolAttributes::exported()),
        });

        let mut out = Vec::new();
        writer.write_to_stream(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "_b\n_a\n");
    }
}
