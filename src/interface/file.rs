// Wed Feb 4 2026 - Alex

use crate::encoder::convert_api;
use crate::format::FormatError;
use crate::interface::FileType;
use crate::record::Api;
use crate::symbol::{EncodeKind, SymbolFlags, SymbolSet};
use crate::target::{ArchitectureSet, Platform, Target};
use crate::version::PackedVersion;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

static FRAMEWORK_INSTALL_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/([^/]+)\.framework/(?:Versions/[^/]+/)?([^/]+)$").expect("valid framework regex")
});

/// A library referenced by install name on a subset of targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceFileRef {
    install_name: String,
    targets: Vec<Target>,
}

impl InterfaceFileRef {
    pub fn new(install_name: impl Into<String>) -> Self {
        Self {
            install_name: install_name.into(),
            targets: Vec::new(),
        }
    }

    pub fn install_name(&self) -> &str {
        &self.install_name
    }

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
}

/// In-memory form of a text stub or dylib: everything a linker needs.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceFile {
    pub path: Option<PathBuf>,
    pub file_type: FileType,
    pub install_name: String,
    pub current_version: PackedVersion,
    pub compatibility_version: PackedVersion,
    pub swift_abi_version: u8,
    pub two_level_namespace: bool,
    pub application_extension_safe: bool,
    pub install_api: bool,
    targets: Vec<Target>,
    parent_umbrellas: Vec<(Target, String)>,
    allowable_clients: Vec<InterfaceFileRef>,
    reexported_libraries: Vec<InterfaceFileRef>,
    uuids: Vec<(Target, String)>,
    pub symbols: SymbolSet,
    /// Libraries inlined into the same stub.
    pub documents: Vec<InterfaceFile>,
}

impl Default for InterfaceFile {
    fn default() -> Self {
        Self {
            path: None,
            file_type: FileType::INVALID,
            install_name: String::new(),
            current_version: PackedVersion::new(1, 0, 0),
            compatibility_version: PackedVersion::new(1, 0, 0),
            swift_abi_version: 0,
            two_level_namespace: true,
            application_extension_safe: true,
            install_api: false,
            targets: Vec::new(),
            parent_umbrellas: Vec::new(),
            allowable_clients: Vec::new(),
            reexported_libraries: Vec::new(),
            uuids: Vec::new(),
            symbols: SymbolSet::new(),
            documents: Vec::new(),
        }
    }
}

impl InterfaceFile {
    pub fn new(install_name: impl Into<String>) -> Self {
        Self {
            install_name: install_name.into(),
            ..Self::default()
        }
    }

    /// Targets in the order they were first added.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn add_target(&mut self, target: Target) {
        match self.targets.iter_mut().find(|t| **t == target) {
            Some(existing) => {
                if existing.min_deployment.is_empty() {
                    existing.min_deployment = target.min_deployment;
                }
            }
            None => self.targets.push(target),
        }
    }

    pub fn architectures(&self) -> ArchitectureSet {
        self.targets.iter().map(|t| t.arch).collect()
    }

    /// Distinct platforms, in target order.
    pub fn platforms(&self) -> Vec<Platform> {
        let mut platforms = Vec::new();
        for target in &self.targets {
            if !platforms.contains(&target.platform) {
                platforms.push(target.platform);
            }
        }
        platforms
    }

    pub fn parent_umbrellas(&self) -> &[(Target, String)] {
        &self.parent_umbrellas
    }

    pub fn add_parent_umbrella(&mut self, target: Target, umbrella: impl Into<String>) {
        let umbrella = umbrella.into();
        match self.parent_umbrellas.iter_mut().find(|(t, _)| *t == target) {
            Some(entry) => entry.1 = umbrella,
            None => self.parent_umbrellas.push((target, umbrella)),
        }
    }

    pub fn allowable_clients(&self) -> &[InterfaceFileRef] {
        &self.allowable_clients
    }

    pub fn add_allowable_client(&mut self, name: &str, target: Target) {
        add_ref(&mut self.allowable_clients, name, target);
    }

    pub fn reexported_libraries(&self) -> &[InterfaceFileRef] {
        &self.reexported_libraries
    }

    pub fn add_reexported_library(&mut self, name: &str, target: Target) {
        add_ref(&mut self.reexported_libraries, name, target);
    }

    pub fn uuids(&self) -> &[(Target, String)] {
        &self.uuids
    }

    pub fn add_uuid(&mut self, target: Target, uuid: impl Into<String>) {
        let uuid = uuid.into();
        match self.uuids.iter_mut().find(|(t, _)| *t == target) {
            Some(entry) => entry.1 = uuid,
            None => self.uuids.push((target, uuid)),
        }
    }

    pub fn add_symbol(&mut self, kind: EncodeKind, name: &str, flags: SymbolFlags, targets: &[Target]) {
        self.symbols.add_global_for_targets(kind, name, flags, targets);
    }

    pub fn add_document(&mut self, document: InterfaceFile) {
        self.documents.push(document);
    }

    /// Framework name derived from the install name, if it points into a
    /// `.framework` bundle.
    pub fn framework_name(&self) -> Option<&str> {
        FRAMEWORK_INSTALL_NAME
            .captures(&self.install_name)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// Drops everything that belongs to architectures outside `archs`,
    /// including in inlined documents.
    pub fn retain_architectures(&mut self, archs: ArchitectureSet) {
        let keep = |t: &Target| archs.contains(t.arch);
        self.targets.retain(keep);
        self.parent_umbrellas.retain(|(t, _)| keep(t));
        self.uuids.retain(|(t, _)| keep(t));
        for list in [&mut self.allowable_clients, &mut self.reexported_libraries] {
            for library in list.iter_mut() {
                library.targets.retain(keep);
            }
            list.retain(|l| !l.targets.is_empty());
        }
        self.symbols.retain_targets(keep);
        for document in &mut self.documents {
            document.retain_architectures(archs);
        }
    }

    /// Merges per-target APIs into one stub. Header fields come from the
    /// first API; targets, per-target metadata and symbols accumulate.
    pub fn from_apis(apis: &[Api], record_undefined: bool) -> Result<InterfaceFile, FormatError> {
        let first = apis
            .first()
            .ok_or_else(|| FormatError::InvalidArgument("no APIs to merge".to_string()))?;

        let info = &first.binary;
        let mut file = InterfaceFile::new(info.install_name.clone());
        file.file_type = info.file_type;
        file.current_version = info.current_version;
        file.compatibility_version = info.compatibility_version;
        file.swift_abi_version = info.swift_abi_version;
        file.two_level_namespace = info.two_level_namespace;
        file.application_extension_safe = info.application_extension_safe;
        file.install_api = info.install_api;

        for api in apis {
            let target = *api.target();
            let info = &api.binary;
            if info.install_name != file.install_name {
                return Err(FormatError::InvalidArgument(format!(
                    "install name mismatch: '{}' vs '{}'",
                    info.install_name, file.install_name
                )));
            }

            file.add_target(target);
            if let Some(umbrella) = &info.parent_umbrella {
                file.add_parent_umbrella(target, umbrella.clone());
            }
            for client in &info.allowable_clients {
                file.add_allowable_client(client, target);
            }
            for library in &info.reexported_libraries {
                file.add_reexported_library(library, target);
            }
            if let Some(uuid) = &info.uuid {
                file.add_uuid(target, uuid.clone());
            }
            convert_api(api, &mut file.symbols, record_undefined);
        }

        Ok(file)
    }
}

fn add_ref(list: &mut Vec<InterfaceFileRef>, name: &str, target: Target) {
    match list.iter_mut().find(|r| r.install_name == name) {
        Some(existing) => existing.add_target(target),
        None => {
            let mut library = InterfaceFileRef::new(name);
            library.add_target(target);
            list.push(library);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BinaryInfo, GlobalRecord, ApiRecord};
    use crate::target::Architecture;

    fn macos(arch: Architecture) -> Target {
        Target::new(arch, Platform::MacOS)
    }

    #[test]
    fn test_targets_keep_first_seen_order() {
        let mut file = InterfaceFile::new("/usr/lib/libfoo.dylib");
        file.add_target(macos(Architecture::X86_64));
        file.add_target(macos(Architecture::Arm64));
        file.add_target(macos(Architecture::X86_64).with_min_deployment(PackedVersion::new(10, 15, 0)));
        assert_eq!(file.targets(), &[macos(Architecture::X86_64), macos(Architecture::Arm64)]);
        assert_eq!(file.targets()[0].min_deployment, PackedVersion::new(10, 15, 0));
    }

    #[test]
    fn test_framework_name() {
        let file = InterfaceFile::new("/System/Library/Frameworks/Foundation.framework/Versions/C/Foundation");
        assert_eq!(file.framework_name(), Some("Foundation"));
        let file = InterfaceFile::new("/System/Library/Frameworks/UIKit.framework/UIKit");
        assert_eq!(file.framework_name(), Some("UIKit"));
        assert_eq!(InterfaceFile::new("/usr/lib/libz.dylib").framework_name(), None);
    }

    #[test]
    fn test_retain_architectures() {
        let mut file = InterfaceFile::new("/usr/lib/libfoo.dylib");
        let intel = macos(Architecture::X86_64);
        let arm = macos(Architecture::Arm64);
        file.add_target(intel);
        file.add_target(arm);
        file.add_reexported_library("/usr/lib/libintel.dylib", intel);
        file.add_symbol(EncodeKind::GlobalSymbol, "_intel_only", SymbolFlags::DATA, &[intel]);
        file.add_symbol(EncodeKind::GlobalSymbol, "_shared", SymbolFlags::DATA, &[intel, arm]);

        file.retain_architectures(Architecture::Arm64.into());
        assert_eq!(file.targets(), &[arm]);
        assert!(file.reexported_libraries().is_empty());
        assert_eq!(file.symbols.len(), 1);
    }

    #[test]
    fn test_from_apis_merges_targets() {
        let info = BinaryInfo {
            install_name: "/usr/lib/libfoo.dylib".to_string(),
            parent_umbrella: Some("System".to_string()),
            ..BinaryInfo::default()
        };
        let mut apis = Vec::new();
        for arch in [Architecture::X86_64, Architecture::Arm64] {
            let mut api = Api::new(macos(arch)).with_binary_info(info.clone());
            api.add_record(ApiRecord::Global(GlobalRecord::function("_foo")));
            apis.push(api);
        }

        let file = InterfaceFile::from_apis(&apis, false).unwrap();
        assert_eq!(file.targets().len(), 2);
        assert_eq!(file.parent_umbrellas().len(), 2);
        let foo = file.symbols.find(EncodeKind::GlobalSymbol, "_foo").unwrap();
        assert_eq!(foo.targets().len(), 2);
        assert!(foo.is_text());
    }

    #[test]
    fn test_from_apis_rejects_empty_input() {
        assert!(matches!(
            InterfaceFile::from_apis(&[], false),
            Err(FormatError::InvalidArgument(_))
        ));
    }
}
