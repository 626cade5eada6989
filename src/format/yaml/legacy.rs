// Thu Feb 5 2026 - Alex

//! v1, v2 and v3 stubs: one platform per document, symbols grouped by
//! architecture.

use super::emit::YamlEmitter;
use super::{
    bool_flags, buffer_file_type, is_default_version, load_documents, parse_bool_flags,
    parse_version, YamlDocument, TAG_V2, TAG_V3,
};
use crate::format::sections::{ObjCNaming, SymbolBuckets};
use crate::format::{finish_read, FileMagic, FormatError, MemoryBuffer, ReadFlags, Reader, Writer};
use crate::interface::{FileType, InterfaceFile};
use crate::symbol::SymbolFlags;
use crate::target::{Architecture, ArchitectureSet, Platform, Target};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Write;

const LEGACY_TYPES: FileType = FileType::TBD_V1.union(FileType::TBD_V2).union(FileType::TBD_V3);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct LegacyStub {
    archs: Vec<String>,
    #[serde(default)]
    uuids: Vec<String>,
    platform: String,
    #[serde(default)]
    flags: Vec<String>,
    install_name: String,
    current_version: Option<String>,
    compatibility_version: Option<String>,
    swift_version: Option<String>,
    swift_abi_version: Option<String>,
    #[allow(dead_code)]
    objc_constraint: Option<String>,
    parent_umbrella: Option<String>,
    #[serde(default)]
    exports: Vec<ExportSection>,
    #[serde(default)]
    undefineds: Vec<UndefinedSection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ExportSection {
    archs: Vec<String>,
    #[serde(default, alias = "allowed-clients")]
    allowable_clients: Vec<String>,
    #[serde(default)]
    re_exports: Vec<String>,
    #[serde(default)]
    symbols: Vec<String>,
    #[serde(default)]
    objc_classes: Vec<String>,
    #[serde(default)]
    objc_eh_types: Vec<String>,
    #[serde(default)]
    objc_ivars: Vec<String>,
    #[serde(default)]
    weak_def_symbols: Vec<String>,
    #[serde(default)]
    thread_local_symbols: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct UndefinedSection {
    archs: Vec<String>,
    #[serde(default)]
    symbols: Vec<String>,
    #[serde(default)]
    objc_classes: Vec<String>,
    #[serde(default)]
    objc_eh_types: Vec<String>,
    #[serde(default)]
    objc_ivars: Vec<String>,
    #[serde(default)]
    weak_ref_symbols: Vec<String>,
}

/// Reads and writes the three pre-target generations.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextStubLegacy;

impl TextStubLegacy {
    pub fn new() -> Self {
        Self
    }
}

fn naming_for(file_type: FileType) -> ObjCNaming {
    if file_type == FileType::TBD_V3 {
        ObjCNaming::Plain
    } else {
        ObjCNaming::Decorated
    }
}

/// Swift ABI versions before 4 were spelled as language versions.
fn parse_swift_version(value: &str) -> Result<u8, FormatError> {
    match value {
        "1.0" => Ok(1),
        "1.1" => Ok(2),
        "2.0" => Ok(3),
        "3.0" => Ok(4),
        other => other
            .parse()
            .map_err(|_| FormatError::malformed(format!("invalid swift version '{}'", other))),
    }
}

fn format_swift_version(version: u8) -> String {
    match version {
        1 => "1.0".to_string(),
        2 => "1.1".to_string(),
        3 => "2.0".to_string(),
        4 => "3.0".to_string(),
        other => other.to_string(),
    }
}

fn parse_archs(names: &[String]) -> Result<ArchitectureSet, FormatError> {
    names
        .iter()
        .map(|n| n.parse::<Architecture>().map_err(FormatError::from))
        .collect()
}

fn targets_for(file: &InterfaceFile, archs: ArchitectureSet) -> Vec<Target> {
    file.targets()
        .iter()
        .filter(|t| archs.contains(t.arch))
        .copied()
        .collect()
}

fn parse_document(doc: &YamlDocument, file_type: FileType) -> Result<InterfaceFile, FormatError> {
    let stub: LegacyStub = serde_yaml::from_str(&doc.body)?;
    let mut file = InterfaceFile::new(stub.install_name);
    file.file_type = file_type;

    for name in &stub.archs {
        let arch: Architecture = name.parse()?;
        for platform in Platform::from_legacy_name(&stub.platform, arch)? {
            file.add_target(Target::new(arch, platform));
        }
    }
    if file.targets().is_empty() {
        return Err(FormatError::malformed("no architectures"));
    }
    if stub.platform == "zippered" && file_type != FileType::TBD_V3 {
        return Err(FormatError::malformed(format!("zippered platform in a {} stub", file_type)));
    }

    file.current_version = parse_version(stub.current_version.as_deref(), "current-version")?;
    file.compatibility_version = parse_version(stub.compatibility_version.as_deref(), "compatibility-version")?;
    if let Some(swift) = stub.swift_abi_version.as_deref().or(stub.swift_version.as_deref()) {
        file.swift_abi_version = parse_swift_version(swift)?;
    }
    parse_bool_flags(&stub.flags, &mut file)?;

    for entry in &stub.uuids {
        let (arch, uuid) = entry
            .split_once(':')
            .ok_or_else(|| FormatError::malformed(format!("invalid uuid entry '{}'", entry)))?;
        let arch: Architecture = arch.trim().parse()?;
        for target in targets_for(&file, arch.into()) {
            file.add_uuid(target, uuid.trim());
        }
    }

    if let Some(umbrella) = &stub.parent_umbrella {
        for target in file.targets().to_vec() {
            file.add_parent_umbrella(target, umbrella.clone());
        }
    }

    let naming = naming_for(file_type);
    for section in &stub.exports {
        let targets = targets_for(&file, parse_archs(&section.archs)?);
        for client in &section.allowable_clients {
            for target in &targets {
                file.add_allowable_client(client, *target);
            }
        }
        for library in &section.re_exports {
            for target in &targets {
                file.add_reexported_library(library, *target);
            }
        }
        let buckets = SymbolBuckets {
            globals: section.symbols.clone(),
            objc_classes: section.objc_classes.clone(),
            objc_eh_types: section.objc_eh_types.clone(),
            objc_ivars: section.objc_ivars.clone(),
            weak: section.weak_def_symbols.clone(),
            thread_local: section.thread_local_symbols.clone(),
        };
        buckets.insert_into(&mut file.symbols, &targets, SymbolFlags::DATA, SymbolFlags::WEAK_DEFINED, naming);
    }

    for section in &stub.undefineds {
        let targets = targets_for(&file, parse_archs(&section.archs)?);
        let buckets = SymbolBuckets {
            globals: section.symbols.clone(),
            objc_classes: section.objc_classes.clone(),
            objc_eh_types: section.objc_eh_types.clone(),
            objc_ivars: section.objc_ivars.clone(),
            weak: section.weak_ref_symbols.clone(),
            thread_local: Vec::new(),
        };
        buckets.insert_into(
            &mut file.symbols,
            &targets,
            SymbolFlags::DATA | SymbolFlags::UNDEFINED,
            SymbolFlags::WEAK_REFERENCED,
            naming,
        );
    }

    Ok(file)
}

impl Reader for TextStubLegacy {
    fn name(&self) -> &'static str {
        "tbd-legacy"
    }

    fn can_read(&self, magic: FileMagic, buffer: &MemoryBuffer, types: FileType) -> bool {
        let file_type = buffer_file_type(magic, buffer);
        LEGACY_TYPES.contains(file_type) && !file_type.is_invalid() && types.contains(file_type)
    }

    fn get_file_type(&self, magic: FileMagic, buffer: &MemoryBuffer) -> FileType {
        let file_type = buffer_file_type(magic, buffer);
        if LEGACY_TYPES.contains(file_type) {
            file_type
        } else {
            FileType::INVALID
        }
    }

    fn read_file(
        &self,
        buffer: &MemoryBuffer,
        flags: ReadFlags,
        arches: ArchitectureSet,
    ) -> Result<InterfaceFile, FormatError> {
        let (file_type, documents) = load_documents(buffer)?;
        if !LEGACY_TYPES.contains(file_type) {
            return Err(FormatError::UnsupportedFileType);
        }
        if documents.len() > 1 && file_type != FileType::TBD_V3 {
            return Err(FormatError::malformed(format!("{} stubs hold a single document", file_type)));
        }

        let mut documents = documents.iter();
        let mut file = match documents.next() {
            Some(doc) => parse_document(doc, file_type)?,
            None => return Err(FormatError::malformed("no YAML document")),
        };
        for doc in documents {
            file.add_document(parse_document(doc, file_type)?);
        }
        debug!("read {} stub for {}", file_type, file.install_name);
        Ok(finish_read(file, flags, arches))
    }
}

/// The single `platform:` spelling covering all of `file`'s targets.
fn legacy_platform(file: &InterfaceFile, file_type: FileType) -> Option<&'static str> {
    let platforms = file.platforms();
    let mut names: Vec<&'static str> = platforms.iter().map(|p| p.legacy_name()).collect();
    names.sort_unstable();
    names.dedup();
    match names.as_slice() {
        [single] => Some(*single),
        _ if file_type == FileType::TBD_V3
            && platforms.len() == 2
            && platforms.contains(&Platform::MacOS)
            && platforms.contains(&Platform::MacCatalyst) =>
        {
            Some("zippered")
        }
        _ => None,
    }
}

fn can_write_document(file: &InterfaceFile, file_type: FileType) -> bool {
    if legacy_platform(file, file_type).is_none() {
        return false;
    }
    // Outside zippered stubs every architecture names exactly one target.
    if file.platforms().len() == 1 && file.architectures().len() != file.targets().len() {
        return false;
    }
    if file_type == FileType::TBD_V1
        && (!file.two_level_namespace || !file.application_extension_safe || file.install_api)
    {
        return false;
    }
    true
}

#[derive(Default)]
struct ExportGroup {
    clients: Vec<String>,
    reexports: Vec<String>,
    symbols: SymbolBuckets,
}

fn ref_archs(targets: &[Target]) -> ArchitectureSet {
    targets.iter().map(|t| t.arch).collect()
}

fn write_document(e: &mut YamlEmitter, file: &InterfaceFile, file_type: FileType) {
    let tag = if file_type == FileType::TBD_V2 {
        Some(TAG_V2)
    } else if file_type == FileType::TBD_V3 {
        Some(TAG_V3)
    } else {
        None
    };
    let naming = naming_for(file_type);
    let archs: Vec<&str> = file.architectures().iter().map(|a| a.name()).collect();

    e.begin_document(tag);
    e.flow_seq(0, "archs", &archs);

    if file_type != FileType::TBD_V1 {
        let mut uuids: Vec<String> = Vec::new();
        for (target, uuid) in file.uuids() {
            let entry = format!("{}: {}", target.arch, uuid);
            if !uuids.iter().any(|u| u.starts_with(&format!("{}:", target.arch))) {
                uuids.push(entry);
            }
        }
        e.optional_seq(0, "uuids", &uuids);
    }

    e.scalar(0, "platform", legacy_platform(file, file_type).unwrap_or("unknown"));

    if file_type != FileType::TBD_V1 {
        e.optional_seq(0, "flags", &bool_flags(file));
    }
    e.scalar(0, "install-name", &file.install_name);
    if !is_default_version(file.current_version) {
        e.scalar(0, "current-version", &file.current_version.to_string());
    }
    if !is_default_version(file.compatibility_version) {
        e.scalar(0, "compatibility-version", &file.compatibility_version.to_string());
    }
    if file.swift_abi_version != 0 {
        if file_type == FileType::TBD_V3 {
            e.number(0, "swift-abi-version", file.swift_abi_version);
        } else {
            e.number(0, "swift-version", format_swift_version(file.swift_abi_version));
        }
    }
    if file_type != FileType::TBD_V1 {
        if let Some((_, umbrella)) = file.parent_umbrellas().first() {
            e.scalar(0, "parent-umbrella", umbrella);
        }
    }

    let mut exports: BTreeMap<ArchitectureSet, ExportGroup> = BTreeMap::new();
    for client in file.allowable_clients() {
        exports
            .entry(ref_archs(client.targets()))
            .or_default()
            .clients
            .push(client.install_name().to_string());
    }
    for library in file.reexported_libraries() {
        exports
            .entry(ref_archs(library.targets()))
            .or_default()
            .reexports
            .push(library.install_name().to_string());
    }
    // Reexported symbols have no list of their own before v4.
    for symbol in file.symbols.iter().filter(|s| !s.is_undefined()) {
        exports
            .entry(symbol.architectures())
            .or_default()
            .symbols
            .push(symbol, naming);
    }

    if !exports.is_empty() {
        let clients_key = if file_type == FileType::TBD_V1 {
            "allowed-clients"
        } else {
            "allowable-clients"
        };
        e.block(0, "exports");
        for (archs, mut group) in exports {
            group.symbols.finish();
            let names: Vec<&str> = archs.iter().map(|a| a.name()).collect();
            e.begin_item(2);
            e.flow_seq(4, "archs", &names);
            e.optional_seq(4, clients_key, &group.clients);
            e.optional_seq(4, "re-exports", &group.reexports);
            write_buckets(e, &group.symbols, "weak-def-symbols", true);
        }
    }

    if file_type != FileType::TBD_V1 {
        let mut undefineds: BTreeMap<ArchitectureSet, SymbolBuckets> = BTreeMap::new();
        for symbol in file.symbols.undefineds() {
            undefineds
                .entry(symbol.architectures())
                .or_default()
                .push(symbol, naming);
        }
        if !undefineds.is_empty() {
            e.block(0, "undefineds");
            for (archs, mut buckets) in undefineds {
                buckets.finish();
                let names: Vec<&str> = archs.iter().map(|a| a.name()).collect();
                e.begin_item(2);
                e.flow_seq(4, "archs", &names);
                write_buckets(e, &buckets, "weak-ref-symbols", false);
            }
        }
    }

    e.end_document();
}

fn write_buckets(e: &mut YamlEmitter, buckets: &SymbolBuckets, weak_key: &str, exports: bool) {
    e.optional_seq(4, "symbols", &buckets.globals);
    e.optional_seq(4, "objc-classes", &buckets.objc_classes);
    e.optional_seq(4, "objc-eh-types", &buckets.objc_eh_types);
    e.optional_seq(4, "objc-ivars", &buckets.objc_ivars);
    e.optional_seq(4, weak_key, &buckets.weak);
    if exports {
        e.optional_seq(4, "thread-local-symbols", &buckets.thread_local);
    }
}

impl Writer for TextStubLegacy {
    fn name(&self) -> &'static str {
        "tbd-legacy"
    }

    fn can_write(&self, file: &InterfaceFile, file_type: FileType) -> bool {
        if !LEGACY_TYPES.contains(file_type) || file_type.bits().count_ones() != 1 {
            return false;
        }
        if !file.documents.is_empty() && file_type != FileType::TBD_V3 {
            return false;
        }
        can_write_document(file, file_type)
            && file.documents.iter().all(|d| can_write_document(d, file_type))
    }

    fn write_file(&self, out: &mut dyn Write, file: &InterfaceFile, file_type: FileType) -> Result<(), FormatError> {
        if !self.can_write(file, file_type) {
            return Err(FormatError::UnsupportedWrite(file_type));
        }
        let mut e = YamlEmitter::new();
        write_document(&mut e, file, file_type);
        for document in &file.documents {
            write_document(&mut e, document, file_type);
        }
        out.write_all(e.finish().as_bytes())?;
        Ok(())
    }
}
