// Fri Feb 6 2026 - Alex

use super::emit::YamlEmitter;
use super::{
    bool_flags, buffer_file_type, is_default_version, load_documents, parse_bool_flags,
    parse_version, YamlDocument, TAG_V4,
};
use crate::format::sections::{ObjCNaming, SymbolBuckets};
use crate::format::{finish_read, FileMagic, FormatError, MemoryBuffer, ReadFlags, Reader, Writer};
use crate::interface::{FileType, InterfaceFile, InterfaceFileRef};
use crate::symbol::{Symbol, SymbolFlags};
use crate::target::{ArchitectureSet, Target};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct StubV4 {
    targets: Vec<String>,
    #[serde(default)]
    uuids: Vec<UuidEntry>,
    #[serde(default)]
    flags: Vec<String>,
    install_name: String,
    current_version: Option<String>,
    compatibility_version: Option<String>,
    swift_abi_version: Option<String>,
    #[serde(default)]
    parent_umbrella: Vec<UmbrellaEntry>,
    #[serde(default)]
    allowable_clients: Vec<ClientsEntry>,
    #[serde(default)]
    reexported_libraries: Vec<LibrariesEntry>,
    #[serde(default)]
    exports: Vec<SymbolSection>,
    #[serde(default)]
    reexports: Vec<SymbolSection>,
    #[serde(default)]
    undefineds: Vec<SymbolSection>,
}

#[derive(Debug, Deserialize)]
struct UuidEntry {
    target: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct UmbrellaEntry {
    targets: Vec<String>,
    umbrella: String,
}

#[derive(Debug, Deserialize)]
struct ClientsEntry {
    targets: Vec<String>,
    clients: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LibrariesEntry {
    targets: Vec<String>,
    libraries: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SymbolSection {
    targets: Vec<String>,
    #[serde(default)]
    symbols: Vec<String>,
    #[serde(default)]
    objc_classes: Vec<String>,
    #[serde(default)]
    objc_eh_types: Vec<String>,
    #[serde(default)]
    objc_ivars: Vec<String>,
    #[serde(default)]
    weak_symbols: Vec<String>,
    #[serde(default)]
    thread_local_symbols: Vec<String>,
}

impl SymbolSection {
    fn buckets(&self) -> SymbolBuckets {
        SymbolBuckets {
            globals: self.symbols.clone(),
            objc_classes: self.objc_classes.clone(),
            objc_eh_types: self.objc_eh_types.clone(),
            objc_ivars: self.objc_ivars.clone(),
            weak: self.weak_symbols.clone(),
            thread_local: self.thread_local_symbols.clone(),
        }
    }
}

/// Target-keyed YAML stubs (`--- !tapi-tbd`, `tbd-version: 4`).
#[derive(Debug, Default, Clone, Copy)]
pub struct TextStubV4;

impl TextStubV4 {
    pub fn new() -> Self {
        Self
    }
}

fn parse_targets(names: &[String]) -> Result<Vec<Target>, FormatError> {
    names
        .iter()
        .map(|n| n.parse::<Target>().map_err(FormatError::from))
        .collect()
}

fn parse_document(doc: &YamlDocument) -> Result<InterfaceFile, FormatError> {
    let stub: StubV4 = serde_yaml::from_str(&doc.body)?;
    let mut file = InterfaceFile::new(stub.install_name);
    file.file_type = FileType::TBD_V4;

    for target in parse_targets(&stub.targets)? {
        file.add_target(target);
    }
    if file.targets().is_empty() {
        return Err(FormatError::malformed("no targets"));
    }

    file.current_version = parse_version(stub.current_version.as_deref(), "current-version")?;
    file.compatibility_version = parse_version(stub.compatibility_version.as_deref(), "compatibility-version")?;
    if let Some(swift) = &stub.swift_abi_version {
        file.swift_abi_version = swift
            .parse()
            .map_err(|_| FormatError::malformed(format!("invalid swift-abi-version '{}'", swift)))?;
    }
    parse_bool_flags(&stub.flags, &mut file)?;

    for uuid in &stub.uuids {
        file.add_uuid(uuid.target.parse()?, uuid.value.clone());
    }
    for entry in &stub.parent_umbrella {
        for target in parse_targets(&entry.targets)? {
            file.add_parent_umbrella(target, entry.umbrella.clone());
        }
    }
    for entry in &stub.allowable_clients {
        let targets = parse_targets(&entry.targets)?;
        for client in &entry.clients {
            for target in &targets {
                file.add_allowable_client(client, *target);
            }
        }
    }
    for entry in &stub.reexported_libraries {
        let targets = parse_targets(&entry.targets)?;
        for library in &entry.libraries {
            for target in &targets {
                file.add_reexported_library(library, *target);
            }
        }
    }

    let sections = [
        (&stub.exports, SymbolFlags::DATA, SymbolFlags::WEAK_DEFINED),
        (&stub.reexports, SymbolFlags::DATA | SymbolFlags::REXPORTED, SymbolFlags::WEAK_DEFINED),
        (&stub.undefineds, SymbolFlags::DATA | SymbolFlags::UNDEFINED, SymbolFlags::WEAK_REFERENCED),
    ];
    for (list, flags, weak) in sections {
        for section in list {
            let targets = parse_targets(&section.targets)?;
            section
                .buckets()
                .insert_into(&mut file.symbols, &targets, flags, weak, ObjCNaming::Plain);
        }
    }

    Ok(file)
}

impl Reader for TextStubV4 {
    fn name(&self) -> &'static str {
        "tbd-v4"
    }

    fn can_read(&self, magic: FileMagic, buffer: &MemoryBuffer, types: FileType) -> bool {
        types.contains(FileType::TBD_V4) && buffer_file_type(magic, buffer) == FileType::TBD_V4
    }

    fn get_file_type(&self, magic: FileMagic, buffer: &MemoryBuffer) -> FileType {
        if buffer_file_type(magic, buffer) == FileType::TBD_V4 {
            FileType::TBD_V4
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
        if file_type != FileType::TBD_V4 {
            return Err(FormatError::UnsupportedFileType);
        }

        let mut parsed = documents.iter().map(parse_document);
        let mut file = match parsed.next() {
            Some(main) => main?,
            None => return Err(FormatError::malformed("no YAML document")),
        };
        for document in parsed {
            file.add_document(document?);
        }
        debug!("read tbd-v4 stub for {} with {} inlined documents", file.install_name, file.documents.len());
        Ok(finish_read(file, flags, arches))
    }
}

fn target_names(targets: &[Target]) -> Vec<String> {
    targets.iter().map(|t| t.to_string()).collect()
}

fn group_refs(refs: &[InterfaceFileRef]) -> BTreeMap<Vec<Target>, Vec<String>> {
    let mut groups: BTreeMap<Vec<Target>, Vec<String>> = BTreeMap::new();
    for library in refs {
        groups
            .entry(library.targets().to_vec())
            .or_default()
            .push(library.install_name().to_string());
    }
    for names in groups.values_mut() {
        names.sort();
    }
    groups
}

fn group_symbols<'a, I>(symbols: I) -> BTreeMap<Vec<Target>, SymbolBuckets>
where
    I: Iterator<Item = &'a Symbol>,
{
    let mut groups: BTreeMap<Vec<Target>, SymbolBuckets> = BTreeMap::new();
    for symbol in symbols {
        groups
            .entry(symbol.targets().to_vec())
            .or_default()
            .push(symbol, ObjCNaming::Plain);
    }
    for buckets in groups.values_mut() {
        buckets.finish();
    }
    groups
}

fn write_symbol_sections(
    e: &mut YamlEmitter,
    key: &str,
    groups: BTreeMap<Vec<Target>, SymbolBuckets>,
    thread_local: bool,
) {
    if groups.is_empty() {
        return;
    }
    e.block(0, key);
    for (targets, buckets) in groups {
        e.begin_item(2);
        e.flow_seq(4, "targets", &target_names(&targets));
        e.optional_seq(4, "symbols", &buckets.globals);
        e.optional_seq(4, "objc-classes", &buckets.objc_classes);
        e.optional_seq(4, "objc-eh-types", &buckets.objc_eh_types);
        e.optional_seq(4, "objc-ivars", &buckets.objc_ivars);
        e.optional_seq(4, "weak-symbols", &buckets.weak);
        if thread_local {
            e.optional_seq(4, "thread-local-symbols", &buckets.thread_local);
        }
    }
}

fn write_document(e: &mut YamlEmitter, file: &InterfaceFile) {
    e.begin_document(Some(TAG_V4));
    e.number(0, "tbd-version", 4);
    e.flow_seq(0, "targets", &target_names(file.targets()));

    if !file.uuids().is_empty() {
        e.block(0, "uuids");
        for (target, uuid) in file.uuids() {
            e.begin_item(2);
            e.scalar(4, "target", &target.to_string());
            e.scalar(4, "value", uuid);
        }
    }
    e.optional_seq(0, "flags", &bool_flags(file));
    e.scalar(0, "install-name", &file.install_name);
    if !is_default_version(file.current_version) {
        e.scalar(0, "current-version", &file.current_version.to_string());
    }
    if !is_default_version(file.compatibility_version) {
        e.scalar(0, "compatibility-version", &file.compatibility_version.to_string());
    }
    if file.swift_abi_version != 0 {
        e.number(0, "swift-abi-version", file.swift_abi_version);
    }

    let mut umbrellas: IndexMap<&str, Vec<Target>> = IndexMap::new();
    for (target, umbrella) in file.parent_umbrellas() {
        umbrellas.entry(umbrella.as_str()).or_default().push(*target);
    }
    if !umbrellas.is_empty() {
        e.block(0, "parent-umbrella");
        for (umbrella, mut targets) in umbrellas {
            targets.sort();
            e.begin_item(2);
            e.flow_seq(4, "targets", &target_names(&targets));
            e.scalar(4, "umbrella", umbrella);
        }
    }

    for (key, list_key, refs) in [
        ("allowable-clients", "clients", file.allowable_clients()),
        ("reexported-libraries", "libraries", file.reexported_libraries()),
    ] {
        let groups = group_refs(refs);
        if groups.is_empty() {
            continue;
        }
        e.block(0, key);
        for (targets, names) in groups {
            e.begin_item(2);
            e.flow_seq(4, "targets", &target_names(&targets));
            e.flow_seq(4, list_key, &names);
        }
    }

    write_symbol_sections(e, "exports", group_symbols(file.symbols.exports()), true);
    write_symbol_sections(e, "reexports", group_symbols(file.symbols.reexports()), true);
    write_symbol_sections(e, "undefineds", group_symbols(file.symbols.undefineds()), false);
    e.end_document();
}

impl Writer for TextStubV4 {
    fn name(&self) -> &'static str {
        "tbd-v4"
    }

    fn can_write(&self, _file: &InterfaceFile, file_type: FileType) -> bool {
        file_type == FileType::TBD_V4
    }

    fn write_file(&self, out: &mut dyn Write, file: &InterfaceFile, file_type: FileType) -> Result<(), FormatError> {
        if !self.can_write(file, file_type) {
            return Err(FormatError::UnsupportedWrite(file_type));
        }
        let mut e = YamlEmitter::new();
        write_document(&mut e, file);
        for document in &file.documents {
            write_document(&mut e, document);
        }
        out.write_all(e.finish().as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::EncodeKind;
    use crate::target::{Architecture, Platform};

    const V4_STUB: &str = "--- !tapi-tbd
tbd-version:     4
targets:         [ x86_64-macos, arm64-macos ]
uuids:
  - target:          x86_64-macos
    value:           00000000-0000-0000-0000-000000000000
flags:           [ installapi ]
install-name:    /System/Library/Frameworks/Foo.framework/Foo
current-version: 2.1
swift-abi-version: 5
parent-umbrella:
  - targets:         [ x86_64-macos, arm64-macos ]
    umbrella:        System
allowable-clients:
  - targets:         [ arm64-macos ]
    clients:         [ Bar ]
exports:
  - targets:         [ x86_64-macos, arm64-macos ]
    symbols:         [ _foo ]
    objc-classes:    [ Foo ]
    objc-eh-types:   [ Foo ]
    objc-ivars:      [ Foo.bar ]
    weak-symbols:    [ _weak ]
reexports:
  - targets:         [ arm64-macos ]
    symbols:         [ _reexported ]
undefineds:
  - targets:         [ x86_64-macos ]
    symbols:         [ _malloc ]
    weak-symbols:    [ _maybe ]
...
";

    fn read(text: &str) -> InterfaceFile {
        TextStubV4
            .read_file(&MemoryBuffer::new("Foo.tbd", text), ReadFlags::All, ArchitectureSet::all())
            .unwrap()
    }

    #[test]
    fn test_read() {
        let file = read(V4_STUB);
        assert_eq!(file.targets().len(), 2);
        assert!(file.install_api);
        assert_eq!(file.swift_abi_version, 5);
        assert_eq!(file.framework_name(), Some("Foo"));
        assert!(file.symbols.find(EncodeKind::GlobalSymbol, "_reexported").unwrap().is_reexported());
        assert!(file.symbols.find(EncodeKind::GlobalSymbol, "_maybe").unwrap().is_weak_referenced());
        assert!(file.symbols.find(EncodeKind::GlobalSymbol, "_weak").unwrap().is_weak_defined());
        assert_eq!(file.symbols.find(EncodeKind::ObjectiveCClass, "Foo").unwrap().targets().len(), 2);
    }

    #[test]
    fn test_write_is_canonical() {
        let file = read(V4_STUB);
        let mut out = Vec::new();
        TextStubV4.write_file(&mut out, &file, FileType::TBD_V4).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), V4_STUB);
    }

    #[test]
    fn test_header_read_drops_symbols() {
        let file = TextStubV4
            .read_file(&MemoryBuffer::new("Foo.tbd", V4_STUB), ReadFlags::Header, ArchitectureSet::all())
            .unwrap();
        assert!(file.symbols.is_empty());
        assert_eq!(file.targets().len(), 2);
    }

    #[test]
    fn test_arch_filter() {
        let file = TextStubV4
            .read_file(&MemoryBuffer::new("Foo.tbd", V4_STUB), ReadFlags::All, Architecture::Arm64.into())
            .unwrap();
        assert_eq!(file.targets(), &[Target::new(Architecture::Arm64, Platform::MacOS)]);
        assert!(file.symbols.find(EncodeKind::GlobalSymbol, "_malloc").is_none());
        assert!(file.uuids().is_empty());
    }

    #[test]
    fn test_can_read_requires_v4_content() {
        let buffer = MemoryBuffer::new("Foo.tbd", V4_STUB);
        assert!(TextStubV4.can_read(FileMagic::TextStub, &buffer, FileType::TBD_V4));
        assert!(!TextStubV4.can_read(FileMagic::TextStub, &buffer, FileType::TBD_V3));
        let v3 = MemoryBuffer::new("Foo.tbd", "--- !tapi-tbd-v3\narchs: [ x86_64 ]\n...\n");
        assert!(!TextStubV4.can_read(FileMagic::TextStub, &v3, FileType::TEXT_STUBS));
    }
}
