// Sat Feb 7 2026 - Alex

//! JSON text stubs (`tapi_tbd_version: 5`).

use crate::format::{finish_read, FileMagic, FormatError, MemoryBuffer, ReadFlags, Reader, Writer};
use crate::format::sections::{ObjCNaming, SymbolBuckets};
use crate::interface::{FileType, InterfaceFile, InterfaceFileRef};
use crate::symbol::{Symbol, SymbolFlags};
use crate::target::{ArchitectureSet, Target};
use crate::version::PackedVersion;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

const FORMAT_VERSION: u32 = 5;

#[derive(Debug, Serialize, Deserialize)]
struct JsonStub {
    tapi_tbd_version: u32,
    main_library: JsonLibrary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    libraries: Vec<JsonLibrary>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonLibrary {
    target_info: Vec<JsonTargetInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    flags: Vec<JsonFlags>,
    install_names: Vec<JsonName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    current_versions: Vec<JsonVersion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    compatibility_versions: Vec<JsonVersion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parent_umbrellas: Vec<JsonUmbrella>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    allowable_clients: Vec<JsonClients>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    reexported_libraries: Vec<JsonLibraries>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    swift_abi: Vec<JsonSwiftAbi>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    exported_symbols: Vec<JsonSymbolSection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    reexported_symbols: Vec<JsonSymbolSection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    undefined_symbols: Vec<JsonSymbolSection>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonTargetInfo {
    target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_deployment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonFlags {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    targets: Vec<String>,
    attributes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonName {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    targets: Vec<String>,
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonVersion {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    targets: Vec<String>,
    version: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonUmbrella {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    targets: Vec<String>,
    umbrella: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonClients {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    targets: Vec<String>,
    clients: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonLibraries {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    targets: Vec<String>,
    names: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonSwiftAbi {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    targets: Vec<String>,
    abi: u8,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonSymbolSection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    targets: Vec<String>,
    #[serde(default, skip_serializing_if = "JsonSymbols::is_empty")]
    data: JsonSymbols,
    #[serde(default, skip_serializing_if = "JsonSymbols::is_empty")]
    text: JsonSymbols,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonSymbols {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    global: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    objc_class: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    objc_eh_type: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    objc_ivar: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    weak: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    thread_local: Vec<String>,
}

impl JsonSymbols {
    fn is_empty(&self) -> bool {
        self.buckets().is_empty()
    }

    fn buckets(&self) -> SymbolBuckets {
        SymbolBuckets {
            globals: self.global.clone(),
            objc_classes: self.objc_class.clone(),
            objc_eh_types: self.objc_eh_type.clone(),
            objc_ivars: self.objc_ivar.clone(),
            weak: self.weak.clone(),
            thread_local: self.thread_local.clone(),
        }
    }

    fn from_buckets(buckets: SymbolBuckets) -> Self {
        Self {
            global: buckets.globals,
            objc_class: buckets.objc_classes,
            objc_eh_type: buckets.objc_eh_types,
            objc_ivar: buckets.objc_ivars,
            weak: buckets.weak,
            thread_local: buckets.thread_local,
        }
    }
}

/// The JSON stub generation.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextStubV5;

impl TextStubV5 {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Deserialize)]
struct VersionProbe {
    tapi_tbd_version: Option<u32>,
}

fn is_v5(magic: FileMagic, buffer: &MemoryBuffer) -> bool {
    if magic != FileMagic::TextStub || !buffer.has_extension("tbd") {
        return false;
    }
    matches!(
        serde_json::from_slice::<VersionProbe>(buffer.data()),
        Ok(VersionProbe { tapi_tbd_version: Some(FORMAT_VERSION) })
    )
}

/// Targets a section applies to; no list means every target of the library.
fn section_targets(names: &[String], all: &[Target]) -> Result<Vec<Target>, FormatError> {
    if names.is_empty() {
        return Ok(all.to_vec());
    }
    names
        .iter()
        .map(|n| n.parse::<Target>().map_err(FormatError::from))
        .collect()
}

fn parse_version(value: &str, key: &str) -> Result<PackedVersion, FormatError> {
    PackedVersion::parse32(value).ok_or_else(|| FormatError::malformed(format!("invalid {} '{}'", key, value)))
}

fn parse_library(library: &JsonLibrary) -> Result<InterfaceFile, FormatError> {
    let install_name = library
        .install_names
        .first()
        .ok_or_else(|| FormatError::malformed("missing install_names"))?;
    let mut file = InterfaceFile::new(install_name.name.clone());
    file.file_type = FileType::TBD_V5;

    for info in &library.target_info {
        let mut target: Target = info.target.parse()?;
        if let Some(min) = &info.min_deployment {
            target.min_deployment = parse_version(min, "min_deployment")?;
        }
        file.add_target(target);
    }
    if file.targets().is_empty() {
        return Err(FormatError::malformed("missing target_info"));
    }
    let all = file.targets().to_vec();

    for flags in &library.flags {
        for attribute in &flags.attributes {
            match attribute.as_str() {
                "flat_namespace" => file.two_level_namespace = false,
                "not_app_extension_safe" => file.application_extension_safe = false,
                other => return Err(FormatError::malformed(format!("unknown flag '{}'", other))),
            }
        }
    }
    if let Some(version) = library.current_versions.first() {
        file.current_version = parse_version(&version.version, "current_versions")?;
    }
    if let Some(version) = library.compatibility_versions.first() {
        file.compatibility_version = parse_version(&version.version, "compatibility_versions")?;
    }
    if let Some(swift) = library.swift_abi.first() {
        file.swift_abi_version = swift.abi;
    }

    for entry in &library.parent_umbrellas {
        for target in section_targets(&entry.targets, &all)? {
            file.add_parent_umbrella(target, entry.umbrella.clone());
        }
    }
    for entry in &library.allowable_clients {
        let targets = section_targets(&entry.targets, &all)?;
        for client in &entry.clients {
            for target in &targets {
                file.add_allowable_client(client, *target);
            }
        }
    }
    for entry in &library.reexported_libraries {
        let targets = section_targets(&entry.targets, &all)?;
        for name in &entry.names {
            for target in &targets {
                file.add_reexported_library(name, *target);
            }
        }
    }

    let lists = [
        (&library.exported_symbols, SymbolFlags::empty(), SymbolFlags::WEAK_DEFINED),
        (&library.reexported_symbols, SymbolFlags::REXPORTED, SymbolFlags::WEAK_DEFINED),
        (&library.undefined_symbols, SymbolFlags::UNDEFINED, SymbolFlags::WEAK_REFERENCED),
    ];
    for (sections, linkage, weak) in lists {
        for section in sections {
            let targets = section_targets(&section.targets, &all)?;
            for (symbols, kind) in [(&section.data, SymbolFlags::DATA), (&section.text, SymbolFlags::TEXT)] {
                symbols
                    .buckets()
                    .insert_into(&mut file.symbols, &targets, linkage | kind, weak, ObjCNaming::Plain);
            }
        }
    }

    Ok(file)
}

impl Reader for TextStubV5 {
    fn name(&self) -> &'static str {
        "tbd-v5"
    }

    fn can_read(&self, magic: FileMagic, buffer: &MemoryBuffer, types: FileType) -> bool {
        types.contains(FileType::TBD_V5) && is_v5(magic, buffer)
    }

    fn get_file_type(&self, magic: FileMagic, buffer: &MemoryBuffer) -> FileType {
        if is_v5(magic, buffer) {
            FileType::TBD_V5
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
        let stub: JsonStub = serde_json::from_slice(buffer.data())?;
        if stub.tapi_tbd_version != FORMAT_VERSION {
            return Err(FormatError::malformed(format!(
                "unsupported tapi_tbd_version {}",
                stub.tapi_tbd_version
            )));
        }

        let mut file = parse_library(&stub.main_library)?;
        for library in &stub.libraries {
            file.add_document(parse_library(library)?);
        }
        debug!("read tbd-v5 stub for {}", file.install_name);
        Ok(finish_read(file, flags, arches))
    }
}

fn target_names(targets: &[Target], all: &[Target]) -> Vec<String> {
    let mut sorted_all = all.to_vec();
    sorted_all.sort();
    if targets == sorted_all.as_slice() {
        return Vec::new();
    }
    targets.iter().map(|t| t.to_string()).collect()
}

fn ref_groups(refs: &[InterfaceFileRef]) -> BTreeMap<Vec<Target>, Vec<String>> {
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

fn symbol_sections<'a, I>(symbols: I, all: &[Target]) -> Vec<JsonSymbolSection>
where
    I: Iterator<Item = &'a Symbol>,
{
    let mut groups: BTreeMap<Vec<Target>, (SymbolBuckets, SymbolBuckets)> = BTreeMap::new();
    for symbol in symbols {
        let (data, text) = groups.entry(symbol.targets().to_vec()).or_default();
        if symbol.is_text() {
            text.push(symbol, ObjCNaming::Plain);
        } else {
            data.push(symbol, ObjCNaming::Plain);
        }
    }
    groups
        .into_iter()
        .map(|(targets, (mut data, mut text))| {
            data.finish();
            text.finish();
            JsonSymbolSection {
                targets: target_names(&targets, all),
                data: JsonSymbols::from_buckets(data),
                text: JsonSymbols::from_buckets(text),
            }
        })
        .collect()
}

fn library_for(file: &InterfaceFile) -> JsonLibrary {
    let all = file.targets();
    let mut library = JsonLibrary {
        target_info: all
            .iter()
            .map(|t| JsonTargetInfo {
                target: t.to_string(),
                min_deployment: (!t.min_deployment.is_empty()).then(|| t.min_deployment.to_string()),
            })
            .collect(),
        install_names: vec![JsonName {
            targets: Vec::new(),
            name: file.install_name.clone(),
        }],
        ..JsonLibrary::default()
    };

    let mut attributes = Vec::new();
    if !file.two_level_namespace {
        attributes.push("flat_namespace".to_string());
    }
    if !file.application_extension_safe {
        attributes.push("not_app_extension_safe".to_string());
    }
    if !attributes.is_empty() {
        library.flags.push(JsonFlags {
            targets: Vec::new(),
            attributes,
        });
    }
    if file.current_version != PackedVersion::new(1, 0, 0) {
        library.current_versions.push(JsonVersion {
            targets: Vec::new(),
            version: file.current_version.to_string(),
        });
    }
    if file.compatibility_version != PackedVersion::new(1, 0, 0) {
        library.compatibility_versions.push(JsonVersion {
            targets: Vec::new(),
            version: file.compatibility_version.to_string(),
        });
    }

    let mut umbrellas: IndexMap<&str, Vec<Target>> = IndexMap::new();
    for (target, umbrella) in file.parent_umbrellas() {
        umbrellas.entry(umbrella.as_str()).or_default().push(*target);
    }
    for (umbrella, mut targets) in umbrellas {
        targets.sort();
        library.parent_umbrellas.push(JsonUmbrella {
            targets: target_names(&targets, all),
            umbrella: umbrella.to_string(),
        });
    }
    for (targets, clients) in ref_groups(file.allowable_clients()) {
        library.allowable_clients.push(JsonClients {
            targets: target_names(&targets, all),
            clients,
        });
    }
    for (targets, names) in ref_groups(file.reexported_libraries()) {
        library.reexported_libraries.push(JsonLibraries {
            targets: target_names(&targets, all),
            names,
        });
    }
    if file.swift_abi_version != 0 {
        library.swift_abi.push(JsonSwiftAbi {
            targets: Vec::new(),
            abi: file.swift_abi_version,
        });
    }

    library.exported_symbols = symbol_sections(file.symbols.exports(), all);
    library.reexported_symbols = symbol_sections(file.symbols.reexports(), all);
    library.undefined_symbols = symbol_sections(file.symbols.undefineds(), all);
    library
}

impl Writer for TextStubV5 {
    fn name(&self) -> &'static str {
        "tbd-v5"
    }

    fn can_write(&self, file: &InterfaceFile, file_type: FileType) -> bool {
        file_type == FileType::TBD_V5 && !file.install_api
    }

    fn write_file(&self, out: &mut dyn Write, file: &InterfaceFile, file_type: FileType) -> Result<(), FormatError> {
        if !self.can_write(file, file_type) {
            return Err(FormatError::UnsupportedWrite(file_type));
        }
        let stub = JsonStub {
            tapi_tbd_version: FORMAT_VERSION,
            main_library: library_for(file),
            libraries: file.documents.iter().map(library_for).collect(),
        };
        let mut text = serde_json::to_string_pretty(&stub)?;
        text.push('\n');
        out.write_all(text.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::EncodeKind;
    use crate::target::{Architecture, Platform};

    const STUB: &str = r#"{
  "tapi_tbd_version": 5,
  "main_library": {
    "target_info": [
      { "target": "x86_64-macos", "min_deployment": "10.14" },
      { "target": "arm64-macos", "min_deployment": "11.0" }
    ],
    "flags": [ { "attributes": [ "flat_namespace" ] } ],
    "install_names": [ { "name": "/usr/lib/libfoo.dylib" } ],
    "current_versions": [ { "version": "1.2" } ],
    "exported_symbols": [
      {
        "data": { "global": [ "_data" ], "objc_class": [ "Foo" ] },
        "text": { "global": [ "_func" ], "weak": [ "_weak_func" ] }
      },
      { "targets": [ "arm64-macos" ], "text": { "global": [ "_arm_only" ] } }
    ],
    "undefined_symbols": [
      { "data": { "global": [ "_extern" ], "weak": [ "_maybe" ] } }
    ]
  }
}
"#;

    fn read(text: &str) -> InterfaceFile {
        TextStubV5
            .read_file(&MemoryBuffer::new("libfoo.tbd", text), ReadFlags::All, ArchitectureSet::all())
            .unwrap()
    }

    #[test]
    fn test_read() {
        let file = read(STUB);
        assert_eq!(file.targets().len(), 2);
        assert_eq!(file.targets()[1].min_deployment, PackedVersion::new(11, 0, 0));
        assert!(!file.two_level_namespace);
        assert_eq!(file.current_version, PackedVersion::new(1, 2, 0));

        let func = file.symbols.find(EncodeKind::GlobalSymbol, "_func").unwrap();
        assert!(func.is_text());
        assert_eq!(func.targets().len(), 2);
        let weak = file.symbols.find(EncodeKind::GlobalSymbol, "_weak_func").unwrap();
        assert!(weak.is_text() && weak.is_weak_defined());
        assert!(file.symbols.find(EncodeKind::GlobalSymbol, "_data").unwrap().is_data());
        assert_eq!(file.symbols.find(EncodeKind::GlobalSymbol, "_arm_only").unwrap().targets().len(), 1);
        let maybe = file.symbols.find(EncodeKind::GlobalSymbol, "_maybe").unwrap();
        assert!(maybe.is_undefined() && maybe.is_weak_referenced());
    }

    #[test]
    fn test_round_trip_is_stable() {
        let file = read(STUB);
        let mut first = Vec::new();
        TextStubV5.write_file(&mut first, &file, FileType::TBD_V5).unwrap();
        let first = String::from_utf8(first).unwrap();

        let again = read(&first);
        assert_eq!(again, file);
        let mut second = Vec::new();
        TextStubV5.write_file(&mut second, &again, FileType::TBD_V5).unwrap();
        assert_eq!(String::from_utf8(second).unwrap(), first);
        assert!(first.ends_with("}\n"));
    }

    #[test]
    fn test_detection_needs_extension_and_version() {
        let magic = FileMagic::TextStub;
        assert!(TextStubV5.can_read(magic, &MemoryBuffer::new("libfoo.tbd", STUB), FileType::TBD_V5));
        assert!(!TextStubV5.can_read(magic, &MemoryBuffer::new("libfoo.json", STUB), FileType::TBD_V5));
        assert!(!TextStubV5.can_read(magic, &MemoryBuffer::new("libfoo.tbd", STUB), FileType::TBD_V4));
        let v6 = STUB.replace("\"tapi_tbd_version\": 5", "\"tapi_tbd_version\": 6");
        assert!(!TextStubV5.can_read(magic, &MemoryBuffer::new("libfoo.tbd", v6), FileType::TEXT_STUBS));
    }

    #[test]
    fn test_missing_install_name_is_malformed() {
        let text = r#"{ "tapi_tbd_version": 5, "main_library": { "target_info": [ { "target": "arm64-macos" } ], "install_names": [] } }"#;
        let err = TextStubV5
            .read_file(&MemoryBuffer::new("libfoo.tbd", text), ReadFlags::All, ArchitectureSet::all())
            .unwrap_err();
        assert!(matches!(err, FormatError::Malformed(_)));
    }

    #[test]
    fn test_installapi_is_not_writable() {
        let mut file = InterfaceFile::new("/usr/lib/libfoo.dylib");
        file.add_target(Target::new(Architecture::Arm64, Platform::MacOS));
        assert!(TextStubV5.can_write(&file, FileType::TBD_V5));
        file.install_api = true;
        assert!(!TextStubV5.can_write(&file, FileType::TBD_V5));
    }
}
