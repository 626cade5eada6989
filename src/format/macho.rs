// Sun Feb 8 2026 - Alex

//! Dynamic libraries, stubs and bundles read straight from Mach-O images,
//! thin or universal.

use crate::format::{finish_read, identify_magic, FileMagic, FormatError, MemoryBuffer, ReadFlags, Reader};
use crate::interface::{FileType, InterfaceFile};
use crate::symbol::{EncodeKind, ObjCLinkerName, SymbolFlags};
use crate::target::{Architecture, ArchitectureSet, Platform, Target};
use crate::version::PackedVersion;
use goblin::mach::exports::{
    ExportInfo, EXPORT_SYMBOL_FLAGS_KIND_MASK, EXPORT_SYMBOL_FLAGS_KIND_THREAD_LOCAL, EXPORT_SYMBOL_FLAGS_REEXPORT,
    EXPORT_SYMBOL_FLAGS_STUB_AND_RESOLVER, EXPORT_SYMBOL_FLAGS_WEAK_DEFINITION,
};
use goblin::mach::header::{MH_APP_EXTENSION_SAFE, MH_BUNDLE, MH_DYLIB, MH_DYLIB_STUB, MH_TWOLEVEL};
use goblin::mach::load_command::CommandVariant;
use goblin::mach::symbols::N_WEAK_REF;
use goblin::mach::{Mach, MachO};
use log::{debug, trace};
use std::collections::HashSet;

/// Everything one architecture slice contributes.
#[derive(Debug, Default)]
struct SliceInfo {
    file_type: FileType,
    targets: Vec<Target>,
    install_name: String,
    current_version: PackedVersion,
    compatibility_version: PackedVersion,
    swift_abi_version: u8,
    two_level_namespace: bool,
    application_extension_safe: bool,
    uuid: Option<String>,
    parent_umbrella: Option<String>,
    allowable_clients: Vec<String>,
    reexported_libraries: Vec<String>,
    symbols: Vec<(EncodeKind, String, SymbolFlags)>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MachOReader;

impl MachOReader {
    pub fn new() -> Self {
        Self
    }
}

fn file_type_for(filetype: u32) -> FileType {
    match filetype {
        MH_DYLIB => FileType::MACHO_DYNAMIC_LIBRARY,
        MH_DYLIB_STUB => FileType::MACHO_DYNAMIC_LIBRARY_STUB,
        MH_BUNDLE => FileType::MACHO_BUNDLE,
        _ => FileType::INVALID,
    }
}

fn magic_file_type(magic: FileMagic) -> FileType {
    match magic {
        FileMagic::MachODynamicLibrary => FileType::MACHO_DYNAMIC_LIBRARY,
        FileMagic::MachODynamicLibraryStub => FileType::MACHO_DYNAMIC_LIBRARY_STUB,
        FileMagic::MachOBundle => FileType::MACHO_BUNDLE,
        _ => FileType::INVALID,
    }
}

/// Thin images as `(architecture, bytes)`.
fn slices(data: &[u8]) -> Result<Vec<(Architecture, &[u8])>, FormatError> {
    match Mach::parse(data)? {
        Mach::Binary(macho) => Ok(vec![(
            Architecture::from_cpu_type(macho.header.cputype, macho.header.cpusubtype),
            data,
        )]),
        Mach::Fat(fat) => {
            let mut slices = Vec::new();
            for arch in fat.iter_arches() {
                let arch = arch?;
                let start = arch.offset as usize;
                let end = start + arch.size as usize;
                let bytes = data
                    .get(start..end)
                    .ok_or_else(|| FormatError::malformed("universal slice out of bounds"))?;
                slices.push((Architecture::from_cpu_type(arch.cputype, arch.cpusubtype), bytes));
            }
            Ok(slices)
        }
    }
}

fn c_string(bytes: &[u8], offset: usize) -> Result<String, FormatError> {
    let tail = bytes
        .get(offset..)
        .ok_or_else(|| FormatError::malformed("load command string out of bounds"))?;
    let end = tail.iter().position(|b| *b == 0).unwrap_or(tail.len());
    Ok(String::from_utf8_lossy(&tail[..end]).into_owned())
}

fn format_uuid(uuid: &[u8; 16]) -> String {
    let hex: Vec<String> = uuid.iter().map(|b| format!("{:02X}", b)).collect();
    format!(
        "{}-{}-{}-{}-{}",
        hex[0..4].concat(),
        hex[4..6].concat(),
        hex[6..8].concat(),
        hex[8..10].concat(),
        hex[10..16].concat()
    )
}

fn segment_name(raw: &[u8; 16]) -> &str {
    std::str::from_utf8(raw).unwrap_or("").trim_end_matches('\0')
}

fn text_vmsize(macho: &MachO) -> u64 {
    for segment in &macho.segments {
        if segment_name(&segment.segname) == "__TEXT" {
            return segment.vmsize;
        }
    }
    0
}

/// Swift ABI version recorded in `__objc_imageinfo`, if any.
fn swift_abi_version(macho: &MachO) -> u8 {
    for segment in &macho.segments {
        let Ok(sections) = segment.sections() else { continue };
        for (section, data) in sections {
            if segment_name(&section.sectname) != "__objc_imageinfo" {
                continue;
            }
            if let Some(flags) = data.get(4..8) {
                let flags = u32::from_le_bytes([flags[0], flags[1], flags[2], flags[3]]);
                return ((flags >> 8) & 0xff) as u8;
            }
        }
    }
    0
}

/// Folds linker names into stub symbols. A class and metaclass pair
/// becomes one class symbol; a lone half stays a plain global.
fn classify_symbols(names: Vec<(String, SymbolFlags)>) -> Vec<(EncodeKind, String, SymbolFlags)> {
    let mut classes = HashSet::new();
    let mut metaclasses = HashSet::new();
    for (name, _) in &names {
        match ObjCLinkerName::classify(name) {
            ObjCLinkerName::Class(c) => {
                classes.insert(c.to_string());
            }
            ObjCLinkerName::MetaClass(c) => {
                metaclasses.insert(c.to_string());
            }
            _ => {}
        }
    }

    let mut symbols = Vec::new();
    for (name, flags) in &names {
        let symbol = match ObjCLinkerName::classify(name) {
            ObjCLinkerName::Class(c) if metaclasses.contains(c) => (EncodeKind::ObjectiveCClass, c),
            ObjCLinkerName::MetaClass(c) if classes.contains(c) => continue,
            ObjCLinkerName::Objc1Class(c) => (EncodeKind::ObjectiveCClass, c),
            ObjCLinkerName::EHType(c) => (EncodeKind::ObjectiveCClassEHType, c),
            ObjCLinkerName::IVar(q) => (EncodeKind::ObjectiveCInstanceVariable, q),
            _ => (EncodeKind::GlobalSymbol, name.as_str()),
        };
        symbols.push((symbol.0, symbol.1.to_string(), *flags));
    }
    symbols
}

fn export_flags(info: &ExportInfo, text_size: u64) -> SymbolFlags {
    let (raw, kind) = match info {
        ExportInfo::Regular { address, flags } => {
            let kind = if *address < text_size {
                SymbolFlags::TEXT
            } else {
                SymbolFlags::DATA
            };
            (*flags, kind)
        }
        ExportInfo::Reexport { flags, .. } => (*flags, SymbolFlags::DATA),
        ExportInfo::Stub { flags, .. } => (*flags, SymbolFlags::TEXT),
    };

    let mut flags = kind;
    if raw & EXPORT_SYMBOL_FLAGS_KIND_MASK == EXPORT_SYMBOL_FLAGS_KIND_THREAD_LOCAL {
        flags = SymbolFlags::DATA | SymbolFlags::THREAD_LOCAL_VALUE;
    }
    if raw & EXPORT_SYMBOL_FLAGS_WEAK_DEFINITION != 0 {
        flags |= SymbolFlags::WEAK_DEFINED;
    }
    if raw & EXPORT_SYMBOL_FLAGS_REEXPORT != 0 {
        flags |= SymbolFlags::REXPORTED;
    }
    if raw & EXPORT_SYMBOL_FLAGS_STUB_AND_RESOLVER != 0 {
        flags = (flags - SymbolFlags::KIND_MASK) | SymbolFlags::TEXT;
    }
    flags
}

fn read_slice(arch: Architecture, bytes: &[u8], flags: ReadFlags) -> Result<SliceInfo, FormatError> {
    let macho = MachO::parse(bytes, 0)?;
    let header = &macho.header;
    let mut info = SliceInfo {
        file_type: file_type_for(header.filetype),
        install_name: macho.name.unwrap_or_default().to_string(),
        current_version: PackedVersion::new(1, 0, 0),
        compatibility_version: PackedVersion::new(1, 0, 0),
        two_level_namespace: header.flags & MH_TWOLEVEL != 0,
        application_extension_safe: header.flags & MH_APP_EXTENSION_SAFE != 0,
        ..SliceInfo::default()
    };
    if info.file_type.is_invalid() {
        return Err(FormatError::UnsupportedFileType);
    }

    for lc in &macho.load_commands {
        match &lc.command {
            CommandVariant::IdDylib(cmd) => {
                info.current_version = PackedVersion::from_raw(cmd.dylib.current_version);
                info.compatibility_version = PackedVersion::from_raw(cmd.dylib.compatibility_version);
            }
            CommandVariant::ReexportDylib(cmd) => {
                info.reexported_libraries
                    .push(c_string(bytes, lc.offset + cmd.dylib.name as usize)?);
            }
            CommandVariant::SubFramework(cmd) => {
                info.parent_umbrella = Some(c_string(bytes, lc.offset + cmd.umbrella as usize)?);
            }
            CommandVariant::SubClient(cmd) => {
                info.allowable_clients
                    .push(c_string(bytes, lc.offset + cmd.client as usize)?);
            }
            CommandVariant::Uuid(cmd) => info.uuid = Some(format_uuid(&cmd.uuid)),
            CommandVariant::BuildVersion(cmd) => {
                let platform = Platform::from_build_version(cmd.platform);
                info.targets.push(
                    Target::new(arch, platform).with_min_deployment(PackedVersion::from_raw(cmd.minos)),
                );
            }
            CommandVariant::VersionMinMacosx(cmd) => {
                info.targets.push(
                    Target::new(arch, Platform::MacOS).with_min_deployment(PackedVersion::from_raw(cmd.version)),
                );
            }
            CommandVariant::VersionMinIphoneos(cmd) => {
                info.targets.push(
                    Target::new(arch, Platform::IOS.for_architecture(arch))
                        .with_min_deployment(PackedVersion::from_raw(cmd.version)),
                );
            }
            CommandVariant::VersionMinTvos(cmd) => {
                info.targets.push(
                    Target::new(arch, Platform::TvOS.for_architecture(arch))
                        .with_min_deployment(PackedVersion::from_raw(cmd.version)),
                );
            }
            CommandVariant::VersionMinWatchos(cmd) => {
                info.targets.push(
                    Target::new(arch, Platform::WatchOS.for_architecture(arch))
                        .with_min_deployment(PackedVersion::from_raw(cmd.version)),
                );
            }
            _ => {}
        }
    }
    if info.targets.is_empty() {
        debug!("no platform load command for {}, assuming unknown platform", arch);
        info.targets.push(Target::new(arch, Platform::Unknown));
    }
    info.swift_abi_version = swift_abi_version(&macho);

    if flags == ReadFlags::Header {
        return Ok(info);
    }

    let text_size = text_vmsize(&macho);
    let mut names = Vec::new();
    for export in macho.exports()? {
        trace!("export {} on {}", export.name, arch);
        let flags = export_flags(&export.info, text_size);
        names.push((export.name, flags));
    }
    if !info.two_level_namespace {
        for symbol in macho.symbols() {
            let (name, nlist) = symbol?;
            if nlist.is_stab() || !nlist.is_undefined() || !nlist.is_global() {
                continue;
            }
            let mut flags = SymbolFlags::UNDEFINED | SymbolFlags::DATA;
            if nlist.n_desc & N_WEAK_REF != 0 {
                flags |= SymbolFlags::WEAK_REFERENCED;
            }
            names.push((name.to_string(), flags));
        }
    }
    info.symbols = classify_symbols(names);
    Ok(info)
}

impl Reader for MachOReader {
    fn name(&self) -> &'static str {
        "mach-o"
    }

    fn can_read(&self, magic: FileMagic, buffer: &MemoryBuffer, types: FileType) -> bool {
        let file_type = self.get_file_type(magic, buffer);
        !file_type.is_invalid() && types.contains(file_type)
    }

    fn get_file_type(&self, magic: FileMagic, buffer: &MemoryBuffer) -> FileType {
        match magic {
            FileMagic::MachOUniversalBinary => match slices(buffer.data()) {
                Ok(slices) => slices
                    .first()
                    .map(|(_, bytes)| magic_file_type(identify_magic(bytes)))
                    .unwrap_or(FileType::INVALID),
                Err(_) => FileType::INVALID,
            },
            other => magic_file_type(other),
        }
    }

    fn read_file(
        &self,
        buffer: &MemoryBuffer,
        flags: ReadFlags,
        arches: ArchitectureSet,
    ) -> Result<InterfaceFile, FormatError> {
        let mut file: Option<InterfaceFile> = None;

        for (arch, bytes) in slices(buffer.data())? {
            if !arches.contains(arch) {
                debug!("skipping {} slice of {}", arch, buffer.identifier());
                continue;
            }
            let slice = read_slice(arch, bytes, flags)?;
            let file = file.get_or_insert_with(|| {
                let mut file = InterfaceFile::new(slice.install_name.clone());
                file.file_type = slice.file_type;
                file.current_version = slice.current_version;
                file.compatibility_version = slice.compatibility_version;
                file.swift_abi_version = slice.swift_abi_version;
                file.two_level_namespace = slice.two_level_namespace;
                file.application_extension_safe = slice.application_extension_safe;
                file
            });

            for target in &slice.targets {
                file.add_target(*target);
                if let Some(uuid) = &slice.uuid {
                    file.add_uuid(*target, uuid.clone());
                }
                if let Some(umbrella) = &slice.parent_umbrella {
                    file.add_parent_umbrella(*target, umbrella.clone());
                }
                for client in &slice.allowable_clients {
                    file.add_allowable_client(client, *target);
                }
                for library in &slice.reexported_libraries {
                    file.add_reexported_library(library, *target);
                }
            }
            for (kind, name, flags) in &slice.symbols {
                file.add_symbol(*kind, name, *flags, &slice.targets);
            }
        }

        let file = file.ok_or_else(|| {
            FormatError::InvalidArgument(format!("{} has no slice for {}", buffer.identifier(), arches))
        })?;
        debug!(
            "read {} with {} targets and {} symbols",
            file.install_name,
            file.targets().len(),
            file.symbols.len()
        );
        Ok(finish_read(file, flags, arches))
    }
}
