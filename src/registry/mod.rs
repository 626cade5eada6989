// Mon Feb 9 2026 - Alex

//! Ordered reader and writer lists; the first handler that accepts a
//! buffer or document wins.

pub mod atomic;

use crate::format::{
    identify_magic, DiagnosticReader, FileMagic, FormatError, MachOReader, MemoryBuffer, ReadFlags,
    Reader, TextStubLegacy, TextStubV4, TextStubV5, Writer,
};
use crate::interface::{FileType, InterfaceFile};
use crate::record::Api;
use crate::target::ArchitectureSet;
use log::debug;
use std::io::Write;
use std::path::Path;

pub struct Registry {
    readers: Vec<Box<dyn Reader>>,
    writers: Vec<Box<dyn Writer>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// An empty registry; nothing can be read or written until handlers
    /// are added.
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
            writers: Vec::new(),
        }
    }

    /// Every handler, in the order that keeps the diagnostic reader last.
    pub fn with_all_handlers() -> Self {
        let mut registry = Self::new();
        registry.add_binary_readers();
        registry.add_yaml_readers();
        registry.add_json_readers();
        registry.add_diagnostic_reader();
        registry.add_yaml_writers();
        registry.add_json_writers();
        registry
    }

    pub fn add_reader<R: Reader + 'static>(&mut self, reader: R) {
        self.readers.push(Box::new(reader));
    }

    pub fn add_writer<W: Writer + 'static>(&mut self, writer: W) {
        self.writers.push(Box::new(writer));
    }

    pub fn add_binary_readers(&mut self) {
        self.add_reader(MachOReader::new());
    }

    pub fn add_yaml_readers(&mut self) {
        self.add_reader(TextStubV4::new());
        self.add_reader(TextStubLegacy::new());
    }

    pub fn add_yaml_writers(&mut self) {
        self.add_writer(TextStubV4::new());
        self.add_writer(TextStubLegacy::new());
    }

    pub fn add_json_readers(&mut self) {
        self.add_reader(TextStubV5::new());
    }

    pub fn add_json_writers(&mut self) {
        self.add_writer(TextStubV5::new());
    }

    pub fn add_diagnostic_reader(&mut self) {
        self.add_reader(DiagnosticReader::new());
    }

    pub fn can_read(&self, buffer: &MemoryBuffer, types: FileType) -> bool {
        let magic = identify_magic(buffer.data());
        self.readers.iter().any(|r| r.can_read(magic, buffer, types))
    }

    pub fn get_file_type(&self, buffer: &MemoryBuffer) -> FileType {
        let magic = identify_magic(buffer.data());
        self.readers
            .iter()
            .map(|r| r.get_file_type(magic, buffer))
            .find(|t| !t.is_invalid())
            .unwrap_or(FileType::INVALID)
    }

    fn dispatch(
        &self,
        magic: FileMagic,
        buffer: &MemoryBuffer,
        flags: ReadFlags,
        arches: ArchitectureSet,
    ) -> Result<InterfaceFile, FormatError> {
        let reader = self
            .readers
            .iter()
            .find(|r| r.can_read(magic, buffer, FileType::all()))
            .ok_or(FormatError::UnsupportedFileType)?;
        debug!("reading {} with {}", buffer.identifier(), reader.name());

        let mut file = reader.read_file(buffer, flags, arches)?;
        file.path = Some(buffer.identifier().into());
        Ok(file)
    }

    pub fn read_interface_file(
        &self,
        buffer: &MemoryBuffer,
        flags: ReadFlags,
        arches: ArchitectureSet,
    ) -> Result<InterfaceFile, FormatError> {
        self.dispatch(identify_magic(buffer.data()), buffer, flags, arches)
    }

    /// Per-target APIs of the library and of every inlined library.
    pub fn read_file(
        &self,
        buffer: &MemoryBuffer,
        flags: ReadFlags,
        arches: ArchitectureSet,
    ) -> Result<Vec<Api>, FormatError> {
        let file = self.read_interface_file(buffer, flags, arches)?;
        let mut apis = file.to_apis();
        for document in &file.documents {
            apis.extend(document.to_apis());
        }
        Ok(apis)
    }

    /// Like [`Registry::read_interface_file`] but refuses anything that is
    /// not a text stub.
    pub fn read_text_file(
        &self,
        buffer: &MemoryBuffer,
        flags: ReadFlags,
        arches: ArchitectureSet,
    ) -> Result<InterfaceFile, FormatError> {
        let magic = identify_magic(buffer.data());
        if magic != FileMagic::TextStub {
            return Err(FormatError::UnsupportedFileType);
        }
        self.dispatch(magic, buffer, flags, arches)
    }

    fn writer_for(&self, file: &InterfaceFile, file_type: FileType) -> Result<&dyn Writer, FormatError> {
        self.writers
            .iter()
            .find(|w| w.can_write(file, file_type))
            .map(|w| &**w)
            .ok_or(FormatError::UnsupportedFileType)
    }

    pub fn write_to_stream(
        &self,
        out: &mut dyn Write,
        file: &InterfaceFile,
        file_type: FileType,
    ) -> Result<(), FormatError> {
        let writer = self.writer_for(file, file_type)?;
        debug!("writing {} as {} with {}", file.install_name, file_type, writer.name());
        writer.write_file(out, file, file_type)
    }

    /// Renders `file` as `file_type` and stores it at `path`. Replacing
    /// goes through a temporary file and a rename.
    pub fn write_file(
        &self,
        path: &Path,
        file: Option<&InterfaceFile>,
        file_type: FileType,
        replace_existing: bool,
    ) -> Result<(), FormatError> {
        let file = file.ok_or_else(|| FormatError::InvalidArgument("no interface file to write".to_string()))?;
        let mut contents = Vec::new();
        self.write_to_stream(&mut contents, file, file_type)?;
        atomic::write_file(path, &contents, replace_existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{EncodeKind, SymbolFlags};
    use crate::target::{Architecture, Platform, Target};
    use std::fs;

    fn library() -> InterfaceFile {
        let t = Target::new(Architecture::X86_64, Platform::MacOS);
        let mut file = InterfaceFile::new("/usr/lib/libfoo.dylib");
        file.add_target(t);
        file.add_symbol(EncodeKind::GlobalSymbol, "_foo", SymbolFlags::TEXT, &[t]);
        file
    }

    #[test]
    fn test_empty_registry_reads_nothing() {
        let buffer = MemoryBuffer::new("libfoo.tbd", "--- !tapi-tbd-v3\narchs: [ x86_64 ]\n...\n");
        let err = Registry::new()
            .read_interface_file(&buffer, ReadFlags::All, ArchitectureSet::all())
            .unwrap_err();
        assert_eq!(err.to_string(), "unsupported file type");
    }

    #[test]
    fn test_unknown_tag_diagnostic() {
        let registry = Registry::with_all_handlers();
        let buffer = MemoryBuffer::new("future.tbd", "--- !tapi-tbd-v99\n...\n");
        let err = registry
            .read_interface_file(&buffer, ReadFlags::All, ArchitectureSet::all())
            .unwrap_err();
        assert_eq!(err.to_string(), "unsupported tapi file type '!tapi-tbd-v99' in YAML");
        assert_eq!(registry.get_file_type(&buffer), FileType::INVALID);
    }

    #[test]
    fn test_write_gating() {
        let registry = Registry::with_all_handlers();
        let mut file = library();
        file.two_level_namespace = false;
        let mut out = Vec::new();
        assert!(matches!(
            registry.write_to_stream(&mut out, &file, FileType::TBD_V1),
            Err(FormatError::UnsupportedFileType)
        ));
        for file_type in [FileType::TBD_V2, FileType::TBD_V3, FileType::TBD_V4, FileType::TBD_V5] {
            let mut out = Vec::new();
            registry.write_to_stream(&mut out, &file, file_type).unwrap();
            assert!(!out.is_empty());
        }
    }

    #[test]
    fn test_write_without_document() {
        let dir = tempfile::tempdir().unwrap();
        let err = Registry::with_all_handlers()
            .write_file(&dir.path().join("x.tbd"), None, FileType::TBD_V4, true)
            .unwrap_err();
        assert!(matches!(err, FormatError::InvalidArgument(_)));
    }

    #[test]
    fn test_write_then_read() {
        let registry = Registry::with_all_handlers();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libfoo.tbd");
        let file = library();

        for file_type in [FileType::TBD_V3, FileType::TBD_V4, FileType::TBD_V5] {
            registry.write_file(&path, Some(&file), file_type, true).unwrap();
            let buffer = MemoryBuffer::from_path(&path).unwrap();
            assert_eq!(registry.get_file_type(&buffer), file_type);
            assert!(registry.can_read(&buffer, file_type));

            let back = registry
                .read_text_file(&buffer, ReadFlags::All, ArchitectureSet::all())
                .unwrap();
            assert_eq!(back.install_name, file.install_name);
            assert_eq!(back.file_type, file_type);
            assert_eq!(back.path.as_deref(), Some(path.as_path()));
            assert!(back.symbols.find(EncodeKind::GlobalSymbol, "_foo").is_some());
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_read_file_yields_one_api_per_target() {
        let registry = Registry::with_all_handlers();
        let text = "--- !tapi-tbd
tbd-version:     4
targets:         [ x86_64-macos, arm64-macos ]
install-name:    /usr/lib/libfoo.dylib
exports:
  - targets:         [ x86_64-macos, arm64-macos ]
    symbols:         [ _foo ]
    objc-classes:    [ Foo ]
...
";
        let apis = registry
            .read_file(&MemoryBuffer::new("libfoo.tbd", text), ReadFlags::All, ArchitectureSet::all())
            .unwrap();
        assert_eq!(apis.len(), 2);
        for api in &apis {
            assert!(api.find_global("_foo").is_some());
            assert!(api.find_interface("Foo").is_some());
            assert_eq!(api.binary.install_name, "/usr/lib/libfoo.dylib");
        }
    }

    #[test]
    fn test_read_text_file_rejects_binaries() {
        let mut data = 0xfeed_facfu32.to_le_bytes().to_vec();
        data.extend_from_slice(&[0; 28]);
        let buffer = MemoryBuffer::new("libfoo.dylib", data);
        assert!(matches!(
            Registry::with_all_handlers().read_text_file(&buffer, ReadFlags::All, ArchitectureSet::all()),
            Err(FormatError::UnsupportedFileType)
        ));
    }
}
