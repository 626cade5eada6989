// Wed Feb 4 2026 - Alex

pub mod error;
pub mod buffer;
pub mod sections;
pub mod yaml;
pub mod json;
pub mod macho;
pub mod diagnostic;

pub use error::FormatError;
pub use buffer::{identify_magic, FileMagic, MemoryBuffer};
pub use yaml::{TextStubV4, TextStubLegacy};
pub use json::TextStubV5;
pub use macho::MachOReader;
pub use diagnostic::DiagnosticReader;

use crate::interface::{FileType, InterfaceFile};
use crate::target::ArchitectureSet;
use std::io::Write;

/// How much of a file to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ReadFlags {
    /// Library metadata only, no symbols.
    Header,
    Symbols,
    #[default]
    All,
}

/// Parses one or more file generations into an [`InterfaceFile`].
pub trait Reader {
    fn name(&self) -> &'static str;

    /// True only if the buffer is exactly one of `types`, judged from its
    /// content.
    fn can_read(&self, magic: FileMagic, buffer: &MemoryBuffer, types: FileType) -> bool;

    /// The generation of the buffer, or [`FileType::INVALID`].
    fn get_file_type(&self, magic: FileMagic, buffer: &MemoryBuffer) -> FileType;

    fn read_file(
        &self,
        buffer: &MemoryBuffer,
        flags: ReadFlags,
        arches: ArchitectureSet,
    ) -> Result<InterfaceFile, FormatError>;
}

/// Renders an [`InterfaceFile`] in one or more generations.
pub trait Writer {
    fn name(&self) -> &'static str;

    fn can_write(&self, file: &InterfaceFile, file_type: FileType) -> bool;

    fn write_file(&self, out: &mut dyn Write, file: &InterfaceFile, file_type: FileType) -> Result<(), FormatError>;
}

/// Shared tail of every reader: drop symbols for header-only reads and
/// anything outside the requested architectures.
pub(crate) fn finish_read(mut file: InterfaceFile, flags: ReadFlags, arches: ArchitectureSet) -> InterfaceFile {
    if flags == ReadFlags::Header {
        strip_symbols(&mut file);
    }
    if arches != ArchitectureSet::all() {
        file.retain_architectures(arches);
    }
    file
}

fn strip_symbols(file: &mut InterfaceFile) {
    file.symbols = Default::default();
    for document in &mut file.documents {
        strip_symbols(document);
    }
}
