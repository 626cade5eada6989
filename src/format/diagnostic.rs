// Sun Feb 8 2026 - Alex

use crate::format::yaml::{detect, split_documents};
use crate::format::{FileMagic, FormatError, MemoryBuffer, ReadFlags, Reader};
use crate::interface::{FileType, InterfaceFile};
use crate::target::ArchitectureSet;

/// Claims YAML stubs whose `!tapi` tag no other reader understands and
/// fails them with the tag named.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiagnosticReader;

impl DiagnosticReader {
    pub fn new() -> Self {
        Self
    }

    fn unsupported_tag(magic: FileMagic, buffer: &MemoryBuffer) -> Option<String> {
        if magic != FileMagic::TextStub {
            return None;
        }
        let documents = split_documents(buffer.text()?);
        let first = documents.first()?;
        let tag = first.tag.as_deref()?;
        if !tag.starts_with("!tapi") || !detect(first).is_invalid() {
            return None;
        }
        Some(tag.to_string())
    }
}

impl Reader for DiagnosticReader {
    fn name(&self) -> &'static str {
        "diagnostic"
    }

    fn can_read(&self, magic: FileMagic, buffer: &MemoryBuffer, types: FileType) -> bool {
        types.intersects(FileType::TEXT_STUBS) && Self::unsupported_tag(magic, buffer).is_some()
    }

    fn get_file_type(&self, _magic: FileMagic, _buffer: &MemoryBuffer) -> FileType {
        FileType::INVALID
    }

    fn read_file(
        &self,
        buffer: &MemoryBuffer,
        _flags: ReadFlags,
        _arches: ArchitectureSet,
    ) -> Result<InterfaceFile, FormatError> {
        let magic = crate::format::identify_magic(buffer.data());
        match Self::unsupported_tag(magic, buffer) {
            Some(tag) => Err(FormatError::UnsupportedTapiFileType(tag)),
            None => Err(FormatError::UnsupportedFileType),
        }
    }
}
