// Wed Feb 4 2026 - Alex

use crate::format::FormatError;
use goblin::mach::fat::FAT_MAGIC;
use goblin::mach::header::{MH_BUNDLE, MH_CIGAM, MH_CIGAM_64, MH_DYLIB, MH_DYLIB_STUB, MH_MAGIC, MH_MAGIC_64};
use std::fs::File;
use std::io::Read;
use std::path::Path;

// not exported by goblin
const FAT_MAGIC_64: u32 = 0xcafe_babf;

/// Coarse classification of a buffer from its first bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMagic {
    Unknown,
    MachODynamicLibrary,
    MachODynamicLibraryStub,
    MachOBundle,
    MachOOther,
    MachOUniversalBinary,
    /// A YAML document or a JSON object carrying a stub version.
    TextStub,
}

impl FileMagic {
    pub fn is_macho(&self) -> bool {
        matches!(
            self,
            FileMagic::MachODynamicLibrary
                | FileMagic::MachODynamicLibraryStub
                | FileMagic::MachOBundle
                | FileMagic::MachOOther
                | FileMagic::MachOUniversalBinary
        )
    }
}

/// File contents plus the name they were loaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBuffer {
    identifier: String,
    data: Vec<u8>,
}

impl MemoryBuffer {
    pub fn new(identifier: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            identifier: identifier.into(),
            data: data.into(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FormatError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| FormatError::io(path, e))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data).map_err(|e| FormatError::io(path, e))?;
        Ok(Self::new(path.to_string_lossy(), data))
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }

    pub fn has_extension(&self, ext: &str) -> bool {
        Path::new(&self.identifier)
            .extension()
            .map(|e| e.eq_ignore_ascii_case(ext))
            .unwrap_or(false)
    }
}

fn read_u32(data: &[u8], offset: usize, big_endian: bool) -> Option<u32> {
    let bytes: [u8; 4] = data.get(offset..offset + 4)?.try_into().ok()?;
    Some(if big_endian {
        u32::from_be_bytes(bytes)
    } else {
        u32::from_le_bytes(bytes)
    })
}

pub fn identify_magic(data: &[u8]) -> FileMagic {
    if let Ok(magic) = goblin::mach::peek(data, 0) {
        match magic {
            FAT_MAGIC | FAT_MAGIC_64 => {
                // Java class files share the fat magic; they carry a large
                // version number where the arch count would be.
                return match read_u32(data, 4, true) {
                    Some(count) if count > 0 && count < 40 => FileMagic::MachOUniversalBinary,
                    _ => FileMagic::Unknown,
                };
            }
            MH_MAGIC | MH_MAGIC_64 | MH_CIGAM | MH_CIGAM_64 => {
                let big_endian = magic == MH_MAGIC || magic == MH_MAGIC_64;
                return match read_u32(data, 12, big_endian) {
                    Some(MH_DYLIB) => FileMagic::MachODynamicLibrary,
                    Some(MH_DYLIB_STUB) => FileMagic::MachODynamicLibraryStub,
                    Some(MH_BUNDLE) => FileMagic::MachOBundle,
                    _ => FileMagic::MachOOther,
                };
            }
            _ => {}
        }
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return FileMagic::Unknown;
    };
    let text = text.trim_start();
    if text.starts_with("---") {
        return FileMagic::TextStub;
    }
    if text.starts_with('{') && text.contains("\"tapi_tbd_version\"") {
        return FileMagic::TextStub;
    }
    FileMagic::Unknown
}
