// Wed Feb 4 2026 - Alex

use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// File generations. A single bit names one generation; unions are
    /// used to ask a reader for any of several.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FileType: u32 {
        const MACHO_DYNAMIC_LIBRARY = 1 << 0;
        const MACHO_DYNAMIC_LIBRARY_STUB = 1 << 1;
        const MACHO_BUNDLE = 1 << 2;
        const TBD_V1 = 1 << 3;
        const TBD_V2 = 1 << 4;
        const TBD_V3 = 1 << 5;
        const TBD_V4 = 1 << 6;
        const TBD_V5 = 1 << 7;
    }
}

const NAMES: &[(FileType, &str)] = &[
    (FileType::MACHO_DYNAMIC_LIBRARY, "mach-o-dylib"),
    (FileType::MACHO_DYNAMIC_LIBRARY_STUB, "mach-o-dylib-stub"),
    (FileType::MACHO_BUNDLE, "mach-o-bundle"),
    (FileType::TBD_V1, "tbd-v1"),
    (FileType::TBD_V2, "tbd-v2"),
    (FileType::TBD_V3, "tbd-v3"),
    (FileType::TBD_V4, "tbd-v4"),
    (FileType::TBD_V5, "tbd-v5"),
];

impl FileType {
    pub const INVALID: FileType = FileType::empty();
    pub const TEXT_STUBS: FileType = FileType::TBD_V1
        .union(FileType::TBD_V2)
        .union(FileType::TBD_V3)
        .union(FileType::TBD_V4)
        .union(FileType::TBD_V5);
    pub const MACHO: FileType = FileType::MACHO_DYNAMIC_LIBRARY
        .union(FileType::MACHO_DYNAMIC_LIBRARY_STUB)
        .union(FileType::MACHO_BUNDLE);

    pub fn is_invalid(&self) -> bool {
        self.is_empty()
    }

    pub fn is_text_stub(&self) -> bool {
        !self.is_empty() && FileType::TEXT_STUBS.contains(*self)
    }

    pub fn is_macho(&self) -> bool {
        !self.is_empty() && FileType::MACHO.contains(*self)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("invalid");
        }
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(t, _)| self.contains(*t))
            .map(|(_, n)| *n)
            .collect();
        f.write_str(&names.join("|"))
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        let wanted = s.strip_prefix("tbd-").unwrap_or(&s);
        NAMES
            .iter()
            .find(|(_, n)| *n == s || n.strip_prefix("tbd-") == Some(wanted))
            .map(|(t, _)| *t)
            .ok_or_else(|| format!("unknown file type '{}'", s))
    }
}
