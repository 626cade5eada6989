// Mon Feb 2 2026 - Alex

use crate::target::TargetError;
use goblin::mach::cputype::{
    CPU_SUBTYPE_ARM64_32_V8, CPU_SUBTYPE_ARM64_ALL, CPU_SUBTYPE_ARM64_E, CPU_SUBTYPE_ARM_V4T, CPU_SUBTYPE_ARM_V5TEJ,
    CPU_SUBTYPE_ARM_V6, CPU_SUBTYPE_ARM_V6M, CPU_SUBTYPE_ARM_V7, CPU_SUBTYPE_ARM_V7EM, CPU_SUBTYPE_ARM_V7K,
    CPU_SUBTYPE_ARM_V7M, CPU_SUBTYPE_ARM_V7S, CPU_SUBTYPE_I386_ALL, CPU_SUBTYPE_MASK, CPU_SUBTYPE_X86_64_ALL,
    CPU_SUBTYPE_X86_64_H, CPU_TYPE_ARM, CPU_TYPE_ARM64, CPU_TYPE_ARM64_32, CPU_TYPE_X86, CPU_TYPE_X86_64,
};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Architecture {
    I386,
    X86_64,
    X86_64h,
    Armv4t,
    Armv6,
    Armv5,
    Armv7,
    Armv7s,
    Armv7k,
    Armv6m,
    Armv7m,
    Armv7em,
    Arm64,
    Arm64e,
    Arm64_32,
    Unknown,
}

struct ArchEntry {
    arch: Architecture,
    name: &'static str,
    cpu_type: u32,
    cpu_subtype: u32,
}

const ARCHITECTURES: &[ArchEntry] = &[
    ArchEntry { arch: Architecture::I386, name: "i386", cpu_type: CPU_TYPE_X86, cpu_subtype: CPU_SUBTYPE_I386_ALL },
    ArchEntry { arch: Architecture::X86_64, name: "x86_64", cpu_type: CPU_TYPE_X86_64, cpu_subtype: CPU_SUBTYPE_X86_64_ALL },
    ArchEntry { arch: Architecture::X86_64h, name: "x86_64h", cpu_type: CPU_TYPE_X86_64, cpu_subtype: CPU_SUBTYPE_X86_64_H },
    ArchEntry { arch: Architecture::Armv4t, name: "armv4t", cpu_type: CPU_TYPE_ARM, cpu_subtype: CPU_SUBTYPE_ARM_V4T },
    ArchEntry { arch: Architecture::Armv6, name: "armv6", cpu_type: CPU_TYPE_ARM, cpu_subtype: CPU_SUBTYPE_ARM_V6 },
    ArchEntry { arch: Architecture::Armv5, name: "armv5", cpu_type: CPU_TYPE_ARM, cpu_subtype: CPU_SUBTYPE_ARM_V5TEJ },
    ArchEntry { arch: Architecture::Armv7, name: "armv7", cpu_type: CPU_TYPE_ARM, cpu_subtype: CPU_SUBTYPE_ARM_V7 },
    ArchEntry { arch: Architecture::Armv7s, name: "armv7s", cpu_type: CPU_TYPE_ARM, cpu_subtype: CPU_SUBTYPE_ARM_V7S },
    ArchEntry { arch: Architecture::Armv7k, name: "armv7k", cpu_type: CPU_TYPE_ARM, cpu_subtype: CPU_SUBTYPE_ARM_V7K },
    ArchEntry { arch: Architecture::Armv6m, name: "armv6m", cpu_type: CPU_TYPE_ARM, cpu_subtype: CPU_SUBTYPE_ARM_V6M },
    ArchEntry { arch: Architecture::Armv7m, name: "armv7m", cpu_type: CPU_TYPE_ARM, cpu_subtype: CPU_SUBTYPE_ARM_V7M },
    ArchEntry { arch: Architecture::Armv7em, name: "armv7em", cpu_type: CPU_TYPE_ARM, cpu_subtype: CPU_SUBTYPE_ARM_V7EM },
    ArchEntry { arch: Architecture::Arm64, name: "arm64", cpu_type: CPU_TYPE_ARM64, cpu_subtype: CPU_SUBTYPE_ARM64_ALL },
    ArchEntry { arch: Architecture::Arm64e, name: "arm64e", cpu_type: CPU_TYPE_ARM64, cpu_subtype: CPU_SUBTYPE_ARM64_E },
    ArchEntry { arch: Architecture::Arm64_32, name: "arm64_32", cpu_type: CPU_TYPE_ARM64_32, cpu_subtype: CPU_SUBTYPE_ARM64_32_V8 },
];

impl Architecture {
    pub fn all() -> impl Iterator<Item = Architecture> {
        ARCHITECTURES.iter().map(|e| e.arch)
    }

    fn entry(&self) -> Option<&'static ArchEntry> {
        ARCHITECTURES.iter().find(|e| e.arch == *self)
    }

    pub fn name(&self) -> &'static str {
        self.entry().map(|e| e.name).unwrap_or("unknown")
    }

    pub fn from_name(name: &str) -> Architecture {
        ARCHITECTURES
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.arch)
            .unwrap_or(Architecture::Unknown)
    }

    pub fn from_cpu_type(cpu_type: u32, cpu_subtype: u32) -> Architecture {
        let subtype = cpu_subtype & !CPU_SUBTYPE_MASK;
        ARCHITECTURES
            .iter()
            .find(|e| e.cpu_type == cpu_type && e.cpu_subtype == subtype)
            .map(|e| e.arch)
            .unwrap_or(Architecture::Unknown)
    }

    pub fn cpu_type(&self) -> Option<(u32, u32)> {
        self.entry().map(|e| (e.cpu_type, e.cpu_subtype))
    }

    pub fn is_intel(&self) -> bool {
        matches!(self, Architecture::I386 | Architecture::X86_64 | Architecture::X86_64h)
    }

    fn bit(&self) -> u32 {
        1 << (*self as u32)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Architecture {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Architecture::from_name(s) {
            Architecture::Unknown => Err(TargetError::UnknownArchitecture(s.to_string())),
            arch => Ok(arch),
        }
    }
}

/// Set of architectures, iterated in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ArchitectureSet {
    bits: u32,
}

impl ArchitectureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Architecture::all().collect()
    }

    pub fn insert(&mut self, arch: Architecture) {
        self.bits |= arch.bit();
    }

    pub fn contains(&self, arch: Architecture) -> bool {
        self.bits & arch.bit() != 0
    }

    pub fn has_any_of(&self, other: ArchitectureSet) -> bool {
        self.bits & other.bits != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Architecture> + '_ {
        Architecture::all()
            .chain(std::iter::once(Architecture::Unknown))
            .filter(move |a| self.contains(*a))
    }
}

impl FromIterator<Architecture> for ArchitectureSet {
    fn from_iter<T: IntoIterator<Item = Architecture>>(iter: T) -> Self {
        let mut set = ArchitectureSet::new();
        for arch in iter {
            set.insert(arch);
        }
        set
    }
}

impl From<Architecture> for ArchitectureSet {
    fn from(arch: Architecture) -> Self {
        std::iter::once(arch).collect()
    }
}

impl fmt::Display for ArchitectureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|a| a.name()).collect();
        write!(f, "[ {} ]", names.join(", "))
    }
}
