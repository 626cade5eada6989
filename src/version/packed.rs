// Mon Feb 2 2026 - Alex

use crate::version::VersionError;
use std::fmt;
use std::str::FromStr;

/// A `major.minor.patch` version packed into 32 bits as `xxxx.yy.zz`,
/// the same layout Mach-O load commands use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PackedVersion {
    value: u32,
}

impl PackedVersion {
    pub const fn new(major: u16, minor: u8, patch: u8) -> Self {
        Self {
            value: ((major as u32) << 16) | ((minor as u32) << 8) | patch as u32,
        }
    }

    pub const fn from_raw(value: u32) -> Self {
        Self { value }
    }

    pub fn raw(&self) -> u32 {
        self.value
    }

    pub fn major(&self) -> u16 {
        (self.value >> 16) as u16
    }

    pub fn minor(&self) -> u8 {
        ((self.value >> 8) & 0xff) as u8
    }

    pub fn patch(&self) -> u8 {
        (self.value & 0xff) as u8
    }

    pub fn is_empty(&self) -> bool {
        self.value == 0
    }

    /// Parses `X`, `X.Y` or `X.Y.Z`. Missing components are zero.
    pub fn parse32(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() > 3 {
            return None;
        }

        let mut components = [0u32; 3];
        for (slot, part) in components.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            *slot = part.parse().ok()?;
        }

        if components[0] > 0xffff || components[1] > 0xff || components[2] > 0xff {
            return None;
        }

        Some(Self::new(
            components[0] as u16,
            components[1] as u8,
            components[2] as u8,
        ))
    }
}

impl fmt::Display for PackedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())?;
        if self.patch() != 0 {
            write!(f, ".{}", self.patch())?;
        }
        Ok(())
    }
}

impl FromStr for PackedVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(version) = Self::parse32(s) {
            return Ok(version);
        }

        let well_formed = s
            .trim()
            .split('.')
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
        if well_formed && s.trim().split('.').count() <= 3 {
            Err(VersionError::OutOfRange(s.to_string()))
        } else {
            Err(VersionError::Invalid(s.to_string()))
        }
    }
}

impl From<u32> for PackedVersion {
    fn from(value: u32) -> Self {
        Self::from_raw(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_round_trip() {
        for version in [
            PackedVersion::new(0, 0, 0),
            PackedVersion::new(1, 2, 3),
            PackedVersion::new(65535, 0, 0),
            PackedVersion::new(10, 15, 0),
        ] {
            assert_eq!(PackedVersion::parse32(&version.to_string()), Some(version));
        }
    }

    #[test]
    fn test_display_omits_zero_patch() {
        assert_eq!(PackedVersion::new(1, 2, 0).to_string(), "1.2");
        assert_eq!(PackedVersion::new(1, 2, 3).to_string(), "1.2.3");
        assert_eq!(PackedVersion::default().to_string(), "0.0");
    }

    #[test]
    fn test_parse_partial_components() {
        assert_eq!(PackedVersion::parse32("7"), Some(PackedVersion::new(7, 0, 0)));
        assert_eq!(PackedVersion::parse32("1.2"), PackedVersion::parse32("1.2.0"));
        assert_eq!(PackedVersion::parse32("1405.1.3").map(|v| v.raw()), Some(0x057d0103));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(PackedVersion::parse32(""), None);
        assert_eq!(PackedVersion::parse32("1..2"), None);
        assert_eq!(PackedVersion::parse32("a.b"), None);
        assert_eq!(PackedVersion::parse32("1.2.3.4"), None);
        assert_eq!(PackedVersion::parse32("65536"), None);
        assert_eq!(PackedVersion::parse32("1.256"), None);
    }

    #[test]
    fn test_from_str_errors() {
        assert_eq!(
            "1.300".parse::<PackedVersion>(),
            Err(VersionError::OutOfRange("1.300".to_string()))
        );
        assert_eq!(
            "x".parse::<PackedVersion>(),
            Err(VersionError::Invalid("x".to_string()))
        );
    }
}
