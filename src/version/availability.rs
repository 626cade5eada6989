// Mon Feb 2 2026 - Alex

use crate::version::PackedVersion;
use std::fmt;

/// Availability of a declaration on one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AvailabilityInfo {
    pub introduced: PackedVersion,
    pub deprecated: PackedVersion,
    pub obsoleted: PackedVersion,
    pub unavailable: bool,
    pub is_spi_available: bool,
}

impl AvailabilityInfo {
    pub fn new(introduced: PackedVersion) -> Self {
        Self {
            introduced,
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_deprecated(mut self, version: PackedVersion) -> Self {
        self.deprecated = version;
        self
    }

    pub fn with_obsoleted(mut self, version: PackedVersion) -> Self {
        self.obsoleted = version;
        self
    }

    pub fn with_spi(mut self, spi: bool) -> Self {
        self.is_spi_available = spi;
        self
    }

    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    /// Field-by-field rendering, e.g. `i:10.9 d:0 o:0 u:0`.
    pub fn describe(&self) -> String {
        format!(
            "i:{} d:{} o:{} u:{}",
            version_or_zero(self.introduced),
            version_or_zero(self.deprecated),
            version_or_zero(self.obsoleted),
            self.unavailable as u8
        )
    }

    /// Folds the availability of the same declaration seen on another
    /// header or slice into this one. The earliest introduction and
    /// deprecation win, the latest obsoletion wins, and the declaration
    /// stays unavailable only if both sides agree.
    pub fn merge(&mut self, other: &AvailabilityInfo) {
        self.introduced = min_set(self.introduced, other.introduced);
        self.deprecated = min_set(self.deprecated, other.deprecated);
        self.obsoleted = self.obsoleted.max(other.obsoleted);
        self.unavailable = self.unavailable && other.unavailable;
        self.is_spi_available |= other.is_spi_available;
    }
}

fn version_or_zero(version: PackedVersion) -> String {
    if version.is_empty() {
        "0".to_string()
    } else {
        version.to_string()
    }
}

fn min_set(a: PackedVersion, b: PackedVersion) -> PackedVersion {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b,
        (_, true) => a,
        _ => a.min(b),
    }
}

impl fmt::Display for AvailabilityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unavailable {
            return write!(f, "n/a");
        }

        write!(f, "{}", version_or_zero(self.introduced))?;
        if !self.obsoleted.is_empty() {
            write!(f, "..{}", self.obsoleted)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_renders_na() {
        assert_eq!(AvailabilityInfo::unavailable().to_string(), "n/a");
    }

    #[test]
    fn test_canonical_range() {
        let info = AvailabilityInfo::new(PackedVersion::new(10, 9, 0));
        assert_eq!(info.to_string(), "10.9");

        let info = info.with_obsoleted(PackedVersion::new(10, 12, 0));
        assert_eq!(info.to_string(), "10.9..10.12");
    }

    #[test]
    fn test_describe_fields() {
        let info = AvailabilityInfo::new(PackedVersion::new(10, 9, 0));
        assert_eq!(info.describe(), "i:10.9 d:0 o:0 u:0");
        assert_eq!(AvailabilityInfo::unavailable().describe(), "i:0 d:0 o:0 u:1");
    }

    #[test]
    fn test_merge_keeps_widest_window() {
        let mut a = AvailabilityInfo::new(PackedVersion::new(10, 12, 0));
        let b = AvailabilityInfo::new(PackedVersion::new(10, 9, 0))
            .with_obsoleted(PackedVersion::new(11, 0, 0))
            .with_spi(true);
        a.merge(&b);
        assert_eq!(a.introduced, PackedVersion::new(10, 9, 0));
        assert_eq!(a.obsoleted, PackedVersion::new(11, 0, 0));
        assert!(a.is_spi_available);
        assert!(!a.unavailable);

        let mut gone = AvailabilityInfo::unavailable();
        gone.merge(&AvailabilityInfo::default());
        assert!(!gone.unavailable);
    }
}
