// Mon Feb 2 2026 - Alex

use crate::target::{Architecture, TargetError};
use std::fmt;
use std::str::FromStr;

/// Platforms numbered as in `LC_BUILD_VERSION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Unknown = 0,
    MacOS = 1,
    IOS = 2,
    TvOS = 3,
    WatchOS = 4,
    BridgeOS = 5,
    MacCatalyst = 6,
    IOSSimulator = 7,
    TvOSSimulator = 8,
    WatchOSSimulator = 9,
    DriverKit = 10,
}

const PLATFORMS: &[(Platform, &str)] = &[
    (Platform::MacOS, "macos"),
    (Platform::IOS, "ios"),
    (Platform::TvOS, "tvos"),
    (Platform::WatchOS, "watchos"),
    (Platform::BridgeOS, "bridgeos"),
    (Platform::MacCatalyst, "maccatalyst"),
    (Platform::IOSSimulator, "ios-simulator"),
    (Platform::TvOSSimulator, "tvos-simulator"),
    (Platform::WatchOSSimulator, "watchos-simulator"),
    (Platform::DriverKit, "driverkit"),
];

impl Platform {
    pub fn from_build_version(value: u32) -> Platform {
        PLATFORMS
            .iter()
            .find(|(p, _)| *p as u32 == value)
            .map(|(p, _)| *p)
            .unwrap_or(Platform::Unknown)
    }

    pub fn build_version(&self) -> u32 {
        *self as u32
    }

    /// Spelling used in target triples (`x86_64-macos`, `arm64-ios-simulator`).
    pub fn name(&self) -> &'static str {
        PLATFORMS
            .iter()
            .find(|(p, _)| p == self)
            .map(|(_, n)| *n)
            .unwrap_or("unknown")
    }

    /// Spelling used by the `platform:` key of v1 to v3 stubs. Simulators
    /// collapse onto their device platform there.
    pub fn legacy_name(&self) -> &'static str {
        match self {
            Platform::MacOS => "macosx",
            Platform::IOS | Platform::IOSSimulator => "ios",
            Platform::TvOS | Platform::TvOSSimulator => "tvos",
            Platform::WatchOS | Platform::WatchOSSimulator => "watchos",
            Platform::BridgeOS => "bridgeos",
            Platform::MacCatalyst => "iosmac",
            Platform::DriverKit => "driverkit",
            Platform::Unknown => "unknown",
        }
    }

    /// Resolves a legacy `platform:` value for one architecture. Intel slices
    /// of device platforms are simulator slices.
    pub fn from_legacy_name(name: &str, arch: Architecture) -> Result<Vec<Platform>, TargetError> {
        let platform = match name {
            "macosx" | "macos" => Platform::MacOS,
            "ios" => Platform::IOS,
            "tvos" => Platform::TvOS,
            "watchos" => Platform::WatchOS,
            "bridgeos" => Platform::BridgeOS,
            "iosmac" | "maccatalyst" => Platform::MacCatalyst,
            "driverkit" => Platform::DriverKit,
            "zippered" => return Ok(vec![Platform::MacOS, Platform::MacCatalyst]),
            "unknown" => Platform::Unknown,
            other => return Err(TargetError::UnknownPlatform(other.to_string())),
        };

        Ok(vec![platform.for_architecture(arch)])
    }

    pub fn for_architecture(self, arch: Architecture) -> Platform {
        if !arch.is_intel() {
            return self;
        }
        match self {
            Platform::IOS => Platform::IOSSimulator,
            Platform::TvOS => Platform::TvOSSimulator,
            Platform::WatchOS => Platform::WatchOSSimulator,
            other => other,
        }
    }

    pub fn is_simulator(&self) -> bool {
        matches!(
            self,
            Platform::IOSSimulator | Platform::TvOSSimulator | Platform::WatchOSSimulator
        )
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PLATFORMS
            .iter()
            .find(|(_, n)| *n == s)
            .map(|(p, _)| *p)
            .ok_or_else(|| TargetError::UnknownPlatform(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_simulator_resolution() {
        assert_eq!(
            Platform::from_legacy_name("ios", Architecture::X86_64),
            Ok(vec![Platform::IOSSimulator])
        );
        assert_eq!(
            Platform::from_legacy_name("ios", Architecture::Arm64),
            Ok(vec![Platform::IOS])
        );
        assert_eq!(
            Platform::from_legacy_name("macosx", Architecture::X86_64),
            Ok(vec![Platform::MacOS])
        );
        assert_eq!(
            Platform::from_legacy_name("zippered", Architecture::X86_64),
            Ok(vec![Platform::MacOS, Platform::MacCatalyst])
        );
        assert!(Platform::from_legacy_name("beos", Architecture::X86_64).is_err());
    }

    #[test]
    fn test_build_version_numbers() {
        assert_eq!(Platform::from_build_version(6), Platform::MacCatalyst);
        assert_eq!(Platform::from_build_version(99), Platform::Unknown);
        assert_eq!(Platform::DriverKit.build_version(), 10);
        assert_eq!(Platform::IOSSimulator.legacy_name(), "ios");
    }
}
