// Mon Feb 2 2026 - Alex

use crate::target::{Architecture, Platform, TargetError};
use crate::version::PackedVersion;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// An architecture/platform pair. The deployment target rides along but
/// does not take part in equality, hashing or ordering.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub arch: Architecture,
    pub platform: Platform,
    pub min_deployment: PackedVersion,
}

impl Target {
    pub fn new(arch: Architecture, platform: Platform) -> Self {
        Self {
            arch,
            platform,
            min_deployment: PackedVersion::default(),
        }
    }

    pub fn with_min_deployment(mut self, version: PackedVersion) -> Self {
        self.min_deployment = version;
        self
    }

    /// Legacy Objective-C runtime with `.objc_class_name_` class symbols.
    pub fn uses_fragile_objc_abi(&self) -> bool {
        self.arch == Architecture::I386 && self.platform == Platform::MacOS
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.arch == other.arch && self.platform == other.platform
    }
}

impl Eq for Target {}

impl Hash for Target {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.arch.hash(state);
        self.platform.hash(state);
    }
}

impl PartialOrd for Target {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Target {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.arch, self.platform).cmp(&(other.arch, other.platform))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.arch, self.platform)
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (arch, platform) = s
            .split_once('-')
            .ok_or_else(|| TargetError::MalformedTarget(s.to_string()))?;
        let arch: Architecture = arch.parse()?;
        let platform = match platform {
            "macosx" => Platform::MacOS,
            other => other.parse()?,
        };
        Ok(Target::new(arch, platform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_round_trip() {
        for triple in ["x86_64-macos", "arm64-ios-simulator", "arm64_32-watchos", "x86_64-maccatalyst"] {
            let target: Target = triple.parse().unwrap();
            assert_eq!(target.to_string(), triple);
        }
    }

    #[test]
    fn test_identity_ignores_deployment_target() {
        let a = Target::new(Architecture::Arm64, Platform::MacOS);
        let b = a.with_min_deployment(PackedVersion::new(11, 0, 0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_malformed_triples() {
        assert_eq!(
            "arm64".parse::<Target>(),
            Err(TargetError::MalformedTarget("arm64".to_string()))
        );
        assert!("arm64-plan9".parse::<Target>().is_err());
        assert!("mips-macos".parse::<Target>().is_err());
    }

    #[test]
    fn test_fragile_abi() {
        assert!(Target::new(Architecture::I386, Platform::MacOS).uses_fragile_objc_abi());
        assert!(!Target::new(Architecture::I386, Platform::IOSSimulator).uses_fragile_objc_abi());
        assert!(!Target::new(Architecture::X86_64, Platform::MacOS).uses_fragile_objc_abi());
    }
}
