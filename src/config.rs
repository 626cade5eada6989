// Tue Feb 10 2026 - Alex

use crate::interface::FileType;
use crate::target::{Architecture, ArchitectureSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings of one conversion run. Every field has a default so partial
/// JSON files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub output_format: String,
    pub reexport_output: Option<PathBuf>,
    pub archs: Vec<String>,
    pub replace_existing: bool,
    pub record_undefined: bool,
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            output_format: "tbd-v4".to_string(),
            reexport_output: None,
            archs: Vec::new(),
            replace_existing: false,
            record_undefined: false,
            verbosity: 0,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn with_input(mut self, input: PathBuf) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = format.into();
        self
    }

    pub fn with_reexport_output(mut self, path: PathBuf) -> Self {
        self.reexport_output = Some(path);
        self
    }

    pub fn with_archs(mut self, archs: Vec<String>) -> Self {
        self.archs = archs;
        self
    }

    pub fn with_replace_existing(mut self, replace: bool) -> Self {
        self.replace_existing = replace;
        self
    }

    pub fn with_record_undefined(mut self, record: bool) -> Self {
        self.record_undefined = record;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn file_type(&self) -> Result<FileType, String> {
        let file_type: FileType = self.output_format.parse()?;
        if !file_type.is_text_stub() {
            return Err(format!("'{}' is not a text stub format", self.output_format));
        }
        Ok(file_type)
    }

    /// The requested architectures; an empty list means all of them.
    pub fn architectures(&self) -> Result<ArchitectureSet, String> {
        if self.archs.is_empty() {
            return Ok(ArchitectureSet::all());
        }
        let mut set = ArchitectureSet::new();
        for name in &self.archs {
            let arch: Architecture = name.parse().map_err(|e: crate::target::TargetError| e.to_string())?;
            set.insert(arch);
        }
        Ok(set)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.input.is_none() {
            return Err("an input file must be given".to_string());
        }
        if self.output.is_none() && self.reexport_output.is_none() {
            return Err("nothing to do: give an output or a reexport path".to_string());
        }
        self.file_type()?;
        self.architectures()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validate() {
        let config = Config::new();
        assert!(config.validate().is_err());

        let config = config.with_input("libfoo.dylib".into());
        assert!(config.validate().unwrap_err().starts_with("nothing to do"));

        let config = config.with_output("libfoo.tbd".into());
        assert_eq!(config.validate(), Ok(()));

        let bad = config.clone().with_output_format("mach-o-dylib");
        assert!(bad.validate().is_err());

        let bad = config.with_archs(vec!["pdp11".to_string()]);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_architectures() {
        assert_eq!(Config::new().architectures(), Ok(ArchitectureSet::all()));
        let set = Config::new()
            .with_archs(vec!["arm64".to_string(), "x86_64".to_string()])
            .architectures()
            .unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(Architecture::Arm64));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "input": "libfoo.tbd", "output_format": "tbd-v3", "archs": ["x86_64"] }}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.input, Some(PathBuf::from("libfoo.tbd")));
        assert_eq!(config.file_type(), Ok(FileType::TBD_V3));
        assert!(!config.replace_existing);
        assert!(!config.record_undefined);
    }

    #[test]
    fn test_load_missing() {
        assert!(matches!(
            Config::load("/nonexistent/tbd-tool.json"),
            Err(ConfigError::NotFound(_))
        ));
    }
}
