// Thu Feb 5 2026 - Alex

//! YAML text stubs, v1 through v4.

pub(crate) mod emit;
pub mod legacy;
pub mod v4;

pub use legacy::TextStubLegacy;
pub use v4::TextStubV4;

use crate::format::{FileMagic, FormatError, MemoryBuffer};
use crate::interface::FileType;
use crate::version::PackedVersion;
use serde::Deserialize;

pub(crate) const TAG_V1: &str = "!tapi-tbd-v1";
pub(crate) const TAG_V2: &str = "!tapi-tbd-v2";
pub(crate) const TAG_V3: &str = "!tapi-tbd-v3";
pub(crate) const TAG_V4: &str = "!tapi-tbd";

/// One `---` document with its tag lifted off. serde_yaml would otherwise
/// read a tagged root mapping as an enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct YamlDocument {
    pub tag: Option<String>,
    pub body: String,
}

pub(crate) fn split_documents(text: &str) -> Vec<YamlDocument> {
    let mut documents = Vec::new();
    let mut current: Option<YamlDocument> = None;

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("---") {
            if let Some(doc) = current.take() {
                documents.push(doc);
            }
            let rest = rest.trim();
            let tag = rest
                .split_whitespace()
                .next()
                .filter(|t| t.starts_with('!'))
                .map(|t| t.to_string());
            let inline = match &tag {
                Some(t) => rest[t.len()..].trim(),
                None => rest,
            };
            let mut body = String::new();
            if !inline.is_empty() {
                body.push_str(inline);
                body.push('\n');
            }
            current = Some(YamlDocument { tag, body });
        } else if line.trim_end() == "..." {
            if let Some(doc) = current.take() {
                documents.push(doc);
            }
        } else {
            let doc = current.get_or_insert_with(|| YamlDocument {
                tag: None,
                body: String::new(),
            });
            doc.body.push_str(line);
            doc.body.push('\n');
        }
    }
    if let Some(doc) = current {
        documents.push(doc);
    }
    documents.retain(|d| d.tag.is_some() || !d.body.trim().is_empty());
    documents
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DocumentHeader {
    archs: Option<serde_yaml::Value>,
    tbd_version: Option<u32>,
}

/// Generation of one document, judged from its tag and the keys it carries.
pub(crate) fn detect(doc: &YamlDocument) -> FileType {
    let Ok(header) = serde_yaml::from_str::<DocumentHeader>(&doc.body) else {
        return FileType::INVALID;
    };
    let legacy = header.archs.is_some() && header.tbd_version.is_none();
    match doc.tag.as_deref() {
        None | Some(TAG_V1) if legacy => FileType::TBD_V1,
        Some(TAG_V2) if legacy => FileType::TBD_V2,
        Some(TAG_V3) if legacy => FileType::TBD_V3,
        Some(TAG_V4) if header.tbd_version == Some(4) => FileType::TBD_V4,
        _ => FileType::INVALID,
    }
}

pub(crate) fn buffer_file_type(magic: FileMagic, buffer: &MemoryBuffer) -> FileType {
    if magic != FileMagic::TextStub {
        return FileType::INVALID;
    }
    let Some(text) = buffer.text() else {
        return FileType::INVALID;
    };
    split_documents(text).first().map(detect).unwrap_or(FileType::INVALID)
}

/// Splits `buffer` and checks every document is of the same generation.
pub(crate) fn load_documents(buffer: &MemoryBuffer) -> Result<(FileType, Vec<YamlDocument>), FormatError> {
    let text = buffer
        .text()
        .ok_or_else(|| FormatError::malformed("text stub is not valid UTF-8"))?;
    let documents = split_documents(text);
    let first = documents
        .first()
        .ok_or_else(|| FormatError::malformed("no YAML document"))?;
    let file_type = detect(first);
    if file_type.is_invalid() {
        return Err(FormatError::UnsupportedFileType);
    }
    for doc in &documents[1..] {
        let other = detect(doc);
        if other != file_type {
            return Err(FormatError::malformed(format!(
                "inlined document is {} in a {} stub",
                other, file_type
            )));
        }
    }
    Ok((file_type, documents))
}

/// `current-version` and friends; absent means 1.0.
pub(crate) fn parse_version(value: Option<&str>, key: &str) -> Result<PackedVersion, FormatError> {
    match value {
        None => Ok(PackedVersion::new(1, 0, 0)),
        Some(v) => PackedVersion::parse32(v)
            .ok_or_else(|| FormatError::malformed(format!("invalid {} '{}'", key, v))),
    }
}

pub(crate) fn is_default_version(version: PackedVersion) -> bool {
    version == PackedVersion::new(1, 0, 0)
}

pub(crate) fn parse_bool_flags(
    flags: &[String],
    file: &mut crate::interface::InterfaceFile,
) -> Result<(), FormatError> {
    for flag in flags {
        match flag.as_str() {
            "flat_namespace" => file.two_level_namespace = false,
            "not_app_extension_safe" => file.application_extension_safe = false,
            "installapi" => file.install_api = true,
            other => return Err(FormatError::malformed(format!("unknown flag '{}'", other))),
        }
    }
    Ok(())
}

pub(crate) fn bool_flags(file: &crate::interface::InterfaceFile) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if !file.two_level_namespace {
        flags.push("flat_namespace");
    }
    if !file.application_extension_safe {
        flags.push("not_app_extension_safe");
    }
    if file.install_api {
        flags.push("installapi");
    }
    flags
}
