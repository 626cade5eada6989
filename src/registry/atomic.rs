// Mon Feb 9 2026 - Alex

use crate::format::FormatError;
use log::{debug, warn};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

fn temp_file_for(path: &Path, dir: &Path) -> io::Result<NamedTempFile> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    let suffix = match path.extension() {
        Some(ext) => format!(".{}.tmp", ext.to_string_lossy()),
        None => ".tmp".to_string(),
    };
    Builder::new()
        .prefix(&format!("{}-", stem))
        .suffix(&suffix)
        .rand_bytes(8)
        .tempfile_in(dir)
}

fn rename_into_place(temp: NamedTempFile, path: &Path) -> io::Result<()> {
    temp.persist(path).map(|_| ()).map_err(|e| e.error)
}

/// Writes `contents` to `path`, creating parent directories. With
/// `replace_existing` the bytes go to a sibling temporary file that is then
/// renamed over `path`.
pub fn write_file(path: &Path, contents: &[u8], replace_existing: bool) -> Result<(), FormatError> {
    write_file_with(path, contents, replace_existing, temp_file_for, rename_into_place)
}

/// [`write_file`] with the temporary file creation and the final rename
/// supplied by the caller.
pub(crate) fn write_file_with<S, F>(
    path: &Path,
    contents: &[u8],
    replace_existing: bool,
    stage: S,
    persist: F,
) -> Result<(), FormatError>
where
    S: FnOnce(&Path, &Path) -> io::Result<NamedTempFile>,
    F: FnOnce(NamedTempFile, &Path) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| FormatError::io(dir, e))?;

    if replace_existing {
        match stage(path, dir) {
            Ok(mut temp) => {
                debug!("staging {} in {}", path.display(), temp.path().display());
                temp.write_all(contents)
                    .and_then(|_| temp.as_file().sync_all())
                    .map_err(|e| FormatError::io(temp.path(), e))?;
                // On failure the temporary file is dropped and removed.
                return persist(temp, path).map_err(|e| FormatError::io(path, e));
            }
            Err(e) => {
                warn!(
                    "cannot create a temporary file in {} ({}), writing {} in place",
                    dir.display(),
                    e,
                    path.display()
                );
            }
        }
    }

    fs::write(path, contents).map_err(|e| FormatError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_replace_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libfoo.tbd");
        fs::write(&path, "old").unwrap();
        write_file(&path, b"new", true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(entries(dir.path()), vec!["libfoo.tbd"]);
    }

    #[test]
    fn test_temp_file_name_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libfoo.tbd");
        let mut seen = String::new();
        write_file_with(&path, b"new", true, temp_file_for, |temp, _| {
            seen = temp.path().file_name().unwrap().to_string_lossy().into_owned();
            Ok(())
        })
        .unwrap();
        assert!(seen.starts_with("libfoo-"));
        assert!(seen.ends_with(".tbd.tmp"));
        assert_eq!(seen.len(), "libfoo-".len() + 8 + ".tbd.tmp".len());
    }

    #[test]
    fn test_failed_rename_leaves_destination_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libfoo.tbd");
        fs::write(&path, "original contents").unwrap();

        let err = write_file_with(&path, b"replacement", true, temp_file_for, |_, _| {
            Err(io::Error::new(io::ErrorKind::Other, "rename failed"))
        })
        .unwrap_err();

        assert!(err.to_string().ends_with("libfoo.tbd: rename failed"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "original contents");
        assert_eq!(entries(dir.path()), vec!["libfoo.tbd"]);
    }

    #[test]
    fn test_unavailable_temp_file_falls_back_to_direct_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libfoo.tbd");
        fs::write(&path, "old").unwrap();

        let mut renamed = false;
        write_file_with(
            &path,
            b"new",
            true,
            |_, _| Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only directory")),
            |_, _| {
                renamed = true;
                Ok(())
            },
        )
        .unwrap();

        assert!(!renamed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(entries(dir.path()), vec!["libfoo.tbd"]);
    }

    #[test]
    fn test_direct_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/libfoo.tbd");
        write_file(&path, b"contents", false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "contents");
    }
}
