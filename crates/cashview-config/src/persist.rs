//! Whole-file replacement shared by every JSON document cashview writes.

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use tempfile::NamedTempFile;

/// Stages `contents` in a temp file next to `path`, then renames it into place.
///
/// Readers see either the previous file or the new one, never a partial write.
/// On error `path` is left untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Reads `path`, or `None` when it does not exist.
pub fn read_if_exists(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(data) => Ok(Some(data)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn replaces_contents_and_leaves_no_staging_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        write_atomic(&path, b"{\"v\":1}").unwrap();
        write_atomic(&path, b"{\"v\":2}").unwrap();
        assert_eq!(read_if_exists(&path).unwrap().as_deref(), Some("{\"v\":2}"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_write_keeps_target_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::create_dir(&path).unwrap();
        assert!(write_atomic(&path, b"{}").is_err());
        assert!(path.is_dir());
        assert_eq!(read_if_exists(&dir.path().join("missing.json")).unwrap(), None);
    }
}
