//! Capability-based file access for roadtour documents.
//!
//! Road networks, city catalogues and route requests are small UTF-8 JSON
//! files. Paths given on the command line are opened with ambient authority;
//! network files named by a catalogue are opened relative to the catalogue's
//! directory through a [`fs_utf8::Dir`] capability, so a catalogue entry
//! cannot reach outside that directory.
#![forbid(unsafe_code)]

use std::io::{self, Read, Write};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open a UTF-8 file path using ambient authority.
///
/// # Errors
///
/// Propagates the I/O error from opening the file.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole UTF-8 file.
///
/// # Errors
///
/// Propagates I/O errors, including invalid UTF-8 content.
pub fn read_utf8(path: &Utf8Path) -> io::Result<String> {
    let mut contents = String::new();
    open_utf8_file(path)?.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Open the directory containing `path` and return it with the file name.
///
/// # Errors
///
/// Fails if `path` has no file name or its parent cannot be opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Read `name` from inside `dir` without leaving it.
///
/// # Errors
///
/// Fails if `dir` cannot be opened, or if `name` is missing or escapes
/// `dir`.
pub fn read_in_dir(dir: &Utf8Path, name: &str) -> io::Result<String> {
    fs_utf8::Dir::open_ambient_dir(dir, ambient_authority())?.read_to_string(name)
}

/// Whether `path` exists and is a regular file.
///
/// # Errors
///
/// Fails with [`io::ErrorKind::NotFound`] when nothing exists at `path`, and
/// with other errors when the parent cannot be opened or inspected.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Write `contents` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Propagates I/O errors from directory creation or writing.
pub fn write_utf8(path: &Utf8Path, contents: &str) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_dir_and_file(path)?;
    let mut file = dir.create(name.as_str())?;
    file.write_all(contents.as_bytes())?;
    file.flush()
}

/// Ensure the parent directory of `path` exists.
///
/// # Errors
///
/// Propagates I/O errors from opening the base directory or creating the
/// missing components.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }
    let (base_dir, relative) = base_dir_and_relative(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)
}

/// Split a parent path into an ambient base directory and a relative suffix.
///
/// # Errors
///
/// Fails for non-UTF-8 prefixes or when the base directory cannot be opened.
pub fn base_dir_and_relative(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    let (base, std_relative) = match std_parent.components().next() {
        // Windows drive or UNC prefix.
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_parent.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from parent path"))?
                .to_path_buf();
            (base, relative)
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), std_parent.to_path_buf()),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative = Utf8PathBuf::from_path_buf(std_relative)
        .map_err(|_| io::Error::other("non-UTF-8 parent path"))?;
    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn scratch() -> (TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        (dir, root)
    }

    #[rstest]
    fn writes_then_reads(scratch: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = scratch;
        let path = root.join("out/nested/route.json");
        write_utf8(&path, "{\"status\":\"success\"}").expect("write");
        assert!(file_is_file(&path).expect("metadata"));
        assert_eq!(read_utf8(&path).expect("read"), "{\"status\":\"success\"}");
    }

    #[rstest]
    fn missing_file_is_reported(scratch: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = scratch;
        let err = file_is_file(&root.join("absent.json")).expect_err("missing");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn directories_are_not_files(scratch: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = scratch;
        let nested = root.join("cities");
        ensure_parent_dir(&nested.join("kyiv.json")).expect("create");
        assert!(!file_is_file(&nested).expect("metadata"));
    }

    #[rstest]
    fn reads_inside_directory(scratch: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = scratch;
        write_utf8(&root.join("kyiv.json"), "{}").expect("write");
        assert_eq!(read_in_dir(&root, "kyiv.json").expect("read"), "{}");
    }

    #[rstest]
    fn cannot_escape_directory(scratch: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = scratch;
        write_utf8(&root.join("secret.json"), "{}").expect("write");
        let inner = root.join("cities");
        ensure_parent_dir(&inner.join("placeholder")).expect("create");
        assert!(read_in_dir(&inner, "../secret.json").is_err());
    }
}
