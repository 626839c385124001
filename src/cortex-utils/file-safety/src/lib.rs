//! File safety utilities for Cortex.
//!
//! Two concerns live here:
//! - deciding whether a path is safe to load fully into memory as text
//!   (regular file, not a device or special filesystem entry, not oversized)
//! - replacing a file's contents atomically, so a reader sees either the old
//!   bytes or the new bytes and never a truncated file

use std::fmt;
use std::fs::Metadata;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Maximum file size allowed for reading (100MB by default).
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Kind of non-regular filesystem entry that must not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKind {
    /// A directory.
    Directory,
    /// A block device (e.g. `/dev/sda`).
    BlockDevice,
    /// A character device (e.g. `/dev/null`).
    CharDevice,
    /// A FIFO / named pipe.
    Fifo,
    /// A Unix domain socket.
    Socket,
}

impl fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpecialKind::Directory => "directory",
            SpecialKind::BlockDevice => "block device",
            SpecialKind::CharDevice => "character device",
            SpecialKind::Fifo => "FIFO/named pipe",
            SpecialKind::Socket => "socket",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during file validation.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// The path does not exist.
    #[error("No such file: {0}")]
    NotFound(PathBuf),

    /// The path exists but is not a regular file.
    #[error("Cannot read {kind}: {path}")]
    NotRegular { path: PathBuf, kind: SpecialKind },

    /// The path lives under a special system tree.
    #[error("Cannot read special system path: {0}")]
    SpecialPath(PathBuf),

    /// File exceeds maximum allowed size.
    #[error("File too large: {path} ({size} bytes, max {max} bytes)")]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    /// Metadata lookup failed for another reason (e.g. permission denied).
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Validate that a file path is safe to read, using [`MAX_FILE_SIZE`].
///
/// Returns the file size in bytes on success.
pub fn validate_file_for_read(path: &Path) -> Result<u64, FileError> {
    validate_file_for_read_with_limit(path, MAX_FILE_SIZE)
}

/// Validate that a file path is safe to read with a custom size limit.
///
/// `max_size` of 0 disables the size check. Returns the file size in bytes.
///
/// ```no_run
/// use cortex_utils_file_safety::validate_file_for_read_with_limit;
/// use std::path::Path;
///
/// let size = validate_file_for_read_with_limit(Path::new("Cargo.toml"), 0).unwrap();
/// assert!(size > 0);
/// ```
pub fn validate_file_for_read_with_limit(path: &Path, max_size: u64) -> Result<u64, FileError> {
    if is_special_path(path) {
        return Err(FileError::SpecialPath(path.to_path_buf()));
    }

    let metadata = std::fs::metadata(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            FileError::NotFound(path.to_path_buf())
        } else {
            FileError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    if let Some(kind) = classify(&metadata) {
        return Err(FileError::NotRegular {
            path: path.to_path_buf(),
            kind,
        });
    }

    let size = metadata.len();
    if max_size > 0 && size > max_size {
        return Err(FileError::TooLarge {
            path: path.to_path_buf(),
            size,
            max: max_size,
        });
    }

    Ok(size)
}

/// Classify metadata, returning `None` for regular files.
fn classify(metadata: &Metadata) -> Option<SpecialKind> {
    let file_type = metadata.file_type();
    if file_type.is_dir() {
        return Some(SpecialKind::Directory);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;

        if file_type.is_block_device() {
            return Some(SpecialKind::BlockDevice);
        }
        if file_type.is_char_device() {
            return Some(SpecialKind::CharDevice);
        }
        if file_type.is_fifo() {
            return Some(SpecialKind::Fifo);
        }
        if file_type.is_socket() {
            return Some(SpecialKind::Socket);
        }
    }

    None
}

/// Path prefixes of kernel-backed pseudo filesystems and device namespaces.
#[cfg(unix)]
const SPECIAL_PREFIXES: &[&str] = &["/dev/", "/proc/", "/sys/"];
#[cfg(windows)]
const SPECIAL_PREFIXES: &[&str] = &["\\\\.\\"];
#[cfg(not(any(unix, windows)))]
const SPECIAL_PREFIXES: &[&str] = &[];

/// Check if a path appears to be a special system path.
///
/// Purely lexical; no filesystem access.
pub fn is_special_path(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    SPECIAL_PREFIXES
        .iter()
        .any(|prefix| path_str.starts_with(prefix))
}

/// Atomically replace the contents of `path`.
///
/// The content goes to a temporary file created next to the target (same
/// filesystem), is synced to disk, receives the target's permissions, and is
/// then renamed over the target. If `path` is a symlink, the file it points
/// to is replaced and the link is left in place. A read-only target, or one
/// the caller has no write access to, is refused with
/// [`io::ErrorKind::PermissionDenied`].
///
/// The temporary file is removed if any step fails.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let target = resolve_write_target(path)?;
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let existing_permissions = match std::fs::metadata(&target) {
        Ok(metadata) => {
            if metadata.permissions().readonly() {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("{} is read-only", target.display()),
                ));
            }
            ensure_writable(&target)?;
            Some(metadata.permissions())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };

    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());

    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(&parent)?;

    temp.write_all(content)?;
    temp.flush()?;
    if let Some(permissions) = existing_permissions {
        temp.as_file().set_permissions(permissions)?;
    }
    temp.as_file().sync_all()?;

    temp.persist(&target).map_err(|e| e.error)?;

    #[cfg(unix)]
    {
        if let Ok(dir) = std::fs::File::open(&parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

/// Atomically write a string to a file.
///
/// Convenience wrapper around [`atomic_write`] for string content.
pub fn atomic_write_string(path: &Path, content: &str) -> io::Result<()> {
    atomic_write(path, content.as_bytes())
}

/// The rename only needs write access to the directory, so the caller's
/// access to the file itself is checked by opening it for writing. The open
/// neither truncates nor creates.
fn ensure_writable(target: &Path) -> io::Result<()> {
    std::fs::OpenOptions::new()
        .write(true)
        .open(target)
        .map(drop)
        .map_err(|e| {
            if e.kind() == io::ErrorKind::PermissionDenied {
                io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("{} is not writable: {e}", target.display()),
                )
            } else {
                e
            }
        })
}

/// Follow a symlink so the rename lands on the real file.
fn resolve_write_target(path: &Path) -> io::Result<PathBuf> {
    match std::fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => std::fs::canonicalize(path),
        _ => Ok(path.to_path_buf()),
    }
}
