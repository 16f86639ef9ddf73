// Copyright (C) Brian G. Milnes 2025

//! Transactional writer: back up, overwrite, then clean up or roll back
//!
//! The backup is a uniquely named sibling of the target, so restoring it is a
//! same-directory rename.

pub mod writer {
    use std::fs::{self, File, Permissions};
    use std::io::{self, Write};
    use std::path::{Path, PathBuf};
    use tempfile::{Builder, NamedTempFile, PersistError};
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum WriteError {
        #[error("cannot back up {}", .path.display())]
        Backup {
            path: PathBuf,
            #[source]
            source: io::Error,
        },
        #[error("cannot write {}, original restored", .path.display())]
        Overwrite {
            path: PathBuf,
            #[source]
            source: io::Error,
        },
        #[error("cannot write {} and cannot restore it from {}: {restore}", .path.display(), .backup.display())]
        Restore {
            path: PathBuf,
            backup: PathBuf,
            #[source]
            source: io::Error,
            restore: io::Error,
        },
        #[error("cannot remove backup {}", .backup.display())]
        Cleanup {
            backup: PathBuf,
            #[source]
            source: io::Error,
        },
    }

    /// Replace `path`'s content with `contents`, keeping `original` safe until it lands
    pub fn write_with_backup(
        path: &Path,
        original: &[u8],
        perm: &Permissions,
        contents: &[u8],
    ) -> Result<(), WriteError> {
        write_with_backup_using(path, original, perm, contents, overwrite)
    }

    /// As `write_with_backup`, with the overwrite step supplied by the caller
    pub fn write_with_backup_using<F>(
        path: &Path,
        original: &[u8],
        perm: &Permissions,
        contents: &[u8],
        overwrite: F,
    ) -> Result<(), WriteError>
    where
        F: FnOnce(&Path, &[u8], &Permissions) -> io::Result<()>,
    {
        let backup = create_backup(path, original, perm).map_err(|source| WriteError::Backup {
            path: path.to_path_buf(),
            source,
        })?;
        let backup_path = backup.path().to_path_buf();

        if let Err(source) = overwrite(path, contents, perm) {
            return match backup.persist(path) {
                Ok(_) => Err(WriteError::Overwrite {
                    path: path.to_path_buf(),
                    source,
                }),
                Err(PersistError { error, file }) => {
                    // Leave the backup on disk; it is the only copy left
                    let backup = file.keep().map(|(_, kept)| kept).unwrap_or(backup_path);
                    Err(WriteError::Restore {
                        path: path.to_path_buf(),
                        backup,
                        source,
                        restore: error,
                    })
                }
            };
        }

        backup.close().map_err(|source| WriteError::Cleanup {
            backup: backup_path,
            source,
        })
    }

    /// Sibling temp file holding the original bytes and permissions
    fn create_backup(path: &Path, original: &[u8], perm: &Permissions) -> io::Result<NamedTempFile> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut backup = Builder::new().prefix(&format!("{name}.")).tempfile_in(dir)?;
        copy_permissions(backup.as_file(), perm)?;
        backup.write_all(original)?;
        backup.as_file().sync_all()?;
        Ok(backup)
    }

    #[cfg(unix)]
    fn copy_permissions(file: &File, perm: &Permissions) -> io::Result<()> {
        file.set_permissions(perm.clone())
    }

    // Permission bits carry no meaning here
    #[cfg(not(unix))]
    fn copy_permissions(_file: &File, _perm: &Permissions) -> io::Result<()> {
        Ok(())
    }

    fn overwrite(path: &Path, contents: &[u8], perm: &Permissions) -> io::Result<()> {
        fs::write(path, contents)?;
        fs::set_permissions(path, perm.clone())
    }
}
