//! World save file layout.
//!
//! A world named `W` keeps its files in `<save dir>/worlds_local/`:
//!
//! - `W.fwl` - The primary world descriptor
//! - `W.db` - World data generated from the seed
//! - `W_backup_auto-<timestamp>.fwl` - Automatic descriptor backups
//!
//! Backup timestamps are zero-padded, so the lexicographically greatest
//! backup name is also the most recent one.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::{Error, Result};

/// Directory under the save root holding local worlds.
pub const LOCAL_WORLDS_DIR: &str = "worlds_local";

/// Extension of world descriptor files.
pub const DESCRIPTOR_EXTENSION: &str = "fwl";

/// Extension of generated world data files.
pub const DATABASE_EXTENSION: &str = "db";

/// Marker embedded in automatic backup names.
pub const BACKUP_MARKER: &str = "_backup_auto-";

/// Whether a descriptor came from a backup or the primary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SourceKind {
    /// An automatic backup descriptor.
    Backup,
    /// The primary `<world>.fwl`.
    Primary,
}

/// The descriptor file chosen as the authoritative copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorSource {
    /// Path to the descriptor.
    pub path: PathBuf,
    /// Where it came from.
    pub kind: SourceKind,
}

/// Paths of one world's save files.
#[derive(Debug, Clone)]
pub struct WorldFiles {
    dir: PathBuf,
    name: String,
}

impl WorldFiles {
    /// Files of world `name` under the save root `save_dir`.
    pub fn new(save_dir: impl AsRef<Path>, name: impl Into<String>) -> Self {
        Self {
            dir: save_dir.as_ref().join(LOCAL_WORLDS_DIR),
            name: name.into(),
        }
    }

    /// Files of world `name` directly inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// Directory holding the world's files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// World name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the primary descriptor.
    pub fn descriptor_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.name, DESCRIPTOR_EXTENSION))
    }

    /// Path of the generated world data.
    pub fn database_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.name, DATABASE_EXTENSION))
    }

    /// File name pattern matching this world's descriptor backups.
    ///
    /// The world name is escaped, so names containing `*`, `?` or `[` only
    /// match themselves.
    pub fn backup_pattern(&self) -> Result<Pattern> {
        let pattern = format!(
            "{}*{}*.{}",
            Pattern::escape(&self.name),
            BACKUP_MARKER,
            DESCRIPTOR_EXTENSION
        );
        Ok(Pattern::new(&pattern)?)
    }

    /// The most recent descriptor backup, if any.
    pub fn latest_backup(&self) -> Result<Option<PathBuf>> {
        let pattern = self.backup_pattern()?;

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(&self.dir)(e)),
        };

        let mut latest: Option<PathBuf> = None;
        for entry in entries {
            let entry = entry.map_err(Error::io(&self.dir))?;
            let file_name = entry.file_name();

            let Some(name) = file_name.to_str() else {
                continue;
            };
            if !pattern.matches(name) || !entry.path().is_file() {
                continue;
            }

            let newer = latest
                .as_deref()
                .and_then(Path::file_name)
                .map_or(true, |current| file_name.as_os_str() > current);
            if newer {
                latest = Some(entry.path());
            }
        }

        Ok(latest)
    }

    /// Pick the descriptor to read: the latest backup, else the primary
    /// descriptor, else nothing.
    pub fn select_source(&self) -> Result<Option<DescriptorSource>> {
        if let Some(path) = self.latest_backup()? {
            log::debug!("using backup descriptor {}", path.display());
            return Ok(Some(DescriptorSource {
                path,
                kind: SourceKind::Backup,
            }));
        }

        let primary = self.descriptor_path();
        if primary.is_file() {
            log::debug!("no backups, using {}", primary.display());
            return Ok(Some(DescriptorSource {
                path: primary,
                kind: SourceKind::Primary,
            }));
        }

        Ok(None)
    }
}

/// File name of `path` for display.
pub fn display_name(path: &Path) -> &str {
    path.file_name().and_then(OsStr::to_str).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_paths() {
        let files = WorldFiles::new("/saves", "Dedicated");

        assert_eq!(files.dir(), Path::new("/saves/worlds_local"));
        assert_eq!(
            files.descriptor_path(),
            Path::new("/saves/worlds_local/Dedicated.fwl")
        );
        assert_eq!(
            files.database_path(),
            Path::new("/saves/worlds_local/Dedicated.db")
        );
    }

    #[test]
    fn test_backup_pattern() {
        let files = WorldFiles::in_dir("/w", "Dedicated");
        let pattern = files.backup_pattern().unwrap();

        assert!(pattern.matches("Dedicated_backup_auto-20240101120000.fwl"));
        assert!(!pattern.matches("Dedicated_backup_auto-20240101120000.db"));
        assert!(!pattern.matches("Dedicated.fwl"));
        assert!(!pattern.matches("Other_backup_auto-20240101120000.fwl"));
    }

    #[test]
    fn test_backup_pattern_escapes_name() {
        let files = WorldFiles::in_dir("/w", "W[1]*");
        let pattern = files.backup_pattern().unwrap();

        assert!(pattern.matches("W[1]*_backup_auto-1.fwl"));
        assert!(!pattern.matches("W1x_backup_auto-1.fwl"));
    }

    #[test]
    fn test_latest_backup_is_greatest_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "World.fwl");
        touch(dir.path(), "World_backup_auto-20240101000000.fwl");
        touch(dir.path(), "World_backup_auto-20240301000000.fwl");
        touch(dir.path(), "World_backup_auto-20240201000000.fwl");
        touch(dir.path(), "World_backup_auto-20250101000000.db");

        let files = WorldFiles::in_dir(dir.path(), "World");
        let source = files.select_source().unwrap().unwrap();

        assert_eq!(source.kind, SourceKind::Backup);
        assert_eq!(
            display_name(&source.path),
            "World_backup_auto-20240301000000.fwl"
        );
    }

    #[test]
    fn test_falls_back_to_primary() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "World.fwl");
        touch(dir.path(), "World.db");

        let files = WorldFiles::in_dir(dir.path(), "World");
        let source = files.select_source().unwrap().unwrap();

        assert_eq!(source.kind, SourceKind::Primary);
        assert_eq!(source.path, files.descriptor_path());
    }

    #[test]
    fn test_nothing_to_select() {
        let dir = tempfile::tempdir().unwrap();
        let files = WorldFiles::in_dir(dir.path(), "World");
        assert!(files.select_source().unwrap().is_none());

        let missing = WorldFiles::new(dir.path().join("absent"), "World");
        assert!(missing.select_source().unwrap().is_none());
    }
}
