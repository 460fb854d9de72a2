//! Seed synchronisation.
//!
//! [`sync_seed`] makes a world's descriptor carry a target seed:
//!
//! 1. Pick the authoritative descriptor ([`WorldFiles::select_source`]).
//! 2. Read its seed. If it already matches, stop.
//! 3. Patch the seed in memory.
//! 4. Write the patched bytes to the primary descriptor if it is not the source.
//! 5. Remove the generated world data so it is rebuilt from the new seed.
//! 6. Write the patched bytes to the source.
//!
//! Every failure before step 4 leaves the disk untouched. The source is
//! committed last, so a run that fails part way still sees the old seed on
//! the next attempt and patches again.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use seedsmith_fwl::{patch_seed, PatchOptions, SeedPatch, WorldDescriptor};

use crate::world::{display_name, SourceKind, WorldFiles};
use crate::write::write_atomic;
use crate::{Error, Result};

/// Options for [`sync_seed`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Checksum detection and scan settings.
    pub patch: PatchOptions,
    /// Compute everything but write and delete nothing.
    pub dry_run: bool,
    /// Leave the generated world data in place after patching.
    pub keep_database: bool,
}

/// What was decided for one descriptor buffer.
#[derive(Debug)]
pub struct Decision<'a> {
    /// The descriptor as read.
    pub descriptor: WorldDescriptor<'a>,
    /// The patched descriptor, or `None` if the seed already matches.
    pub patch: Option<SeedPatch>,
}

/// Decide whether `data` needs its seed replaced by `target`, and build the
/// replacement if so.
pub fn decide<'a>(
    data: &'a [u8],
    target: &[u8],
    options: &PatchOptions,
) -> Result<Decision<'a>> {
    let descriptor = WorldDescriptor::parse(data)?;

    if descriptor.seed_matches(target) {
        return Ok(Decision {
            descriptor,
            patch: None,
        });
    }

    let patch = patch_seed(data, target, options)?;
    Ok(Decision {
        descriptor,
        patch: Some(patch),
    })
}

/// What happened to the generated world data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DatabaseAction {
    /// The file was deleted.
    Removed,
    /// There was no file to delete.
    Missing,
    /// Deletion was disabled.
    Kept,
    /// Dry run; the file would have been deleted.
    Skipped,
}

/// Details of a seed replacement.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PatchReport {
    /// Descriptor the seed was read from.
    pub source: PathBuf,
    /// Whether `source` is a backup or the primary descriptor.
    pub source_kind: SourceKind,
    /// World name stored in the descriptor.
    pub world_name: String,
    /// Descriptor format version.
    pub version: i32,
    /// Seed before patching.
    pub previous_seed: String,
    /// Seed after patching.
    pub seed: String,
    /// Checksum algorithm found and re-applied.
    pub algorithm: &'static str,
    /// Bytes between the seed and its checksum.
    pub gap_len: usize,
    /// Descriptors rewritten, in order. In a dry run, the ones that would be.
    pub targets: Vec<PathBuf>,
    /// Generated world data path.
    pub database: PathBuf,
    /// What happened to it.
    pub database_action: DatabaseAction,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

/// Result of [`sync_seed`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum SyncOutcome {
    /// No target seed was given.
    NoTarget,
    /// The world has no descriptor yet.
    NoDescriptor { dir: PathBuf },
    /// The descriptor already carries the target seed.
    AlreadyCurrent { source: PathBuf, seed: String },
    /// The seed was replaced.
    Patched(PatchReport),
}

/// Make the world described by `files` use seed `target`.
///
/// An empty `target` means "no target" and does nothing.
pub fn sync_seed(files: &WorldFiles, target: &str, options: &SyncOptions) -> Result<SyncOutcome> {
    if target.is_empty() {
        log::info!("no target seed, nothing to do");
        return Ok(SyncOutcome::NoTarget);
    }

    let Some(source) = files.select_source()? else {
        log::info!("no descriptor for {} in {}", files.name(), files.dir().display());
        return Ok(SyncOutcome::NoDescriptor {
            dir: files.dir().to_path_buf(),
        });
    };

    let data = fs::read(&source.path).map_err(Error::io(&source.path))?;
    let decision = decide(&data, target.as_bytes(), &options.patch)?;
    let descriptor = decision.descriptor;

    let Some(patch) = decision.patch else {
        log::info!("{} already has seed {}", display_name(&source.path), target);
        return Ok(SyncOutcome::AlreadyCurrent {
            source: source.path,
            seed: descriptor.seed().into_owned(),
        });
    };

    log::info!(
        "patching {}: {} -> {} ({} checksum, gap {})",
        display_name(&source.path),
        descriptor.seed(),
        target,
        patch.algorithm,
        patch.location.gap_len()
    );

    let primary = files.descriptor_path();
    let database = files.database_path();
    let separate_primary = source.path != primary;

    let database_action = if options.dry_run {
        if options.keep_database {
            DatabaseAction::Kept
        } else {
            DatabaseAction::Skipped
        }
    } else {
        if separate_primary {
            write_descriptor(&primary, &patch.data)?;
        }
        let action = if options.keep_database {
            DatabaseAction::Kept
        } else {
            remove_database(&database)?
        };
        write_descriptor(&source.path, &patch.data)?;
        action
    };

    let mut targets = Vec::with_capacity(2);
    if separate_primary {
        targets.push(primary);
    }
    targets.push(source.path.clone());

    Ok(SyncOutcome::Patched(PatchReport {
        source: source.path,
        source_kind: source.kind,
        world_name: descriptor.world_name().into_owned(),
        version: descriptor.version(),
        previous_seed: descriptor.seed().into_owned(),
        seed: target.to_string(),
        algorithm: patch.algorithm,
        gap_len: patch.location.gap_len(),
        targets,
        database,
        database_action,
        dry_run: options.dry_run,
    }))
}

fn write_descriptor(path: &Path, data: &[u8]) -> Result<()> {
    write_atomic(path, data).map_err(Error::io(path))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

fn remove_database(path: &Path) -> Result<DatabaseAction> {
    match fs::remove_file(path) {
        Ok(()) => {
            log::info!("removed {}", path.display());
            Ok(DatabaseAction::Removed)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("{} not found, nothing to regenerate", path.display());
            Ok(DatabaseAction::Missing)
        }
        Err(e) => Err(Error::io(path)(e)),
    }
}
