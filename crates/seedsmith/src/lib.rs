//! seedsmith - pin the world seed of a world save.
//!
//! Rewrites the seed stored in a world descriptor (`.fwl`), keeping every
//! other byte as it was, and deletes the generated world data (`.db`) so it
//! is rebuilt from the new seed.
//!
//! # Crates
//!
//! - [`seedsmith_common`] - Binary reading, 7-bit integers, string hashes
//! - [`seedsmith_fwl`] - Descriptor reader and hash-relocating seed patcher
//!
//! # Example
//!
//! ```no_run
//! use seedsmith::prelude::*;
//!
//! let files = WorldFiles::new("/srv/saves", "Dedicated");
//! match sync_seed(&files, "NewSeed456", &SyncOptions::default())? {
//!     SyncOutcome::Patched(report) => println!("now {}", report.seed),
//!     other => println!("{other:?}"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod sync;
mod world;
mod write;

// Re-export the sub-crates
pub use seedsmith_common as common;
pub use seedsmith_fwl as fwl;

pub use error::{Error, Result};
pub use sync::{
    decide, sync_seed, DatabaseAction, Decision, PatchReport, SyncOptions, SyncOutcome,
};
pub use world::{display_name, DescriptorSource, SourceKind, WorldFiles, LOCAL_WORLDS_DIR};
pub use write::write_atomic;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{sync_seed, DatabaseAction, SyncOptions, SyncOutcome, WorldFiles};
    pub use seedsmith_fwl::{
        patch_seed, AlgorithmSelection, ChecksumAlgorithm, PatchOptions, SeedChecksum,
        WorldDescriptor,
    };
}
