//! World descriptor (`.fwl`) reader and seed patcher.
//!
//! A world descriptor is a small binary file holding a world's name, seed
//! and identity. This crate reads the seed out of it and rewrites it without
//! disturbing any other byte.
//!
//! # File Format
//!
//! All integers are little-endian.
//!
//! - 4 bytes: Format version (`i32`)
//! - 4 bytes: Auxiliary field, not interpreted
//! - 7-bit encoded length + bytes: World name
//! - 7-bit encoded length + bytes: Seed
//! - 0+ bytes: Gap of unknown content, present in some producer versions
//! - 4 bytes: Checksum of the seed (`i32`)
//! - Remainder: Unique id, generator options and anything else, preserved
//!   verbatim
//!
//! The checksum is one of the hashes in [`ChecksumAlgorithm`]. Because the
//! gap length is unknown, the checksum is located by scanning forward from
//! the end of the seed for the checksum of the current seed.
//!
//! # Example
//!
//! ```no_run
//! use seedsmith_fwl::{patch_seed, PatchOptions, WorldDescriptor};
//!
//! let data = std::fs::read("Dedicated.fwl")?;
//! let descriptor = WorldDescriptor::parse(&data)?;
//! println!("{}: {}", descriptor.world_name(), descriptor.seed());
//!
//! let patch = patch_seed(&data, b"NewSeed456", &PatchOptions::default())?;
//! std::fs::write("Dedicated.fwl", &patch.data)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod descriptor;
mod error;
mod header;

pub mod checksum;
pub mod patch;

pub use checksum::{AlgorithmSelection, ChecksumAlgorithm, SeedChecksum};
pub use descriptor::WorldDescriptor;
pub use error::{Error, Result};
pub use header::FixedHeader;
pub use patch::{patch_seed, patch_seed_with, PatchOptions, SeedPatch, DEFAULT_SCAN_WINDOW};
