//! Common utilities for seedsmith.
//!
//! This crate provides the low-level building blocks used by the other
//! seedsmith crates:
//!
//! - [`BinaryReader`] - Bounds-checked, zero-copy reading from byte slices
//! - [`varint`] - 7-bit encoded integer writing
//! - [`hash`] - The 32-bit string hashes used as checksums

mod error;
mod reader;

pub mod hash;
pub mod varint;

pub use error::{Error, Result};
pub use reader::BinaryReader;
