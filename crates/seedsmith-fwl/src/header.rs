//! Fixed-size descriptor prefix.

use zerocopy::{FromBytes, Immutable, KnownLayout};

/// The first eight bytes of a world descriptor.
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct FixedHeader {
    /// Format version.
    pub version: i32,
    /// Auxiliary field. Not interpreted.
    pub aux: [u8; 4],
}
