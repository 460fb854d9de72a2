//! Record reader for world descriptors.

use std::borrow::Cow;

use seedsmith_common::BinaryReader;

use crate::header::FixedHeader;
use crate::Result;

/// A parsed view over a world descriptor buffer.
///
/// Only the prefix up to and including the seed string is interpreted. The
/// checksum that follows the seed is located separately by the patcher,
/// since its offset is not fixed.
#[derive(Debug, Clone, Copy)]
pub struct WorldDescriptor<'a> {
    header: FixedHeader,
    world_name: &'a [u8],
    seed: &'a [u8],
    header_end: usize,
    seed_end: usize,
}

impl<'a> WorldDescriptor<'a> {
    /// Walk the descriptor header and seed.
    ///
    /// Fails on any truncated field; nothing is defaulted.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        // The version is only consumed to advance past it. The auxiliary
        // block is kept raw.
        let header: FixedHeader = reader.read_struct()?;
        let world_name = reader.read_prefixed_bytes()?;
        let header_end = reader.position();

        let seed = reader.read_prefixed_bytes()?;
        let seed_end = reader.position();

        log::debug!(
            "parsed descriptor: version {}, header ends at {}, seed ends at {}",
            { header.version },
            header_end,
            seed_end
        );

        Ok(Self {
            header,
            world_name,
            seed,
            header_end,
            seed_end,
        })
    }

    /// Format version from the first four bytes.
    pub fn version(&self) -> i32 {
        self.header.version
    }

    /// Raw auxiliary header field.
    pub fn aux(&self) -> [u8; 4] {
        self.header.aux
    }

    /// World name for display.
    pub fn world_name(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.world_name)
    }

    /// Raw seed bytes, as hashed and compared.
    pub fn seed_bytes(&self) -> &'a [u8] {
        self.seed
    }

    /// Seed for display.
    pub fn seed(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.seed)
    }

    /// Offset where the header (version, aux, world name) ends and the seed
    /// length prefix begins. Bytes before it are never rewritten.
    pub fn header_end(&self) -> usize {
        self.header_end
    }

    /// Offset of the first byte after the seed string.
    pub fn seed_end(&self) -> usize {
        self.seed_end
    }

    /// Whether the stored seed equals `target` byte for byte.
    pub fn seed_matches(&self, target: &[u8]) -> bool {
        self.seed == target
    }
}
