//! Hash-relocating seed patcher.
//!
//! The seed's checksum usually follows the seed string directly, but some
//! producers insert padding in between. Rather than reading a fixed offset,
//! the patcher computes the checksum of the *current* seed and scans forward
//! one byte at a time until it finds those four bytes. Whatever it stepped
//! over is the gap.
//!
//! The rebuilt buffer is:
//!
//! ```text
//! data[..header_end] | len(target) target | gap | checksum(target) | data[checksum_end..]
//! ```

use std::ops::Range;

use byteorder::{ByteOrder, LittleEndian};
use seedsmith_common::{varint, BinaryReader};

use crate::checksum::{AlgorithmSelection, ChecksumAlgorithm, SeedChecksum};
use crate::descriptor::WorldDescriptor;
use crate::{Error, Result};

/// Number of candidate offsets tried after the seed before giving up.
pub const DEFAULT_SCAN_WINDOW: usize = 256;

/// Size of the checksum field in bytes.
pub const CHECKSUM_SIZE: usize = 4;

/// Options for [`patch_seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchOptions {
    /// Which checksum algorithm(s) to look for.
    pub algorithm: AlgorithmSelection,
    /// Maximum number of offsets scanned for the checksum. A value of `n`
    /// tolerates gaps of up to `n - 1` bytes.
    pub scan_window: usize,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmSelection::Auto,
            scan_window: DEFAULT_SCAN_WINDOW,
        }
    }
}

/// Where the checksum of the current seed was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumLocation {
    /// First byte after the seed string, where the scan began.
    pub gap_start: usize,
    /// Offset of the checksum field.
    pub offset: usize,
}

impl ChecksumLocation {
    /// Byte range of the gap between the seed and the checksum.
    pub fn gap(&self) -> Range<usize> {
        self.gap_start..self.offset
    }

    /// Length of the gap.
    pub fn gap_len(&self) -> usize {
        self.offset - self.gap_start
    }

    /// Offset of the first trailing byte after the checksum.
    pub fn end(&self) -> usize {
        self.offset + CHECKSUM_SIZE
    }
}

/// A fully assembled patched descriptor.
#[derive(Debug, Clone)]
pub struct SeedPatch {
    /// The rebuilt descriptor bytes.
    pub data: Vec<u8>,
    /// Name of the checksum algorithm that was found and re-applied.
    pub algorithm: &'static str,
    /// Where the old checksum sat in the input.
    pub location: ChecksumLocation,
    /// Checksum of the previous seed.
    pub old_checksum: i32,
    /// Checksum written for the new seed.
    pub new_checksum: i32,
}

/// Scan forward from `start` for the little-endian `expected` value.
///
/// At most `window` offsets are tried, each one byte past the last. Returns
/// `None` if the window is exhausted or fewer than four bytes remain.
pub fn locate_checksum(
    data: &[u8],
    start: usize,
    expected: i32,
    window: usize,
) -> Option<ChecksumLocation> {
    let mut reader = BinaryReader::new_at(data, start);

    for _ in 0..window {
        let offset = reader.position();
        let candidate = reader.peek_i32().ok()?;

        if candidate == expected {
            return Some(ChecksumLocation {
                gap_start: start,
                offset,
            });
        }

        log::trace!("offset {offset}: {candidate:#010x} != {expected:#010x}");
        reader.seek(offset + 1);
    }

    None
}

/// Locate the checksum of the descriptor's current seed under `checksum`.
pub fn find_checksum<C: SeedChecksum + ?Sized>(
    data: &[u8],
    descriptor: &WorldDescriptor<'_>,
    checksum: &C,
    window: usize,
) -> Option<ChecksumLocation> {
    let expected = checksum.compute(descriptor.seed_bytes());
    locate_checksum(data, descriptor.seed_end(), expected, window)
}

/// Work out which algorithm protects the current seed, and where.
///
/// Candidates are tried in [`AlgorithmSelection::candidates`] order and the
/// first match wins.
pub fn detect_checksum(
    data: &[u8],
    descriptor: &WorldDescriptor<'_>,
    options: &PatchOptions,
) -> Result<(ChecksumAlgorithm, ChecksumLocation)> {
    let mut found: Option<(ChecksumAlgorithm, ChecksumLocation)> = None;

    for &algorithm in options.algorithm.candidates() {
        let Some(location) = find_checksum(data, descriptor, &algorithm, options.scan_window)
        else {
            log::debug!("no {algorithm} checksum within {} bytes", options.scan_window);
            continue;
        };

        log::debug!(
            "{algorithm} checksum at offset {} (gap of {} bytes)",
            location.offset,
            location.gap_len()
        );

        match found {
            None => found = Some((algorithm, location)),
            Some((first, _)) => {
                log::warn!("seed checksum also matches {algorithm}; keeping {first}");
            }
        }
    }

    found.ok_or_else(|| Error::ChecksumNotFound {
        algorithms: options
            .algorithm
            .candidates()
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>()
            .join(", "),
        start: descriptor.seed_end(),
        window: options.scan_window,
    })
}

/// Replace the seed of the descriptor in `data` with `target`.
///
/// The checksum algorithm is chosen per `options`. The input is never
/// modified; a failure leaves nothing half-built.
pub fn patch_seed(data: &[u8], target: &[u8], options: &PatchOptions) -> Result<SeedPatch> {
    let descriptor = WorldDescriptor::parse(data)?;
    let (algorithm, location) = detect_checksum(data, &descriptor, options)?;
    splice(data, &descriptor, location, target, &algorithm)
}

/// Replace the seed using a caller-supplied checksum strategy.
pub fn patch_seed_with<C: SeedChecksum + ?Sized>(
    data: &[u8],
    target: &[u8],
    checksum: &C,
    scan_window: usize,
) -> Result<SeedPatch> {
    let descriptor = WorldDescriptor::parse(data)?;
    let location = find_checksum(data, &descriptor, checksum, scan_window).ok_or_else(|| {
        Error::ChecksumNotFound {
            algorithms: checksum.name().to_string(),
            start: descriptor.seed_end(),
            window: scan_window,
        }
    })?;
    splice(data, &descriptor, location, target, checksum)
}

fn splice<C: SeedChecksum + ?Sized>(
    data: &[u8],
    descriptor: &WorldDescriptor<'_>,
    location: ChecksumLocation,
    target: &[u8],
    checksum: &C,
) -> Result<SeedPatch> {
    let header = &data[..descriptor.header_end()];
    let gap = &data[location.gap()];
    let trailing = &data[location.end()..];

    let old_checksum = checksum.compute(descriptor.seed_bytes());
    let new_checksum = checksum.compute(target);

    let mut output = Vec::with_capacity(
        header.len()
            + varint::MAX_7BIT_ENCODED_LEN
            + target.len()
            + gap.len()
            + CHECKSUM_SIZE
            + trailing.len(),
    );

    output.extend_from_slice(header);
    varint::write_prefixed_bytes(&mut output, target).ok_or(Error::SeedTooLong(target.len()))?;
    output.extend_from_slice(gap);

    let mut checksum_bytes = [0u8; CHECKSUM_SIZE];
    LittleEndian::write_i32(&mut checksum_bytes, new_checksum);
    output.extend_from_slice(&checksum_bytes);

    output.extend_from_slice(trailing);

    Ok(SeedPatch {
        data: output,
        algorithm: checksum.name(),
        location,
        old_checksum,
        new_checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::{PolynomialChecksum, StableChecksum};
    use seedsmith_common::hash::{polynomial_hash, stable_hash};

    /// Build a descriptor with `gap` between the seed and its checksum.
    fn build(name: &[u8], seed: &[u8], gap: &[u8], checksum: i32, trailing: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&4i32.to_le_bytes());
        data.extend_from_slice(&0i32.to_le_bytes());
        varint::write_prefixed_bytes(&mut data, name).unwrap();
        varint::write_prefixed_bytes(&mut data, seed).unwrap();
        data.extend_from_slice(gap);
        data.extend_from_slice(&checksum.to_le_bytes());
        data.extend_from_slice(trailing);
        data
    }

    /// Deterministic pseudo-random payload.
    fn payload(len: usize, mut state: u64) -> Vec<u8> {
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (state >> 56) as u8
            })
            .collect()
    }

    #[test]
    fn test_dedicated_scenario() {
        let trailing = [0xAA; 16];
        let data = build(b"Dedicated", b"OldSeed123", &[], stable_hash(b"OldSeed123"), &trailing);

        let patch = patch_seed(&data, b"NewSeed456", &PatchOptions::default()).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&data[..18]);
        expected.push(10);
        expected.extend_from_slice(b"NewSeed456");
        expected.extend_from_slice(&stable_hash(b"NewSeed456").to_le_bytes());
        expected.extend_from_slice(&trailing);

        assert_eq!(patch.data, expected);
        assert_eq!(patch.algorithm, "stable");
        assert_eq!(patch.location.gap_len(), 0);
        assert_eq!(patch.old_checksum, -924_326_194);
        assert_eq!(patch.new_checksum, -1_272_277_652);
    }

    #[test]
    fn test_gap_preservation() {
        for gap in [&[][..], &[0x00][..], &[0x11, 0x22, 0x33, 0x44, 0x55][..]] {
            let data = build(b"World", b"alpha", gap, stable_hash(b"alpha"), b"tail");
            let patch = patch_seed(&data, b"a much longer seed", &PatchOptions::default()).unwrap();

            assert_eq!(patch.location.gap_len(), gap.len());

            let descriptor = WorldDescriptor::parse(&patch.data).unwrap();
            assert_eq!(descriptor.seed_bytes(), b"a much longer seed");

            let gap_start = descriptor.seed_end();
            let gap_end = gap_start + gap.len();
            assert_eq!(&patch.data[gap_start..gap_end], gap);
            assert_eq!(
                &patch.data[gap_end..gap_end + 4],
                &stable_hash(b"a much longer seed").to_le_bytes()
            );
            assert_eq!(&patch.data[gap_end + 4..], b"tail");
        }
    }

    #[test]
    fn test_byte_preservation_with_random_payload() {
        let trailing = payload(512, 0x5EED);
        let gap = payload(7, 0x6A9);
        let data = build(b"Midgard", b"abcdefgh", &gap, stable_hash(b"abcdefgh"), &trailing);
        let header_end = WorldDescriptor::parse(&data).unwrap().header_end();

        let patch = patch_seed(&data, b"xyz", &PatchOptions::default()).unwrap();

        assert_eq!(&patch.data[..header_end], &data[..header_end]);
        assert!(patch.data.ends_with(&trailing));
        assert_eq!(patch.data.len(), data.len() - 5);
    }

    #[test]
    fn test_length_prefix_grows_and_shrinks() {
        let long = vec![b'L'; 200];
        let data = build(b"World", b"short", &[0x42], stable_hash(b"short"), b"end");
        let header_end = WorldDescriptor::parse(&data).unwrap().header_end();

        let grown = patch_seed(&data, &long, &PatchOptions::default()).unwrap();
        assert_eq!(&grown.data[header_end..header_end + 2], &[0xC8, 0x01]);
        assert_eq!(WorldDescriptor::parse(&grown.data).unwrap().seed_bytes(), &long[..]);

        let shrunk = patch_seed(&grown.data, b"short", &PatchOptions::default()).unwrap();
        assert_eq!(shrunk.data, data);
    }

    #[test]
    fn test_patch_to_same_seed_reproduces_input() {
        let data = build(b"World", b"same", &[9, 9], stable_hash(b"same"), &payload(32, 1));
        let patch = patch_seed(&data, b"same", &PatchOptions::default()).unwrap();
        assert_eq!(patch.data, data);
    }

    #[test]
    fn test_reapplication_is_stable() {
        let data = build(b"World", b"A", &[0xEE], stable_hash(b"A"), &[1, 2, 3]);

        let first = patch_seed(&data, b"B", &PatchOptions::default()).unwrap();
        let descriptor = WorldDescriptor::parse(&first.data).unwrap();
        assert!(descriptor.seed_matches(b"B"));

        let second = patch_seed(&first.data, b"B", &PatchOptions::default()).unwrap();
        assert_eq!(second.data, first.data);
    }

    #[test]
    fn test_polynomial_detected_automatically() {
        let data = build(b"World", b"OldSeed123", &[0, 0], polynomial_hash(b"OldSeed123"), &[7; 8]);
        let patch = patch_seed(&data, b"NewSeed456", &PatchOptions::default()).unwrap();

        assert_eq!(patch.algorithm, "polynomial");
        assert_eq!(patch.new_checksum, polynomial_hash(b"NewSeed456"));
        assert_eq!(patch.location.gap_len(), 2);
    }

    #[test]
    fn test_explicit_algorithm_must_match() {
        let data = build(b"World", b"OldSeed123", &[], stable_hash(b"OldSeed123"), &[0; 8]);
        let options = PatchOptions {
            algorithm: AlgorithmSelection::Only(ChecksumAlgorithm::Polynomial),
            ..PatchOptions::default()
        };

        let err = patch_seed(&data, b"NewSeed456", &options).unwrap_err();
        assert!(matches!(
            err,
            Error::ChecksumNotFound { ref algorithms, .. } if algorithms == "polynomial"
        ));
        assert!(err.is_structural());
    }

    #[test]
    fn test_corrupted_checksum_is_not_found() {
        let data = build(b"World", b"OldSeed123", &[], 0x1234_5678, &payload(300, 3));
        let err = patch_seed(&data, b"NewSeed456", &PatchOptions::default()).unwrap_err();

        match err {
            Error::ChecksumNotFound {
                algorithms,
                start,
                window,
            } => {
                assert_eq!(algorithms, "stable, polynomial");
                assert_eq!(start, WorldDescriptor::parse(&data).unwrap().seed_end());
                assert_eq!(window, DEFAULT_SCAN_WINDOW);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scan_window_bounds_gap() {
        let gap = [0xAB; 5];
        let data = build(b"World", b"seed", &gap, stable_hash(b"seed"), &[]);

        let narrow = PatchOptions {
            scan_window: 5,
            ..PatchOptions::default()
        };
        assert!(patch_seed(&data, b"new", &narrow).is_err());

        let exact = PatchOptions {
            scan_window: 6,
            ..PatchOptions::default()
        };
        assert_eq!(patch_seed(&data, b"new", &exact).unwrap().location.gap_len(), 5);
    }

    #[test]
    fn test_scan_stops_at_end_of_buffer() {
        let mut data = build(b"World", b"seed", &[], 0, &[]);
        // Drop the checksum entirely; only three bytes follow the seed.
        data.truncate(data.len() - 1);

        assert!(locate_checksum(&data, data.len() - 3, 0, DEFAULT_SCAN_WINDOW).is_none());
        assert!(patch_seed(&data, b"x", &PatchOptions::default()).is_err());
    }

    #[test]
    fn test_checksum_at_end_of_buffer() {
        let data = build(b"World", b"seed", &[1, 2, 3], stable_hash(b"seed"), &[]);
        let patch = patch_seed(&data, b"other", &PatchOptions::default()).unwrap();

        assert!(patch.data.ends_with(&stable_hash(b"other").to_le_bytes()));
        assert_eq!(patch.location.end(), data.len());
    }

    #[test]
    fn test_locate_steps_one_byte_at_a_time() {
        let expected = 0x0403_0201i32;
        let data = [0xFF, 0x01, 0x02, 0x03, 0x04, 0xFF];

        let location = locate_checksum(&data, 0, expected, 8).unwrap();
        assert_eq!(location.offset, 1);
        assert_eq!(location.gap(), 0..1);
    }

    #[test]
    fn test_custom_strategy() {
        struct Constant;
        impl SeedChecksum for Constant {
            fn name(&self) -> &'static str {
                "constant"
            }
            fn compute(&self, _seed: &[u8]) -> i32 {
                -1
            }
        }

        let data = build(b"World", b"seed", &[0x10], -1, &[0x20]);
        let patch = patch_seed_with(&data, b"next", &Constant, 4).unwrap();
        assert_eq!(patch.algorithm, "constant");
        assert!(patch.data.ends_with(&[0x10, 0xFF, 0xFF, 0xFF, 0xFF, 0x20]));

        assert!(patch_seed_with(&data, b"next", &PolynomialChecksum, 4).is_err());
        assert!(patch_seed_with(&data, b"next", &StableChecksum, 0).is_err());
    }

    #[test]
    fn test_malformed_descriptor_propagates() {
        let data = [4, 0, 0, 0, 0, 0, 0, 0, 0x05, b'a'];
        let err = patch_seed(&data, b"x", &PatchOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }
}
