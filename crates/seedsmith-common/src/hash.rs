//! 32-bit string hashes used as field checksums.
//!
//! Both functions walk the input byte by byte (each byte zero-extended, so
//! bytes >= 0x80 contribute 128..=255) and use two's-complement wrapping
//! arithmetic throughout, the same way a 32-bit `int` overflows on the
//! platforms that write these files.

/// Seed value of both accumulators in [`stable_hash`].
const STABLE_SEED: i32 = 5381;

/// Multiplier folding the second accumulator into the first.
const STABLE_MIX: i32 = 1_566_083_941;

/// Double-accumulator djb2 variant.
///
/// Even-indexed bytes feed the first accumulator, odd-indexed bytes the
/// second, each with `acc = (acc * 33) ^ byte`. The result is
/// `acc1 + acc2 * 1566083941`.
#[inline]
pub fn stable_hash(data: &[u8]) -> i32 {
    let mut even = STABLE_SEED;
    let mut odd = STABLE_SEED;

    for (index, &byte) in data.iter().enumerate() {
        let acc = if index % 2 == 0 { &mut even } else { &mut odd };
        *acc = (*acc << 5).wrapping_add(*acc) ^ i32::from(byte);
    }

    even.wrapping_add(odd.wrapping_mul(STABLE_MIX))
}

/// Polynomial hash with multiplier 31 and zero seed.
#[inline]
pub fn polynomial_hash(data: &[u8]) -> i32 {
    data.iter().fold(0i32, |acc, &byte| {
        (acc << 5).wrapping_sub(acc).wrapping_add(i32::from(byte))
    })
}
