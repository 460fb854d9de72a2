//! 7-bit encoded integers.
//!
//! Lengths in world descriptors are stored as little-endian base-128
//! integers: seven value bits per byte, high bit set on every byte but the
//! last. Decoding lives on [`BinaryReader`](crate::BinaryReader).

/// Maximum number of bytes a 7-bit encoded `u32` occupies.
pub const MAX_7BIT_ENCODED_LEN: usize = 5;

/// Append the 7-bit encoding of `value` to `out`.
pub fn write_7bit_encoded_u32(out: &mut Vec<u8>, mut value: u32) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Number of bytes [`write_7bit_encoded_u32`] emits for `value`.
pub const fn encoded_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0x0FFF_FFFF => 4,
        _ => 5,
    }
}

/// Append a byte string prefixed with its 7-bit encoded length.
///
/// Returns `None` without touching `out` when the length does not fit in a
/// `u32`.
pub fn write_prefixed_bytes(out: &mut Vec<u8>, bytes: &[u8]) -> Option<()> {
    let length = u32::try_from(bytes.len()).ok()?;
    out.reserve(encoded_len(length) + bytes.len());
    write_7bit_encoded_u32(out, length);
    out.extend_from_slice(bytes);
    Some(())
}
