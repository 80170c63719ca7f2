//! Gray code (reflected binary code) conversion for queue pointers.
//!
//! Consecutive values differ in exactly one Gray bit, so a pointer sampled by a foreign clock is either the old or
//! the new value, never a mix of both.

/// Encodes a binary value. `gray[i] = bin[i] ^ bin[i + 1]`, the top bit is copied through.
pub const fn to_gray(bin: u64) -> u64 { bin ^ (bin >> 1) }

/// Decodes a Gray value of the given bit width: prefix XOR from the top bit downward.
pub fn to_binary(gray: u64, width: u32) -> u64 {
    let mut bin = 0;
    let mut acc = 0;
    for i in (0..width.min(u64::BITS)).rev() {
        acc ^= (gray >> i) & 1;
        bin |= acc << i;
    }
    bin
}

/// Number of bits that differ between two codes.
pub const fn hamming(a: u64, b: u64) -> u32 { (a ^ b).count_ones() }
