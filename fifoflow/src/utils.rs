//! Utilities.

use crate::Word;

/// Returns ceiling log2.
pub const fn clog2(value: usize) -> usize {
    if value <= 1 {
        0
    } else {
        (::std::mem::size_of::<usize>() * 8) - (value - 1).leading_zeros() as usize
    }
}

/// Returns ceiling of `value / by`.
pub const fn div_ceil(value: usize, by: usize) -> usize { (value + by - 1) / by }

/// Returns a mask with the low `width` bits set.
pub const fn mask(width: u32) -> Word {
    if width >= Word::BITS {
        Word::MAX
    } else {
        (1 << width) - 1
    }
}

/// Extracts `width` bits of `word` starting at bit `offset`.
pub const fn bit_slice(word: Word, offset: u32, width: u32) -> Word {
    if offset >= Word::BITS {
        0
    } else {
        (word >> offset) & mask(width)
    }
}
