//! Bit packing for the `lfValue` flag array
//!
//! Layout (LSB first): flag `i` occupies bits `2i..2i+2` for the first seven
//! flags, `len - 6` occupies bits 14..16, and flags 7 and 8 continue above the
//! length field at bits 16..20. Arrays of six or seven flags therefore fit in
//! 16 bits.

use bitvec::prelude::*;
use smallvec::SmallVec;

use crate::constants::{LF_LENGTH_SHIFT, LF_MAX_LEN, LF_MAX_VALUE, LF_MIN_LEN};
use crate::error::{IzlError, Result};

/// Unpacked flag array
pub type LfValue = SmallVec<[u8; LF_MAX_LEN]>;

const FLAG_BITS: usize = 2;
const INLINE_FLAGS: usize = LF_LENGTH_SHIFT / FLAG_BITS;

fn flag_offset(idx: usize) -> usize {
    if idx < INLINE_FLAGS {
        idx * FLAG_BITS
    } else {
        idx * FLAG_BITS + FLAG_BITS
    }
}

/// Pack a flag array into a single integer.
///
/// Fails with [`IzlError::Packing`] when the length is outside 6..=9 or a flag
/// is larger than 3.
pub fn pack(flags: &[u8]) -> Result<u32> {
    if !(LF_MIN_LEN..=LF_MAX_LEN).contains(&flags.len()) {
        return Err(IzlError::Packing(format!(
            "length {} outside {}..={}",
            flags.len(),
            LF_MIN_LEN,
            LF_MAX_LEN
        )));
    }
    if let Some((idx, value)) = flags
        .iter()
        .enumerate()
        .find(|(_, value)| **value > LF_MAX_VALUE)
    {
        return Err(IzlError::Packing(format!(
            "flag {} has value {} (max {})",
            idx, value, LF_MAX_VALUE
        )));
    }

    let mut word = 0u32;
    let bits = word.view_bits_mut::<Lsb0>();
    for (idx, value) in flags.iter().enumerate() {
        let start = flag_offset(idx);
        bits[start..start + FLAG_BITS].store::<u8>(*value);
    }
    bits[LF_LENGTH_SHIFT..LF_LENGTH_SHIFT + FLAG_BITS].store::<u8>((flags.len() - LF_MIN_LEN) as u8);
    Ok(word)
}

/// Unpack a flag array. Total: every input yields 6 to 9 flags.
pub fn unpack(word: u32) -> LfValue {
    let bits = word.view_bits::<Lsb0>();
    let len = bits[LF_LENGTH_SHIFT..LF_LENGTH_SHIFT + FLAG_BITS].load::<u8>() as usize + LF_MIN_LEN;
    (0..len)
        .map(|idx| {
            let start = flag_offset(idx);
            bits[start..start + FLAG_BITS].load::<u8>()
        })
        .collect()
}
