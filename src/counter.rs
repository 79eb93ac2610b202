//! The CTR counter window.
//!
//! The counter is the low `m` bits of a block, read as a
//! big-endian integer. The bits above it (the nonce) are never
//! modified, including the high bits of a partial top byte.

use crate::{Block, Error, BLOCK_SIZE};

/// The widest possible counter, in bits.
pub const MAX_COUNTER_BITS: u32 = 8 * BLOCK_SIZE as u32;

/// The position of an `m`-bit counter inside a block.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CounterWindow {
    bits: u32,
    /// Index of the most significant counter byte.
    offset: usize,
    /// The counter bits of the byte at `offset`.
    top_mask: u8,
}

impl CounterWindow {
    /// Describes the low `bits` bits of a block.
    ///
    /// `bits` must be in `1..=128`.
    #[allow(
        clippy::arithmetic_side_effects,
        clippy::cast_possible_truncation,
        reason = "`bits` is checked to be in 1..=128."
    )]
    pub const fn new(bits: u32) -> Result<Self, Error> {
        if bits == 0 || bits > MAX_COUNTER_BITS {
            return Err(Error::InvalidCounterWidth(bits));
        }
        let bytes = bits.div_ceil(8) as usize;
        let fixed = bytes as u32 * 8 - bits;
        Ok(Self {
            bits,
            offset: BLOCK_SIZE - bytes,
            top_mask: 0xFF >> fixed,
        })
    }

    /// The width of the counter in bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// The index of the most significant counter byte.
    pub const fn byte_offset(&self) -> usize {
        self.offset
    }

    /// The bits of the most significant counter byte that belong
    /// to the counter.
    pub const fn top_byte_mask(&self) -> u8 {
        self.top_mask
    }

    /// Adds one to the counter, modulo `2^m`.
    ///
    /// The carry runs from the last byte towards the top counter
    /// byte and stops there.
    #[inline]
    pub fn increment(&self, block: &mut Block) {
        let Some((top, low)) = block
            .get_mut(self.offset..)
            .and_then(|w| w.split_first_mut())
        else {
            return;
        };
        for b in low.iter_mut().rev() {
            let (v, carry) = b.overflowing_add(1);
            *b = v;
            if !carry {
                return;
            }
        }
        let ctr = (*top & self.top_mask).wrapping_add(1) & self.top_mask;
        *top = (*top & !self.top_mask) | ctr;
    }

    /// Sets the counter to zero.
    pub fn clear(&self, block: &mut Block) {
        self.write(block, 0);
    }

    /// Reads the counter.
    pub fn read(&self, block: &Block) -> u128 {
        u128::from_be_bytes(*block) & self.mask()
    }

    /// Sets the counter to `value` modulo `2^m`.
    pub fn write(&self, block: &mut Block, value: u128) {
        let mask = self.mask();
        let v = u128::from_be_bytes(*block);
        *block = ((v & !mask) | (value & mask)).to_be_bytes();
    }

    #[allow(
        clippy::arithmetic_side_effects,
        reason = "`bits` is checked to be in 1..=128."
    )]
    fn mask(&self) -> u128 {
        u128::MAX >> (MAX_COUNTER_BITS - self.bits)
    }
}
