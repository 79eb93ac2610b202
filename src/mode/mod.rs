//! Modes of operation.
//!
//! Each mode owns its cipher and processes exactly one block per
//! [`process`][OperationMode::process] call. Modes that chain
//! (CBC, CTR) carry their chaining vector from call to call, so
//! a mode instance must not be shared between threads without
//! external locking.
//!
//! A mode built with a bad IV or counter width stays invalid:
//! every call reports the construction error until it is fixed
//! with [`set_iv`][OperationMode::set_iv] (for IVs) or the mode
//! is rebuilt (for counter widths).

mod cbc;
mod ctr;
mod ecb;

pub use cbc::Cbc;
pub use ctr::{Ctr, DEFAULT_COUNTER_BITS};
pub use ecb::Ecb;

use crate::{cipher::Aes, Block, Error, BLOCK_SIZE};

/// AES in ECB mode.
pub type AesEcb = Ecb<Aes>;

/// AES in CBC mode.
pub type AesCbc = Cbc<Aes>;

/// AES in CTR mode.
pub type AesCtr = Ctr<Aes>;

/// Whether a mode encrypts or decrypts.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Encrypt.
    #[default]
    Encrypt,
    /// Decrypt.
    Decrypt,
}

/// A block cipher mode of operation.
pub trait OperationMode {
    /// Processes one block from `input` into `output`.
    ///
    /// Both spans must be exactly one block long. On error
    /// `output` and the chaining state are left untouched.
    fn process(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error>;

    /// Replaces the chaining vector.
    fn set_iv(&mut self, iv: &[u8]) -> Result<(), Error>;

    /// Reports the current direction.
    fn direction(&self) -> Direction;

    /// Changes the direction of subsequent calls.
    fn set_direction(&mut self, direction: Direction);

    /// Reports whether [`process`][Self::process] can succeed.
    fn is_valid(&self) -> bool;

    /// Processes a block-aligned buffer, one block at a time.
    ///
    /// `input` and `output` must have the same length, which
    /// must be a multiple of the block size.
    fn process_blocks(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        if input.len() % BLOCK_SIZE != 0 {
            return Err(Error::InvalidBlockLength(input.len()));
        }
        if output.len() != input.len() {
            return Err(Error::InvalidBlockLength(output.len()));
        }
        if !self.is_valid() && !input.is_empty() {
            // Surface the precise error without writing.
            let mut scratch = [0u8; BLOCK_SIZE];
            let first = input.get(..BLOCK_SIZE).unwrap_or_default();
            return self.process(first, &mut scratch);
        }
        for (src, dst) in input
            .chunks_exact(BLOCK_SIZE)
            .zip(output.chunks_exact_mut(BLOCK_SIZE))
        {
            self.process(src, dst)?;
        }
        Ok(())
    }
}

/// Copies an IV into a block.
pub(crate) fn load_iv(iv: &[u8]) -> Result<Block, Error> {
    iv.try_into().map_err(|_| Error::InvalidIvLength(iv.len()))
}

/// Checks that both spans are one block long.
pub(crate) fn check_spans(input: &[u8], output: &[u8]) -> Result<(), Error> {
    if input.len() != BLOCK_SIZE {
        return Err(Error::InvalidBlockLength(input.len()));
    }
    if output.len() != BLOCK_SIZE {
        return Err(Error::InvalidBlockLength(output.len()));
    }
    Ok(())
}
