use super::{check_spans, Direction, OperationMode};
use crate::{cipher::BlockCipher, Error};

/// Electronic codebook mode.
///
/// Every block is transformed independently; there is no
/// chaining state.
#[derive(Clone, Debug)]
pub struct Ecb<C> {
    cipher: C,
    direction: Direction,
}

impl<C: BlockCipher> Ecb<C> {
    /// Wraps `cipher`.
    pub fn new(cipher: C, direction: Direction) -> Self {
        Self { cipher, direction }
    }

    /// Returns the underlying cipher.
    pub fn cipher(&self) -> &C {
        &self.cipher
    }
}

impl<C: BlockCipher> OperationMode for Ecb<C> {
    fn process(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        check_spans(input, output)?;
        match self.direction {
            Direction::Encrypt => self.cipher.encrypt(input, output),
            Direction::Decrypt => self.cipher.decrypt(input, output),
        }
    }

    /// ECB has no chaining vector; the IV is ignored.
    fn set_iv(&mut self, _iv: &[u8]) -> Result<(), Error> {
        Ok(())
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    fn is_valid(&self) -> bool {
        self.cipher.is_valid()
    }
}
