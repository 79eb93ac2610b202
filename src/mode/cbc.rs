use super::{check_spans, load_iv, Direction, OperationMode};
use crate::{cipher::BlockCipher, xor_in_place, Block, Error, BLOCK_SIZE};

/// Cipher block chaining mode.
///
/// Encryption XORs each plaintext block with the previous
/// ciphertext block (the IV for the first block) before
/// encrypting it. Decryption undoes this.
#[derive(Clone, Debug)]
pub struct Cbc<C> {
    cipher: C,
    direction: Direction,
    /// The previous ciphertext block.
    chain: Block,
    buffer: Block,
    iv_status: Result<(), Error>,
}

impl<C: BlockCipher> Cbc<C> {
    /// Wraps `cipher`, starting the chain at `iv`.
    ///
    /// If `iv` is not one block long the mode is created in an
    /// invalid state; see [`OperationMode::set_iv`].
    pub fn new(cipher: C, iv: &[u8], direction: Direction) -> Self {
        let (chain, iv_status) = match load_iv(iv) {
            Ok(chain) => (chain, Ok(())),
            Err(err) => {
                tracing::warn!(%err, "CBC mode created without a usable IV");
                ([0; BLOCK_SIZE], Err(err))
            }
        };
        Self {
            cipher,
            direction,
            chain,
            buffer: [0; BLOCK_SIZE],
            iv_status,
        }
    }

    /// Returns the underlying cipher.
    pub fn cipher(&self) -> &C {
        &self.cipher
    }
}

impl<C: BlockCipher> OperationMode for Cbc<C> {
    fn process(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        self.iv_status?;
        check_spans(input, output)?;

        match self.direction {
            Direction::Encrypt => {
                self.buffer.copy_from_slice(input);
                xor_in_place(&mut self.buffer, &self.chain);
                let mut next = [0u8; BLOCK_SIZE];
                self.cipher.encrypt(&self.buffer, &mut next)?;
                self.chain = next;
                self.buffer = next;
            }
            Direction::Decrypt => {
                self.cipher.decrypt(input, &mut self.buffer)?;
                xor_in_place(&mut self.buffer, &self.chain);
                self.chain.copy_from_slice(input);
            }
        }
        output.copy_from_slice(&self.buffer);
        Ok(())
    }

    fn set_iv(&mut self, iv: &[u8]) -> Result<(), Error> {
        self.chain = load_iv(iv)?;
        self.iv_status = Ok(());
        Ok(())
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    fn is_valid(&self) -> bool {
        self.iv_status.is_ok() && self.cipher.is_valid()
    }
}

#[cfg(feature = "zeroize")]
impl<C> zeroize::ZeroizeOnDrop for Cbc<C> {}

impl<C> Drop for Cbc<C> {
    #[inline]
    fn drop(&mut self) {
        #[cfg(feature = "zeroize")]
        {
            use zeroize::Zeroize;
            self.chain.zeroize();
            self.buffer.zeroize();
        }
    }
}
