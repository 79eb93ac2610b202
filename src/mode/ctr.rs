use super::{check_spans, load_iv, Direction, OperationMode};
use crate::{
    cipher::BlockCipher, counter::CounterWindow, xor_in_place, Block, Error, BLOCK_SIZE,
};

/// The counter width used by [`Ctr::with_default_width`].
pub const DEFAULT_COUNTER_BITS: u32 = 64;

/// Counter mode.
///
/// The keystream is the encryption of successive counter blocks.
/// The low `m` bits of the counter block hold a big-endian
/// counter that wraps modulo `2^m`; the bits above it are a fixed
/// nonce. Encryption and decryption are the same operation.
#[derive(Clone, Debug)]
pub struct Ctr<C> {
    cipher: C,
    direction: Direction,
    /// The next counter block.
    chain: Block,
    buffer: Block,
    window: Result<CounterWindow, Error>,
    iv_status: Result<(), Error>,
}

impl<C: BlockCipher> Ctr<C> {
    /// Wraps `cipher` with a `counter_bits`-bit counter.
    ///
    /// The counter block starts as `iv` with its counter window
    /// cleared, so the nonce is taken from the high bits of `iv`.
    /// An `iv` that is not one block long or a `counter_bits`
    /// outside `1..=128` leaves the mode invalid.
    ///
    /// `direction` is only recorded: both directions produce the
    /// same output.
    pub fn new(cipher: C, iv: &[u8], counter_bits: u32, direction: Direction) -> Self {
        let window = CounterWindow::new(counter_bits);
        let (mut chain, iv_status) = match load_iv(iv) {
            Ok(chain) => (chain, Ok(())),
            Err(err) => ([0; BLOCK_SIZE], Err(err)),
        };
        match window {
            Ok(w) => w.clear(&mut chain),
            Err(err) => tracing::warn!(%err, "CTR mode created with a bad counter width"),
        }
        if let Err(err) = iv_status {
            tracing::warn!(%err, "CTR mode created without a usable IV");
        }
        Self {
            cipher,
            direction,
            chain,
            buffer: [0; BLOCK_SIZE],
            window,
            iv_status,
        }
    }

    /// Wraps `cipher` with a [`DEFAULT_COUNTER_BITS`]-bit counter.
    pub fn with_default_width(cipher: C, iv: &[u8], direction: Direction) -> Self {
        Self::new(cipher, iv, DEFAULT_COUNTER_BITS, direction)
    }

    /// Returns the underlying cipher.
    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    /// Returns the counter window, if the width was valid.
    pub fn counter_window(&self) -> Option<CounterWindow> {
        self.window.ok()
    }

    /// Returns the next counter block.
    pub fn counter_block(&self) -> &Block {
        &self.chain
    }
}

impl<C: BlockCipher> OperationMode for Ctr<C> {
    fn process(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        let window = self.window?;
        self.iv_status?;
        check_spans(input, output)?;

        self.cipher.encrypt(&self.chain, &mut self.buffer)?;
        window.increment(&mut self.chain);
        xor_in_place(&mut self.buffer, input);
        output.copy_from_slice(&self.buffer);
        Ok(())
    }

    /// Installs `iv` as the counter block as is, counter bits
    /// included.
    fn set_iv(&mut self, iv: &[u8]) -> Result<(), Error> {
        self.chain = load_iv(iv)?;
        self.iv_status = Ok(());
        Ok(())
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    /// CTR is symmetric; the direction is recorded but has no
    /// effect.
    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    fn is_valid(&self) -> bool {
        self.window.is_ok() && self.iv_status.is_ok() && self.cipher.is_valid()
    }
}

#[cfg(feature = "zeroize")]
impl<C> zeroize::ZeroizeOnDrop for Ctr<C> {}

impl<C> Drop for Ctr<C> {
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
