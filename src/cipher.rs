//! The block cipher interface and AES.

use crate::{
    backend::{Backend, BackendKind, CipherBackend},
    key::BlockKey,
    to_block, Block, Error, BLOCK_SIZE,
};

/// A keyed block cipher, as seen by the modes of operation.
pub trait BlockCipher {
    /// Encrypts the single block `block` into `out`.
    ///
    /// Both spans must be exactly one block long.
    fn encrypt(&self, block: &[u8], out: &mut [u8]) -> Result<(), Error>;

    /// Decrypts the single block `block` into `out`.
    ///
    /// Both spans must be exactly one block long.
    fn decrypt(&self, block: &[u8], out: &mut [u8]) -> Result<(), Error>;

    /// Installs a new key.
    ///
    /// On failure the previous key, if any, is kept.
    fn set_key(&mut self, key: &[u8]) -> Result<(), Error>;

    /// Reports whether a key is installed.
    fn is_valid(&self) -> bool;

    /// The key size in bits, or zero if no key is installed.
    fn key_size(&self) -> u32;

    /// The block size in bits.
    fn block_size(&self) -> u32;
}

/// AES-128, AES-192 or AES-256, chosen by key length.
///
/// The backend is picked when the cipher is created and does not
/// change afterwards, not even across [`set_key`][Aes::set_key].
#[derive(Clone, Debug)]
pub struct Aes {
    backend: Backend,
    key: Option<BlockKey>,
}

impl Aes {
    /// The size in octets of an AES block.
    pub const BLOCK_SIZE: usize = BLOCK_SIZE;

    /// Creates a cipher using the fastest available backend.
    pub fn new(key: &[u8]) -> Result<Self, Error> {
        let mut aes = Self::unkeyed();
        aes.set_key(key)?;
        Ok(aes)
    }

    /// Creates a cipher using a particular backend.
    pub fn with_backend(key: &[u8], kind: BackendKind) -> Result<Self, Error> {
        let mut aes = Self {
            backend: Backend::of_kind(kind)?,
            key: None,
        };
        aes.set_key(key)?;
        Ok(aes)
    }

    /// Creates a cipher without a key.
    ///
    /// Every encryption or decryption fails with
    /// [`Error::KeyNotSet`] until a key is installed.
    pub fn unkeyed() -> Self {
        Self {
            backend: Backend::detect(),
            key: None,
        }
    }

    /// Reports which backend this cipher uses.
    pub fn backend(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Returns the installed key.
    pub fn key(&self) -> Option<&BlockKey> {
        self.key.as_ref()
    }

    /// Installs an already expanded key.
    pub fn set_block_key(&mut self, key: &BlockKey) {
        tracing::debug!(bits = key.size().bits(), "installing expanded AES key");
        self.key = Some(key.clone());
    }

    /// Encrypts one block in place.
    #[inline]
    pub fn encrypt_block(&self, block: &mut Block) -> Result<(), Error> {
        let key = self.key.as_ref().ok_or(Error::KeyNotSet)?;
        self.backend.encrypt_block(key, block);
        Ok(())
    }

    /// Decrypts one block in place.
    #[inline]
    pub fn decrypt_block(&self, block: &mut Block) -> Result<(), Error> {
        let key = self.key.as_ref().ok_or(Error::KeyNotSet)?;
        self.backend.decrypt_block(key, block);
        Ok(())
    }
}

impl Default for Aes {
    fn default() -> Self {
        Self::unkeyed()
    }
}

impl BlockCipher for Aes {
    fn encrypt(&self, block: &[u8], out: &mut [u8]) -> Result<(), Error> {
        let mut tmp = to_block(block)?;
        if out.len() != BLOCK_SIZE {
            return Err(Error::InvalidBlockLength(out.len()));
        }
        self.encrypt_block(&mut tmp)?;
        out.copy_from_slice(&tmp);
        Ok(())
    }

    fn decrypt(&self, block: &[u8], out: &mut [u8]) -> Result<(), Error> {
        let mut tmp = to_block(block)?;
        if out.len() != BLOCK_SIZE {
            return Err(Error::InvalidBlockLength(out.len()));
        }
        self.decrypt_block(&mut tmp)?;
        out.copy_from_slice(&tmp);
        Ok(())
    }

    fn set_key(&mut self, key: &[u8]) -> Result<(), Error> {
        let key = self.backend.expand_key(key).inspect_err(|err| {
            tracing::debug!(%err, "rejecting AES key");
        })?;
        tracing::debug!(
            bits = key.size().bits(),
            backend = ?self.backend.kind(),
            "installed AES key"
        );
        self.key = Some(key);
        Ok(())
    }

    fn is_valid(&self) -> bool {
        self.key.is_some()
    }

    fn key_size(&self) -> u32 {
        self.key.as_ref().map_or(0, |k| k.size().bits())
    }

    fn block_size(&self) -> u32 {
        128
    }
}
