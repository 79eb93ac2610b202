//! Backend selection.
//!
//! A [`Backend`] is chosen once, when a cipher is keyed, and is
//! never changed afterwards. The hardware backend is picked
//! whenever the CPU reports AES instructions; otherwise the
//! portable backend is used.

use crate::{key::BlockKey, soft::Portable, Block, Error};

/// The operations every AES backend provides.
///
/// Backends are stateless: all key material lives in the
/// [`BlockKey`] they return. For the same inputs every backend
/// must produce byte-identical key schedules and blocks.
pub trait CipherBackend {
    /// Reports which backend this is.
    fn kind(&self) -> BackendKind;

    /// Expands a 16, 24 or 32 byte key.
    fn expand_key(&self, key: &[u8]) -> Result<BlockKey, Error>;

    /// Encrypts one block in place.
    fn encrypt_block(&self, key: &BlockKey, block: &mut Block);

    /// Decrypts one block in place.
    fn decrypt_block(&self, key: &BlockKey, block: &mut Block);
}

/// Names a backend.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BackendKind {
    /// AES-NI.
    Hardware,
    /// [`soft`](crate::soft).
    Portable,
}

/// One of the available backends.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Backend {
    /// AES-NI.
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Hardware(crate::ni::Hardware),
    /// The portable backend.
    Portable(Portable),
}

impl Backend {
    /// Picks the fastest backend the CPU supports.
    pub fn detect() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            if let Some(hw) = crate::ni::Hardware::detect() {
                tracing::debug!("using AES-NI backend");
                return Self::Hardware(hw);
            }
        }
        tracing::debug!("AES instructions unavailable, using portable backend");
        Self::Portable(Portable)
    }

    /// Returns the backend named by `kind`.
    ///
    /// Fails with [`Error::BackendUnavailable`] if `kind` is
    /// [`BackendKind::Hardware`] and the CPU lacks AES
    /// instructions.
    pub fn of_kind(kind: BackendKind) -> Result<Self, Error> {
        match kind {
            BackendKind::Portable => Ok(Self::Portable(Portable)),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            BackendKind::Hardware => crate::ni::Hardware::detect()
                .map(Self::Hardware)
                .ok_or(Error::BackendUnavailable),
            #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
            BackendKind::Hardware => Err(Error::BackendUnavailable),
        }
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::detect()
    }
}

impl CipherBackend for Backend {
    #[inline]
    fn kind(&self) -> BackendKind {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Self::Hardware(b) => b.kind(),
            Self::Portable(b) => b.kind(),
        }
    }

    #[inline]
    fn expand_key(&self, key: &[u8]) -> Result<BlockKey, Error> {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Self::Hardware(b) => b.expand_key(key),
            Self::Portable(b) => b.expand_key(key),
        }
    }

    #[inline]
    fn encrypt_block(&self, key: &BlockKey, block: &mut Block) {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Self::Hardware(b) => b.encrypt_block(key, block),
            Self::Portable(b) => b.encrypt_block(key, block),
        }
    }

    #[inline]
    fn decrypt_block(&self, key: &BlockKey, block: &mut Block) {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Self::Hardware(b) => b.decrypt_block(key, block),
            Self::Portable(b) => b.decrypt_block(key, block),
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))] {
        /// Reports whether the CPU has AES instructions.
        ///
        /// Always `false` on this architecture.
        pub fn aes_instructions_available() -> bool {
            false
        }
    } else if #[cfg(any(test, feature = "std"))] {
        /// Reports whether the CPU has AES instructions.
        ///
        /// The answer comes from run-time detection and is
        /// cached for the life of the process.
        pub fn aes_instructions_available() -> bool {
            static AVAILABLE: std::sync::OnceLock<bool> = std::sync::OnceLock::new();
            *AVAILABLE.get_or_init(|| {
                std::is_x86_feature_detected!("aes") && std::is_x86_feature_detected!("sse2")
            })
        }
    } else {
        /// Reports whether the CPU has AES instructions.
        ///
        /// Without `std` only the compile-time target features
        /// are consulted.
        pub fn aes_instructions_available() -> bool {
            cfg!(all(target_feature = "aes", target_feature = "sse2"))
        }
    }
}
