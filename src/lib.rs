//! AES-128/192/256 with interchangeable hardware and portable
//! backends, and the ECB, CBC and CTR modes of operation.
//!
//! ```
//! use rijndael_modes::{Aes, AesCbc, Direction, OperationMode};
//!
//! let key = [0u8; 16];
//! let iv = [0u8; 16];
//! let mut cbc = AesCbc::new(Aes::new(&key)?, &iv, Direction::Encrypt);
//!
//! let mut out = [0u8; 16];
//! cbc.process(&[0x42; 16], &mut out)?;
//! # Ok::<(), rijndael_modes::Error>(())
//! ```
//!
//! # Warning
//!
//! This is low-level cryptography. None of the modes here
//! authenticate their output and none of them pad. Do NOT use
//! this code unless you know exactly what you are doing. If in
//! doubt, use [`aes-gcm`] instead.
//!
//! [`aes-gcm`]: https://crates.io/crates/aes-gcm

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(any(test, doctest, feature = "std")), no_std)]

pub mod backend;
pub mod cipher;
pub mod counter;
mod error;
pub mod gf;
pub mod key;
pub mod mode;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod ni;
pub mod sbox;
pub mod soft;
mod tests;

pub use backend::{Backend, BackendKind, CipherBackend};
pub use cipher::{Aes, BlockCipher};
pub use counter::CounterWindow;
pub use error::Error;
pub use key::{BlockKey, KeySize};
pub use mode::{AesCbc, AesCtr, AesEcb, Cbc, Ctr, Direction, Ecb, OperationMode};

/// The size in bytes of an AES block.
pub const BLOCK_SIZE: usize = 16;

/// An AES block.
pub type Block = [u8; BLOCK_SIZE];

cfg_if::cfg_if! {
    if #[cfg(feature = "zeroize")] {
        pub(crate) use zeroize::Zeroizing;
    } else {
        pub(crate) struct Zeroizing<T>(core::marker::PhantomData<T>);
        impl<T> Zeroizing<T> {
            #[inline(always)]
            pub fn new(v: T) -> T {
                v
            }
        }
    }
}

/// XORs `src` into `dst`.
///
/// Only the common prefix of the two slices is touched.
#[inline]
pub fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= *s;
    }
}

/// Returns `a ^ b`.
#[inline]
pub fn xor(a: &Block, b: &Block) -> Block {
    let mut out = *a;
    xor_in_place(&mut out, b);
    out
}

/// Converts a slice into a block, or reports its length.
#[inline(always)]
pub(crate) fn to_block(data: &[u8]) -> Result<Block, Error> {
    data.try_into()
        .map_err(|_| Error::InvalidBlockLength(data.len()))
}
