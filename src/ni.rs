//! AES using the AES-NI instruction set.
//!
//! Each round is a single `AESENC`/`AESDEC` instruction. The key
//! schedule runs the shared Rijndael recurrence from
//! [`key`](crate::key) with `AESKEYGENASSIST` computing the
//! substituted words, and derives the decryption schedule with
//! `AESIMC`.
//!
//! # Related documents
//! - [Intel AES-NI whitepaper](https://software.intel.com/sites/default/files/article/165683/aes-wp-2012-09-22-v01.pdf)

#[cfg(target_arch = "x86")]
use core::arch::x86 as arch;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64 as arch;

use arch::{
    __m128i, _mm_aesdec_si128, _mm_aesdeclast_si128, _mm_aesenc_si128, _mm_aesenclast_si128,
    _mm_aesimc_si128, _mm_aeskeygenassist_si128, _mm_cvtsi128_si32, _mm_loadu_si128,
    _mm_set_epi32, _mm_shuffle_epi32, _mm_storeu_si128, _mm_xor_si128,
};

use crate::{
    backend::{aes_instructions_available, BackendKind, CipherBackend},
    key::{self, BlockKey, KeySize, Word},
    Block, Error,
};

/// The AES-NI backend.
///
/// Only [`Hardware::detect`] creates one, and it does so only
/// when the CPU supports the instructions used here.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Hardware {
    _private: (),
}

impl Hardware {
    /// Returns the backend if the CPU has AES instructions.
    pub fn detect() -> Option<Self> {
        aes_instructions_available().then_some(Self { _private: () })
    }
}

impl CipherBackend for Hardware {
    fn kind(&self) -> BackendKind {
        BackendKind::Hardware
    }

    fn expand_key(&self, key: &[u8]) -> Result<BlockKey, Error> {
        let size = KeySize::from_len(key.len())?;
        let enc = key::encryption_schedule(key, size, |w, rcon| {
            // SAFETY: `self` proves the CPU supports AES-NI.
            unsafe { keygen_word(w, rcon) }
        });
        Ok(BlockKey::from_encryption_schedule(size, enc, |rk| {
            // SAFETY: `self` proves the CPU supports AES-NI.
            unsafe { inv_mix_columns(rk) }
        }))
    }

    #[inline]
    fn encrypt_block(&self, key: &BlockKey, block: &mut Block) {
        // SAFETY: `self` proves the CPU supports AES-NI.
        unsafe { encrypt(key.encryption_round_keys(), block) }
    }

    #[inline]
    fn decrypt_block(&self, key: &BlockKey, block: &mut Block) {
        // SAFETY: `self` proves the CPU supports AES-NI.
        unsafe { decrypt(key.decryption_round_keys(), block) }
    }
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn load(block: &Block) -> __m128i {
    // SAFETY: `block` is 16 readable bytes and the load is
    // unaligned.
    unsafe { _mm_loadu_si128(block.as_ptr().cast()) }
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn store(block: &mut Block, v: __m128i) {
    // SAFETY: `block` is 16 writable bytes and the store is
    // unaligned.
    unsafe { _mm_storeu_si128(block.as_mut_ptr().cast(), v) }
}

/// Computes `SubWord(RotWord(w)) ^ rcon`, or `SubWord(w)` if
/// `rcon` is `None`.
///
/// `AESKEYGENASSIST` only takes its round constant as an
/// immediate, so it is run with zero and the constant is added
/// afterwards.
#[target_feature(enable = "aes,sse2")]
unsafe fn keygen_word(w: Word, rcon: Option<u8>) -> Word {
    // Place `w` in the second dword.
    let x = _mm_set_epi32(0, 0, i32::from_le_bytes(w), 0);
    let t = _mm_aeskeygenassist_si128::<0>(x);
    match rcon {
        Some(rcon) => {
            // Second dword: RotWord(SubWord(w)).
            let mut v = _mm_cvtsi128_si32(_mm_shuffle_epi32::<0x55>(t)).to_le_bytes();
            v[0] ^= rcon;
            v
        }
        // First dword: SubWord(w).
        None => _mm_cvtsi128_si32(t).to_le_bytes(),
    }
}

#[target_feature(enable = "aes,sse2")]
unsafe fn inv_mix_columns(rk: &mut Block) {
    // SAFETY: the caller guarantees the target features.
    unsafe { store(rk, _mm_aesimc_si128(load(rk))) }
}

#[target_feature(enable = "aes,sse2")]
unsafe fn encrypt(round_keys: &[Block], block: &mut Block) {
    let Some((first, rest)) = round_keys.split_first() else {
        return;
    };
    let Some((last, middle)) = rest.split_last() else {
        return;
    };

    // SAFETY: the caller guarantees the target features.
    unsafe {
        let mut state = _mm_xor_si128(load(block), load(first));
        for rk in middle {
            state = _mm_aesenc_si128(state, load(rk));
        }
        state = _mm_aesenclast_si128(state, load(last));
        store(block, state);
    }
}

#[target_feature(enable = "aes,sse2")]
unsafe fn decrypt(round_keys: &[Block], block: &mut Block) {
    let Some((first, rest)) = round_keys.split_first() else {
        return;
    };
    let Some((last, middle)) = rest.split_last() else {
        return;
    };

    // SAFETY: the caller guarantees the target features.
    unsafe {
        let mut state = _mm_xor_si128(load(block), load(last));
        for rk in middle.iter().rev() {
            state = _mm_aesdec_si128(state, load(rk));
        }
        state = _mm_aesdeclast_si128(state, load(first));
        store(block, state);
    }
}
