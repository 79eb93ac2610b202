//! The AES key schedule.
//!
//! Both backends share the Rijndael word recurrence implemented
//! here. They differ only in how they compute `SubWord` and
//! `InvMixColumns`, so their schedules are identical by
//! construction.

use core::fmt;

use crate::{sbox::SBOX, soft, Block, Error, Zeroizing, BLOCK_SIZE};

/// The maximum number of round keys (AES-256).
pub const MAX_ROUND_KEYS: usize = 15;

/// A 32-bit key schedule word, in memory order.
pub type Word = [u8; 4];

/// One of the three AES key sizes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum KeySize {
    /// 128-bit keys, 10 rounds.
    Aes128,
    /// 192-bit keys, 12 rounds.
    Aes192,
    /// 256-bit keys, 14 rounds.
    Aes256,
}

impl KeySize {
    /// Returns the key size for a key of `len` bytes.
    pub const fn from_len(len: usize) -> Result<Self, Error> {
        match len {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            n => Err(Error::InvalidKeyLength(n)),
        }
    }

    /// The size of the key in bits.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Aes128 => 128,
            Self::Aes192 => 192,
            Self::Aes256 => 256,
        }
    }

    /// The size of the key in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// `Nk`, the number of words in the key.
    pub const fn words(self) -> usize {
        match self {
            Self::Aes128 => 4,
            Self::Aes192 => 6,
            Self::Aes256 => 8,
        }
    }

    /// `Nr`, the number of rounds.
    pub const fn rounds(self) -> usize {
        match self {
            Self::Aes128 => 10,
            Self::Aes192 => 12,
            Self::Aes256 => 14,
        }
    }
}

/// An expanded AES key.
///
/// Holds `Nr + 1` encryption round keys and the matching
/// decryption round keys for the equivalent inverse cipher:
/// the first and last are shared, every other one is passed
/// through `InvMixColumns`.
#[derive(Clone)]
pub struct BlockKey {
    size: KeySize,
    enc: [Block; MAX_ROUND_KEYS],
    dec: [Block; MAX_ROUND_KEYS],
}

impl BlockKey {
    /// Builds a key from an encryption schedule, deriving the
    /// decryption schedule with `inv_mix_columns`.
    pub(crate) fn from_encryption_schedule<F>(
        size: KeySize,
        enc: [Block; MAX_ROUND_KEYS],
        mut inv_mix_columns: F,
    ) -> Self
    where
        F: FnMut(&mut Block),
    {
        let mut dec = enc;
        let nr = size.rounds();
        for rk in dec.iter_mut().take(nr).skip(1) {
            inv_mix_columns(rk);
        }
        Self { size, enc, dec }
    }

    /// Returns the key size.
    pub fn size(&self) -> KeySize {
        self.size
    }

    /// Returns `Nr`.
    pub fn rounds(&self) -> usize {
        self.size.rounds()
    }

    /// Returns the `Nr + 1` encryption round keys.
    pub fn encryption_round_keys(&self) -> &[Block] {
        self.enc.get(..=self.rounds()).unwrap_or(&self.enc)
    }

    /// Returns the `Nr + 1` decryption round keys.
    pub fn decryption_round_keys(&self) -> &[Block] {
        self.dec.get(..=self.rounds()).unwrap_or(&self.dec)
    }
}

impl fmt::Debug for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockKey")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "zeroize")]
impl zeroize::ZeroizeOnDrop for BlockKey {}

impl Drop for BlockKey {
    #[inline]
    fn drop(&mut self) {
        #[cfg(feature = "zeroize")]
        {
            use zeroize::Zeroize;
            self.enc.zeroize();
            self.dec.zeroize();
        }
    }
}

/// Expands `key` with the portable `SubWord` and
/// `InvMixColumns`.
pub fn expand(key: &[u8]) -> Result<BlockKey, Error> {
    let size = KeySize::from_len(key.len())?;
    let enc = encryption_schedule(key, size, |w, rcon| match rcon {
        Some(rcon) => {
            let mut t = sub_word(rot_word(w));
            t[0] ^= rcon;
            t
        }
        None => sub_word(w),
    });
    Ok(BlockKey::from_encryption_schedule(
        size,
        enc,
        soft::inv_mix_columns,
    ))
}

/// Runs the Rijndael key expansion.
///
/// `transform(w, rcon)` must return
/// `SubWord(RotWord(w)) ^ rcon` if `rcon` is `Some` and
/// `SubWord(w)` otherwise.
///
/// `key` must be `size.bytes()` long.
#[allow(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    reason = "Indices are bounded by `4 * (Nr + 1) <= 60`."
)]
pub(crate) fn encryption_schedule<F>(
    key: &[u8],
    size: KeySize,
    mut transform: F,
) -> [Block; MAX_ROUND_KEYS]
where
    F: FnMut(Word, Option<u8>) -> Word,
{
    debug_assert_eq!(key.len(), size.bytes());

    let nk = size.words();
    let total = 4 * (size.rounds() + 1);

    let mut w = Zeroizing::new([[0u8; 4]; 4 * MAX_ROUND_KEYS]);
    for (w, k) in w.iter_mut().zip(key.chunks_exact(4)) {
        w.copy_from_slice(k);
    }

    for i in nk..total {
        let mut t = w[i - 1];
        if i % nk == 0 {
            t = transform(t, Some(crate::sbox::rcon(i / nk)));
        } else if nk > 6 && i % nk == 4 {
            t = transform(t, None);
        }
        w[i] = xor_word(w[i - nk], t);
    }

    let mut rk = [[0u8; BLOCK_SIZE]; MAX_ROUND_KEYS];
    for (rk, w) in rk.iter_mut().zip(w.chunks_exact(4)) {
        for (dst, src) in rk.chunks_exact_mut(4).zip(w) {
            dst.copy_from_slice(src);
        }
    }
    rk
}

/// `RotWord`: `[a0, a1, a2, a3] -> [a1, a2, a3, a0]`.
#[inline(always)]
pub fn rot_word(w: Word) -> Word {
    let [a0, a1, a2, a3] = w;
    [a1, a2, a3, a0]
}

/// `SubWord`: the S-box applied to each byte.
#[inline(always)]
#[allow(clippy::indexing_slicing, reason = "`u8` indices are below 256.")]
pub fn sub_word(w: Word) -> Word {
    w.map(|b| SBOX[usize::from(b)])
}

#[inline(always)]
fn xor_word(a: Word, b: Word) -> Word {
    let [a0, a1, a2, a3] = a;
    let [b0, b1, b2, b3] = b;
    [a0 ^ b0, a1 ^ b1, a2 ^ b2, a3 ^ b3]
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::tests::{AES_128_TESTS, AES_192_TESTS, AES_256_TESTS};

    #[test]
    fn test_key_size() {
        assert_eq!(KeySize::from_len(16), Ok(KeySize::Aes128));
        assert_eq!(KeySize::from_len(24), Ok(KeySize::Aes192));
        assert_eq!(KeySize::from_len(32), Ok(KeySize::Aes256));
        for n in [0, 1, 15, 17, 20, 23, 25, 31, 33, 64] {
            assert_eq!(KeySize::from_len(n), Err(Error::InvalidKeyLength(n)));
        }
        for size in [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256] {
            assert_eq!(size.bits(), 32 * size.words() as u32);
            assert_eq!(size.bytes() * 8, size.bits() as usize);
            assert_eq!(size.rounds(), size.words() + 6);
        }
    }

    #[test]
    fn test_word_helpers() {
        assert_eq!(rot_word([0x09, 0xcf, 0x4f, 0x3c]), [0xcf, 0x4f, 0x3c, 0x09]);
        assert_eq!(sub_word([0xcf, 0x4f, 0x3c, 0x09]), [0x8a, 0x84, 0xeb, 0x01]);
    }

    // FIPS-197 appendix A.1.
    #[test]
    fn test_expand_aes128() {
        let key = expand(&hex!("2b7e151628aed2a6abf7158809cf4f3c")).unwrap();
        let rk = key.encryption_round_keys();
        assert_eq!(rk.len(), 11);
        assert_eq!(rk[0], hex!("2b7e151628aed2a6abf7158809cf4f3c"));
        assert_eq!(rk[1], hex!("a0fafe1788542cb123a339392a6c7605"));
        assert_eq!(rk[10], hex!("d014f9a8c9ee2589e13f0cc8b6630ca6"));
    }

    // FIPS-197 appendix A.2.
    #[test]
    fn test_expand_aes192() {
        let key = expand(&hex!("8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b")).unwrap();
        let rk = key.encryption_round_keys();
        assert_eq!(rk.len(), 13);
        assert_eq!(rk[0], hex!("8e73b0f7da0e6452c810f32b809079e5"));
        assert_eq!(rk[1], hex!("62f8ead2522c6b7bfe0c91f72402f5a5"));
        assert_eq!(rk[12], hex!("e98ba06f448c773c8ecc720401002202"));
    }

    // FIPS-197 appendix A.3.
    #[test]
    fn test_expand_aes256() {
        let key = expand(&hex!(
            "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4"
        ))
        .unwrap();
        let rk = key.encryption_round_keys();
        assert_eq!(rk.len(), 15);
        assert_eq!(rk[2], hex!("9ba354118e6925afa51a8b5f2067fcde"));
        assert_eq!(rk[14], hex!("fe4890d1e6188d0b046df344706c631e"));
    }

    #[test]
    fn test_expand_rejects_bad_lengths() {
        for n in [0, 8, 15, 17, 31, 33] {
            let key = [0u8; 40];
            assert_eq!(expand(&key[..n]).unwrap_err(), Error::InvalidKeyLength(n));
        }
    }

    fn check_decryption_schedule(key: &BlockKey) {
        let enc = key.encryption_round_keys();
        let dec = key.decryption_round_keys();
        let nr = key.rounds();
        assert_eq!(enc.len(), nr + 1);
        assert_eq!(dec.len(), nr + 1);
        assert_eq!(dec[0], enc[0]);
        assert_eq!(dec[nr], enc[nr]);
        for i in 1..nr {
            let mut want = enc[i];
            soft::inv_mix_columns(&mut want);
            assert_eq!(dec[i], want, "round {i}");
        }
    }

    #[test]
    fn test_decryption_schedule() {
        for &(key, _, _) in AES_128_TESTS {
            check_decryption_schedule(&expand(&key).unwrap());
        }
        for &(key, _, _) in AES_192_TESTS {
            check_decryption_schedule(&expand(&key).unwrap());
        }
        for &(key, _, _) in AES_256_TESTS {
            check_decryption_schedule(&expand(&key).unwrap());
        }
    }

    #[test]
    fn test_debug_hides_round_keys() {
        let key = expand(&[0xAB; 16]).unwrap();
        let s = format!("{key:?}");
        assert!(s.contains("Aes128"));
        assert!(!s.contains("171"));
        assert!(!s.to_lowercase().contains("ab, "));
    }
}
