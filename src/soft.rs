//! Portable AES.
//!
//! The state is a 16-byte block read as a 4x4 column-major
//! matrix: byte `i` sits at row `i % 4`, column `i / 4`. This
//! is also the layout of the round keys, so `AddRoundKey` is a
//! plain XOR.
//!
//! `MixColumns` and its inverse are written as products with
//! the fixed GF(2^8) matrices from FIPS-197.

use crate::{
    backend::{BackendKind, CipherBackend},
    gf,
    key::{self, BlockKey},
    sbox::{INV_SBOX, SBOX},
    Block, Error,
};

/// The `MixColumns` matrix.
pub const MIX: [[u8; 4]; 4] = [
    [0x02, 0x03, 0x01, 0x01],
    [0x01, 0x02, 0x03, 0x01],
    [0x01, 0x01, 0x02, 0x03],
    [0x03, 0x01, 0x01, 0x02],
];

/// The `InvMixColumns` matrix.
pub const INV_MIX: [[u8; 4]; 4] = [
    [0x0e, 0x0b, 0x0d, 0x09],
    [0x09, 0x0e, 0x0b, 0x0d],
    [0x0d, 0x09, 0x0e, 0x0b],
    [0x0b, 0x0d, 0x09, 0x0e],
];

/// The portable backend.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Portable;

impl CipherBackend for Portable {
    fn kind(&self) -> BackendKind {
        BackendKind::Portable
    }

    fn expand_key(&self, key: &[u8]) -> Result<BlockKey, Error> {
        key::expand(key)
    }

    fn encrypt_block(&self, key: &BlockKey, block: &mut Block) {
        encrypt_block(key.encryption_round_keys(), block);
    }

    fn decrypt_block(&self, key: &BlockKey, block: &mut Block) {
        decrypt_block(key.decryption_round_keys(), block);
    }
}

/// Encrypts one block with `Nr + 1` encryption round keys.
pub fn encrypt_block(round_keys: &[Block], block: &mut Block) {
    let Some((first, rest)) = round_keys.split_first() else {
        return;
    };
    let Some((last, middle)) = rest.split_last() else {
        return;
    };

    add_round_key(block, first);
    for rk in middle {
        sub_bytes(block);
        shift_rows(block);
        mix_columns(block);
        add_round_key(block, rk);
    }
    sub_bytes(block);
    shift_rows(block);
    add_round_key(block, last);
}

/// Decrypts one block with `Nr + 1` decryption round keys,
/// using the equivalent inverse cipher.
pub fn decrypt_block(round_keys: &[Block], block: &mut Block) {
    let Some((first, rest)) = round_keys.split_first() else {
        return;
    };
    let Some((last, middle)) = rest.split_last() else {
        return;
    };

    add_round_key(block, last);
    for rk in middle.iter().rev() {
        inv_shift_rows(block);
        inv_sub_bytes(block);
        inv_mix_columns(block);
        add_round_key(block, rk);
    }
    inv_shift_rows(block);
    inv_sub_bytes(block);
    add_round_key(block, first);
}

/// `AddRoundKey`.
#[inline(always)]
pub fn add_round_key(state: &mut Block, rk: &Block) {
    for (s, k) in state.iter_mut().zip(rk) {
        *s ^= *k;
    }
}

/// `SubBytes`.
#[inline(always)]
#[allow(clippy::indexing_slicing, reason = "`u8` indices are below 256.")]
pub fn sub_bytes(state: &mut Block) {
    for s in state {
        *s = SBOX[usize::from(*s)];
    }
}

/// Inverse of `SubBytes`.
#[inline(always)]
#[allow(clippy::indexing_slicing, reason = "`u8` indices are below 256.")]
pub fn inv_sub_bytes(state: &mut Block) {
    for s in state {
        *s = INV_SBOX[usize::from(*s)];
    }
}

/// `ShiftRows`: row `r` is rotated left by `r`.
#[inline(always)]
#[allow(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    reason = "All indices are below 16."
)]
pub fn shift_rows(state: &mut Block) {
    let old = *state;
    for col in 0..4 {
        for row in 0..4 {
            state[col * 4 + row] = old[((col + row) % 4) * 4 + row];
        }
    }
}

/// Inverse of `ShiftRows`: row `r` is rotated right by `r`.
#[inline(always)]
#[allow(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    reason = "All indices are below 16."
)]
pub fn inv_shift_rows(state: &mut Block) {
    let old = *state;
    for col in 0..4 {
        for row in 0..4 {
            state[((col + row) % 4) * 4 + row] = old[col * 4 + row];
        }
    }
}

/// `MixColumns`.
#[inline(always)]
pub fn mix_columns(state: &mut Block) {
    for col in state.chunks_exact_mut(4) {
        mix_column(col, &MIX);
    }
}

/// Inverse of `MixColumns`.
#[inline(always)]
pub fn inv_mix_columns(state: &mut Block) {
    for col in state.chunks_exact_mut(4) {
        mix_column(col, &INV_MIX);
    }
}

/// Replaces `col` with `m * col`.
#[inline(always)]
fn mix_column(col: &mut [u8], m: &[[u8; 4]; 4]) {
    let mut tmp = [0u8; 4];
    for (out, row) in tmp.iter_mut().zip(m) {
        *out = row
            .iter()
            .zip(col.iter())
            .fold(0, |acc, (&a, &b)| acc ^ gf::multiply(a, b));
    }
    col.copy_from_slice(&tmp);
}
