//! The AES S-box, its inverse and the key schedule round
//! constants.
//!
//! All three tables are derived from [`gf`](crate::gf) at
//! compile time and are shared by both backends.

use crate::gf;

/// The forward S-box.
pub static SBOX: [u8; 256] = build_sbox();

/// The inverse S-box.
pub static INV_SBOX: [u8; 256] = build_inv_sbox();

/// Round constants, `RCON[j] = x^(j-1)` for `j >= 1`.
///
/// `RCON[0]` is unused.
pub static RCON: [u8; 11] = build_rcon();

/// Computes `S(x)`: the field inverse followed by the affine
/// transform.
#[inline]
pub const fn sub_byte(x: u8) -> u8 {
    let y = gf::inverse(x);
    y ^ y.rotate_left(1) ^ y.rotate_left(2) ^ y.rotate_left(3) ^ y.rotate_left(4) ^ 0x63
}

/// Computes `S^-1(x)`: the inverse affine transform followed by
/// the field inverse.
#[inline]
pub const fn inv_sub_byte(x: u8) -> u8 {
    gf::inverse(x.rotate_left(1) ^ x.rotate_left(3) ^ x.rotate_left(6) ^ 0x05)
}

/// Returns `Rcon(j)`, or zero if `j` is out of range.
#[inline]
pub fn rcon(j: usize) -> u8 {
    RCON.get(j).copied().unwrap_or(0)
}

#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    reason = "Evaluated at compile time over 0..256."
)]
const fn build_sbox() -> [u8; 256] {
    let mut t = [0; 256];
    let mut i = 0;
    while i < 256 {
        t[i] = sub_byte(i as u8);
        i += 1;
    }
    t
}

#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    reason = "Evaluated at compile time over 0..256."
)]
const fn build_inv_sbox() -> [u8; 256] {
    let mut t = [0; 256];
    let mut i = 0;
    while i < 256 {
        t[i] = inv_sub_byte(i as u8);
        i += 1;
    }
    t
}

#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    reason = "Evaluated at compile time over 1..11."
)]
const fn build_rcon() -> [u8; 11] {
    let mut t = [0; 11];
    t[1] = 0x01;
    let mut j = 2;
    while j < t.len() {
        t[j] = gf::xtime(t[j - 1]);
        j += 1;
    }
    t
}
