//! Arithmetic in GF(2^8) modulo `x^8 + x^4 + x^3 + x + 1`.
//!
//! Every function is `const` so that the S-boxes and the round
//! constants can be built at compile time.

/// The low byte of the reduction polynomial.
pub const REDUCTION: u8 = 0x1B;

/// Multiplies `a` by `x`.
#[inline(always)]
pub const fn xtime(a: u8) -> u8 {
    let hi = 0u8.wrapping_sub(a >> 7);
    (a << 1) ^ (hi & REDUCTION)
}

/// Multiplies `x` by `y`.
#[inline]
#[allow(clippy::arithmetic_side_effects, reason = "`i` counts to 8.")]
pub const fn multiply(mut x: u8, mut y: u8) -> u8 {
    let mut r = 0;
    let mut i = 0;
    while i < 8 {
        r ^= x & 0u8.wrapping_sub(y & 1);
        x = xtime(x);
        y >>= 1;
        i += 1;
    }
    r
}

/// Raises `a` to the `e`-th power by square-and-multiply.
#[inline]
pub const fn power(mut a: u8, mut e: u32) -> u8 {
    let mut r = 1;
    while e != 0 {
        if e & 1 != 0 {
            r = multiply(r, a);
        }
        a = multiply(a, a);
        e >>= 1;
    }
    r
}

/// Returns the multiplicative inverse of `a`, which is
/// `a^254`.
///
/// Zero has no inverse; `inverse(0)` is `0`.
#[inline]
pub const fn inverse(a: u8) -> u8 {
    power(a, 254)
}
