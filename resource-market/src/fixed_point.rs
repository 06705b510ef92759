//! Q64.64 fixed-point helpers.
//!
//! Fractional protocol constants are unsigned integers scaled by 2^64. Every
//! helper here is checked: `None` means the exact result does not fit the
//! return type or the divisor is zero. Rounding direction is part of the
//! protocol, so callers pick [`floor_div`] or [`ceil_div`] explicitly.

/// Number of fractional bits in a Q64.64 value.
pub const FRACTIONAL_BITS: u32 = 64;

/// `floor(a * b / 2^64)` with a full 192-bit intermediate product.
///
/// `a` is split into 64-bit halves so neither partial product can wrap:
///
/// ```text
/// a * b = (a_hi * b) << 64 + a_lo * b
/// (a * b) >> 64 = a_hi * b + (a_lo * b) >> 64
/// ```
#[inline]
pub fn mul_shift_64(a: u128, b: u64) -> Option<u128> {
    let a_hi = a.checked_shr(FRACTIONAL_BITS)?;
    let a_lo = a & u128::from(u64::MAX);
    let b = u128::from(b);

    let hi = a_hi.checked_mul(b)?;
    let lo = a_lo.checked_mul(b)?.checked_shr(FRACTIONAL_BITS)?;
    hi.checked_add(lo)
}

/// `floor((a << 64) / d)`.
#[inline]
pub fn shl_64_div(a: u64, d: u128) -> Option<u128> {
    u128::from(a).checked_shl(FRACTIONAL_BITS)?.checked_div(d)
}

/// Truncating division. Rounds toward the protocol.
#[inline]
pub fn floor_div(a: u128, b: u128) -> Option<u128> {
    a.checked_div(b)
}

/// `floor((a + b - 1) / b)`, computed without the `a + b` intermediate so it
/// cannot overflow near `u128::MAX`. Rounds against the spender.
#[inline]
pub fn ceil_div(a: u128, b: u128) -> Option<u128> {
    let quotient = a.checked_div(b)?;
    if a.checked_rem(b)? == 0 {
        Some(quotient)
    } else {
        quotient.checked_add(1)
    }
}
