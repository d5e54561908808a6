//! Overflow-safe modular arithmetic for 31-bit moduli.
//!
//! Every intermediate value stays below 2^32, so the routines work on plain
//! `u32` without widening. Callers must keep `1 <= m < 2^31`; the fixed
//! [`PRIME`](crate::core::PRIME) satisfies this by construction.

/// Compute `(a * b) mod m` without forming the full product.
///
/// Binary long multiplication over the 31 low bits of `a`. The running
/// partial product starts at `b mod m` and is doubled and reduced each step,
/// so both the accumulator and the partial product stay below `m`.
///
/// Contract: `a < 2^31`, `1 <= m < 2^31`. Any `b` is accepted.
pub fn mul_mod(a: u32, b: u32, m: u32) -> u32 {
    debug_assert!(m != 0 && m < 1 << 31, "modulus out of range: {m}");
    debug_assert!(a < 1 << 31, "multiplicand out of range: {a}");

    let mut result = 0u32;
    let mut partial = b % m;
    for bit in 0..31 {
        if a & (1 << bit) != 0 {
            result = (result + partial) % m;
        }
        partial = (partial << 1) % m;
    }
    result
}

/// Compute `(a ^ b) mod m` by square-and-multiply over the 32 exponent bits.
///
/// Contract: `1 <= m < 2^31`, and `a` and `b` are not both zero (the result
/// for `0^0` is `1 mod m`).
pub fn fast_pow_mod(a: u32, b: u32, m: u32) -> u32 {
    debug_assert!(m != 0 && m < 1 << 31, "modulus out of range: {m}");

    let mut result = 1 % m;
    let mut power = a % m;
    for bit in 0..32 {
        if b & (1 << bit) != 0 {
            result = mul_mod(result, power, m);
        }
        power = mul_mod(power, power, m);
    }
    result
}
