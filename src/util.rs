// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::{BigUint, ModInverse};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Computes a⁻¹ mod m, or `None` when a and m share a factor.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }
    a.mod_inverse(m)?.to_biguint()
}

#[inline]
pub fn is_coprime(a: &BigUint, b: &BigUint) -> bool {
    a.gcd(b).is_one()
}

/// Converts a recovered plaintext into its minimal big-endian byte form.
///
/// Zero maps to an empty message: `b""` and `b"\x00"` are the same integer,
/// so leading zero bytes never survive a textbook RSA round trip.
pub fn biguint_to_bytes_minimal(m: &BigUint) -> Vec<u8> {
    if m.is_zero() {
        return Vec::new();
    }
    m.to_bytes_be()
}

/// Big-endian bytes of `value`, left-padded with zeros to `len`.
///
/// Callers guarantee `value` fits in `len` bytes.
pub fn biguint_to_fixed_bytes(value: &BigUint, len: usize) -> Vec<u8> {
    let bytes = biguint_to_bytes_minimal(value);
    if bytes.len() >= len {
        return bytes;
    }

    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(&bytes);
    out
}

/// Byte length needed to hold `n`.
#[inline]
pub fn byte_len(n: &BigUint) -> usize {
    n.bits().div_ceil(8)
}
