// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec;
use crate::{Error, Result};

use super::{FORMAT_RAW, FORMAT_RECORD};

/// Opaque secret bytes, used by Vernam, Vigenère and one-time-pad ciphers.
///
/// The algorithm name is supplied by the caller since the same material
/// feeds several ciphers.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct RawSecretKey {
    #[zeroize(skip)]
    algorithm: String,
    bytes: Vec<u8>,
}

impl RawSecretKey {
    /// Copies `bytes` into a new key. Empty material is rejected, as is
    /// material or an algorithm name longer than [`codec::MAX_FIELD_LEN`].
    pub fn new(algorithm: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::KeyValidation("secret key material is empty".into()));
        }
        codec::check_field_len(bytes.len(), "secret key material")?;
        let algorithm = algorithm.into();
        codec::check_field_len(algorithm.len(), "algorithm name")?;

        Ok(Self { algorithm, bytes: bytes.to_vec() })
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn format(&self) -> &'static str {
        FORMAT_RAW
    }

    /// Return a copy of the key material.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self)
    }
}

#[cfg(not(feature = "expose-secret"))]
impl std::fmt::Debug for RawSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawSecretKey")
            .field("algorithm", &self.algorithm)
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

/// Integer shift used by the Caesar cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftKey {
    shift: i64,
}

impl ShiftKey {
    pub fn new(shift: i64) -> Self {
        Self { shift }
    }

    #[inline]
    pub fn shift(&self) -> i64 {
        self.shift
    }

    pub fn algorithm(&self) -> &'static str {
        "Caesar"
    }

    pub fn format(&self) -> &'static str {
        FORMAT_RECORD
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self)
    }
}

/// Affine transform `x -> (a·x + b) mod m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AffineKey {
    a: i64,
    b: i64,
    m: u64,
}

impl AffineKey {
    /// Builds the key, requiring `m > 0` and `gcd(a, m) == 1` so the
    /// transform is invertible.
    pub fn new(a: i64, b: i64, m: u64) -> Result<Self> {
        if m == 0 {
            return Err(Error::KeyValidation("affine modulus must be positive".into()));
        }

        let a_mod = reduce(a, m);
        let g = num_integer::gcd(a_mod, m);
        if g != 1 {
            return Err(Error::KeyValidation(format!(
                "affine coefficient {a} is not coprime to modulus {m} (gcd {g})"
            )));
        }

        Ok(Self { a, b, m })
    }

    #[inline]
    pub fn a(&self) -> i64 {
        self.a
    }

    #[inline]
    pub fn b(&self) -> i64 {
        self.b
    }

    #[inline]
    pub fn m(&self) -> u64 {
        self.m
    }

    pub fn algorithm(&self) -> &'static str {
        "Affine"
    }

    pub fn format(&self) -> &'static str {
        FORMAT_RECORD
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self)
    }
}

/// Reduce a signed value into `[0, m)`.
pub(crate) fn reduce(value: i64, m: u64) -> u64 {
    (i128::from(value)).rem_euclid(i128::from(m)) as u64
}

/// Column order for a transposition cipher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermutationKey {
    order: Vec<u32>,
}

impl PermutationKey {
    /// Only emptiness is checked here; ciphers that need a true permutation
    /// validate it when they are initialised.
    pub fn new(order: &[u32]) -> Result<Self> {
        if order.is_empty() {
            return Err(Error::KeyValidation("permutation is empty".into()));
        }
        codec::check_field_len(order.len().saturating_mul(4), "permutation")?;

        Ok(Self { order: order.to_vec() })
    }

    pub fn order(&self) -> &[u32] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn algorithm(&self) -> &'static str {
        "Transposition"
    }

    pub fn format(&self) -> &'static str {
        FORMAT_RECORD
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self)
    }
}

/// Number of rails for the rail fence cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RailfenceKey {
    rails: u64,
}

impl RailfenceKey {
    pub fn new(rails: u64) -> Result<Self> {
        if rails == 0 {
            return Err(Error::KeyValidation("rail count must be positive".into()));
        }

        Ok(Self { rails })
    }

    #[inline]
    pub fn rails(&self) -> u64 {
        self.rails
    }

    pub fn algorithm(&self) -> &'static str {
        "Railfence"
    }

    pub fn format(&self) -> &'static str {
        FORMAT_RECORD
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self)
    }
}

/// Byte substitution table for a monoalphabetic cipher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonoalphabetKey {
    mapping: BTreeMap<u8, u8>,
}

impl MonoalphabetKey {
    pub fn new(mapping: BTreeMap<u8, u8>) -> Result<Self> {
        if mapping.is_empty() {
            return Err(Error::KeyValidation("substitution mapping is empty".into()));
        }

        Ok(Self { mapping })
    }

    /// Build a mapping that sends `from[i]` to `to[i]`.
    pub fn from_alphabets(from: &[u8], to: &[u8]) -> Result<Self> {
        if from.len() != to.len() {
            return Err(Error::KeyValidation(format!(
                "alphabet lengths differ ({} vs {})",
                from.len(),
                to.len()
            )));
        }

        Self::new(from.iter().copied().zip(to.iter().copied()).collect())
    }

    pub fn mapping(&self) -> &BTreeMap<u8, u8> {
        &self.mapping
    }

    pub fn algorithm(&self) -> &'static str {
        "Monoalphabet"
    }

    pub fn format(&self) -> &'static str {
        FORMAT_RECORD
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affine_requires_coprime_coefficient() {
        assert!(matches!(AffineKey::new(2, 3, 4), Err(Error::KeyValidation(_))));
        assert!(AffineKey::new(13, 3, 21).is_ok());
    }

    #[test]
    fn affine_reduces_negative_coefficient() {
        // -1 ≡ 25 (mod 26), coprime
        assert!(AffineKey::new(-1, 0, 26).is_ok());
        // -2 ≡ 24 (mod 26), gcd 2
        assert!(AffineKey::new(-2, 0, 26).is_err());
    }

    #[test]
    fn affine_rejects_zero_modulus() {
        assert!(matches!(AffineKey::new(1, 0, 0), Err(Error::KeyValidation(_))));
    }

    #[test]
    fn raw_secret_key_copies_input() {
        let mut material = vec![1u8, 2, 3];
        let key = RawSecretKey::new("Vernam", &material).unwrap();
        material[0] = 99;

        assert_eq!(key.to_bytes(), vec![1, 2, 3]);
        assert_eq!(key.algorithm(), "Vernam");
        assert_eq!(key.format(), FORMAT_RAW);
    }

    #[test]
    fn empty_material_is_rejected() {
        assert!(RawSecretKey::new("Vernam", &[]).is_err());
        assert!(PermutationKey::new(&[]).is_err());
        assert!(MonoalphabetKey::new(BTreeMap::new()).is_err());
        assert!(RailfenceKey::new(0).is_err());
    }

    #[test]
    fn permutation_allows_duplicates() {
        let key = PermutationKey::new(&[1, 1, 0]).unwrap();
        assert_eq!(key.order(), &[1, 1, 0]);
    }

    #[test]
    fn monoalphabet_from_alphabets() {
        let key = MonoalphabetKey::from_alphabets(b"abc", b"xyz").unwrap();
        assert_eq!(key.mapping().get(&b'b'), Some(&b'y'));
        assert!(MonoalphabetKey::from_alphabets(b"ab", b"x").is_err());
    }

    #[test]
    fn identical_fields_encode_identically() {
        assert_eq!(ShiftKey::new(13).encode(), ShiftKey::new(13).encode());
        assert_ne!(ShiftKey::new(13).encode(), ShiftKey::new(14).encode());
    }
}
