// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::{BigUint, RandBigInt, RandPrime};
use num_traits::One;
use rand::{CryptoRng, RngCore};
use tracing::{debug, warn};

use crate::key::{RsaKeyPair, RsaPrivateKey};
use crate::util::{is_coprime, mod_inverse};
use crate::{Error, Result};

/// Attempts at drawing a random exponent coprime to φ before giving up.
const EXPONENT_ATTEMPTS: usize = 1_000;

/// Builder for RSA key pairs.
///
/// Either supply both primes with [`primes`](Self::primes), or let the
/// generator draw them for a modulus of [`bit_length`](Self::bit_length)
/// bits. Without an explicit [`public_exponent`](Self::public_exponent), a
/// random exponent coprime to φ is drawn.
#[derive(Debug, Clone)]
pub struct RsaKeyGenerator {
    primes: Option<(BigUint, BigUint)>,
    exponent: Option<BigUint>,
    bit_length: usize,
}

impl RsaKeyGenerator {
    /// Minimum recommended modulus size.
    pub const MIN_SECURE_BITS: usize = 2048;

    /// Smallest modulus the generator will draw primes for.
    #[cfg(not(feature = "allow-weak-keys"))]
    pub const ABSOLUTE_MIN_BITS: usize = 512;

    #[cfg(feature = "allow-weak-keys")]
    pub const ABSOLUTE_MIN_BITS: usize = 64;

    pub fn new() -> Self {
        Self { primes: None, exponent: None, bit_length: Self::MIN_SECURE_BITS }
    }

    /// Use the given primes instead of generating them.
    ///
    /// Primality is not checked.
    pub fn primes(mut self, p: BigUint, q: BigUint) -> Self {
        self.primes = Some((p, q));
        self
    }

    pub fn public_exponent(mut self, e: BigUint) -> Self {
        self.exponent = Some(e);
        self
    }

    /// Modulus size used when primes are generated.
    pub fn bit_length(mut self, bits: usize) -> Self {
        self.bit_length = bits;
        self
    }

    /// Generate the key pair, drawing any randomness from `rng`.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R) -> Result<RsaKeyPair> {
        let (p, q) = match &self.primes {
            Some((p, q)) => (p.clone(), q.clone()),
            None => self.random_primes(rng)?,
        };

        let two = BigUint::from(2u32);
        if p < two || q < two {
            return Err(Error::KeyGeneration("primes must be at least 2".into()));
        }
        if p == q {
            return Err(Error::KeyGeneration("primes must be distinct".into()));
        }

        let n = &p * &q;
        let phi = (&p - BigUint::one()) * (&q - BigUint::one());

        let e = match &self.exponent {
            Some(e) => {
                if *e <= BigUint::one() || !is_coprime(e, &phi) {
                    return Err(Error::KeyGeneration(format!(
                        "public exponent {e} is not coprime to φ"
                    )));
                }
                e.clone()
            }
            None => random_exponent(&phi, rng)?,
        };

        let d = mod_inverse(&e, &phi)
            .ok_or_else(|| Error::KeyGeneration("public exponent has no inverse modulo φ".into()))?;

        let secret = RsaPrivateKey::new(n, p, q, e, d)
            .map_err(|err| Error::KeyGeneration(err.to_string()))?;
        debug!(modulus_bits = secret.n().bits(), "generated RSA key pair");

        Ok(RsaKeyPair::from_private(secret))
    }

    fn random_primes<R: RngCore + ?Sized>(&self, rng: &mut R) -> Result<(BigUint, BigUint)> {
        if self.bit_length < Self::ABSOLUTE_MIN_BITS {
            return Err(Error::KeyGeneration(format!(
                "modulus must be at least {} bits, got {}",
                Self::ABSOLUTE_MIN_BITS,
                self.bit_length
            )));
        }
        if self.bit_length < Self::MIN_SECURE_BITS {
            warn!(
                bits = self.bit_length,
                recommended = Self::MIN_SECURE_BITS,
                "generating a cryptographically weak RSA modulus"
            );
        }

        let p_bits = self.bit_length / 2;
        let q_bits = self.bit_length - p_bits;
        let p = rng.gen_prime(p_bits);
        let q = loop {
            let candidate = rng.gen_prime(q_bits);
            if candidate != p {
                break candidate;
            }
        };

        Ok((p, q))
    }
}

impl Default for RsaKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw `e` uniformly from `[3, φ)` until it is coprime to φ.
fn random_exponent<R: RngCore + ?Sized>(phi: &BigUint, rng: &mut R) -> Result<BigUint> {
    let low = BigUint::from(3u32);
    if *phi <= low {
        return Err(Error::KeyGeneration(format!("φ = {phi} leaves no room for an exponent")));
    }

    for _ in 0..EXPONENT_ATTEMPTS {
        let candidate = rng.gen_biguint_range(&low, phi);
        if is_coprime(&candidate, phi) {
            return Ok(candidate);
        }
    }

    Err(Error::KeyGeneration("no exponent coprime to φ found".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::{OsRng, StdRng};

    fn big(v: u32) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn textbook_parameters() {
        let pair = RsaKeyGenerator::new()
            .primes(big(89), big(97))
            .public_exponent(big(5))
            .generate(&mut OsRng)
            .unwrap();
        let key = pair.private_key();

        assert_eq!(key.n(), &big(8633));
        assert_eq!(key.d(), &big(5069));
        assert_eq!(key.dp(), &big(5069 % 88));
        assert_eq!(key.dq(), &big(5069 % 96));
        assert_eq!((key.qinv() * key.q()) % key.p(), big(1));
    }

    #[test]
    fn random_exponent_is_coprime() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let pair = RsaKeyGenerator::new().primes(big(89), big(97)).generate(&mut rng).unwrap();
            let e = pair.public_key().e();
            assert!(is_coprime(e, &big(8448)));
            assert_eq!((e * pair.private_key().d()) % big(8448), big(1));
        }
    }

    #[test]
    fn non_coprime_exponent_fails() {
        // φ = 8448 is even
        let err = RsaKeyGenerator::new()
            .primes(big(89), big(97))
            .public_exponent(big(4))
            .generate(&mut OsRng);
        assert!(matches!(err, Err(Error::KeyGeneration(_))));

        let err = RsaKeyGenerator::new()
            .primes(big(89), big(97))
            .public_exponent(big(1))
            .generate(&mut OsRng);
        assert!(matches!(err, Err(Error::KeyGeneration(_))));
    }

    #[test]
    fn degenerate_primes_fail() {
        let same = RsaKeyGenerator::new().primes(big(89), big(89)).generate(&mut OsRng);
        assert!(matches!(same, Err(Error::KeyGeneration(_))));

        let tiny = RsaKeyGenerator::new().primes(big(1), big(97)).generate(&mut OsRng);
        assert!(matches!(tiny, Err(Error::KeyGeneration(_))));

        // φ = 2 leaves no exponent in [3, φ)
        let small = RsaKeyGenerator::new().primes(big(2), big(3)).generate(&mut OsRng);
        assert!(matches!(small, Err(Error::KeyGeneration(_))));
    }

    #[test]
    fn generated_modulus_has_requested_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let pair = RsaKeyGenerator::new()
            .bit_length(512)
            .public_exponent(big(65537))
            .generate(&mut rng)
            .unwrap();

        let bits = pair.public_key().n().bits();
        assert!((511..=512).contains(&bits), "got {bits} bits");
        assert_eq!(pair.public_key().e(), &big(65537));
    }

    #[test]
    fn undersized_modulus_is_refused() {
        let err = RsaKeyGenerator::new().bit_length(32).generate(&mut OsRng);
        assert!(matches!(err, Err(Error::KeyGeneration(_))));
    }
}
