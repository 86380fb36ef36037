// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;
use num_traits::{One, Zero};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec;
use crate::util::{byte_len, is_coprime, mod_inverse};
use crate::{Error, Result};

use super::FORMAT_RECORD;

/// RSA public parameters `(n, e)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RsaPublicKey {
    pub(crate) n: BigUint,
    pub(crate) e: BigUint,
}

impl RsaPublicKey {
    /// Construct a public key. Neither component may be zero.
    pub fn new(n: BigUint, e: BigUint) -> Result<Self> {
        if n.is_zero() {
            return Err(Error::KeyValidation("RSA modulus is zero".into()));
        }
        if e.is_zero() {
            return Err(Error::KeyValidation("RSA public exponent is zero".into()));
        }
        codec::check_field_len(byte_len(&n), "RSA modulus")?;
        codec::check_field_len(byte_len(&e), "RSA public exponent")?;

        Ok(Self { n, e })
    }

    /// Return the public modulus `n`.
    #[inline]
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Return the public exponent `e`.
    #[inline]
    pub fn e(&self) -> &BigUint {
        &self.e
    }

    pub fn algorithm(&self) -> &'static str {
        "RSA"
    }

    pub fn format(&self) -> &'static str {
        FORMAT_RECORD
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self)
    }
}

/// RSA private key with precomputed CRT parameters.
///
/// The CRT values are derived from `d`, `p` and `q` on construction:
/// `dp = d mod (p-1)`, `dq = d mod (q-1)`, `qinv = q⁻¹ mod p`.
/// Every component is zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct RsaPrivateKey {
    pub(crate) n: BigUint,
    pub(crate) p: BigUint,
    pub(crate) q: BigUint,
    pub(crate) e: BigUint,
    pub(crate) d: BigUint,
    pub(crate) dp: BigUint,
    pub(crate) dq: BigUint,
    pub(crate) qinv: BigUint,
}

impl RsaPrivateKey {
    /// Construct a private key and derive its CRT parameters.
    ///
    /// Checks that `n = p·q` and that `p` and `q` are coprime. Primality of
    /// the factors is not verified.
    pub fn new(n: BigUint, p: BigUint, q: BigUint, e: BigUint, d: BigUint) -> Result<Self> {
        if n.is_zero() {
            return Err(Error::KeyValidation("RSA modulus is zero".into()));
        }
        if e.is_zero() || d.is_zero() {
            return Err(Error::KeyValidation("RSA exponents must be non-zero".into()));
        }
        codec::check_field_len(byte_len(&n), "RSA modulus")?;
        codec::check_field_len(byte_len(&e), "RSA public exponent")?;
        codec::check_field_len(byte_len(&d), "RSA private exponent")?;
        if p <= BigUint::one() || q <= BigUint::one() {
            return Err(Error::KeyValidation("RSA factors must be greater than one".into()));
        }
        if !is_coprime(&p, &q) {
            return Err(Error::KeyValidation("RSA factors p and q are not coprime".into()));
        }
        if &p * &q != n {
            return Err(Error::KeyValidation("RSA modulus does not equal p·q".into()));
        }

        let dp = &d % (&p - BigUint::one());
        let dq = &d % (&q - BigUint::one());
        let qinv = mod_inverse(&q, &p)
            .ok_or_else(|| Error::KeyValidation("q has no inverse modulo p".into()))?;

        Ok(Self { n, p, q, e, d, dp, dq, qinv })
    }

    /// Construct a private key from all eight components, checking that the
    /// supplied CRT parameters agree with the derived ones.
    #[allow(clippy::too_many_arguments)]
    pub fn from_components(
        n: BigUint,
        p: BigUint,
        q: BigUint,
        e: BigUint,
        d: BigUint,
        dp: BigUint,
        dq: BigUint,
        qinv: BigUint,
    ) -> Result<Self> {
        let key = Self::new(n, p, q, e, d)?;
        if key.dp != dp || key.dq != dq || key.qinv != qinv {
            return Err(Error::KeyValidation("CRT parameters do not match d, p and q".into()));
        }
        Ok(key)
    }

    #[inline]
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    #[inline]
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    #[inline]
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    #[inline]
    pub fn e(&self) -> &BigUint {
        &self.e
    }

    #[inline]
    pub fn d(&self) -> &BigUint {
        &self.d
    }

    /// `d mod (p-1)`
    #[inline]
    pub fn dp(&self) -> &BigUint {
        &self.dp
    }

    /// `d mod (q-1)`
    #[inline]
    pub fn dq(&self) -> &BigUint {
        &self.dq
    }

    /// `q⁻¹ mod p`
    #[inline]
    pub fn qinv(&self) -> &BigUint {
        &self.qinv
    }

    /// Return the matching public key.
    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey { n: self.n.clone(), e: self.e.clone() }
    }

    pub fn algorithm(&self) -> &'static str {
        "RSA"
    }

    pub fn format(&self) -> &'static str {
        FORMAT_RECORD
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self)
    }
}

#[cfg(not(feature = "expose-secret"))]
impl std::fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("n", &self.n)
            .field("e", &self.e)
            .finish_non_exhaustive()
    }
}

/// Matching public and private RSA keys.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct RsaKeyPair {
    #[zeroize(skip)]
    public: RsaPublicKey,
    secret: RsaPrivateKey,
}

impl RsaKeyPair {
    pub(crate) fn from_private(secret: RsaPrivateKey) -> Self {
        Self { public: secret.public_key(), secret }
    }

    /// Return the public key.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Return the private key.
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.secret
    }
}

#[cfg(not(feature = "expose-secret"))]
impl std::fmt::Debug for RsaKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaKeyPair").field("public", &self.public).finish_non_exhaustive()
    }
}
