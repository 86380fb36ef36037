// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Textbook RSA.
//!
//! No padding scheme is applied and the arithmetic is not constant-time.
//! Input is accumulated by `update` and transformed once, as a single integer,
//! by `finish`.

mod keygen;

pub use keygen::*;

use num_bigint_dig::BigUint;
use tracing::{debug, trace};
use zeroize::Zeroize;

use crate::cipher::{AsymmetricCipher, Cipher, Direction};
use crate::key::{Key, RsaPrivateKey, RsaPublicKey};
use crate::param::CipherParameter;
use crate::util::{biguint_to_bytes_minimal, biguint_to_fixed_bytes, byte_len};
use crate::{Error, Result};

const NAME: &str = "RSA";

/// `m^e mod n`
pub fn encrypt_raw(key: &RsaPublicKey, m: &BigUint) -> Result<BigUint> {
    if m >= key.n() {
        return Err(Error::DataLength("message is not smaller than the modulus".into()));
    }
    Ok(m.modpow(key.e(), key.n()))
}

/// `c^d mod n`, without the CRT shortcut.
pub fn decrypt_raw(key: &RsaPrivateKey, c: &BigUint) -> Result<BigUint> {
    if c >= key.n() {
        return Err(Error::DataLength("ciphertext is not smaller than the modulus".into()));
    }
    Ok(c.modpow(key.d(), key.n()))
}

/// CRT decryption:
///
/// ```text
/// m1 = c^dp mod p
/// m2 = c^dq mod q
/// h  = qinv · (m1 - m2) mod p
/// m  = m2 + h·q
/// ```
pub fn decrypt_raw_crt(key: &RsaPrivateKey, c: &BigUint) -> Result<BigUint> {
    if c >= key.n() {
        return Err(Error::DataLength("ciphertext is not smaller than the modulus".into()));
    }

    let p = key.p();
    let q = key.q();
    let m1 = (c % p).modpow(key.dp(), p);
    let m2 = (c % q).modpow(key.dq(), q);

    // (m1 - m2) mod p without going negative
    let diff = (&m1 + p - (&m2 % p)) % p;
    let h = (key.qinv() * diff) % p;

    Ok(m2 + h * q)
}

enum Binding {
    Encrypt(RsaPublicKey),
    Decrypt(RsaPrivateKey),
}

impl Binding {
    fn modulus(&self) -> &BigUint {
        match self {
            Binding::Encrypt(key) => key.n(),
            Binding::Decrypt(key) => key.n(),
        }
    }
}

/// RSA as an [`AsymmetricCipher`].
///
/// Encryption accepts a public or private key (only `n` and `e` are used) and
/// returns a block of exactly the modulus byte length. Decryption needs a
/// private key and returns the minimal big-endian plaintext, so leading zero
/// bytes of the original message are not preserved.
pub struct RsaCipher {
    use_crt: bool,
    binding: Option<Binding>,
    buffer: Vec<u8>,
}

impl RsaCipher {
    pub fn new() -> Self {
        Self { use_crt: true, binding: None, buffer: Vec::new() }
    }

    /// Toggle the CRT fast path for private-key operations (on by default).
    pub fn with_crt(mut self, use_crt: bool) -> Self {
        self.use_crt = use_crt;
        self
    }

    fn binding(&self) -> Result<&Binding> {
        self.binding.as_ref().ok_or(Error::IllegalState("RSA cipher used before init"))
    }

    fn clear_buffer(&mut self) {
        self.buffer.zeroize();
        self.buffer.clear();
    }

    fn transform(&self, binding: &Binding) -> Result<Vec<u8>> {
        let mut input = BigUint::from_bytes_be(&self.buffer);

        let result = match binding {
            Binding::Encrypt(key) => {
                let c = encrypt_raw(key, &input)?;
                Ok(biguint_to_fixed_bytes(&c, byte_len(key.n())))
            }
            Binding::Decrypt(key) => {
                let m = if self.use_crt {
                    decrypt_raw_crt(key, &input)
                } else {
                    decrypt_raw(key, &input)
                };
                m.map(|m| biguint_to_bytes_minimal(&m))
            }
        };

        input.zeroize();
        result
    }
}

impl Default for RsaCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl Cipher for RsaCipher {
    /// Accepts only `Key`, `WrappedKey` and `KeyWithIv` parameters holding an
    /// RSA key. Raw bytes are refused because the key's algebraic type must
    /// be known.
    fn init(&mut self, direction: Direction, params: &CipherParameter) -> Result<()> {
        let key = match params {
            CipherParameter::Key(key)
            | CipherParameter::WrappedKey(key)
            | CipherParameter::KeyWithIv { key, .. } => key,
            other => {
                return Err(Error::InvalidParameterShape {
                    cipher: NAME.into(),
                    shape: other.shape(),
                });
            }
        };

        let binding = match (direction, key) {
            (Direction::Encrypt, Key::RsaPublic(key)) => Binding::Encrypt(key.clone()),
            (Direction::Encrypt, Key::RsaPrivate(key)) => Binding::Encrypt(key.public_key()),
            (Direction::Decrypt, Key::RsaPrivate(key)) => Binding::Decrypt(key.clone()),
            (_, other) => {
                return Err(Error::InvalidKeyType { cipher: NAME.into(), key: other.kind() });
            }
        };

        self.clear_buffer();
        debug!(
            algorithm = NAME,
            ?direction,
            modulus_bits = binding.modulus().bits(),
            crt = self.use_crt,
            "cipher initialised"
        );
        self.binding = Some(binding);
        Ok(())
    }

    fn algorithm_name(&self) -> String {
        NAME.into()
    }

    /// Buffers `data`. Fails without buffering anything if the message would
    /// outgrow the modulus.
    fn update(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let limit = self.input_block_size()?;
        if self.buffer.len() + data.len() > limit {
            return Err(Error::DataLength(format!(
                "RSA input limited to {limit} bytes, got {}",
                self.buffer.len() + data.len()
            )));
        }

        self.buffer.extend_from_slice(data);
        Ok(Vec::new())
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        let binding = self.binding()?;
        let result = self.transform(binding);
        trace!(input_len = self.buffer.len(), ok = result.is_ok(), "rsa block transformed");
        self.clear_buffer();
        result
    }

    fn output_size(&self, input_len: usize) -> usize {
        match self.binding.as_ref() {
            Some(binding) => byte_len(binding.modulus()),
            None => input_len,
        }
    }
}

impl AsymmetricCipher for RsaCipher {
    fn input_block_size(&self) -> Result<usize> {
        Ok(byte_len(self.binding()?.modulus()))
    }

    fn output_block_size(&self) -> Result<usize> {
        Ok(byte_len(self.binding()?.modulus()))
    }
}

impl std::fmt::Debug for RsaCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaCipher")
            .field("use_crt", &self.use_crt)
            .field("initialised", &self.binding.is_some())
            .finish_non_exhaustive()
    }
}
