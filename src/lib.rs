// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Pluggable Cipher Engine
//!
//! A uniform interface over classical block ciphers and textbook RSA, a
//! parameter tree for binding keys to ciphers, fan-out composition of several
//! ciphers, and a canonical binary codec for every key type.
//!
//! Ciphers follow one lifecycle: `init` binds a key and a [`Direction`],
//! `update` feeds input, and `finish` flushes what remains. The same instance
//! may be re-initialised to decrypt what it just encrypted.
//!
//! ## Security
//!
//! The classical ciphers are for teaching and puzzles. RSA is unpadded and
//! not constant-time. Secret key material is zeroized on drop via the
//! `zeroize` crate.
//!
//! ## Example
//!
//! ```rust
//! use num_bigint_dig::BigUint;
//! use polycipher::{Cipher, CipherParameter, Direction, RsaCipher, RsaKeyGenerator};
//!
//! let pair = RsaKeyGenerator::new()
//!     .primes(BigUint::from(89u32), BigUint::from(97u32))
//!     .public_exponent(BigUint::from(5u32))
//!     .generate(&mut rand::rngs::OsRng)
//!     .expect("key generation failed");
//!
//! let mut rsa = RsaCipher::new();
//! rsa.init(Direction::Encrypt, &CipherParameter::key(pair.public_key().clone()))
//!     .expect("init failed");
//! let ciphertext = rsa.finish_with(&[0x12, 0x34]).expect("encryption failed");
//!
//! rsa.init(Direction::Decrypt, &CipherParameter::key(pair.private_key().clone()))
//!     .expect("init failed");
//! assert_eq!(rsa.finish_with(&ciphertext).expect("decryption failed"), [0x12, 0x34]);
//! ```

mod cipher;
mod ecb;
mod error;
mod key;
mod padding;
mod param;
mod product;
mod provider;
mod rsa;
mod util;

pub mod classical;
pub mod codec;

pub use cipher::*;
pub use codec::{KeyCodec, KeyRecord};
pub use ecb::*;
pub use error::*;
pub use key::*;
pub use padding::*;
pub use param::*;
pub use product::*;
pub use provider::*;
pub use rsa::*;
