// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key material for every cipher family.
//!
//! Keys validate their algebraic preconditions on construction and are
//! immutable afterwards. Each key reports an algorithm name, a format
//! identifier and a canonical encoding produced by [`crate::codec`].

mod classical;
mod rsa;

pub use classical::*;
pub use rsa::*;

use crate::{Result, codec};

/// Format of keys whose record carries opaque secret bytes.
pub const FORMAT_RAW: &str = "RAW";

/// Format of keys whose record carries typed fields.
pub const FORMAT_RECORD: &str = "RECORD";

/// A key of any supported family.
///
/// Ciphers match on the variant they consume and reject the others, so there
/// is no runtime type inspection beyond the match itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    RawSecret(RawSecretKey),
    Shift(ShiftKey),
    Affine(AffineKey),
    Permutation(PermutationKey),
    Railfence(RailfenceKey),
    Monoalphabet(MonoalphabetKey),
    RsaPublic(RsaPublicKey),
    RsaPrivate(RsaPrivateKey),
}

impl Key {
    /// Algorithm identifier, e.g. `"Caesar"` or `"RSA"`.
    pub fn algorithm(&self) -> &str {
        match self {
            Key::RawSecret(k) => k.algorithm(),
            Key::Shift(k) => k.algorithm(),
            Key::Affine(k) => k.algorithm(),
            Key::Permutation(k) => k.algorithm(),
            Key::Railfence(k) => k.algorithm(),
            Key::Monoalphabet(k) => k.algorithm(),
            Key::RsaPublic(k) => k.algorithm(),
            Key::RsaPrivate(k) => k.algorithm(),
        }
    }

    pub fn format(&self) -> &'static str {
        match self {
            Key::RawSecret(_) => FORMAT_RAW,
            _ => FORMAT_RECORD,
        }
    }

    /// Short human-readable name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Key::RawSecret(_) => "raw secret",
            Key::Shift(_) => "shift",
            Key::Affine(_) => "affine",
            Key::Permutation(_) => "permutation",
            Key::Railfence(_) => "rail fence",
            Key::Monoalphabet(_) => "monoalphabet",
            Key::RsaPublic(_) => "RSA public",
            Key::RsaPrivate(_) => "RSA private",
        }
    }

    /// Canonical self-describing encoding of this key.
    pub fn encode(&self) -> Vec<u8> {
        codec::encode_key(self)
    }

    /// Decode any key produced by [`Key::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        codec::decode_key(bytes)
    }
}

macro_rules! impl_from_key {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Key {
                fn from(key: $ty) -> Self {
                    Key::$variant(key)
                }
            }
        )*
    };
}

impl_from_key! {
    RawSecretKey => RawSecret,
    ShiftKey => Shift,
    AffineKey => Affine,
    PermutationKey => Permutation,
    RailfenceKey => Railfence,
    MonoalphabetKey => Monoalphabet,
    RsaPublicKey => RsaPublic,
    RsaPrivateKey => RsaPrivate,
}
