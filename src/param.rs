// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cipher initialisation parameters.
//!
//! Parameters form a small tree: leaves carry raw bytes, typed keys or IVs,
//! and [`CipherParameter::List`] groups several of them in order. Ciphers
//! search the tree depth-first and take the first match.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::key::{Key, RawSecretKey};
use crate::{Error, Result};

/// Raw, untyped key bytes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RawKeyParameter {
    bytes: Vec<u8>,
}

impl RawKeyParameter {
    /// Copies `bytes`; an empty buffer counts as absent.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::NullParameter("raw key bytes"));
        }
        Ok(Self { bytes: bytes.to_vec() })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for RawKeyParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawKeyParameter").field("len", &self.bytes.len()).finish()
    }
}

/// Initialisation vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IvParameter {
    iv: Vec<u8>,
}

impl IvParameter {
    pub fn new(iv: &[u8]) -> Result<Self> {
        if iv.is_empty() {
            return Err(Error::NullParameter("initialisation vector"));
        }
        Ok(Self { iv: iv.to_vec() })
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }
}

/// A node of the parameter tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherParameter {
    RawKey(RawKeyParameter),
    Key(Key),
    /// Same payload as [`CipherParameter::Key`], used for asymmetric keys.
    WrappedKey(Key),
    Iv(IvParameter),
    KeyWithIv { key: Key, iv: IvParameter },
    RawKeyWithIv { key: RawKeyParameter, iv: IvParameter },
    /// Ordered, duplicate-tolerant group of parameters.
    List(Vec<CipherParameter>),
}

impl CipherParameter {
    pub fn raw_key(bytes: &[u8]) -> Result<Self> {
        Ok(Self::RawKey(RawKeyParameter::new(bytes)?))
    }

    pub fn key(key: impl Into<Key>) -> Self {
        Self::Key(key.into())
    }

    pub fn wrapped(key: impl Into<Key>) -> Self {
        Self::WrappedKey(key.into())
    }

    pub fn iv(iv: &[u8]) -> Result<Self> {
        Ok(Self::Iv(IvParameter::new(iv)?))
    }

    pub fn key_with_iv(key: impl Into<Key>, iv: &[u8]) -> Result<Self> {
        Ok(Self::KeyWithIv { key: key.into(), iv: IvParameter::new(iv)? })
    }

    pub fn raw_key_with_iv(bytes: &[u8], iv: &[u8]) -> Result<Self> {
        Ok(Self::RawKeyWithIv { key: RawKeyParameter::new(bytes)?, iv: IvParameter::new(iv)? })
    }

    pub fn list(params: impl IntoIterator<Item = CipherParameter>) -> Self {
        Self::List(params.into_iter().collect())
    }

    /// Name of the node's shape, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::RawKey(_) => "raw key",
            Self::Key(_) => "key",
            Self::WrappedKey(_) => "wrapped key",
            Self::Iv(_) => "IV",
            Self::KeyWithIv { .. } => "key with IV",
            Self::RawKeyWithIv { .. } => "raw key with IV",
            Self::List(_) => "parameter list",
        }
    }

    /// First typed key in depth-first order.
    pub fn find_key(&self) -> Option<&Key> {
        match self {
            Self::Key(key) | Self::WrappedKey(key) | Self::KeyWithIv { key, .. } => Some(key),
            Self::List(items) => items.iter().find_map(Self::find_key),
            _ => None,
        }
    }

    /// First raw key buffer in depth-first order.
    pub fn find_raw_key(&self) -> Option<&[u8]> {
        match self {
            Self::RawKey(raw) | Self::RawKeyWithIv { key: raw, .. } => Some(raw.bytes()),
            Self::List(items) => items.iter().find_map(Self::find_raw_key),
            _ => None,
        }
    }

    /// First IV in depth-first order.
    pub fn find_iv(&self) -> Option<&[u8]> {
        match self {
            Self::Iv(iv) | Self::KeyWithIv { iv, .. } | Self::RawKeyWithIv { iv, .. } => {
                Some(iv.iv())
            }
            Self::List(items) => items.iter().find_map(Self::find_iv),
            _ => None,
        }
    }

    /// Typed key if present, otherwise raw bytes lifted into a
    /// [`RawSecretKey`] named `algorithm`.
    pub(crate) fn secret_key(&self, algorithm: &str) -> Result<Option<Key>> {
        if let Some(key) = self.find_key() {
            return Ok(Some(key.clone()));
        }
        match self.find_raw_key() {
            Some(raw) => Ok(Some(Key::RawSecret(RawSecretKey::new(algorithm, raw)?))),
            None => Ok(None),
        }
    }
}

impl From<Key> for CipherParameter {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

impl From<Vec<CipherParameter>> for CipherParameter {
    fn from(params: Vec<CipherParameter>) -> Self {
        Self::List(params)
    }
}
