// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lookup of ciphers by algorithm name.
//!
//! The cipher core never consults a [`Provider`]; callers build one and pass
//! it to whatever layer resolves names.

use std::collections::BTreeMap;

use tracing::debug;

use crate::cipher::Cipher;
use crate::classical::{Affine, Caesar, Monoalphabet, Railfence, Transposition, Vernam, Vigenere};
use crate::ecb::Ecb;
use crate::padding::BitPadding;
use crate::rsa::RsaCipher;
use crate::{Error, Result};

type Factory = Box<dyn Fn() -> Box<dyn Cipher> + Send + Sync>;

/// Map from algorithm name to a constructor for a fresh, unbound cipher.
#[derive(Default)]
pub struct Provider {
    factories: BTreeMap<String, Factory>,
}

impl Provider {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every cipher this crate ships.
    ///
    /// Byte-wise ciphers run unpadded under ECB; ciphers whose block follows
    /// the key use bit padding.
    pub fn with_defaults() -> Self {
        let mut provider = Self::new();
        provider.register("Caesar", || Box::new(Ecb::new(Caesar::new())));
        provider.register("Affine", || Box::new(Ecb::new(Affine::new())));
        provider.register("Monoalphabet", || Box::new(Ecb::new(Monoalphabet::new())));
        provider.register("Vigenere", || {
            Box::new(Ecb::new(Vigenere::new()).with_padding(BitPadding))
        });
        provider.register("Vernam", || Box::new(Ecb::new(Vernam::new()).with_padding(BitPadding)));
        provider.register("Transposition", || {
            Box::new(Ecb::new(Transposition::new()).with_padding(BitPadding))
        });
        provider.register("Railfence", || Box::new(Railfence::new()));
        provider.register("RSA", || Box::new(RsaCipher::new()));
        provider
    }

    /// Register `factory` under `name`, replacing any earlier entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Cipher> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(algorithm = %name, "registered cipher");
        self.factories.insert(name, Box::new(factory));
    }

    /// A new instance of the cipher registered as `name`. Names are
    /// case-sensitive.
    pub fn lookup(&self, name: &str) -> Result<Box<dyn Cipher>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| Error::UnknownAlgorithm(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider").field("algorithms", &self.names().collect::<Vec<_>>()).finish()
    }
}
