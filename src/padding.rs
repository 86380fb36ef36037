// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Byte padding strategies for block ciphers.
//!
//! A padding strategy only mutates buffers; it keeps no cryptographic state.

use rand::{CryptoRng, RngCore};

use crate::{Error, Result};

/// Pads the tail of a block and measures padding on removal.
pub trait Padding: Send + Sync {
    /// Seed the strategy. Neither built-in strategy draws randomness, but
    /// schemes with random filler would.
    fn init(&mut self, _rng: &mut dyn SecureRng) {}

    fn name(&self) -> &'static str;

    /// Fill `block[offset..]` with padding and return the number of bytes
    /// written. An `offset` equal to `block.len()` writes nothing.
    ///
    /// # Panics
    /// Panics if `offset > block.len()`.
    fn add_padding(&self, block: &mut [u8], offset: usize) -> usize;

    /// Number of trailing padding bytes in `block`.
    fn pad_count(&self, block: &[u8]) -> Result<usize>;

    fn pad_value(&self) -> u8;
}

/// A cryptographically secure random source, usable as a trait object.
pub trait SecureRng: RngCore + CryptoRng {}

impl<T: RngCore + CryptoRng> SecureRng for T {}

/// Pads with a fixed byte and strips every trailing copy of it.
///
/// Plaintext ending in the pad byte loses those bytes on removal; pick a
/// value that cannot appear at the end of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantPadding {
    value: u8,
}

impl ConstantPadding {
    pub const fn new(value: u8) -> Self {
        Self { value }
    }
}

impl Default for ConstantPadding {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Padding for ConstantPadding {
    fn name(&self) -> &'static str {
        "Constant"
    }

    fn add_padding(&self, block: &mut [u8], offset: usize) -> usize {
        let tail = &mut block[offset..];
        tail.fill(self.value);
        tail.len()
    }

    fn pad_count(&self, block: &[u8]) -> Result<usize> {
        let count = block.iter().rev().take_while(|&&b| b == self.value).count();
        if count == 0 {
            return Err(Error::Padding(format!("block does not end in pad byte {:#04x}", self.value)));
        }
        Ok(count)
    }

    fn pad_value(&self) -> u8 {
        self.value
    }
}

/// Single-bit padding: a `0x01` marker followed by zero bytes.
///
/// Removal scans back over zeros to the marker, so any plaintext survives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitPadding;

impl BitPadding {
    const MARKER: u8 = 0x01;
}

impl Padding for BitPadding {
    fn name(&self) -> &'static str {
        "OneBit"
    }

    fn add_padding(&self, block: &mut [u8], offset: usize) -> usize {
        let tail = &mut block[offset..];
        if let Some((first, rest)) = tail.split_first_mut() {
            *first = Self::MARKER;
            rest.fill(0);
        }
        tail.len()
    }

    fn pad_count(&self, block: &[u8]) -> Result<usize> {
        let zeros = block.iter().rev().take_while(|&&b| b == 0).count();
        match block.len().checked_sub(zeros + 1).map(|i| block[i]) {
            Some(Self::MARKER) => Ok(zeros + 1),
            _ => Err(Error::Padding("missing 0x01 padding marker".into())),
        }
    }

    fn pad_value(&self) -> u8 {
        Self::MARKER
    }
}
