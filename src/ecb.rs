// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::{debug, trace};
use zeroize::Zeroize;

use crate::cipher::{BlockCipher, Cipher, Direction};
use crate::padding::Padding;
use crate::param::CipherParameter;
use crate::{Error, Result};

/// Electronic codebook mode over any [`BlockCipher`].
///
/// Each block is transformed on its own with no chaining. Without padding the
/// message length must be a multiple of the block size; with padding,
/// encryption always appends between one byte and one full block.
pub struct Ecb<C> {
    inner: C,
    padding: Option<Box<dyn Padding>>,
    direction: Option<Direction>,
    buffer: Vec<u8>,
}

impl<C: BlockCipher> Ecb<C> {
    pub fn new(inner: C) -> Self {
        Self { inner, padding: None, direction: None, buffer: Vec::new() }
    }

    /// Attach a padding strategy, applied on `finish`.
    pub fn with_padding(mut self, padding: impl Padding + 'static) -> Self {
        self.padding = Some(Box::new(padding));
        self
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn block_size(&self) -> usize {
        self.inner.block_size()
    }

    fn direction(&self) -> Result<Direction> {
        self.direction.ok_or(Error::IllegalState("ECB cipher used before init"))
    }

    fn clear_buffer(&mut self) {
        self.buffer.zeroize();
        self.buffer.clear();
    }

    /// Transform the first `blocks` blocks of the buffer and drop them.
    fn drain_blocks(&mut self, blocks: usize) -> Result<Vec<u8>> {
        let bs = self.inner.block_size();
        let len = blocks * bs;
        let mut out = vec![0u8; len];

        for offset in (0..len).step_by(bs) {
            self.inner.process_block(&self.buffer, offset, &mut out, offset)?;
        }
        if blocks > 0 {
            trace!(blocks, block_size = bs, "ecb processed blocks");
        }

        drop(self.buffer.drain(..len));
        Ok(out)
    }

    fn finish_encrypt(&mut self, bs: usize) -> Result<Vec<u8>> {
        let Some(padding) = &self.padding else {
            if !self.buffer.is_empty() {
                return Err(Error::DataLength(format!(
                    "{} trailing bytes do not fill a {bs}-byte block and no padding is set",
                    self.buffer.len()
                )));
            }
            return Ok(Vec::new());
        };

        let used = self.buffer.len();
        self.buffer.resize(bs, 0);
        padding.add_padding(&mut self.buffer, used);
        self.drain_blocks(1)
    }

    fn finish_decrypt(&mut self, bs: usize) -> Result<Vec<u8>> {
        match &self.padding {
            None if self.buffer.is_empty() => return Ok(Vec::new()),
            None => {
                return Err(Error::DataLength(format!(
                    "{} trailing bytes do not fill a {bs}-byte block",
                    self.buffer.len()
                )));
            }
            Some(_) if self.buffer.len() != bs => {
                return Err(Error::DataLength(format!(
                    "padded ciphertext must end on a block boundary, {} bytes remain",
                    self.buffer.len()
                )));
            }
            Some(_) => {}
        }

        let mut last = self.drain_blocks(1)?;
        if let Some(padding) = &self.padding {
            let strip = padding.pad_count(&last)?;
            last.truncate(last.len() - strip);
        }
        Ok(last)
    }
}

impl<C: BlockCipher> Cipher for Ecb<C> {
    fn init(&mut self, direction: Direction, params: &CipherParameter) -> Result<()> {
        self.inner.init(direction, params)?;
        self.clear_buffer();
        self.direction = Some(direction);
        debug!(algorithm = %self.algorithm_name(), ?direction, "cipher initialised");
        Ok(())
    }

    fn algorithm_name(&self) -> String {
        format!("{}/ECB", self.inner.algorithm_name())
    }

    fn update(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let direction = self.direction()?;
        let bs = self.inner.block_size();
        self.buffer.extend_from_slice(data);

        // Padded decryption holds back the final block until finish.
        let mut ready = self.buffer.len() / bs;
        if direction == Direction::Decrypt && self.padding.is_some() && self.buffer.len() % bs == 0 {
            ready = ready.saturating_sub(1);
        }

        self.drain_blocks(ready)
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        let direction = self.direction()?;
        let bs = self.inner.block_size();

        let result = match direction {
            Direction::Encrypt => self.finish_encrypt(bs),
            Direction::Decrypt => self.finish_decrypt(bs),
        };
        self.clear_buffer();
        self.inner.reset();
        result
    }

    fn output_size(&self, input_len: usize) -> usize {
        let bs = self.inner.block_size().max(1);
        let pending = self.buffer.len() + input_len;
        match (self.direction, &self.padding) {
            (Some(Direction::Encrypt), Some(_)) => (pending / bs + 1) * bs,
            _ => pending,
        }
    }

    fn preserves_length(&self) -> bool {
        self.padding.is_none()
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for Ecb<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ecb")
            .field("inner", &self.inner)
            .field("padding", &self.padding.as_ref().map(|p| p.name()))
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}
