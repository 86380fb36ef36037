// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cipher contracts.
//!
//! Every cipher starts unbound. `init` binds a key taken from a
//! [`CipherParameter`] tree together with a [`Direction`] and clears any
//! buffered input. An instance may be re-initialised at any time, so the same
//! object can encrypt and then decrypt. Instances are not reentrant; callers
//! serialise access to a single instance.

use crate::param::CipherParameter;
use crate::{Error, Result};

/// Which way a cipher transforms data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// A transform over fixed-size blocks.
///
/// Blocks are independent of one another; chaining, buffering and padding
/// belong to a mode such as [`crate::Ecb`].
pub trait BlockCipher {
    /// Bind a key and direction. Fails with [`Error::InvalidKeyType`] when
    /// the parameter carries a key this cipher cannot use.
    fn init(&mut self, direction: Direction, params: &CipherParameter) -> Result<()>;

    fn algorithm_name(&self) -> String;

    /// Block size in bytes. Ciphers whose block size follows the key report
    /// 0 until they are initialised.
    fn block_size(&self) -> usize;

    /// Bytes produced for `input_len` bytes of input.
    fn output_size(&self, input_len: usize) -> usize {
        input_len
    }

    /// Transform exactly one block from `input[in_off..]` into
    /// `output[out_off..]` and return the number of bytes written.
    ///
    /// Fails with [`Error::IllegalState`] before `init` and with
    /// [`Error::DataLength`] when either side has less than one block left.
    fn process_block(
        &mut self,
        input: &[u8],
        in_off: usize,
        output: &mut [u8],
        out_off: usize,
    ) -> Result<usize>;

    /// Clear internal buffers. The bound key is retained.
    fn reset(&mut self);
}

/// Stateful interface for incremental processing.
///
/// Implementations accept input in chunks via [`update`](Cipher::update) and
/// return whatever output is immediately available. Remaining buffered state
/// is processed by [`finish`](Cipher::finish), after which the instance is
/// ready for another message under the same key.
pub trait Cipher {
    fn init(&mut self, direction: Direction, params: &CipherParameter) -> Result<()>;

    fn algorithm_name(&self) -> String;

    /// Processes the next chunk of input. Implementations may buffer and
    /// return an empty vector.
    fn update(&mut self, data: &[u8]) -> Result<Vec<u8>>;

    /// Flushes buffered input, applying or removing padding.
    fn finish(&mut self) -> Result<Vec<u8>>;

    /// `update(data)` followed by `finish()`.
    fn finish_with(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = self.update(data)?;
        out.extend(self.finish()?);
        Ok(out)
    }

    /// Upper bound on the bytes `finish_with(input_len bytes)` would return.
    fn output_size(&self, input_len: usize) -> usize;

    /// Whether every message comes out exactly as long as it went in, in
    /// both directions. Only such ciphers can be chained by
    /// [`crate::ProductCipher`].
    fn preserves_length(&self) -> bool {
        false
    }
}

/// A public-key transform over integer blocks bounded by the modulus.
pub trait AsymmetricCipher: Cipher {
    /// Largest input accepted by a single `finish`.
    fn input_block_size(&self) -> Result<usize>;

    /// Size of one transformed block.
    fn output_block_size(&self) -> Result<usize>;
}

/// Checks shared by every `process_block` implementation.
pub(crate) fn check_block(
    block_size: usize,
    input: &[u8],
    in_off: usize,
    output: &[u8],
    out_off: usize,
) -> Result<()> {
    let available = input.len().saturating_sub(in_off);
    if available < block_size {
        return Err(Error::DataLength(format!(
            "input has {available} bytes from offset {in_off}, block needs {block_size}"
        )));
    }

    let room = output.len().saturating_sub(out_off);
    if room < block_size {
        return Err(Error::DataLength(format!(
            "output has {room} bytes from offset {out_off}, block needs {block_size}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_a_length_error() {
        let out = [0u8; 8];
        assert!(check_block(4, &[1, 2, 3, 4], 0, &out, 0).is_ok());
        assert!(matches!(check_block(4, &[1, 2, 3, 4], 1, &out, 0), Err(Error::DataLength(_))));
        assert!(matches!(check_block(4, &[1, 2, 3], 9, &out, 0), Err(Error::DataLength(_))));
    }

    #[test]
    fn short_output_is_a_length_error() {
        let out = [0u8; 4];
        assert!(matches!(check_block(4, &[0; 4], 0, &out, 2), Err(Error::DataLength(_))));
    }
}
