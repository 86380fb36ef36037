// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use zeroize::Zeroizing;

use super::wrong_key;
use crate::cipher::{BlockCipher, Direction, check_block};
use crate::key::Key;
use crate::param::CipherParameter;
use crate::{Error, Result};

const NAME: &str = "Vigenere";

/// Vigenère cipher over bytes: `c[i] = (p[i] + k[i]) mod 256`.
///
/// The block size equals the key length, so each block restarts the key.
/// Accepts a [`RawSecretKey`](crate::RawSecretKey) or raw key bytes.
#[derive(Default)]
pub struct Vigenere {
    state: Option<(Direction, Zeroizing<Vec<u8>>)>,
}

impl Vigenere {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockCipher for Vigenere {
    fn init(&mut self, direction: Direction, params: &CipherParameter) -> Result<()> {
        let key = match params.secret_key(NAME)? {
            Some(Key::RawSecret(key)) => Zeroizing::new(key.to_bytes()),
            Some(other) => return Err(wrong_key(NAME, &other)),
            None => {
                return Err(Error::InvalidParameterShape {
                    cipher: NAME.into(),
                    shape: params.shape(),
                });
            }
        };

        self.state = Some((direction, key));
        Ok(())
    }

    fn algorithm_name(&self) -> String {
        NAME.into()
    }

    fn block_size(&self) -> usize {
        self.state.as_ref().map_or(0, |(_, key)| key.len())
    }

    fn process_block(
        &mut self,
        input: &[u8],
        in_off: usize,
        output: &mut [u8],
        out_off: usize,
    ) -> Result<usize> {
        let (direction, key) =
            self.state.as_ref().ok_or(Error::IllegalState("Vigenere used before init"))?;
        let bs = key.len();
        check_block(bs, input, in_off, output, out_off)?;

        let src = &input[in_off..in_off + bs];
        let dst = &mut output[out_off..out_off + bs];
        for ((d, &s), &k) in dst.iter_mut().zip(src).zip(key.iter()) {
            *d = match direction {
                Direction::Encrypt => s.wrapping_add(k),
                Direction::Decrypt => s.wrapping_sub(k),
            };
        }
        Ok(bs)
    }

    fn reset(&mut self) {}
}

impl std::fmt::Debug for Vigenere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vigenere").field("block_size", &self.block_size()).finish()
    }
}
