// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use zeroize::Zeroizing;

use super::wrong_key;
use crate::cipher::{BlockCipher, Direction, check_block};
use crate::key::Key;
use crate::param::CipherParameter;
use crate::{Error, Result};

const NAME: &str = "Vernam";

/// XOR cipher with a repeating key, one key length per block.
///
/// With a key as long as the message this is a one-time pad. Encryption and
/// decryption are the same operation.
#[derive(Default)]
pub struct Vernam {
    key: Option<Zeroizing<Vec<u8>>>,
}

impl Vernam {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockCipher for Vernam {
    fn init(&mut self, _direction: Direction, params: &CipherParameter) -> Result<()> {
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

        self.key = Some(key);
        Ok(())
    }

    fn algorithm_name(&self) -> String {
        NAME.into()
    }

    fn block_size(&self) -> usize {
        self.key.as_ref().map_or(0, |key| key.len())
    }

    fn process_block(
        &mut self,
        input: &[u8],
        in_off: usize,
        output: &mut [u8],
        out_off: usize,
    ) -> Result<usize> {
        let key = self.key.as_ref().ok_or(Error::IllegalState("Vernam used before init"))?;
        let bs = key.len();
        check_block(bs, input, in_off, output, out_off)?;

        for i in 0..bs {
            output[out_off + i] = input[in_off + i] ^ key[i];
        }
        Ok(bs)
    }

    fn reset(&mut self) {}
}

impl std::fmt::Debug for Vernam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vernam").field("block_size", &self.block_size()).finish()
    }
}
