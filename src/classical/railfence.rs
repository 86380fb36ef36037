// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::debug;
use zeroize::Zeroize;

use super::{require_key, wrong_key};
use crate::cipher::{Cipher, Direction};
use crate::key::Key;
use crate::param::CipherParameter;
use crate::{Error, Result};

const NAME: &str = "Railfence";

/// Rail fence transposition over the whole message.
///
/// The zig-zag pattern depends on the total length, so input is buffered by
/// `update` and transformed once by `finish`.
#[derive(Default)]
pub struct Railfence {
    state: Option<(Direction, usize)>,
    buffer: Vec<u8>,
}

impl Railfence {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_buffer(&mut self) {
        self.buffer.zeroize();
        self.buffer.clear();
    }
}

/// Message positions in the order they are read off the rails.
fn read_order(len: usize, rails: usize) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..len).collect();
    // With at least as many rails as bytes the zig-zag never turns.
    if rails < 2 || rails >= len {
        return positions;
    }

    let cycle = 2 * (rails - 1);
    let rail = |i: usize| {
        let k = i % cycle;
        if k < rails { k } else { cycle - k }
    };
    positions.sort_by_key(|&i| rail(i));
    positions
}

impl Cipher for Railfence {
    fn init(&mut self, direction: Direction, params: &CipherParameter) -> Result<()> {
        let rails = match require_key(NAME, params)? {
            Key::Railfence(key) => usize::try_from(key.rails()).unwrap_or(usize::MAX),
            other => return Err(wrong_key(NAME, other)),
        };

        self.clear_buffer();
        self.state = Some((direction, rails));
        debug!(algorithm = NAME, ?direction, rails, "cipher initialised");
        Ok(())
    }

    fn algorithm_name(&self) -> String {
        NAME.into()
    }

    fn update(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        if self.state.is_none() {
            return Err(Error::IllegalState("Railfence used before init"));
        }
        self.buffer.extend_from_slice(data);
        Ok(Vec::new())
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        let (direction, rails) =
            self.state.ok_or(Error::IllegalState("Railfence used before init"))?;

        let order = read_order(self.buffer.len(), rails);
        let mut out = vec![0u8; self.buffer.len()];
        for (i, &pos) in order.iter().enumerate() {
            match direction {
                Direction::Encrypt => out[i] = self.buffer[pos],
                Direction::Decrypt => out[pos] = self.buffer[i],
            }
        }

        self.clear_buffer();
        Ok(out)
    }

    fn output_size(&self, input_len: usize) -> usize {
        self.buffer.len() + input_len
    }

    fn preserves_length(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for Railfence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Railfence")
            .field("initialised", &self.state.is_some())
            .field("buffered", &self.buffer.len())
            .finish()
    }
}
