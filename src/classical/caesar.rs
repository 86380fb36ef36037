// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{SubstitutionTable, require_key, wrong_key};
use crate::cipher::{BlockCipher, Direction};
use crate::key::{Key, reduce};
use crate::param::CipherParameter;
use crate::{Error, Result};

const NAME: &str = "Caesar";

/// Shift cipher: `c = (p + shift) mod 256`.
#[derive(Default)]
pub struct Caesar {
    table: Option<SubstitutionTable>,
}

impl Caesar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockCipher for Caesar {
    fn init(&mut self, direction: Direction, params: &CipherParameter) -> Result<()> {
        let shift = match require_key(NAME, params)? {
            Key::Shift(key) => reduce(key.shift(), 256) as u8,
            other => return Err(wrong_key(NAME, other)),
        };

        let forward = std::array::from_fn(|b| (b as u8).wrapping_add(shift));
        self.table = Some(SubstitutionTable::new(forward, direction)?);
        Ok(())
    }

    fn algorithm_name(&self) -> String {
        NAME.into()
    }

    fn block_size(&self) -> usize {
        1
    }

    fn process_block(
        &mut self,
        input: &[u8],
        in_off: usize,
        output: &mut [u8],
        out_off: usize,
    ) -> Result<usize> {
        let table = self.table.as_ref().ok_or(Error::IllegalState("Caesar used before init"))?;
        table.process_block(input, in_off, output, out_off)
    }

    fn reset(&mut self) {}
}

impl std::fmt::Debug for Caesar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Caesar").field("initialised", &self.table.is_some()).finish()
    }
}
