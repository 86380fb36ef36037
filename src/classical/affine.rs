// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{SubstitutionTable, identity_table, require_key, wrong_key};
use crate::cipher::{BlockCipher, Direction};
use crate::key::{Key, reduce};
use crate::param::CipherParameter;
use crate::{Error, Result};

const NAME: &str = "Affine";

/// Affine cipher over the first `m` byte values.
///
/// Bytes below the key modulus map to `(a·x + b) mod m`; bytes at or above
/// it pass through unchanged. Since `m` must fit the byte alphabet, keys with
/// `m > 256` are rejected at `init`.
#[derive(Default)]
pub struct Affine {
    table: Option<SubstitutionTable>,
}

impl Affine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockCipher for Affine {
    fn init(&mut self, direction: Direction, params: &CipherParameter) -> Result<()> {
        let key = match require_key(NAME, params)? {
            Key::Affine(key) => *key,
            other => return Err(wrong_key(NAME, other)),
        };

        let m = key.m();
        if m > 256 {
            return Err(Error::KeyValidation(format!(
                "affine modulus {m} exceeds the byte alphabet"
            )));
        }
        let a = reduce(key.a(), m);
        let b = reduce(key.b(), m);

        let mut forward = identity_table();
        for (x, slot) in forward.iter_mut().enumerate().take(m as usize) {
            *slot = ((a * x as u64 + b) % m) as u8;
        }

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
        let table = self.table.as_ref().ok_or(Error::IllegalState("Affine used before init"))?;
        table.process_block(input, in_off, output, out_off)
    }

    fn reset(&mut self) {}
}

impl std::fmt::Debug for Affine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Affine").field("initialised", &self.table.is_some()).finish()
    }
}
