// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{SubstitutionTable, identity_table, require_key, wrong_key};
use crate::cipher::{BlockCipher, Direction};
use crate::key::Key;
use crate::param::CipherParameter;
use crate::{Error, Result};

const NAME: &str = "Monoalphabet";

/// Byte substitution through a [`MonoalphabetKey`](crate::MonoalphabetKey).
///
/// Unmapped bytes pass through, so the mapping has to permute its own
/// domain; anything else is rejected at `init`.
#[derive(Default)]
pub struct Monoalphabet {
    table: Option<SubstitutionTable>,
}

impl Monoalphabet {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockCipher for Monoalphabet {
    fn init(&mut self, direction: Direction, params: &CipherParameter) -> Result<()> {
        let key = match require_key(NAME, params)? {
            Key::Monoalphabet(key) => key,
            other => return Err(wrong_key(NAME, other)),
        };

        let mut forward = identity_table();
        for (&from, &to) in key.mapping() {
            forward[from as usize] = to;
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
        let table =
            self.table.as_ref().ok_or(Error::IllegalState("Monoalphabet used before init"))?;
        table.process_block(input, in_off, output, out_off)
    }

    fn reset(&mut self) {}
}

impl std::fmt::Debug for Monoalphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monoalphabet").field("initialised", &self.table.is_some()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classical::test_support::run_blocks;
    use crate::key::MonoalphabetKey;

    const PLAIN: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
    const CIPHER: &[u8] = b"qwertyuiopasdfghjklzxcvbnm";

    #[test]
    fn substitutes_and_passes_through() {
        let params = CipherParameter::key(MonoalphabetKey::from_alphabets(PLAIN, CIPHER).unwrap());
        let out = run_blocks(&mut Monoalphabet::new(), Direction::Encrypt, &params, b"hello, world");
        assert_eq!(out, b"itssg, vgksr");
    }

    #[test]
    fn roundtrip() {
        let params = CipherParameter::key(MonoalphabetKey::from_alphabets(PLAIN, CIPHER).unwrap());
        let mut cipher = Monoalphabet::new();
        let ciphertext = run_blocks(&mut cipher, Direction::Encrypt, &params, b"substitution");
        assert_eq!(run_blocks(&mut cipher, Direction::Decrypt, &params, &ciphertext), b"substitution");
    }

    #[test]
    fn non_invertible_mapping_is_rejected() {
        // 'a' -> 'b' while 'b' still maps to itself
        let params = CipherParameter::key(MonoalphabetKey::from_alphabets(b"a", b"b").unwrap());
        assert!(matches!(
            Monoalphabet::new().init(Direction::Encrypt, &params),
            Err(Error::KeyValidation(_))
        ));
    }
}
