// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classical ciphers over bytes.
//!
//! Substitution ciphers (Caesar, Affine, Monoalphabet) compile their key into
//! a 256-entry table at `init`; the keyed-block ciphers (Vigenère, Vernam,
//! Transposition) use the key length as block size. Rail fence works on the
//! whole message and implements the streaming [`Cipher`](crate::Cipher)
//! contract directly.

mod affine;
mod caesar;
mod monoalphabet;
mod railfence;
mod transposition;
mod vernam;
mod vigenere;

pub use affine::Affine;
pub use caesar::Caesar;
pub use monoalphabet::Monoalphabet;
pub use railfence::Railfence;
pub use transposition::Transposition;
pub use vernam::Vernam;
pub use vigenere::Vigenere;

use crate::cipher::{Direction, check_block};
use crate::key::Key;
use crate::param::CipherParameter;
use crate::{Error, Result};

/// Pull the typed key out of a parameter tree.
pub(crate) fn require_key<'p>(cipher: &str, params: &'p CipherParameter) -> Result<&'p Key> {
    params.find_key().ok_or_else(|| Error::InvalidParameterShape {
        cipher: cipher.to_string(),
        shape: params.shape(),
    })
}

pub(crate) fn wrong_key(cipher: &str, key: &Key) -> Error {
    Error::InvalidKeyType { cipher: cipher.to_string(), key: key.kind() }
}

/// A byte permutation and the direction it is applied in.
#[derive(Clone)]
pub(crate) struct SubstitutionTable {
    table: [u8; 256],
}

impl SubstitutionTable {
    /// Build from a forward mapping, inverting it for decryption.
    ///
    /// Fails if `forward` is not a bijection on bytes.
    pub(crate) fn new(forward: [u8; 256], direction: Direction) -> Result<Self> {
        let mut inverse = [0u8; 256];
        let mut seen = [false; 256];
        for (from, &to) in forward.iter().enumerate() {
            if std::mem::replace(&mut seen[to as usize], true) {
                return Err(Error::KeyValidation(format!(
                    "substitution maps two bytes onto {to:#04x}"
                )));
            }
            inverse[to as usize] = from as u8;
        }

        let table = match direction {
            Direction::Encrypt => forward,
            Direction::Decrypt => inverse,
        };
        Ok(Self { table })
    }

    pub(crate) fn process_block(
        &self,
        input: &[u8],
        in_off: usize,
        output: &mut [u8],
        out_off: usize,
    ) -> Result<usize> {
        check_block(1, input, in_off, output, out_off)?;
        output[out_off] = self.table[input[in_off] as usize];
        Ok(1)
    }
}

impl Drop for SubstitutionTable {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.table);
    }
}

pub(crate) fn identity_table() -> [u8; 256] {
    std::array::from_fn(|i| i as u8)
}
