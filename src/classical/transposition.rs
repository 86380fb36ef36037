// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{require_key, wrong_key};
use crate::cipher::{BlockCipher, Direction, check_block};
use crate::key::Key;
use crate::param::CipherParameter;
use crate::{Error, Result};

const NAME: &str = "Transposition";

/// Columnar transposition within each block: `c[i] = p[order[i]]`.
///
/// The block size is the permutation length.
#[derive(Default)]
pub struct Transposition {
    state: Option<(Direction, Vec<usize>)>,
}

impl Transposition {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Checks that `order` is a permutation of `0..order.len()`.
fn validate(order: &[u32]) -> Result<Vec<usize>> {
    let mut seen = vec![false; order.len()];
    let mut out = Vec::with_capacity(order.len());

    for &column in order {
        let column = column as usize;
        match seen.get_mut(column) {
            Some(slot) if !*slot => *slot = true,
            Some(_) => {
                return Err(Error::KeyValidation(format!("column {column} appears twice")));
            }
            None => {
                return Err(Error::KeyValidation(format!(
                    "column {column} is outside a {}-column permutation",
                    order.len()
                )));
            }
        }
        out.push(column);
    }

    Ok(out)
}

impl BlockCipher for Transposition {
    fn init(&mut self, direction: Direction, params: &CipherParameter) -> Result<()> {
        let order = match require_key(NAME, params)? {
            Key::Permutation(key) => validate(key.order())?,
            other => return Err(wrong_key(NAME, other)),
        };

        self.state = Some((direction, order));
        Ok(())
    }

    fn algorithm_name(&self) -> String {
        NAME.into()
    }

    fn block_size(&self) -> usize {
        self.state.as_ref().map_or(0, |(_, order)| order.len())
    }

    fn process_block(
        &mut self,
        input: &[u8],
        in_off: usize,
        output: &mut [u8],
        out_off: usize,
    ) -> Result<usize> {
        let (direction, order) =
            self.state.as_ref().ok_or(Error::IllegalState("Transposition used before init"))?;
        let bs = order.len();
        check_block(bs, input, in_off, output, out_off)?;

        for (i, &column) in order.iter().enumerate() {
            match direction {
                Direction::Encrypt => output[out_off + i] = input[in_off + column],
                Direction::Decrypt => output[out_off + column] = input[in_off + i],
            }
        }
        Ok(bs)
    }

    fn reset(&mut self) {}
}

impl std::fmt::Debug for Transposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transposition").field("block_size", &self.block_size()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classical::test_support::run_blocks;
    use crate::key::PermutationKey;

    #[test]
    fn reorders_columns() {
        let params = CipherParameter::key(PermutationKey::new(&[2, 0, 1]).unwrap());
        let out = run_blocks(&mut Transposition::new(), Direction::Encrypt, &params, b"abcdef");
        assert_eq!(out, b"cabfde");
    }

    #[test]
    fn roundtrip() {
        let params = CipherParameter::key(PermutationKey::new(&[3, 1, 0, 2]).unwrap());
        let mut cipher = Transposition::new();
        let ciphertext = run_blocks(&mut cipher, Direction::Encrypt, &params, b"transpos");
        assert_eq!(run_blocks(&mut cipher, Direction::Decrypt, &params, &ciphertext), b"transpos");
    }

    #[test]
    fn duplicate_or_out_of_range_columns_are_rejected() {
        for order in [&[0u32, 0][..], &[0, 2][..]] {
            let params = CipherParameter::key(PermutationKey::new(order).unwrap());
            assert!(matches!(
                Transposition::new().init(Direction::Encrypt, &params),
                Err(Error::KeyValidation(_))
            ));
        }
    }

    #[test]
    fn debug_hides_column_order() {
        let mut cipher = Transposition::new();
        let params = CipherParameter::key(PermutationKey::new(&[7, 3, 5, 1, 6, 0, 4, 2]).unwrap());
        cipher.init(Direction::Encrypt, &params).unwrap();
        assert_eq!(format!("{cipher:?}"), "Transposition { block_size: 8 }");
    }
}
