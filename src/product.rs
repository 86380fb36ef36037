// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fan-out composition of several ciphers.
//!
//! Encryption feeds the same input to every bound cipher and concatenates
//! their outputs in binding order. Decryption takes the bindings in reverse
//! order: the ciphertext is split into one equal segment per binding, binding
//! `k` inverts segment `N - 1 - k`, and every recovered plaintext must agree.
//!
//! ```text
//! encrypt [A, B, C]:  A(m) || B(m) || C(m)
//! decrypt [C, B, A]:  C⁻¹(seg 2) == B⁻¹(seg 1) == A⁻¹(seg 0)
//! ```
//!
//! Segments only line up when every cipher preserves length, so unpadded
//! ECB modes and rail fences compose while RSA and padded modes are refused
//! by [`ProductCipher::init`] in either direction.

use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::cipher::{Cipher, Direction};
use crate::param::CipherParameter;
use crate::{Error, Result};

/// Lifecycle of a [`ProductCipher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Uninitialized,
    Initialized,
    Updating,
    Finalized,
}

struct Binding<'a> {
    cipher: &'a mut dyn Cipher,
    params: CipherParameter,
    /// Encrypt output produced so far by this binding.
    pending: Vec<u8>,
}

/// Runs several borrowed ciphers over one message.
///
/// The product only orders the ciphers; it borrows them for the lifetime of
/// a binding so the same instances can be rebound for decryption.
pub struct ProductCipher<'a> {
    state: State,
    direction: Direction,
    bindings: Vec<Binding<'a>>,
    buffer: Vec<u8>,
}

impl<'a> ProductCipher<'a> {
    pub fn new() -> Self {
        Self {
            state: State::Uninitialized,
            direction: Direction::Encrypt,
            bindings: Vec::new(),
            buffer: Vec::new(),
        }
    }

    /// Bind each cipher to its parameters and initialise it for `direction`.
    ///
    /// For decryption the pairs must be supplied in the reverse of the order
    /// used for encryption. Any previous binding is dropped first.
    ///
    /// Fails with [`Error::IllegalArgument`] when the list is empty or holds
    /// a cipher that does not [preserve length](Cipher::preserves_length).
    pub fn init(
        &mut self,
        direction: Direction,
        pairs: Vec<(&'a mut dyn Cipher, CipherParameter)>,
    ) -> Result<()> {
        self.clear();
        if pairs.is_empty() {
            return Err(Error::IllegalArgument("product cipher needs at least one cipher".into()));
        }
        if let Some((cipher, _)) = pairs.iter().find(|(cipher, _)| !cipher.preserves_length()) {
            return Err(Error::IllegalArgument(format!(
                "{} changes message length and cannot be part of a product cipher",
                cipher.algorithm_name()
            )));
        }

        let mut bindings = Vec::with_capacity(pairs.len());
        for (cipher, params) in pairs {
            cipher.init(direction, &params)?;
            bindings.push(Binding { cipher, params, pending: Vec::new() });
        }

        self.bindings = bindings;
        self.direction = direction;
        self.state = State::Initialized;
        Ok(())
    }

    /// Names of the bound ciphers joined with `+`, in binding order.
    pub fn algorithm_name(&self) -> String {
        let names: Vec<String> =
            self.bindings.iter().map(|binding| binding.cipher.algorithm_name()).collect();
        names.join("+")
    }

    /// Number of bound ciphers.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Feed the next chunk of input. Output is only released by `finish`.
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        match self.state {
            State::Initialized | State::Updating => {}
            State::Uninitialized => {
                return Err(Error::IllegalState("product cipher used before init"));
            }
            State::Finalized => {
                return Err(Error::IllegalState("product cipher already finished"));
            }
        }

        match self.direction {
            Direction::Encrypt => {
                for binding in &mut self.bindings {
                    let out = binding.cipher.update(data);
                    match out {
                        Ok(out) => binding.pending.extend_from_slice(&out),
                        Err(err) => {
                            self.abort();
                            return Err(err);
                        }
                    }
                }
            }
            Direction::Decrypt => self.buffer.extend_from_slice(data),
        }

        self.state = State::Updating;
        Ok(())
    }

    /// Complete the message. Either the whole output is returned or nothing
    /// is, and the product moves to its finalized state in both cases.
    pub fn finish(&mut self) -> Result<Vec<u8>> {
        match self.state {
            State::Initialized | State::Updating => {}
            State::Uninitialized => {
                return Err(Error::IllegalState("product cipher used before init"));
            }
            State::Finalized => {
                return Err(Error::IllegalState("product cipher already finished"));
            }
        }

        let result = match self.direction {
            Direction::Encrypt => self.finish_encrypt(),
            Direction::Decrypt => self.finish_decrypt(),
        };

        match &result {
            Ok(_) => self.buffer.zeroize(),
            Err(_) => self.abort(),
        }
        self.state = State::Finalized;

        if let Ok(out) = &result {
            debug!(
                ciphers = self.bindings.len(),
                direction = ?self.direction,
                bytes = out.len(),
                "product cipher finished"
            );
        }
        result
    }

    /// `update(data)` followed by `finish()`.
    pub fn finish_with(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        self.update(data)?;
        self.finish()
    }

    fn finish_encrypt(&mut self) -> Result<Vec<u8>> {
        let mut parts = Vec::with_capacity(self.bindings.len());
        for binding in &mut self.bindings {
            let tail = binding.cipher.finish()?;
            let mut part = std::mem::take(&mut binding.pending);
            part.extend_from_slice(&tail);
            parts.push(part);
        }
        Ok(parts.concat())
    }

    fn finish_decrypt(&mut self) -> Result<Vec<u8>> {
        let count = self.bindings.len();
        if self.buffer.len() % count != 0 {
            return Err(Error::DataLength(format!(
                "ciphertext of {} bytes does not split into {count} segments",
                self.buffer.len()
            )));
        }

        let segment = self.buffer.len() / count;
        let mut recovered: Option<Vec<u8>> = None;
        for (k, binding) in self.bindings.iter_mut().enumerate() {
            let start = (count - 1 - k) * segment;
            let plain = binding.cipher.finish_with(&self.buffer[start..start + segment])?;
            match &recovered {
                None => recovered = Some(plain),
                Some(first) if *first == plain => {}
                Some(_) => return Err(Error::InconsistentSegments),
            }
        }

        Ok(recovered.unwrap_or_default())
    }

    /// Drop buffered input and return every bound cipher to its initial state.
    fn abort(&mut self) {
        self.buffer.zeroize();
        for binding in &mut self.bindings {
            binding.pending.zeroize();
            // Re-binding discards whatever the cipher buffered.
            if let Err(err) = binding.cipher.init(self.direction, &binding.params) {
                warn!(
                    algorithm = %binding.cipher.algorithm_name(),
                    %err,
                    "failed to rebind cipher after error"
                );
            }
        }
    }

    fn clear(&mut self) {
        self.buffer.zeroize();
        self.bindings.clear();
        self.state = State::Uninitialized;
    }
}

impl Default for ProductCipher<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProductCipher<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductCipher")
            .field("state", &self.state)
            .field("direction", &self.direction)
            .field("ciphers", &self.algorithm_name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classical::{Caesar, Monoalphabet, Railfence, Vigenere};
    use crate::ecb::Ecb;
    use crate::key::{MonoalphabetKey, RailfenceKey, RawSecretKey, ShiftKey};
    use crate::padding::BitPadding;
    use crate::rsa::{RsaCipher, RsaKeyGenerator};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bind(
        cipher: &mut dyn Cipher,
        params: CipherParameter,
    ) -> (&mut dyn Cipher, CipherParameter) {
        (cipher, params)
    }

    fn keys() -> [CipherParameter; 3] {
        [
            CipherParameter::key(ShiftKey::new(3)),
            CipherParameter::key(
                MonoalphabetKey::from_alphabets(
                    b"abcdefghijklmnopqrstuvwxyz",
                    b"qwertyuiopasdfghjklzxcvbnm",
                )
                .unwrap(),
            ),
            CipherParameter::key(RailfenceKey::new(3).unwrap()),
        ]
    }

    #[test]
    fn fans_out_and_concatenates() {
        let mut caesar = Ecb::new(Caesar::new());
        let mut rails = Railfence::new();
        let [shift, _, rail] = keys();

        let mut product = ProductCipher::new();
        product
            .init(Direction::Encrypt, vec![bind(&mut caesar, shift), bind(&mut rails, rail)])
            .unwrap();
        assert_eq!(product.algorithm_name(), "Caesar/ECB+Railfence");

        let out = product.finish_with(b"abcdef").unwrap();
        assert_eq!(out, b"defghiaebdfc");
    }

    #[test]
    fn reverse_order_roundtrip() {
        let mut a = Ecb::new(Caesar::new());
        let mut b = Ecb::new(Monoalphabet::new());
        let mut c = Railfence::new();
        let [ka, kb, kc] = keys();
        let message = b"attack at dawn, hold the line";

        let mut product = ProductCipher::new();
        product
            .init(
                Direction::Encrypt,
                vec![bind(&mut a, ka.clone()), bind(&mut b, kb.clone()), bind(&mut c, kc.clone())],
            )
            .unwrap();
        product.update(&message[..10]).unwrap();
        product.update(&message[10..]).unwrap();
        let ciphertext = product.finish().unwrap();
        assert_eq!(ciphertext.len(), 3 * message.len());
        drop(product);

        let mut product = ProductCipher::new();
        product
            .init(Direction::Decrypt, vec![bind(&mut c, kc), bind(&mut b, kb), bind(&mut a, ka)])
            .unwrap();
        assert_eq!(product.finish_with(&ciphertext).unwrap(), message);
    }

    #[test]
    fn empty_binding_list_is_rejected() {
        let mut product = ProductCipher::new();
        assert!(matches!(
            product.init(Direction::Encrypt, Vec::new()),
            Err(Error::IllegalArgument(_))
        ));
        assert!(product.is_empty());
    }

    #[test]
    fn calls_out_of_order_are_illegal() {
        let mut caesar = Ecb::new(Caesar::new());
        let mut product = ProductCipher::new();
        assert!(matches!(product.update(b"x"), Err(Error::IllegalState(_))));
        assert!(matches!(product.finish(), Err(Error::IllegalState(_))));

        product
            .init(Direction::Encrypt, vec![bind(&mut caesar, CipherParameter::key(ShiftKey::new(1)))])
            .unwrap();
        assert_eq!(product.finish_with(b"a").unwrap(), b"b");
        assert!(matches!(product.update(b"x"), Err(Error::IllegalState(_))));
        assert!(matches!(product.finish(), Err(Error::IllegalState(_))));
    }

    #[test]
    fn uneven_ciphertext_is_a_length_error() {
        let mut a = Ecb::new(Caesar::new());
        let mut b = Ecb::new(Caesar::new());
        let mut product = ProductCipher::new();
        product
            .init(
                Direction::Decrypt,
                vec![
                    bind(&mut a, CipherParameter::key(ShiftKey::new(1))),
                    bind(&mut b, CipherParameter::key(ShiftKey::new(2))),
                ],
            )
            .unwrap();
        assert!(matches!(product.finish_with(b"abc"), Err(Error::DataLength(_))));
    }

    #[test]
    fn disagreeing_segments_are_rejected() {
        let mut a = Ecb::new(Caesar::new());
        let mut b = Ecb::new(Caesar::new());
        let mut product = ProductCipher::new();
        product
            .init(
                Direction::Decrypt,
                vec![
                    bind(&mut a, CipherParameter::key(ShiftKey::new(1))),
                    bind(&mut b, CipherParameter::key(ShiftKey::new(1))),
                ],
            )
            .unwrap();
        assert!(matches!(product.finish_with(b"bbcd"), Err(Error::InconsistentSegments)));
    }

    #[test]
    fn failed_binding_leaves_product_uninitialized() {
        let mut a = Ecb::new(Caesar::new());
        let mut product = ProductCipher::new();
        let bad = CipherParameter::key(RailfenceKey::new(2).unwrap());
        assert!(matches!(
            product.init(Direction::Encrypt, vec![bind(&mut a, bad)]),
            Err(Error::InvalidKeyType { .. })
        ));
        assert!(matches!(product.update(b"x"), Err(Error::IllegalState(_))));
    }

    fn vigenere_key() -> CipherParameter {
        CipherParameter::key(RawSecretKey::new("Vigenere", b"KEY").unwrap())
    }

    #[test]
    fn padded_binding_is_refused_in_both_directions() {
        let mut caesar = Ecb::new(Caesar::new());
        let mut vigenere = Ecb::new(Vigenere::new()).with_padding(BitPadding);
        let shift = CipherParameter::key(ShiftKey::new(3));

        for direction in [Direction::Encrypt, Direction::Decrypt] {
            let mut product = ProductCipher::new();
            let err = product
                .init(
                    direction,
                    vec![bind(&mut caesar, shift.clone()), bind(&mut vigenere, vigenere_key())],
                )
                .unwrap_err();
            assert!(matches!(err, Error::IllegalArgument(_)), "{direction:?}: {err:?}");
            assert!(product.is_empty());
            assert!(matches!(product.finish_with(b"hello"), Err(Error::IllegalState(_))));
        }
    }

    #[test]
    fn rsa_binding_is_refused() {
        let mut rng = StdRng::seed_from_u64(7);
        let pair = RsaKeyGenerator::new().bit_length(512).generate(&mut rng).unwrap();
        let mut rsa = RsaCipher::new();
        let mut product = ProductCipher::new();
        assert!(matches!(
            product.init(
                Direction::Encrypt,
                vec![bind(&mut rsa, CipherParameter::key(pair.public_key().clone()))]
            ),
            Err(Error::IllegalArgument(_))
        ));
    }

    #[test]
    fn encrypt_failure_returns_nothing_and_allows_rebinding() {
        let mut caesar = Ecb::new(Caesar::new());
        let mut vigenere = Ecb::new(Vigenere::new());
        let mut rails = Railfence::new();
        let shift = CipherParameter::key(ShiftKey::new(3));

        let mut product = ProductCipher::new();
        product
            .init(
                Direction::Encrypt,
                vec![bind(&mut caesar, shift.clone()), bind(&mut vigenere, vigenere_key())],
            )
            .unwrap();
        // Five bytes leave a partial block for the unpadded three-byte Vigenere.
        assert!(matches!(product.finish_with(b"hello"), Err(Error::DataLength(_))));
        assert!(matches!(product.finish(), Err(Error::IllegalState(_))));

        product
            .init(
                Direction::Encrypt,
                vec![bind(&mut rails, CipherParameter::key(RailfenceKey::new(3).unwrap()))],
            )
            .unwrap();
        assert_eq!(product.finish_with(b"abcdef").unwrap(), b"aebdfc");
        drop(product);

        // Nothing from the failed message is left in the sub-ciphers.
        let mut reference = Ecb::new(Vigenere::new());
        reference.init(Direction::Encrypt, &vigenere_key()).unwrap();
        let expected = reference.finish_with(b"abcdef").unwrap();
        assert_eq!(caesar.finish_with(b"abc").unwrap(), b"def");
        assert_eq!(vigenere.finish_with(b"abcdef").unwrap(), expected);

        let mut product = ProductCipher::new();
        product
            .init(Direction::Encrypt, vec![bind(&mut caesar, shift), bind(&mut vigenere, vigenere_key())])
            .unwrap();
        let ciphertext = product.finish_with(b"abcdef").unwrap();
        assert_eq!(&ciphertext[..6], b"defghi");
        assert_eq!(&ciphertext[6..], &expected[..]);
    }
}
