// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for the key model, the codec and the cipher contracts.

use std::collections::BTreeMap;

use num_bigint_dig::BigUint;
use polycipher::classical::{Affine, Caesar, Railfence, Transposition, Vigenere};
use polycipher::{
    AffineKey, BitPadding, BlockCipher, Cipher, CipherParameter, ConstantPadding, Direction, Ecb,
    Error, Key, MonoalphabetKey, Padding, PermutationKey, ProductCipher, RailfenceKey,
    RawSecretKey, RsaCipher, RsaKeyGenerator, RsaKeyPair, ShiftKey,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Public exponents coprime to φ(8633) = 8448 = 2⁸·3·11.
const EXPONENTS: [u32; 7] = [5, 7, 13, 17, 19, 23, 65537];

fn textbook_pair(e: u32) -> RsaKeyPair {
    RsaKeyGenerator::new()
        .primes(BigUint::from(89u32), BigUint::from(97u32))
        .public_exponent(BigUint::from(e))
        .generate(&mut StdRng::seed_from_u64(0))
        .unwrap()
}

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 1..64)
            .prop_map(|bytes| Key::from(RawSecretKey::new("Vernam", &bytes).unwrap())),
        any::<i64>().prop_map(|shift| Key::from(ShiftKey::new(shift))),
        (any::<i64>(), any::<i64>(), 1u64..1_000_000).prop_filter_map(
            "coefficients must be coprime",
            |(a, b, m)| AffineKey::new(a, b, m).ok().map(Key::from)
        ),
        prop::collection::vec(any::<u32>(), 1..32)
            .prop_map(|order| Key::from(PermutationKey::new(&order).unwrap())),
        (1u64..=u64::MAX).prop_map(|rails| Key::from(RailfenceKey::new(rails).unwrap())),
        prop::collection::btree_map(any::<u8>(), any::<u8>(), 1..64)
            .prop_map(|mapping: BTreeMap<u8, u8>| Key::from(MonoalphabetKey::new(mapping).unwrap())),
        prop::sample::select(EXPONENTS.to_vec())
            .prop_map(|e| Key::from(textbook_pair(e).public_key().clone())),
        prop::sample::select(EXPONENTS.to_vec())
            .prop_map(|e| Key::from(textbook_pair(e).private_key().clone())),
    ]
}

#[test]
fn prop_affine_key_requires_coprime_coefficients() {
    proptest!(|(a in -10_000i64..10_000, b in any::<i64>(), m in 1u64..=512)| {
        let reduced = a.rem_euclid(m as i64) as u64;
        let coprime = num_integer::gcd(reduced, m) == 1;

        match AffineKey::new(a, b, m) {
            Ok(key) => {
                prop_assert!(coprime);
                prop_assert_eq!((key.a(), key.b(), key.m()), (a, b, m));
            }
            Err(err) => {
                prop_assert!(!coprime);
                prop_assert!(matches!(err, Error::KeyValidation(_)));
            }
        }
    });
}

#[test]
fn prop_codec_roundtrips_every_key() {
    proptest!(|(key in key_strategy())| {
        let encoded = key.encode();
        prop_assert_eq!(&encoded, &key.encode());
        prop_assert_eq!(Key::decode(&encoded)?, key);
    });
}

#[test]
fn prop_codec_rejects_truncation() {
    proptest!(|(key in key_strategy(), cut in any::<prop::sample::Index>())| {
        let encoded = key.encode();
        let len = cut.index(encoded.len());
        prop_assert!(matches!(Key::decode(&encoded[..len]), Err(Error::MalformedEncoding(_))));
    });
}

#[test]
fn prop_rsa_roundtrip_below_modulus() {
    proptest!(|(m in 0u32..8633, e in prop::sample::select(EXPONENTS.to_vec()))| {
        let pair = textbook_pair(e);
        let message = BigUint::from(m).to_bytes_be();
        let mut rsa = RsaCipher::new();

        rsa.init(Direction::Encrypt, &CipherParameter::key(pair.public_key().clone()))?;
        let ciphertext = rsa.finish_with(&message)?;
        prop_assert_eq!(ciphertext.len(), 2);

        rsa.init(Direction::Decrypt, &CipherParameter::key(pair.private_key().clone()))?;
        let recovered = rsa.finish_with(&ciphertext)?;
        prop_assert_eq!(BigUint::from_bytes_be(&recovered), BigUint::from(m));
    });
}

#[test]
fn prop_rsa_crt_matches_direct_exponentiation() {
    proptest!(|(c in 0u32..8633, e in prop::sample::select(EXPONENTS.to_vec()))| {
        let pair = textbook_pair(e);
        let param = CipherParameter::key(pair.private_key().clone());
        let ciphertext = BigUint::from(c).to_bytes_be();

        let mut crt = RsaCipher::new().with_crt(true);
        crt.init(Direction::Decrypt, &param)?;
        let mut direct = RsaCipher::new().with_crt(false);
        direct.init(Direction::Decrypt, &param)?;

        prop_assert_eq!(crt.finish_with(&ciphertext)?, direct.finish_with(&ciphertext)?);
    });
}

#[test]
fn prop_product_reverse_order_roundtrip() {
    proptest!(|(
        message in prop::collection::vec(any::<u8>(), 1..200),
        shift in any::<i64>(),
        a in (0i64..128).prop_map(|a| 2 * a + 1),
        b in any::<i64>(),
        rails in 1u64..12,
    )| {
        let keys = [
            CipherParameter::key(ShiftKey::new(shift)),
            CipherParameter::key(AffineKey::new(a, b, 256)?),
            CipherParameter::key(RailfenceKey::new(rails)?),
        ];
        let mut caesar = Ecb::new(Caesar::new());
        let mut affine = Ecb::new(Affine::new());
        let mut railfence = Railfence::new();

        let ciphertext = {
            let mut product = ProductCipher::new();
            product.init(
                Direction::Encrypt,
                vec![
                    (&mut caesar as &mut dyn Cipher, keys[0].clone()),
                    (&mut affine as &mut dyn Cipher, keys[1].clone()),
                    (&mut railfence as &mut dyn Cipher, keys[2].clone()),
                ],
            )?;
            product.finish_with(&message)?
        };
        prop_assert_eq!(ciphertext.len(), 3 * message.len());

        let mut product = ProductCipher::new();
        product.init(
            Direction::Decrypt,
            vec![
                (&mut railfence as &mut dyn Cipher, keys[2].clone()),
                (&mut affine as &mut dyn Cipher, keys[1].clone()),
                (&mut caesar as &mut dyn Cipher, keys[0].clone()),
            ],
        )?;
        prop_assert_eq!(product.finish_with(&ciphertext)?, message);
    });
}

#[test]
fn prop_padding_strips_what_it_adds() {
    proptest!(|(block_size in 1usize..64, fill in any::<prop::sample::Index>(), value in 1u8..=255)| {
        let used = fill.index(block_size);
        let paddings: [&dyn Padding; 2] = [&BitPadding, &ConstantPadding::new(value)];

        for padding in paddings {
            let mut block = vec![0u8; block_size];
            // Data bytes never equal the constant pad value.
            block[..used].fill(value.wrapping_add(1).max(2));
            let added = padding.add_padding(&mut block, used);
            prop_assert_eq!(added, block_size - used);
            prop_assert_eq!(padding.pad_count(&block)?, added);
        }
    });
}

#[test]
fn prop_padded_ecb_roundtrip_up_to_one_block() {
    proptest!(|(key in prop::collection::vec(any::<u8>(), 1..16), seed in any::<u64>())| {
        let param = CipherParameter::key(RawSecretKey::new("Vigenere", &key)?);
        let mut ecb = Ecb::new(Vigenere::new()).with_padding(BitPadding);
        let mut rng = StdRng::seed_from_u64(seed);

        for len in 0..=key.len() {
            let mut message = vec![0u8; len];
            rand::RngCore::fill_bytes(&mut rng, &mut message);

            ecb.init(Direction::Encrypt, &param)?;
            let ciphertext = ecb.finish_with(&message)?;
            prop_assert_eq!(ciphertext.len(), (len / key.len() + 1) * key.len());

            ecb.init(Direction::Decrypt, &param)?;
            prop_assert_eq!(ecb.finish_with(&ciphertext)?, message);
        }
    });
}

#[test]
fn prop_short_block_is_a_length_error() {
    proptest!(|(width in 2usize..32, offset in 0usize..64)| {
        let order: Vec<u32> = (0..width as u32).rev().collect();
        let mut cipher = Transposition::new();
        cipher.init(Direction::Encrypt, &CipherParameter::key(PermutationKey::new(&order)?))?;
        prop_assert_eq!(cipher.block_size(), width);

        let input = vec![0u8; offset + width - 1];
        let mut output = vec![0u8; width];
        prop_assert!(matches!(
            cipher.process_block(&input, offset, &mut output, 0),
            Err(Error::DataLength(_))
        ));
        prop_assert_eq!(output, vec![0u8; width]);
    });
}
