#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

use num_bigint_dig::BigUint;
use polycipher::{Cipher, CipherParameter, Direction, RsaCipher, RsaKeyGenerator, RsaKeyPair};
use rand::SeedableRng;
use rand::rngs::StdRng;

static KEYPAIR: OnceLock<RsaKeyPair> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let pair = KEYPAIR.get_or_init(|| {
        RsaKeyGenerator::new().bit_length(512).generate(&mut StdRng::seed_from_u64(0)).unwrap()
    });

    let mut rsa = RsaCipher::new();
    rsa.init(Direction::Encrypt, &CipherParameter::key(pair.public_key().clone())).unwrap();
    let ciphertext = match rsa.finish_with(data) {
        Ok(ct) => ct,
        // Message at least as large as the modulus
        Err(_) => return,
    };

    let mut crt = RsaCipher::new();
    crt.init(Direction::Decrypt, &CipherParameter::key(pair.private_key().clone())).unwrap();
    let mut direct = RsaCipher::new().with_crt(false);
    direct.init(Direction::Decrypt, &CipherParameter::key(pair.private_key().clone())).unwrap();

    let recovered = crt.finish_with(&ciphertext).expect("decryption failed for valid ciphertext");
    assert_eq!(recovered, direct.finish_with(&ciphertext).unwrap(), "CRT and direct paths disagree");

    assert_eq!(
        BigUint::from_bytes_be(data),
        BigUint::from_bytes_be(&recovered),
        "Plaintext mismatch!\nOriginal bytes: {:?}\nDecrypted bytes: {:?}",
        data,
        recovered
    );
});
