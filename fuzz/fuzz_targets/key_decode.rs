#![no_main]

use libfuzzer_sys::fuzz_target;

use polycipher::Key;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic the decoder
    let Ok(key) = Key::decode(data) else {
        return;
    };

    // Non-minimal integers and unsorted pairs decode too, so compare keys
    // rather than bytes
    let encoded = key.encode();
    let decoded = Key::decode(&encoded).expect("re-encoded key must decode");
    assert_eq!(decoded, key, "{} key changed across a round trip", key.kind());
    assert_eq!(decoded.encode(), encoded);
});
