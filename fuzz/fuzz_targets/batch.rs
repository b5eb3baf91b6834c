#![no_main]

use libfuzzer_sys::fuzz_target;
use wire::{decode_batch, decode_batch_packets, encode_batch, Limits};

fuzz_target!(|data: &[u8]| {
    let limits = Limits::for_testing();

    let Ok(payloads) = decode_batch(data, &limits) else {
        return;
    };
    assert!(payloads.len() <= limits.max_packets);

    // Length prefixes may be non-minimal, so compare payloads, not bytes.
    let encoded = encode_batch(payloads.iter().copied()).unwrap();
    assert!(encoded.len() <= data.len());
    assert_eq!(decode_batch(&encoded, &limits).unwrap(), payloads);

    let _ = decode_batch_packets(data, &limits);
});
