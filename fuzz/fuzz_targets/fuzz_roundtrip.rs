#![no_main]

use libfuzzer_sys::fuzz_target;
use rsnappy::{compress, compress_better, decompress};

fuzz_target!(|data: &[u8]| {
    // Skip very large inputs to avoid OOM
    if data.len() > 1_000_000 {
        return;
    }

    let encoded = compress(data);
    let decoded = decompress(&encoded).expect("fast output must decode");
    assert_eq!(data, &decoded[..], "fast roundtrip failed");

    let encoded = compress_better(data);
    let decoded = decompress(&encoded).expect("better output must decode");
    assert_eq!(data, &decoded[..], "better roundtrip failed");
});
