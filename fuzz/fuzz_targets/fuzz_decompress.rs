#![no_main]

use libfuzzer_sys::fuzz_target;
use rsnappy::{decompress_into, decompress_len};

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary data must never panic or write out of bounds;
    // it either succeeds or returns an error.
    if let Ok((dlen, _)) = decompress_len(data) {
        if dlen <= 1 << 24 {
            let mut buf = vec![0u8; dlen];
            let _ = decompress_into(&mut buf, data);
        }
    }
});
