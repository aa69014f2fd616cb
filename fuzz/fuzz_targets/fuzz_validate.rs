#![no_main]

use libfuzzer_sys::fuzz_target;
use rsnappy::{decompress_into, decompress_len, is_valid_compressed};

fuzz_target!(|data: &[u8]| {
    // The validator must agree with the decoder on every input
    let valid = is_valid_compressed(data);

    let decodes = match decompress_len(data) {
        Err(_) => false,
        Ok((dlen, _)) if dlen > 1 << 24 => return,
        Ok((dlen, _)) => {
            let mut buf = vec![0u8; dlen];
            decompress_into(&mut buf, data).is_ok()
        }
    };

    assert_eq!(valid, decodes, "validator and decoder disagree");
});
