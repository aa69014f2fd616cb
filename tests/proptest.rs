// Copyright 2024 Karpeles Lab Inc.
// Property-based tests using proptest

use proptest::prelude::*;
use rsnappy::{
    compress, compress_better, decompress, decompress_into, decompress_len, is_valid_compressed,
    max_compressed_len,
};

/// Whether the decoder accepts src, without materializing unreasonably
/// large declared lengths.
fn decoder_accepts(src: &[u8]) -> Option<bool> {
    match decompress_len(src) {
        Err(_) => Some(false),
        Ok((dlen, _)) if dlen <= 1 << 20 => {
            let mut buf = vec![0u8; dlen];
            Some(decompress_into(&mut buf, src).is_ok())
        }
        Ok(_) => None,
    }
}

proptest! {
    #[test]
    fn prop_roundtrip_fast(data: Vec<u8>) {
        prop_assume!(data.len() <= 100_000);

        let encoded = compress(&data);
        let decoded = decompress(&encoded).expect("decode failed");
        prop_assert_eq!(data, decoded);
    }

    #[test]
    fn prop_roundtrip_better(data: Vec<u8>) {
        prop_assume!(data.len() <= 100_000);

        let encoded = compress_better(&data);
        let decoded = decompress(&encoded).expect("decode failed");
        prop_assert_eq!(data, decoded);
    }

    #[test]
    fn prop_size_bound(data: Vec<u8>) {
        prop_assume!(data.len() <= 100_000);

        let bound = max_compressed_len(data.len()).unwrap();
        prop_assert!(compress(&data).len() <= bound);
        prop_assert!(compress_better(&data).len() <= bound);
    }

    #[test]
    fn prop_length_prefix(data: Vec<u8>) {
        prop_assume!(data.len() <= 100_000);

        let encoded = compress(&data);
        let (dlen, _) = decompress_len(&encoded).expect("length prefix");
        prop_assert_eq!(dlen, data.len());
    }

    #[test]
    fn prop_decompress_never_panics(data: Vec<u8>) {
        prop_assume!(data.len() <= 10_000);

        // Decoding arbitrary data must not panic, whatever it declares
        if let Some(true) = decoder_accepts(&data) {
            prop_assert!(is_valid_compressed(&data));
        }
    }

    #[test]
    fn prop_validator_agrees_on_garbage(data: Vec<u8>) {
        prop_assume!(data.len() <= 10_000);

        if let Some(decodes) = decoder_accepts(&data) {
            prop_assert_eq!(is_valid_compressed(&data), decodes);
        }
    }

    #[test]
    fn prop_validator_accepts_encoder_output(data: Vec<u8>) {
        prop_assume!(data.len() <= 100_000);

        prop_assert!(is_valid_compressed(&compress(&data)));
        prop_assert!(is_valid_compressed(&compress_better(&data)));
    }

    #[test]
    fn prop_single_corruption_agreement(data in prop::collection::vec(any::<u8>(), 1..2000), pos: usize, delta in 1u8..=255) {
        let encoded = compress(&data);
        let mut corrupted = encoded.clone();
        let pos = pos % corrupted.len();
        corrupted[pos] = corrupted[pos].wrapping_add(delta);

        if let Some(decodes) = decoder_accepts(&corrupted) {
            prop_assert_eq!(is_valid_compressed(&corrupted), decodes);
        }
    }

    #[test]
    fn prop_empty_and_small(size in 0usize..100) {
        let data = vec![b'x'; size];
        let encoded = compress(&data);
        let decoded = decompress(&encoded).expect("decode failed");
        prop_assert_eq!(data, decoded);
    }

    #[test]
    fn prop_all_same_byte(byte: u8, size in 1usize..10000) {
        let data = vec![byte; size];
        let encoded = compress(&data);
        let decoded = decompress(&encoded).expect("decode failed");
        prop_assert_eq!(&data, &decoded);

        // Should achieve good compression on repeated bytes
        if size > 100 {
            prop_assert!(encoded.len() < size / 5);
        }
    }

    #[test]
    fn prop_levels_compatible(data in prop::collection::vec(any::<u8>(), 100..1000)) {
        // Both levels must produce output decoding to the same data
        let repeated = data.repeat(10);

        let fast = compress(&repeated);
        let better = compress_better(&repeated);

        prop_assert_eq!(&repeated, &decompress(&fast).expect("fast decode"));
        prop_assert_eq!(&repeated, &decompress(&better).expect("better decode"));

        // Repeated data should compress to well under half
        prop_assert!(fast.len() < repeated.len() / 2);
    }
}
