// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format by Google
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Tag byte layouts shared by the encoder, decoder and validator.
//!
//! Each operation in a compressed stream starts with one tag byte whose low
//! two bits select the operation type; the remaining bits and any trailing
//! bytes carry the length and offset. The functions here are pure: the
//! `put_*` side assumes the documented value ranges (violations are caller
//! bugs, not stream errors), the parse side reports truncation as
//! [`Error::Corrupt`].

use crate::constants::*;
use crate::error::{Error, Result};

/// Write the literal tag byte, plus the extra length bytes when the length
/// does not fit in the tag. The extra bytes encode `len - 1` little-endian.
/// Returns the number of header bytes written (1-5); the caller appends the
/// `len` literal bytes after the header.
pub fn put_literal_header(dst: &mut [u8], len: usize) -> usize {
    debug_assert!(len >= 1);

    let n = len - 1;
    match n {
        0..=59 => {
            dst[0] = ((n as u8) << 2) | TAG_LITERAL;
            1
        }
        60..=255 => {
            dst[0] = (60 << 2) | TAG_LITERAL;
            dst[1] = n as u8;
            2
        }
        256..=65535 => {
            dst[0] = (61 << 2) | TAG_LITERAL;
            dst[1] = n as u8;
            dst[2] = (n >> 8) as u8;
            3
        }
        65536..=16777215 => {
            dst[0] = (62 << 2) | TAG_LITERAL;
            dst[1] = n as u8;
            dst[2] = (n >> 8) as u8;
            dst[3] = (n >> 16) as u8;
            4
        }
        _ => {
            dst[0] = (63 << 2) | TAG_LITERAL;
            let bytes = (n as u32).to_le_bytes();
            dst[1] = bytes[0];
            dst[2] = bytes[1];
            dst[3] = bytes[2];
            dst[4] = bytes[3];
            5
        }
    }
}

/// Write a COPY1 operation: 11-bit offset, length 4-11. 2 bytes.
pub fn put_copy1(dst: &mut [u8], offset: usize, len: usize) -> usize {
    debug_assert!(offset < 2048);
    debug_assert!((4..=11).contains(&len));

    dst[0] = (((offset >> 8) << 5) | ((len - 4) << 2)) as u8 | TAG_COPY1;
    dst[1] = offset as u8;
    2
}

/// Write a COPY2 operation: 16-bit offset, length 1-64. 3 bytes.
pub fn put_copy2(dst: &mut [u8], offset: usize, len: usize) -> usize {
    debug_assert!(offset < 65536);
    debug_assert!((1..=64).contains(&len));

    dst[0] = (((len - 1) << 2) as u8) | TAG_COPY2;
    dst[1] = offset as u8;
    dst[2] = (offset >> 8) as u8;
    3
}

/// Write a COPY4 operation: 32-bit offset, length 1-64. 5 bytes.
pub fn put_copy4(dst: &mut [u8], offset: usize, len: usize) -> usize {
    debug_assert!(offset <= u32::MAX as usize);
    debug_assert!((1..=64).contains(&len));

    dst[0] = (((len - 1) << 2) as u8) | TAG_COPY4;
    let bytes = (offset as u32).to_le_bytes();
    dst[1] = bytes[0];
    dst[2] = bytes[1];
    dst[3] = bytes[2];
    dst[4] = bytes[3];
    5
}

/// Parse a literal header starting at the tag byte.
/// Returns (literal length, header bytes consumed).
pub fn literal_length(src: &[u8]) -> Result<(usize, usize)> {
    let x = src[0] >> 2;

    match x {
        0..=59 => Ok((x as usize + 1, 1)),
        60 => {
            if src.len() < 2 {
                return Err(Error::Corrupt);
            }
            Ok((src[1] as usize + 1, 2))
        }
        61 => {
            if src.len() < 3 {
                return Err(Error::Corrupt);
            }
            let len = u16::from_le_bytes([src[1], src[2]]) as usize;
            Ok((len + 1, 3))
        }
        62 => {
            if src.len() < 4 {
                return Err(Error::Corrupt);
            }
            let len = u32::from_le_bytes([src[1], src[2], src[3], 0]) as usize;
            Ok((len + 1, 4))
        }
        _ => {
            if src.len() < 5 {
                return Err(Error::Corrupt);
            }
            let len = u32::from_le_bytes([src[1], src[2], src[3], src[4]]) as usize;
            Ok((len + 1, 5))
        }
    }
}

/// Parse a COPY1 operation starting at the tag byte. Consumes 2 bytes.
/// Returns (offset, length).
pub fn copy1_parts(src: &[u8]) -> Result<(usize, usize)> {
    if src.len() < 2 {
        return Err(Error::Corrupt);
    }

    let offset = ((src[0] as usize & 0xe0) << 3) | src[1] as usize;
    let len = ((src[0] >> 2) & 0x07) as usize + 4;
    Ok((offset, len))
}

/// Parse a COPY2 operation starting at the tag byte. Consumes 3 bytes.
/// Returns (offset, length).
pub fn copy2_parts(src: &[u8]) -> Result<(usize, usize)> {
    if src.len() < 3 {
        return Err(Error::Corrupt);
    }

    let offset = u16::from_le_bytes([src[1], src[2]]) as usize;
    let len = (src[0] >> 2) as usize + 1;
    Ok((offset, len))
}

/// Parse a COPY4 operation starting at the tag byte. Consumes 5 bytes.
/// Returns (offset, length).
pub fn copy4_parts(src: &[u8]) -> Result<(usize, usize)> {
    if src.len() < 5 {
        return Err(Error::Corrupt);
    }

    let offset = u32::from_le_bytes([src[1], src[2], src[3], src[4]]) as usize;
    let len = (src[0] >> 2) as usize + 1;
    Ok((offset, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_header_thresholds() {
        // (length, expected header bytes)
        let cases: Vec<(usize, Vec<u8>)> = vec![
            (1, vec![0x00]),
            (60, vec![59 << 2]),
            (61, vec![60 << 2 | TAG_LITERAL, 60]),
            (256, vec![60 << 2, 255]),
            (257, vec![61 << 2, 0x00, 0x01]),
            (65536, vec![61 << 2, 0xff, 0xff]),
            (65537, vec![62 << 2, 0x00, 0x00, 0x01]),
            (16777216, vec![62 << 2, 0xff, 0xff, 0xff]),
            (16777217, vec![63 << 2, 0x00, 0x00, 0x00, 0x01]),
        ];

        for (len, expected) in cases {
            let mut buf = [0u8; 5];
            let n = put_literal_header(&mut buf, len);
            assert_eq!(&buf[..n], &expected[..], "header for length {}", len);

            let (decoded, consumed) = literal_length(&buf[..n]).unwrap();
            assert_eq!(decoded, len, "parsed length for {}", len);
            assert_eq!(consumed, n);
        }
    }

    #[test]
    fn test_literal_header_truncated() {
        assert!(literal_length(&[60 << 2]).is_err());
        assert!(literal_length(&[61 << 2, 0x01]).is_err());
        assert!(literal_length(&[62 << 2, 0x01, 0x02]).is_err());
        assert!(literal_length(&[63 << 2, 0x01, 0x02, 0x03]).is_err());
    }

    #[test]
    fn test_copy1_layout() {
        let mut buf = [0u8; 2];
        let n = put_copy1(&mut buf, 2047, 11);
        assert_eq!(n, 2);
        // High 3 offset bits land in bits 5-7 of the tag.
        assert_eq!(buf[0], 0xe0 | (7 << 2) | TAG_COPY1);
        assert_eq!(buf[1], 0xff);

        let (offset, len) = copy1_parts(&buf).unwrap();
        assert_eq!(offset, 2047);
        assert_eq!(len, 11);

        let n = put_copy1(&mut buf, 1, 4);
        assert_eq!(n, 2);
        assert_eq!(buf[0], TAG_COPY1);
        assert_eq!(buf[1], 0x01);
        assert_eq!(copy1_parts(&buf).unwrap(), (1, 4));
    }

    #[test]
    fn test_copy2_layout() {
        let mut buf = [0u8; 3];
        let n = put_copy2(&mut buf, 65535, 64);
        assert_eq!(n, 3);
        assert_eq!(buf[0], (63 << 2) | TAG_COPY2);
        assert_eq!(buf[1], 0xff);
        assert_eq!(buf[2], 0xff);
        assert_eq!(copy2_parts(&buf).unwrap(), (65535, 64));

        put_copy2(&mut buf, 2048, 1);
        assert_eq!(copy2_parts(&buf).unwrap(), (2048, 1));
    }

    #[test]
    fn test_copy4_layout() {
        let mut buf = [0u8; 5];
        let n = put_copy4(&mut buf, 1 << 20, 64);
        assert_eq!(n, 5);
        assert_eq!(buf[0], (63 << 2) | TAG_COPY4);
        assert_eq!(copy4_parts(&buf).unwrap(), (1 << 20, 64));
    }

    #[test]
    fn test_copy_truncated() {
        assert!(copy1_parts(&[TAG_COPY1]).is_err());
        assert!(copy2_parts(&[TAG_COPY2, 0x01]).is_err());
        assert!(copy4_parts(&[TAG_COPY4, 0x01, 0x02, 0x03]).is_err());
    }
}
