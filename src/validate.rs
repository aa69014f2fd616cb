// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format by Google
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::constants::*;
use crate::error::{Error, Result};
use crate::tag;
use crate::varint::decode_varint;

/// Returns true when src is a structurally well-formed compressed stream.
///
/// This walks every operation the way the decoder does, but tracks the
/// output cursor as an integer instead of materializing output, so it runs
/// in O(compressed size) with no allocation. A stream is legal only if the
/// operations produce exactly the declared length and consume exactly the
/// whole input; trailing bytes are rejected.
pub fn is_valid_compressed(src: &[u8]) -> bool {
    validate(src).is_ok()
}

fn validate(src: &[u8]) -> Result<()> {
    let (dlen, header_len) = decode_varint(src)?;
    let dlen = dlen as u64;
    let src = &src[header_len..];

    let mut d: u64 = 0;
    let mut s = 0;

    while s < src.len() {
        match src[s] & 0x03 {
            TAG_LITERAL => {
                let (length, header) = tag::literal_length(&src[s..])?;
                s += header;

                if length > src.len() - s || d + length as u64 > dlen {
                    return Err(Error::Corrupt);
                }

                d += length as u64;
                s += length;
            }
            TAG_COPY1 => {
                let (offset, length) = tag::copy1_parts(&src[s..])?;
                s += 2;
                d = checked_copy(d, dlen, offset, length)?;
            }
            TAG_COPY2 => {
                let (offset, length) = tag::copy2_parts(&src[s..])?;
                s += 3;
                d = checked_copy(d, dlen, offset, length)?;
            }
            _ => {
                let (offset, length) = tag::copy4_parts(&src[s..])?;
                s += 5;
                d = checked_copy(d, dlen, offset, length)?;
            }
        }
    }

    if d != dlen {
        return Err(Error::Corrupt);
    }

    Ok(())
}

/// Apply one copy to the shadow cursor, enforcing the decoder's offset and
/// length constraints.
#[inline]
fn checked_copy(d: u64, dlen: u64, offset: usize, length: usize) -> Result<u64> {
    if offset == 0 || (offset as u64) > d || d + length as u64 > dlen {
        return Err(Error::Corrupt);
    }
    Ok(d + length as u64)
}
