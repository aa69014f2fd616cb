// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format by Google
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::constants::*;
use crate::error::{Error, Result};
use crate::tag;
use crate::varint::decode_varint;

/// Decompress returns the decoded form of src as a newly allocated Vec.
pub fn decompress(src: &[u8]) -> Result<Vec<u8>> {
    let (dlen, header_len) = decompress_len(src)?;

    let mut dst = vec![0u8; dlen];
    snappy_decode(&mut dst, &src[header_len..])?;

    Ok(dst)
}

/// Decompress into a pre-allocated destination buffer.
/// Returns the number of bytes written to dst, which always equals the
/// stream's declared uncompressed length.
pub fn decompress_into(dst: &mut [u8], src: &[u8]) -> Result<usize> {
    let (dlen, header_len) = decompress_len(src)?;

    if dst.len() < dlen {
        return Err(Error::BufferTooSmall);
    }

    snappy_decode(&mut dst[..dlen], &src[header_len..])?;

    Ok(dlen)
}

/// Returns the length of the decoded block and the number of bytes the
/// length header occupied. O(1); reads at most five bytes.
pub fn decompress_len(src: &[u8]) -> Result<(usize, usize)> {
    let (v, n) = decode_varint(src)?;
    Ok((v as usize, n))
}

/// Core decoding loop. dst is exactly the declared uncompressed length.
///
/// Every operation is bounds-checked against both cursors before any byte
/// moves; crafted input can only produce Corrupt, never an out-of-range
/// access.
fn snappy_decode(dst: &mut [u8], src: &[u8]) -> Result<()> {
    let mut d = 0; // destination index
    let mut s = 0; // source index

    while s < src.len() {
        match src[s] & 0x03 {
            TAG_LITERAL => {
                let (length, header) = tag::literal_length(&src[s..])?;
                s += header;

                if length > src.len() - s || length > dst.len() - d {
                    return Err(Error::Corrupt);
                }

                dst[d..d + length].copy_from_slice(&src[s..s + length]);
                d += length;
                s += length;
            }
            TAG_COPY1 => {
                let (offset, length) = tag::copy1_parts(&src[s..])?;
                s += 2;

                if offset == 0 || d < offset || length > dst.len() - d {
                    return Err(Error::Corrupt);
                }

                copy_within(dst, d, offset, length);
                d += length;
            }
            TAG_COPY2 => {
                let (offset, length) = tag::copy2_parts(&src[s..])?;
                s += 3;

                if offset == 0 || d < offset || length > dst.len() - d {
                    return Err(Error::Corrupt);
                }

                copy_within(dst, d, offset, length);
                d += length;
            }
            _ => {
                let (offset, length) = tag::copy4_parts(&src[s..])?;
                s += 5;

                if offset == 0 || d < offset || length > dst.len() - d {
                    return Err(Error::Corrupt);
                }

                copy_within(dst, d, offset, length);
                d += length;
            }
        }
    }

    // The operations must produce exactly the declared length
    if d != dst.len() {
        return Err(Error::Corrupt);
    }

    Ok(())
}

/// Copy data within the same buffer, handling overlapping regions correctly.
/// When the source overlaps the destination the copy runs byte by byte, so
/// freshly written bytes are read again and the pattern repeats.
#[inline]
fn copy_within(dst: &mut [u8], d: usize, offset: usize, length: usize) {
    let src_start = d - offset;

    if offset >= length {
        dst.copy_within(src_start..src_start + length, d);
    } else {
        for i in 0..length {
            dst[d + i] = dst[src_start + i];
        }
    }
}
