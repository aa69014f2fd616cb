// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format by Google
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::constants::*;
use crate::error::{Error, Result};
use crate::tag;
use crate::varint::encode_varint;

/// Compression level for [`compress_into`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// Single-pass greedy matching. The reference algorithm.
    #[default]
    Fast,
    /// Dual hash tables with denser match searching. Slower, smaller output.
    Better,
}

/// Options for [`compress_into`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Compression level to use
    pub level: CompressionLevel,
}

/// Compress returns the compressed form of src at the fast level.
pub fn compress(src: &[u8]) -> Vec<u8> {
    compress_with(src, &Options::default())
}

/// Compress at the better level. Slower than [`compress`], but the output
/// is smaller and decodes with the same decoder.
pub fn compress_better(src: &[u8]) -> Vec<u8> {
    compress_with(
        src,
        &Options {
            level: CompressionLevel::Better,
        },
    )
}

fn compress_with(src: &[u8], opts: &Options) -> Vec<u8> {
    let max_len = max_compressed_len(src.len()).expect("source too large");
    let mut dst = vec![0u8; max_len];

    let n = compress_into(&mut dst, src, opts).expect("dst sized to max_compressed_len");
    dst.truncate(n);
    dst
}

/// Returns the maximum length of a compressed block.
/// Errors with [`Error::TooLarge`] when the input cannot be described by
/// the format.
pub fn max_compressed_len(src_len: usize) -> Result<usize> {
    if src_len as u64 > MAX_INPUT_SIZE {
        return Err(Error::TooLarge);
    }

    // A stream is never longer than this, whatever the input looks like:
    // the varint and trailing literal headers fit in the constant term, and
    // every emitted operation at least breaks even against its output.
    Ok(32 + src_len + src_len / 6)
}

/// Compress src into the caller-supplied buffer, returning the number of
/// bytes written.
///
/// dst must hold at least [`max_compressed_len`] bytes for this input;
/// anything smaller is rejected with [`Error::BufferTooSmall`] before any
/// output is produced.
pub fn compress_into(dst: &mut [u8], src: &[u8], opts: &Options) -> Result<usize> {
    let max_len = max_compressed_len(src.len())?;
    if dst.len() < max_len {
        return Err(Error::BufferTooSmall);
    }

    // Write the varint-encoded length of the decompressed bytes
    let mut d = encode_varint(dst, src.len() as u32);

    if src.is_empty() {
        return Ok(d);
    }

    if src.len() < MIN_NON_LITERAL_BLOCK_SIZE {
        d += emit_literal(&mut dst[d..], src);
        return Ok(d);
    }

    match opts.level {
        CompressionLevel::Fast => {
            let mut table = vec![0u16; hash_table_size(src.len().min(MAX_BLOCK_SIZE))];
            for fragment in src.chunks(MAX_BLOCK_SIZE) {
                table.fill(0);
                d += encode_fragment(&mut dst[d..], fragment, &mut table);
            }
            Ok(d)
        }
        CompressionLevel::Better => {
            let n = encode_block_better(&mut dst[d..], src);
            if n > 0 {
                Ok(d + n)
            } else {
                // Not compressible
                Ok(d + emit_literal(&mut dst[d..], src))
            }
        }
    }
}

/// Next power of two >= len, clamped to [MIN_HASH_TABLE_SIZE, MAX_HASH_TABLE_SIZE]
fn hash_table_size(len: usize) -> usize {
    let mut size = MIN_HASH_TABLE_SIZE;
    while size < MAX_HASH_TABLE_SIZE && size < len {
        size <<= 1;
    }
    size
}

/// Hash of the four bytes at a probe position
#[inline]
fn hash(w: u32, mask: usize) -> usize {
    (w.wrapping_mul(0x1e35a7bd) >> (32 - MAX_HASH_TABLE_BITS)) as usize & mask
}

/// Hash function for 4 bytes (Better level, short table)
#[inline]
fn hash4(u: u32, bits: u32) -> usize {
    const PRIME_4_BYTES: u32 = 2654435761;
    (u.wrapping_mul(PRIME_4_BYTES) >> (32 - bits)) as usize
}

/// Hash function for 7 bytes (Better level, long table)
#[inline]
fn hash7(u: u64, bits: u32) -> usize {
    const PRIME_7_BYTES: u64 = 58295818150454627;
    (((u << 8).wrapping_mul(PRIME_7_BYTES)) >> (64 - bits)) as usize
}

/// Load a u32 from the slice at the given offset
#[inline]
fn load32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Load a u64 from the slice at the given offset
#[inline]
fn load64(data: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
        data[offset + 4],
        data[offset + 5],
        data[offset + 6],
        data[offset + 7],
    ])
}

/// Number of equal bytes at the start of `a` and `b`, compared eight at a
/// time with a XOR trick for the aligned part.
#[inline]
fn match_len(a: &[u8], b: &[u8]) -> usize {
    let len = a.len().min(b.len());
    let mut n = 0;

    while n + 8 <= len {
        let diff = load64(a, n) ^ load64(b, n);
        if diff != 0 {
            return n + (diff.trailing_zeros() / 8) as usize;
        }
        n += 8;
    }

    while n < len && a[n] == b[n] {
        n += 1;
    }
    n
}

/// Emit a literal chunk and return the number of bytes written
fn emit_literal(dst: &mut [u8], lit: &[u8]) -> usize {
    if lit.is_empty() {
        return 0;
    }

    let n = tag::put_literal_header(dst, lit.len());
    dst[n..n + lit.len()].copy_from_slice(lit);
    n + lit.len()
}

/// Emit a copy chunk and return the number of bytes written.
///
/// Lengths 4-11 with a small offset fit a two-byte COPY1. Longer runs lead
/// with 64-byte chunks and finish with one trailing copy; each chunk reuses
/// the same offset, so the decoder re-reads the pattern as it grows.
fn emit_copy(dst: &mut [u8], offset: usize, len: usize) -> usize {
    debug_assert!(offset >= 1);
    debug_assert!(len >= 4);

    if len <= 11 && offset < 2048 {
        return tag::put_copy1(dst, offset, len);
    }

    let mut d = 0;
    let mut remaining = len;

    while remaining >= 64 {
        if offset < 65536 {
            d += tag::put_copy2(&mut dst[d..], offset, 64);
        } else {
            d += tag::put_copy4(&mut dst[d..], offset, 64);
        }
        remaining -= 64;
    }

    if remaining > 0 {
        if offset < 65536 {
            d += tag::put_copy2(&mut dst[d..], offset, remaining);
        } else {
            d += tag::put_copy4(&mut dst[d..], offset, remaining);
        }
    }

    d
}

/// Encode one fragment of at most MAX_BLOCK_SIZE bytes.
///
/// The hash table holds fragment-relative positions, so every offset the
/// fragment emits fits in 16 bits. Entry 0 doubles as "empty"; the match a
/// real position 0 would give is skipped, which costs at most one literal
/// byte of ratio.
fn encode_fragment(dst: &mut [u8], src: &[u8], table: &mut [u16]) -> usize {
    let mut d = 0;
    let mut next_emit = 0;

    if src.len() > INPUT_MARGIN {
        let mask = table.len() - 1;
        let s_limit = src.len() - INPUT_MARGIN;
        let mut s = 1;

        'outer: loop {
            let mut candidate;

            // Search for the next match, probing with a growing step so
            // incompressible input stays linear time.
            let mut skip = 32;
            loop {
                let next_s = s + (skip >> 5);
                skip += 1;

                if next_s > s_limit {
                    break 'outer;
                }

                let w = load32(src, s);
                let h = hash(w, mask);
                candidate = table[h] as usize;
                table[h] = s as u16;

                if candidate != 0 && load32(src, candidate) == w {
                    break;
                }

                s = next_s;
            }

            // Emit the pending literal bytes
            if next_emit < s {
                d += emit_literal(&mut dst[d..], &src[next_emit..s]);
            }

            // Extend the four verified bytes as far as the fragment allows
            let offset = s - candidate;
            let matched = 4 + match_len(&src[s + 4..], &src[candidate + 4..]);
            s += matched;

            d += emit_copy(&mut dst[d..], offset, matched);
            next_emit = s;

            if s >= s_limit {
                break;
            }

            // Seed the table across the copy we just emitted
            let w = load32(src, s - 1);
            table[hash(w, mask)] = (s - 1) as u16;
        }
    }

    // Emit remaining
    if next_emit < src.len() {
        d += emit_literal(&mut dst[d..], &src[next_emit..]);
    }

    d
}

/// Encode a block with the better algorithm: two hash tables, a long hash
/// over seven bytes and a short one over four, searched over the whole input
/// without fragmenting. Offsets past 64KB are emitted as COPY4.
///
/// Returns 0 when the input does not compress, in which case the caller
/// falls back to a single literal.
fn encode_block_better(dst: &mut [u8], src: &[u8]) -> usize {
    const L_TABLE_BITS: u32 = 17;
    const S_TABLE_BITS: u32 = 14;

    if src.len() < MIN_NON_LITERAL_BLOCK_SIZE {
        return 0;
    }

    let mut l_table = vec![0u32; 1 << L_TABLE_BITS];
    let mut s_table = vec![0u32; 1 << S_TABLE_BITS];

    // Bail if we can't compress to at least this
    let dst_limit = src.len() - src.len() / 32 - 6;

    let s_limit = src.len() - INPUT_MARGIN;
    let mut next_emit = 0;
    let mut s = 1;
    let mut d = 0;

    let mut cv = load64(src, s);

    'outer: loop {
        let mut candidate;
        let mut next_s;

        // Find a match
        loop {
            // Probe step grows with the distance since the last emit
            next_s = s + (s - next_emit) / 128 + 1;
            if next_s > s_limit {
                break 'outer;
            }

            let hash_l = hash7(cv, L_TABLE_BITS);
            let hash_s = hash4(cv as u32, S_TABLE_BITS);
            let candidate_l = l_table[hash_l] as usize;
            let candidate_s = s_table[hash_s] as usize;
            l_table[hash_l] = s as u32;
            s_table[hash_s] = s as u32;

            // !cv never equals cv, so an empty slot can't match
            let val_long = if candidate_l != 0 && candidate_l + 8 <= src.len() {
                load64(src, candidate_l)
            } else {
                !cv
            };
            let val_short = if candidate_s != 0 && candidate_s + 8 <= src.len() {
                load64(src, candidate_s)
            } else {
                !cv
            };

            // If the long candidate matches at least 8 bytes, take it.
            if cv == val_long {
                candidate = candidate_l;
                break;
            }
            // A short candidate matching 8 bytes beats a 4-byte long match.
            if cv == val_short {
                candidate = candidate_s;
                break;
            }

            if (cv as u32) == (val_long as u32) {
                candidate = candidate_l;
                break;
            }

            if (cv as u32) == (val_short as u32) {
                // Try a long candidate one byte ahead before settling
                // for the short one.
                let hash_l1 = hash7(cv >> 8, L_TABLE_BITS);
                let candidate_l1 = l_table[hash_l1] as usize;
                l_table[hash_l1] = (s + 1) as u32;
                if candidate_l1 != 0
                    && candidate_l1 + 4 <= src.len()
                    && (cv >> 8) as u32 == load32(src, candidate_l1)
                {
                    s += 1;
                    candidate = candidate_l1;
                    break;
                }
                candidate = candidate_s;
                break;
            }

            s = next_s;
            cv = load64(src, s);
        }

        // Extend backwards
        while candidate > 0 && s > next_emit && src[candidate - 1] == src[s - 1] {
            candidate -= 1;
            s -= 1;
        }

        // Bail if we exceed the maximum size
        if d + (s - next_emit) > dst_limit {
            return 0;
        }

        let base = s;
        let offset = base - candidate;
        let matched = 4 + match_len(&src[base + 4..], &src[candidate + 4..]);

        // A short match behind a four-byte offset costs as much as it saves
        if offset > 65535 && matched <= 5 {
            s = next_s + 1;
            if s >= s_limit {
                break;
            }
            cv = load64(src, s);
            continue;
        }

        d += emit_literal(&mut dst[d..], &src[next_emit..base]);
        d += emit_copy(&mut dst[d..], offset, matched);

        s = base + matched;
        next_emit = s;
        if s >= s_limit {
            break;
        }

        if d > dst_limit {
            return 0;
        }

        // Index positions around the match for future candidates
        let index0 = base + 1;
        let index1 = s - 2;

        if index0 + 8 <= src.len() {
            let cv0 = load64(src, index0);
            l_table[hash7(cv0, L_TABLE_BITS)] = index0 as u32;
            if index0 + 9 <= src.len() {
                s_table[hash4((cv0 >> 8) as u32, S_TABLE_BITS)] = (index0 + 1) as u32;
            }
        }

        if index1 > index0 && index1 + 8 <= src.len() {
            let cv1 = load64(src, index1);
            l_table[hash7(cv1, L_TABLE_BITS)] = index1 as u32;
            if index1 + 9 <= src.len() {
                s_table[hash4((cv1 >> 8) as u32, S_TABLE_BITS)] = (index1 + 1) as u32;
            }
        }

        // Index long hashes sparsely in between
        let mut i0 = index0 + 1;
        let mut i2 = (i0 + index1 + 1) / 2;
        while i2 < index1 {
            if i0 + 8 <= src.len() {
                l_table[hash7(load64(src, i0), L_TABLE_BITS)] = i0 as u32;
            }
            if i2 + 8 <= src.len() {
                l_table[hash7(load64(src, i2), L_TABLE_BITS)] = i2 as u32;
            }
            i0 += 2;
            i2 += 2;
        }

        cv = load64(src, s);
    }

    // Emit remaining
    if next_emit < src.len() {
        // Bail if we exceed the maximum size
        if d + src.len() - next_emit > dst_limit {
            return 0;
        }
        d += emit_literal(&mut dst[d..], &src[next_emit..]);
    }

    d
}

// Test helpers - expose emit functions for byte-level tests
#[cfg(test)]
pub mod test_helpers {
    use super::*;

    pub fn test_emit_literal(dst: &mut [u8], lit: &[u8]) -> usize {
        emit_literal(dst, lit)
    }

    pub fn test_emit_copy(dst: &mut [u8], offset: usize, length: usize) -> usize {
        emit_copy(dst, offset, length)
    }

    pub fn test_match_len(a: &[u8], b: &[u8]) -> usize {
        match_len(a, b)
    }

    pub fn test_hash_table_size(len: usize) -> usize {
        hash_table_size(len)
    }
}
