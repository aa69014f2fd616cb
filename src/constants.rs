// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format by Google
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Tag for literal chunks
pub const TAG_LITERAL: u8 = 0x00;

/// Tag for copy with 1-byte offset (11 bits)
pub const TAG_COPY1: u8 = 0x01;

/// Tag for copy with 2-byte offset (16 bits)
pub const TAG_COPY2: u8 = 0x02;

/// Tag for copy with 4-byte offset (32 bits)
pub const TAG_COPY4: u8 = 0x03;

/// Largest input a single stream can describe
pub const MAX_INPUT_SIZE: u64 = u32::MAX as u64;

/// Fragment size: the encoder hashes at most this many bytes at a time (64KB)
pub const MAX_BLOCK_SIZE: usize = 1 << 16;

/// Hash table size bounds, in entries
pub const MAX_HASH_TABLE_BITS: u32 = 15;
pub const MIN_HASH_TABLE_SIZE: usize = 1 << 8;
pub const MAX_HASH_TABLE_SIZE: usize = 1 << MAX_HASH_TABLE_BITS;

/// Input margin for encoding: the match loop stops this many bytes before
/// the fragment end so unaligned loads never run past it
pub const INPUT_MARGIN: usize = 15;

/// Minimum non-literal block size
pub const MIN_NON_LITERAL_BLOCK_SIZE: usize = 32;
