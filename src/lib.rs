// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format by Google
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! # Snappy block compression
//!
//! This library implements the raw Snappy block format: an LZ77-family codec
//! that trades compression ratio for throughput. It is byte-compatible with
//! google/snappy and the other conforming implementations, so streams
//! produced here decode anywhere and vice versa.
//!
//! The block format covers a single buffer of up to `u32::MAX` bytes; the
//! Snappy framing format (stream chunking, checksums) is a separate layer
//! and is not part of this crate.
//!
//! ## Example
//!
//! ```rust
//! use rsnappy::{compress, decompress};
//!
//! let data = b"Hello, World! This is a test of Snappy compression.";
//! let compressed = compress(data);
//! let decompressed = decompress(&compressed).expect("decompression failed");
//! assert_eq!(data, &decompressed[..]);
//! ```
//!
//! ## Caller-supplied buffers
//!
//! The allocation-free entry points write into buffers you own:
//!
//! ```rust
//! use rsnappy::{compress_into, decompress_into, max_compressed_len, Options};
//!
//! let data = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
//! let mut buf = vec![0u8; max_compressed_len(data.len()).unwrap()];
//! let n = compress_into(&mut buf, data, &Options::default()).unwrap();
//!
//! let mut out = vec![0u8; data.len()];
//! let m = decompress_into(&mut out, &buf[..n]).unwrap();
//! assert_eq!(&out[..m], data);
//! ```

mod constants;
mod decode;
mod encode;
mod error;
mod tag;
mod validate;
mod varint;

pub use decode::{decompress, decompress_into, decompress_len};
pub use encode::{
    compress, compress_better, compress_into, max_compressed_len, CompressionLevel, Options,
};
pub use error::{Error, Result};
pub use validate::is_valid_compressed;
