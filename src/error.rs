// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format by Google
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt;

/// Result type for Snappy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Snappy compression/decompression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The input data is corrupt
    Corrupt,

    /// The input to compress is larger than the format can describe
    TooLarge,

    /// Caller-supplied buffer is too small
    BufferTooSmall,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Corrupt => write!(f, "snappy: corrupt input"),
            Error::TooLarge => write!(f, "snappy: input too large"),
            Error::BufferTooSmall => write!(f, "snappy: buffer too small"),
        }
    }
}

impl std::error::Error for Error {}
