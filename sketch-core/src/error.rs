//! Error types for the raster core.

use thiserror::Error;

/// Errors from parsing color strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid hex color {input:?}: expected #RRGGBB")]
    InvalidHex { input: String },
}

/// Errors from decoding or restoring an encoded snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot header is missing or has the wrong magic tag")]
    BadMagic,

    #[error("snapshot truncated: needed {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("snapshot runs cover {actual} pixels, header says {expected}")]
    PixelCountMismatch { expected: u64, actual: u64 },

    #[error("snapshot is {actual:?} but the canvas is {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}
