//! Whole-canvas snapshots.
//!
//! A snapshot is a run-length encoded frame:
//!
//! ```text
//! magic "SKR1" | width: u32 LE | height: u32 LE | (count: u32 LE, rgba: [u8; 4])*
//! ```
//!
//! The RGBA bytes are the premultiplied pixel values, so decoding is exact.
//! Drawings are mostly flat color, which keeps a history of full frames small.
//! The encoded bytes are shared behind an `Arc`; cloning a snapshot is cheap.

use crate::canvas::PixelBuffer;
use crate::error::SnapshotError;
use egui::Color32;
use std::fmt;
use std::sync::Arc;

const MAGIC: &[u8; 4] = b"SKR1";
const HEADER_LEN: usize = 12;
const RUN_LEN: usize = 8;

#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    bytes: Arc<[u8]>,
}

impl Snapshot {
    pub fn encode(width: u32, height: u32, pixels: &[Color32]) -> Self {
        let mut bytes = Vec::with_capacity(HEADER_LEN + RUN_LEN * 16);
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&width.to_le_bytes());
        bytes.extend_from_slice(&height.to_le_bytes());

        let mut iter = pixels.iter().copied();
        if let Some(first) = iter.next() {
            let mut current = first;
            let mut count: u32 = 1;
            for pixel in iter {
                if pixel == current && count < u32::MAX {
                    count += 1;
                    continue;
                }
                push_run(&mut bytes, count, current);
                current = pixel;
                count = 1;
            }
            push_run(&mut bytes, count, current);
        }

        Self {
            bytes: bytes.into(),
        }
    }

    /// Wrap bytes produced elsewhere. Validation happens on decode.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn dimensions(&self) -> Result<(u32, u32), SnapshotError> {
        if self.bytes.len() < HEADER_LEN {
            return Err(SnapshotError::Truncated {
                expected: HEADER_LEN,
                actual: self.bytes.len(),
            });
        }
        if &self.bytes[0..4] != MAGIC {
            return Err(SnapshotError::BadMagic);
        }
        Ok((read_u32(&self.bytes[4..8]), read_u32(&self.bytes[8..12])))
    }

    pub fn decode(&self) -> Result<PixelBuffer, SnapshotError> {
        let (width, height) = self.dimensions()?;
        let expected = width as u64 * height as u64;

        let body = &self.bytes[HEADER_LEN..];
        if body.len() % RUN_LEN != 0 {
            let whole = body.len() / RUN_LEN + 1;
            return Err(SnapshotError::Truncated {
                expected: HEADER_LEN + whole * RUN_LEN,
                actual: self.bytes.len(),
            });
        }

        let total: u64 = body
            .chunks_exact(RUN_LEN)
            .map(|run| read_u32(&run[0..4]) as u64)
            .sum();
        if total != expected {
            return Err(SnapshotError::PixelCountMismatch {
                expected,
                actual: total,
            });
        }

        let mut pixels = Vec::with_capacity(expected as usize);
        for run in body.chunks_exact(RUN_LEN) {
            let count = read_u32(&run[0..4]) as usize;
            let color = Color32::from_rgba_premultiplied(run[4], run[5], run[6], run[7]);
            pixels.extend(std::iter::repeat(color).take(count));
        }

        PixelBuffer::from_pixels(width, height, pixels).ok_or(SnapshotError::PixelCountMismatch {
            expected,
            actual: total,
        })
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("dimensions", &self.dimensions().ok())
            .field("encoded_len", &self.bytes.len())
            .finish()
    }
}

fn push_run(bytes: &mut Vec<u8>, count: u32, color: Color32) {
    bytes.extend_from_slice(&count.to_le_bytes());
    bytes.extend_from_slice(&color.to_array());
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
