//! The snapshot of the drawing surface. The browser page owns the live
//! bitmap; on each analyze press it hands over one frame of raw RGBA pixels,
//! base64-encoded. This module decodes and validates that frame.

use crate::config::{CANVAS_HEIGHT, CANVAS_WIDTH};
use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

/// Bytes in one full RGBA frame of the board
pub const FRAME_BYTES: usize = (CANVAS_WIDTH * CANVAS_HEIGHT * 4) as usize;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("canvas pixel data is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("canvas buffer is {actual} bytes, expected {expected} (600x400 RGBA)")]
    BadLength { expected: usize, actual: usize },
}

/// One frame of RGBA canvas content, fixed at the board dimensions.
/// A `Snapshot` of the wrong size cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pixels: Vec<u8>,
}

impl Snapshot {
    /// Wrap a raw RGBA buffer, validating its length against the fixed
    /// board dimensions
    pub fn from_rgba(pixels: Vec<u8>) -> Result<Self, SnapshotError> {
        if pixels.len() != FRAME_BYTES {
            return Err(SnapshotError::BadLength {
                expected: FRAME_BYTES,
                actual: pixels.len(),
            });
        }
        Ok(Snapshot { pixels })
    }

    /// Decode the wire form posted by the page: standard base64 of the raw
    /// RGBA bytes
    pub fn from_b64(data: &str) -> Result<Self, SnapshotError> {
        let pixels = general_purpose::STANDARD.decode(data)?;
        Self::from_rgba(pixels)
    }

    pub fn width(&self) -> u32 {
        CANVAS_WIDTH
    }

    pub fn height(&self) -> u32 {
        CANVAS_HEIGHT
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepts_a_full_frame() {
        let snap = Snapshot::from_rgba(vec![255u8; FRAME_BYTES]).unwrap();
        assert_eq!(snap.pixels().len(), FRAME_BYTES);
        assert_eq!(snap.width(), 600);
        assert_eq!(snap.height(), 400);
    }

    #[test]
    fn rejects_a_truncated_frame() {
        let err = Snapshot::from_rgba(vec![0u8; 100]).unwrap_err();
        match err {
            SnapshotError::BadLength { expected, actual } => {
                assert_eq!(expected, FRAME_BYTES);
                assert_eq!(actual, 100);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decodes_the_wire_form() {
        let raw = vec![7u8; FRAME_BYTES];
        let encoded = general_purpose::STANDARD.encode(&raw);
        let snap = Snapshot::from_b64(&encoded).unwrap();
        assert_eq!(snap.pixels(), &raw[..]);
    }

    #[test]
    fn rejects_bad_base64() {
        let err = Snapshot::from_b64("not base64!!!").unwrap_err();
        assert!(matches!(err, SnapshotError::Decode(_)));
    }
}
