//! Responsive grid arithmetic and the per-card tilt.

use crate::models::PhotoId;
use sha2::{Digest, Sha256};

/// Widths at or below this are phones.
pub const SMALL_MAX_WIDTH: u32 = 640;
/// Widths at or below this (and above [`SMALL_MAX_WIDTH`]) are tablets.
pub const MEDIUM_MAX_WIDTH: u32 = 1024;

/// Largest tilt applied to a polaroid card, in degrees.
pub const MAX_TILT_DEGREES: f64 = 5.0;

/// Photos per row for a viewport width.
pub fn per_row(width: u32) -> usize {
    if width <= SMALL_MAX_WIDTH {
        2
    } else if width <= MEDIUM_MAX_WIDTH {
        4
    } else {
        5
    }
}

/// Splits `items` into rows of `per_row`, in order. The last row may be short.
pub fn chunk_rows<T: Clone>(items: &[T], per_row: usize) -> Vec<Vec<T>> {
    items.chunks(per_row.max(1)).map(<[T]>::to_vec).collect()
}

/// Tilt for a card in `[-5.00, 5.00)` degrees, stable for a given photo id.
pub fn rotation_for(id: &PhotoId) -> f64 {
    let digest = Sha256::digest(id.as_str().as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let unit = u64::from_be_bytes(head) as f64 / (u64::MAX as f64 + 1.0);
    let degrees = unit * (2.0 * MAX_TILT_DEGREES) - MAX_TILT_DEGREES;
    ((degrees * 100.0).floor() / 100.0).clamp(-MAX_TILT_DEGREES, MAX_TILT_DEGREES - 0.01)
}
