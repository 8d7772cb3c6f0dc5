// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Farbwerk interop layer.

use serde::{Deserialize, Serialize};

/// Channel count, order, and bit depth of a single pixel.
///
/// A pixel format describes only how the bytes of one pixel are laid out; it
/// says nothing about row stride or padding, which are carried separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit grayscale, one byte per pixel.
    L8,
    /// 8-bit grayscale with alpha, two bytes per pixel.
    La8,
    /// 24-bit RGB, three bytes per pixel.
    Rgb8,
    /// 32-bit RGBA, four bytes per pixel.
    Rgba8,
}

impl PixelFormat {
    /// Bytes occupied by one pixel, excluding any row padding.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::L8 => 1,
            Self::La8 => 2,
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    /// Number of channels per pixel.
    pub fn channel_count(&self) -> usize {
        match self {
            Self::L8 => 1,
            Self::La8 => 2,
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    /// Minimal byte width of one scanline at this format, before padding.
    pub fn min_row_bytes(&self, width: u32) -> usize {
        width as usize * self.bytes_per_pixel()
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::L8 => "L8",
            Self::La8 => "LA8",
            Self::Rgb8 => "RGB8",
            Self::Rgba8 => "RGBA8",
        };
        write!(f, "{}", name)
    }
}

/// Scanline ordering of a surface's backing memory.
///
/// Encoded in the sign of the stride: platforms report a negative stride for
/// bottom-up surfaces. Sizing always uses the absolute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowOrder {
    /// Row 0 is first in memory.
    TopDown,
    /// Row 0 is last in memory.
    BottomUp,
}

impl RowOrder {
    /// Derive the row order from a signed stride value.
    pub fn from_stride(stride: i32) -> Self {
        if stride < 0 {
            Self::BottomUp
        } else {
            Self::TopDown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_per_pixel_matches_channel_width() {
        assert_eq!(PixelFormat::L8.bytes_per_pixel(), 1);
        assert_eq!(PixelFormat::La8.bytes_per_pixel(), 2);
        assert_eq!(PixelFormat::Rgb8.bytes_per_pixel(), 3);
        assert_eq!(PixelFormat::Rgba8.bytes_per_pixel(), 4);
    }

    #[test]
    fn min_row_bytes_ignores_padding() {
        // 2 pixels of RGB8 occupy 6 bytes regardless of any stride padding.
        assert_eq!(PixelFormat::Rgb8.min_row_bytes(2), 6);
    }

    #[test]
    fn row_order_follows_stride_sign() {
        assert_eq!(RowOrder::from_stride(8), RowOrder::TopDown);
        assert_eq!(RowOrder::from_stride(0), RowOrder::TopDown);
        assert_eq!(RowOrder::from_stride(-8), RowOrder::BottomUp);
    }
}
