// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel buffer extraction — copy the raw bytes backing a bitmap surface,
// stride padding and all, under a scoped memory lock.

use farbwerk_core::error::Result;
use farbwerk_core::types::{PixelFormat, RowOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::surface::BitmapSurface;

/// An owned snapshot of a surface's raw pixel memory plus its layout metadata.
///
/// The byte buffer is a verbatim copy of the backing memory at capture time:
/// exactly `abs(stride) * height` bytes, including any row-alignment padding
/// beyond `width * bytes_per_pixel`. It shares nothing with the live surface;
/// mutating the surface afterwards does not affect a buffer extracted earlier.
///
/// Without the stride and pixel format the bytes could not be reinterpreted as
/// a 2-D image — padding would shear the rows — which is why the metadata is
/// always captured alongside the copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBuffer {
    bytes: Vec<u8>,
    stride: i32,
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
}

impl PixelBuffer {
    /// The copied bytes, `abs(stride) * height` long.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bytes per scanline including padding; negative for bottom-up sources.
    pub fn stride(&self) -> i32 {
        self.stride
    }

    /// Width in pixels at capture time.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels at capture time.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format at capture time.
    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    /// Scanline ordering, derived from the stride sign.
    pub fn row_order(&self) -> RowOrder {
        RowOrder::from_stride(self.stride)
    }

    /// The pixel bytes of logical row `y`, padding trimmed.
    ///
    /// Row 0 is the top of the image regardless of the physical ordering of
    /// the backing memory; bottom-up buffers are addressed from the far end.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row {} out of range 0..{}", y, self.height);
        let stride = self.stride.unsigned_abs() as usize;
        let physical = match self.row_order() {
            RowOrder::TopDown => y as usize,
            RowOrder::BottomUp => (self.height - 1 - y) as usize,
        };
        let start = physical * stride;
        &self.bytes[start..start + self.pixel_format.min_row_bytes(self.width)]
    }

    /// Consume the buffer and return the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Extract an owned copy of a surface's raw pixel memory.
///
/// Acquires an exclusive scoped lock on the backing memory, reads the stride
/// reported at lock time, copies `abs(stride) * height` bytes verbatim
/// (padding included), and releases the lock before returning — on failure
/// paths too, via the guard's drop. The returned buffer carries the stride,
/// dimensions, and pixel format captured at lock time.
///
/// Fails with [`FarbwerkError::LockAcquisition`] when the surface is already
/// locked or disposed. No further validation is performed: stride and pixel
/// format are taken as reported by the surface.
///
/// [`FarbwerkError::LockAcquisition`]: farbwerk_core::FarbwerkError::LockAcquisition
#[instrument(skip(surface), fields(width = surface.width(), height = surface.height()))]
pub fn extract(surface: &BitmapSurface) -> Result<PixelBuffer> {
    let locked = surface.lock_bits()?;

    let stride = locked.stride();
    let width = locked.width();
    let height = locked.height();
    let pixel_format = locked.pixel_format();

    let length = stride.unsigned_abs() as usize * height as usize;
    let mut bytes = Vec::with_capacity(length);
    bytes.extend_from_slice(&locked.bytes()[..length]);

    drop(locked);

    debug!(length, stride, %pixel_format, "pixel buffer extracted");

    Ok(PixelBuffer {
        bytes,
        stride,
        width,
        height,
        pixel_format,
    })
}

// -- Tests --------------------------------------------------------------------
