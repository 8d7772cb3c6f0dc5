// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bitmap surface — an in-memory raster with explicit stride, pixel format, and
// a lock/unlock discipline over its backing bytes, modelled on the lock-bits
// protocol of platform raster backends.

use std::borrow::Cow;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use farbwerk_core::config::SurfaceConfig;
use farbwerk_core::error::{FarbwerkError, Result};
use farbwerk_core::types::PixelFormat;
use image::DynamicImage;
use tracing::{debug, info, instrument};

/// An in-memory bitmap surface with a lockable byte backing.
///
/// The backing is always exactly `abs(stride) * height` bytes. The stride is
/// signed: a negative value marks a bottom-up source, and its absolute value
/// (which may exceed `width * bytes_per_pixel` due to row-alignment padding)
/// is what sizes the allocation.
///
/// Access to the bytes goes through [`BitmapSurface::lock_bits`] /
/// [`BitmapSurface::lock_bits_mut`], which return scoped guards. A surface can
/// hold at most one lock at a time; a second lock attempt fails with
/// [`FarbwerkError::LockAcquisition`] rather than blocking.
pub struct BitmapSurface {
    /// Backing bytes, `abs(stride) * height` long, padding included.
    data: Vec<u8>,
    width: u32,
    height: u32,
    /// Bytes per scanline including padding; sign encodes row order.
    stride: i32,
    pixel_format: PixelFormat,
    /// Lock flag for the backing memory. Lock attempts are atomic with
    /// respect to each other; they fail fast instead of blocking.
    locked: AtomicBool,
    /// Set once by `dispose`; a disposed surface can never be locked again.
    disposed: AtomicBool,
}

impl BitmapSurface {
    // -- Construction ---------------------------------------------------------

    /// Build a surface from a decoded image using the default DWORD row
    /// alignment.
    pub fn from_dynamic(img: &DynamicImage) -> Result<Self> {
        Self::from_dynamic_with(img, &SurfaceConfig::default())
    }

    /// Build a surface from a decoded image, padding each scanline to the
    /// configured row alignment. Padding bytes are zeroed.
    ///
    /// `L8`, `LA8`, `RGB8`, and `RGBA8` sources keep their native channel
    /// order; deeper formats (16-bit, float) are narrowed to `RGBA8` first.
    #[instrument(skip_all, fields(width = img.width(), height = img.height()))]
    pub fn from_dynamic_with(img: &DynamicImage, config: &SurfaceConfig) -> Result<Self> {
        let width = img.width();
        let height = img.height();
        if width == 0 || height == 0 {
            return Err(FarbwerkError::ImageError(format!(
                "cannot build surface from empty image ({}x{})",
                width, height
            )));
        }

        let (pixel_format, packed): (PixelFormat, Cow<'_, [u8]>) = match img {
            DynamicImage::ImageLuma8(buf) => (PixelFormat::L8, Cow::Borrowed(buf.as_raw())),
            DynamicImage::ImageLumaA8(buf) => (PixelFormat::La8, Cow::Borrowed(buf.as_raw())),
            DynamicImage::ImageRgb8(buf) => (PixelFormat::Rgb8, Cow::Borrowed(buf.as_raw())),
            DynamicImage::ImageRgba8(buf) => (PixelFormat::Rgba8, Cow::Borrowed(buf.as_raw())),
            other => (PixelFormat::Rgba8, Cow::Owned(other.to_rgba8().into_raw())),
        };

        let min_row = pixel_format.min_row_bytes(width);
        let stride = config.aligned_stride(min_row);
        let mut data = vec![0u8; stride * height as usize];
        for y in 0..height as usize {
            let src = &packed[y * min_row..(y + 1) * min_row];
            data[y * stride..y * stride + min_row].copy_from_slice(src);
        }

        info!(%pixel_format, stride, "Surface built from decoded image");

        Ok(Self {
            data,
            width,
            height,
            stride: stride as i32,
            pixel_format,
            locked: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
        })
    }

    /// Decode an image file and build a surface from it.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            FarbwerkError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        Self::from_dynamic(&img)
    }

    /// Adopt a caller-provided backing verbatim.
    ///
    /// `data` must be exactly `abs(stride) * height` bytes and `abs(stride)`
    /// must cover at least `width * bytes_per_pixel`. A negative `stride`
    /// marks a bottom-up source. No pixel content is inspected.
    pub fn from_raw(
        width: u32,
        height: u32,
        stride: i32,
        pixel_format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FarbwerkError::ImageError(format!(
                "surface dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let abs_stride = stride.unsigned_abs() as usize;
        if abs_stride < pixel_format.min_row_bytes(width) {
            return Err(FarbwerkError::ImageError(format!(
                "stride {} too small for {} pixels of {}",
                stride, width, pixel_format
            )));
        }
        let expected = abs_stride * height as usize;
        if data.len() != expected {
            return Err(FarbwerkError::ImageError(format!(
                "backing length {} does not match abs(stride) * height = {}",
                data.len(),
                expected
            )));
        }

        Ok(Self {
            data,
            width,
            height,
            stride,
            pixel_format,
            locked: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
        })
    }

    // -- Accessors ------------------------------------------------------------

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format of the backing bytes.
    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    /// Whether the backing memory is currently locked.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    /// Whether `dispose` has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    // -- Locking --------------------------------------------------------------

    /// Acquire an exclusive, scoped read lock on the backing memory.
    ///
    /// Fails with [`FarbwerkError::LockAcquisition`] if the surface is already
    /// locked or has been disposed. The lock is released when the returned
    /// guard is dropped, on every exit path.
    pub fn lock_bits(&self) -> Result<LockedBits<'_>> {
        self.acquire_lock()?;
        debug!("surface bits locked for read");
        Ok(LockedBits { surface: self })
    }

    /// Acquire an exclusive, scoped read-write lock on the backing memory.
    ///
    /// Same discipline as [`BitmapSurface::lock_bits`], but the guard exposes
    /// the bytes mutably so the surface content can be edited in place.
    pub fn lock_bits_mut(&mut self) -> Result<LockedBitsMut<'_>> {
        self.acquire_lock()?;
        debug!("surface bits locked for read-write");
        Ok(LockedBitsMut { surface: self })
    }

    /// Mark the surface as permanently unusable. Any later lock attempt fails
    /// with [`FarbwerkError::LockAcquisition`].
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
        debug!("surface disposed");
    }

    fn acquire_lock(&self) -> Result<()> {
        if self.disposed.load(Ordering::Acquire) {
            return Err(FarbwerkError::LockAcquisition(
                "surface has been disposed".into(),
            ));
        }
        if self
            .locked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(FarbwerkError::LockAcquisition(
                "surface is already locked".into(),
            ));
        }
        Ok(())
    }

    fn release_lock(&self) {
        self.locked.store(false, Ordering::Release);
    }
}

impl std::fmt::Debug for BitmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitmapSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("pixel_format", &self.pixel_format)
            .field("locked", &self.is_locked())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

// -- Lock guards --------------------------------------------------------------

/// Scoped read access to a locked surface's backing bytes.
///
/// Stride and memory address become observable only through this guard,
/// matching the lock-bits protocol: layout is a property of the locked state.
/// Dropping the guard releases the lock unconditionally.
#[derive(Debug)]
pub struct LockedBits<'a> {
    surface: &'a BitmapSurface,
}

impl LockedBits<'_> {
    /// The full backing slice, `abs(stride) * height` bytes, padding included.
    pub fn bytes(&self) -> &[u8] {
        &self.surface.data
    }

    /// Bytes per scanline including padding; negative for bottom-up sources.
    pub fn stride(&self) -> i32 {
        self.surface.stride
    }

    /// Width in pixels at lock time.
    pub fn width(&self) -> u32 {
        self.surface.width
    }

    /// Height in pixels at lock time.
    pub fn height(&self) -> u32 {
        self.surface.height
    }

    /// Pixel format at lock time.
    pub fn pixel_format(&self) -> PixelFormat {
        self.surface.pixel_format
    }
}

impl Drop for LockedBits<'_> {
    fn drop(&mut self) {
        self.surface.release_lock();
    }
}

/// Scoped read-write access to a locked surface's backing bytes.
pub struct LockedBitsMut<'a> {
    surface: &'a mut BitmapSurface,
}

impl LockedBitsMut<'_> {
    /// The full backing slice, mutable.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.surface.data
    }

    /// Bytes per scanline including padding; negative for bottom-up sources.
    pub fn stride(&self) -> i32 {
        self.surface.stride
    }
}

impl Drop for LockedBitsMut<'_> {
    fn drop(&mut self) {
        self.surface.release_lock();
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn rgb_2x2() -> DynamicImage {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([1, 2, 3]));
        img.put_pixel(1, 0, Rgb([4, 5, 6]));
        img.put_pixel(0, 1, Rgb([7, 8, 9]));
        img.put_pixel(1, 1, Rgb([10, 11, 12]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn from_dynamic_pads_rows_to_alignment() {
        // 2 RGB pixels = 6 bytes per row, padded to 8 under DWORD alignment.
        let surface = BitmapSurface::from_dynamic(&rgb_2x2()).unwrap();
        let locked = surface.lock_bits().unwrap();

        assert_eq!(locked.stride(), 8);
        assert_eq!(locked.bytes().len(), 16);
        assert_eq!(&locked.bytes()[0..6], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(&locked.bytes()[6..8], &[0, 0]); // padding, zeroed
        assert_eq!(&locked.bytes()[8..14], &[7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn from_dynamic_narrows_deep_formats_to_rgba() {
        let img = DynamicImage::ImageLuma16(image::ImageBuffer::from_pixel(
            3,
            2,
            image::Luma([40_000u16]),
        ));
        let surface = BitmapSurface::from_dynamic(&img).unwrap();
        assert_eq!(surface.pixel_format(), PixelFormat::Rgba8);
    }

    #[test]
    fn from_raw_accepts_matching_backing() {
        let surface =
            BitmapSurface::from_raw(2, 2, 8, PixelFormat::Rgb8, vec![0u8; 16]).unwrap();
        assert_eq!(surface.width(), 2);
        assert_eq!(surface.height(), 2);
    }

    #[test]
    fn from_raw_accepts_negative_stride() {
        let surface =
            BitmapSurface::from_raw(2, 2, -8, PixelFormat::Rgb8, vec![0u8; 16]).unwrap();
        let locked = surface.lock_bits().unwrap();
        assert_eq!(locked.stride(), -8);
        assert_eq!(locked.bytes().len(), 16);
    }

    #[test]
    fn from_raw_rejects_length_mismatch() {
        let err =
            BitmapSurface::from_raw(2, 2, 8, PixelFormat::Rgb8, vec![0u8; 15]).unwrap_err();
        assert!(matches!(err, FarbwerkError::ImageError(_)));
    }

    #[test]
    fn from_raw_rejects_undersized_stride() {
        // 2 RGB pixels need at least 6 bytes per row.
        let err =
            BitmapSurface::from_raw(2, 2, 5, PixelFormat::Rgb8, vec![0u8; 10]).unwrap_err();
        assert!(matches!(err, FarbwerkError::ImageError(_)));
    }

    #[test]
    fn from_raw_rejects_zero_dimensions() {
        let err = BitmapSurface::from_raw(0, 2, 8, PixelFormat::Rgb8, vec![]).unwrap_err();
        assert!(matches!(err, FarbwerkError::ImageError(_)));
    }

    #[test]
    fn second_lock_fails_while_guard_is_live() {
        let surface = BitmapSurface::from_dynamic(&rgb_2x2()).unwrap();
        let guard = surface.lock_bits().unwrap();

        let err = surface.lock_bits().unwrap_err();
        assert!(matches!(err, FarbwerkError::LockAcquisition(_)));

        drop(guard);
        assert!(surface.lock_bits().is_ok());
    }

    #[test]
    fn lock_released_even_when_guard_dropped_mid_scope() {
        let surface = BitmapSurface::from_dynamic(&rgb_2x2()).unwrap();
        {
            let _guard = surface.lock_bits().unwrap();
            assert!(surface.is_locked());
        }
        assert!(!surface.is_locked());
    }

    #[test]
    fn mutable_lock_writes_into_backing() {
        let mut surface =
            BitmapSurface::from_raw(2, 1, 8, PixelFormat::Rgb8, vec![0u8; 8]).unwrap();
        {
            let mut guard = surface.lock_bits_mut().unwrap();
            guard.bytes_mut()[0] = 0xAB;
        }
        let locked = surface.lock_bits().unwrap();
        assert_eq!(locked.bytes()[0], 0xAB);
    }

    #[test]
    fn disposed_surface_cannot_be_locked() {
        let surface = BitmapSurface::from_dynamic(&rgb_2x2()).unwrap();
        surface.dispose();

        let err = surface.lock_bits().unwrap_err();
        assert!(matches!(err, FarbwerkError::LockAcquisition(_)));
    }

    #[test]
    fn open_decodes_a_saved_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");

        let img = GrayImage::from_pixel(4, 3, Luma([120u8]));
        img.save(&path).unwrap();

        let surface = BitmapSurface::open(&path).unwrap();
        assert_eq!(surface.width(), 4);
        assert_eq!(surface.height(), 3);
        assert_eq!(surface.pixel_format(), PixelFormat::L8);
    }

    #[test]
    fn open_missing_file_is_an_image_error() {
        let err = BitmapSurface::open("/no/such/file.png").unwrap_err();
        assert!(matches!(err, FarbwerkError::ImageError(_)));
    }
}
