//! Owned raster sample storage.
//!
//! [`RasterBuffer`] owns a dense sample array tagged with a
//! [`SampleModel`](crate::SampleModel) and a pixel origin. The array lives in
//! an `Arc` so that tile grids derived from the buffer alias the same bytes
//! without copying and without dangling views. Buffers are never mutated
//! after construction; every transform allocates a fresh buffer or shares
//! this one.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use imgref::ImgVec;
use rgb::{ComponentBytes, Gray, Rgb};

use crate::model::{ColorModel, Interleave, SampleModel};

// ---------------------------------------------------------------------------
// RasterError
// ---------------------------------------------------------------------------

/// Errors from raster buffer construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum RasterError {
    /// Width, height, or band count is unrepresentable (zero bands or
    /// byte-size overflow).
    InvalidDimensions,
    /// Sample data is too small for the given dimensions and layout.
    InsufficientData,
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions => {
                write!(f, "dimensions or band count are unrepresentable")
            }
            Self::InsufficientData => {
                write!(f, "sample data is too small for the given dimensions")
            }
        }
    }
}

impl core::error::Error for RasterError {}

// ---------------------------------------------------------------------------
// RasterBuffer
// ---------------------------------------------------------------------------

/// Owned dense raster with a sample layout and a pixel origin.
///
/// The sample array is reference-counted: cloning a buffer, or deriving a
/// tile grid from it, shares the same bytes. Sample values are immutable for
/// the lifetime of the buffer and of everything that aliases it.
#[derive(Clone)]
pub struct RasterBuffer {
    samples: Arc<[u8]>,
    width: u32,
    height: u32,
    min_x: i32,
    min_y: i32,
    model: SampleModel,
}

impl RasterBuffer {
    /// Wrap an existing `Vec<u8>` as a raster at origin (0, 0).
    ///
    /// The vec must hold at least `width × height × bands × bytes_per_sample`
    /// bytes; trailing bytes beyond that exact length are discarded, so
    /// pooled vecs can be rewrapped.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidDimensions`] if the layout is
    /// unrepresentable and [`RasterError::InsufficientData`] if the vec is
    /// too small.
    pub fn from_vec(
        mut data: Vec<u8>,
        width: u32,
        height: u32,
        model: SampleModel,
    ) -> Result<Self, RasterError> {
        let expected = model
            .buffer_len(width, height)
            .ok_or(RasterError::InvalidDimensions)?;
        if data.len() < expected {
            return Err(RasterError::InsufficientData);
        }
        data.truncate(expected);
        Ok(Self::from_exact_vec(data, width, height, model))
    }

    /// Allocate a zero-filled raster at origin (0, 0).
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidDimensions`] if the layout is
    /// unrepresentable.
    pub fn zeroed(width: u32, height: u32, model: SampleModel) -> Result<Self, RasterError> {
        let len = model
            .buffer_len(width, height)
            .ok_or(RasterError::InvalidDimensions)?;
        Ok(Self::from_exact_vec(vec![0u8; len], width, height, model))
    }

    /// Wrap a vec whose length is already exact for the layout.
    pub(crate) fn from_exact_vec(
        data: Vec<u8>,
        width: u32,
        height: u32,
        model: SampleModel,
    ) -> Self {
        debug_assert_eq!(Some(data.len()), model.buffer_len(width, height));
        Self {
            samples: data.into(),
            width,
            height,
            min_x: 0,
            min_y: 0,
            model,
        }
    }

    /// Place the raster at the given pixel origin in global coordinates.
    #[must_use]
    pub fn with_origin(mut self, min_x: i32, min_y: i32) -> Self {
        self.min_x = min_x;
        self.min_y = min_y;
        self
    }

    /// Raster width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// X coordinate of the leftmost pixel column.
    #[inline]
    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Y coordinate of the topmost pixel row.
    #[inline]
    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Sample layout descriptor.
    #[inline]
    pub fn model(&self) -> SampleModel {
        self.model
    }

    /// The full sample array.
    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Raw bytes of sample (x, y, band), buffer-local coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `x`, `y`, or `band` is out of bounds.
    #[inline]
    pub fn sample_bytes(&self, x: u32, y: u32, band: u8) -> &[u8] {
        assert!(x < self.width, "sample x {x} out of bounds (width: {})", self.width);
        assert!(y < self.height, "sample y {y} out of bounds (height: {})", self.height);
        assert!(
            band < self.model.bands,
            "band {band} out of bounds (bands: {})",
            self.model.bands
        );
        let offset = self.model.sample_offset(self.width, self.height, x, y, band);
        &self.samples[offset..offset + self.model.bytes_per_sample()]
    }

    /// Contiguous bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height` or if rows are not contiguous (multi-band
    /// band-sequential storage).
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(
            self.model.is_row_contiguous(),
            "row access on a multi-band band-sequential raster"
        );
        assert!(y < self.height, "row index {y} out of bounds (height: {})", self.height);
        let stride = self.model.row_stride(self.width);
        let start = self.model.sample_offset(self.width, self.height, 0, y, 0);
        &self.samples[start..start + stride]
    }

    /// Full plane of `band` in a band-sequential raster.
    ///
    /// # Panics
    ///
    /// Panics if the raster is not band-sequential or `band` is out of bounds.
    #[inline]
    pub fn plane(&self, band: u8) -> &[u8] {
        assert!(
            matches!(self.model.interleave, Interleave::BandSequential),
            "plane access requires band-sequential storage"
        );
        assert!(
            band < self.model.bands,
            "band {band} out of bounds (bands: {})",
            self.model.bands
        );
        let stride = self.model.plane_stride(self.width, self.height);
        let start = band as usize * stride;
        &self.samples[start..start + stride]
    }

    /// Row `y` of `band`'s plane in a band-sequential raster.
    ///
    /// # Panics
    ///
    /// Panics if the raster is not band-sequential or any index is out of
    /// bounds.
    #[inline]
    pub fn plane_row(&self, band: u8, y: u32) -> &[u8] {
        assert!(
            matches!(self.model.interleave, Interleave::BandSequential),
            "plane access requires band-sequential storage"
        );
        assert!(
            band < self.model.bands,
            "band {band} out of bounds (bands: {})",
            self.model.bands
        );
        assert!(y < self.height, "row index {y} out of bounds (height: {})", self.height);
        let start = self.model.sample_offset(self.width, self.height, 0, y, band);
        let len = self.width as usize * self.model.bytes_per_sample();
        &self.samples[start..start + len]
    }
}

impl fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RasterBuffer({}x{}, {}-band {:?} {:?})",
            self.width, self.height, self.model.bands, self.model.depth, self.model.interleave
        )
    }
}

// ---------------------------------------------------------------------------
// SampleRegion
// ---------------------------------------------------------------------------

/// A rectangular region that can produce raw sample values.
///
/// The two implementors are [`RasterBuffer`] (owned dense array) and
/// [`TileView`](crate::TileView) (non-owning window into one). Coordinates
/// are region-relative; `min_x`/`min_y` give the region's absolute origin.
pub trait SampleRegion {
    /// Region width in pixels.
    fn width(&self) -> u32;
    /// Region height in pixels.
    fn height(&self) -> u32;
    /// Absolute X of the leftmost column.
    fn min_x(&self) -> i32;
    /// Absolute Y of the topmost row.
    fn min_y(&self) -> i32;
    /// Number of bands per pixel.
    fn bands(&self) -> u8;
    /// Raw bytes of sample (x, y, band), region-relative coordinates.
    fn sample_bytes(&self, x: u32, y: u32, band: u8) -> &[u8];
}

impl SampleRegion for RasterBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn min_x(&self) -> i32 {
        self.min_x
    }

    fn min_y(&self) -> i32 {
        self.min_y
    }

    fn bands(&self) -> u8 {
        self.model.bands
    }

    fn sample_bytes(&self, x: u32, y: u32, band: u8) -> &[u8] {
        RasterBuffer::sample_bytes(self, x, y, band)
    }
}

// ---------------------------------------------------------------------------
// imgref interop (layout is already pixel-interleaved on both sides)
// ---------------------------------------------------------------------------

impl From<ImgVec<Rgb<u8>>> for RasterBuffer {
    fn from(img: ImgVec<Rgb<u8>>) -> Self {
        let (buf, w, h) = img.as_ref().to_contiguous_buf();
        Self::from_exact_vec(
            buf.as_bytes().to_vec(),
            w as u32,
            h as u32,
            SampleModel::pixel_interleaved(ColorModel::Rgb),
        )
    }
}

impl From<ImgVec<Gray<u8>>> for RasterBuffer {
    fn from(img: ImgVec<Gray<u8>>) -> Self {
        let (buf, w, h) = img.as_ref().to_contiguous_buf();
        Self::from_exact_vec(
            buf.as_bytes().to_vec(),
            w as u32,
            h as u32,
            SampleModel::pixel_interleaved(ColorModel::Gray),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
