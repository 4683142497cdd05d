//! Sample-model descriptors.
//!
//! A [`SampleModel`] describes how the samples of a raster are laid out in
//! its backing array: how many bands, how wide each sample is, and whether
//! samples are grouped by band ([`Interleave::BandSequential`]) or by pixel
//! ([`Interleave::PixelSequential`]). The descriptor carries no pixel data;
//! it only knows the addressing arithmetic.

// ---------------------------------------------------------------------------
// Descriptor enums
// ---------------------------------------------------------------------------

/// Sample storage type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum SampleDepth {
    /// 8-bit unsigned integer (1 byte per sample).
    U8 = 1,
    /// 16-bit unsigned integer (2 bytes per sample).
    U16 = 2,
    /// 32-bit floating point (4 bytes per sample).
    F32 = 4,
}

impl SampleDepth {
    /// Byte size of a single sample value.
    #[inline]
    pub const fn byte_size(self) -> usize {
        self as usize
    }
}

/// Target color model for pixel-interleave conversion.
///
/// Alpha models are deliberately absent: the converter re-lays samples out
/// without any alpha or premultiplication handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum ColorModel {
    /// Single luminance band.
    Gray = 1,
    /// Red, green, blue.
    Rgb = 3,
}

impl ColorModel {
    /// Number of bands in this color model.
    #[inline]
    pub const fn bands(self) -> u8 {
        self as u8
    }
}

/// Sample storage order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Interleave {
    /// Planar: all samples of band 0, then all samples of band 1, and so on.
    BandSequential = 0,
    /// Interleaved: all bands of pixel 0, then all bands of pixel 1, and so on.
    PixelSequential = 1,
}

// ---------------------------------------------------------------------------
// SampleModel
// ---------------------------------------------------------------------------

/// Compact sample layout descriptor.
///
/// Describes the layout of a raster's sample array without carrying the
/// array itself. Used to tag [`RasterBuffer`](crate::RasterBuffer) and to
/// compute byte offsets for (x, y, band) addressing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct SampleModel {
    /// Number of bands per pixel.
    pub bands: u8,
    /// Storage type of a single sample.
    pub depth: SampleDepth,
    /// Sample storage order.
    pub interleave: Interleave,
}

impl SampleModel {
    /// Create a sample layout descriptor.
    pub const fn new(bands: u8, depth: SampleDepth, interleave: Interleave) -> Self {
        Self {
            bands,
            depth,
            interleave,
        }
    }

    /// Band-sequential (planar) layout with the given band count and depth.
    pub const fn band_sequential(bands: u8, depth: SampleDepth) -> Self {
        Self::new(bands, depth, Interleave::BandSequential)
    }

    /// The 8-bit pixel-interleaved layout of a [`ColorModel`]: the target
    /// layout produced by
    /// [`to_pixel_interleave`](crate::RasterBuffer::to_pixel_interleave).
    pub const fn pixel_interleaved(model: ColorModel) -> Self {
        Self::new(model.bands(), SampleDepth::U8, Interleave::PixelSequential)
    }

    /// Bytes per sample value.
    #[inline]
    pub const fn bytes_per_sample(self) -> usize {
        self.depth.byte_size()
    }

    /// Bytes per pixel (all bands).
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        self.bands as usize * self.depth.byte_size()
    }

    /// Exact byte length of a sample array for the given dimensions.
    ///
    /// Returns `None` when the band count is zero or the size overflows.
    pub fn buffer_len(self, width: u32, height: u32) -> Option<usize> {
        if self.bands == 0 {
            return None;
        }
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(self.bands as usize)?
            .checked_mul(self.bytes_per_sample())
    }

    /// Whether every raster row occupies one contiguous byte run.
    ///
    /// True for pixel-sequential storage and for any single-band raster
    /// (with one band, planar and interleaved storage coincide).
    #[inline]
    pub const fn is_row_contiguous(self) -> bool {
        matches!(self.interleave, Interleave::PixelSequential) || self.bands == 1
    }

    /// Byte stride between the starts of successive rows.
    ///
    /// Only meaningful for row-contiguous layouts; for a multi-band planar
    /// raster this is the stride within one band plane.
    #[inline]
    pub const fn row_stride(self, width: u32) -> usize {
        match self.interleave {
            Interleave::BandSequential => width as usize * self.bytes_per_sample(),
            Interleave::PixelSequential => width as usize * self.bytes_per_pixel(),
        }
    }

    /// Byte length of one band plane in a band-sequential raster.
    #[inline]
    pub const fn plane_stride(self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.bytes_per_sample()
    }

    /// Byte offset of sample (x, y, band) in a `width` × `height` raster.
    ///
    /// Callers are responsible for bounds; this is pure addressing
    /// arithmetic over in-range coordinates.
    #[inline]
    pub const fn sample_offset(self, width: u32, height: u32, x: u32, y: u32, band: u8) -> usize {
        let w = width as usize;
        let h = height as usize;
        let x = x as usize;
        let y = y as usize;
        let band = band as usize;
        match self.interleave {
            Interleave::BandSequential => ((band * h + y) * w + x) * self.bytes_per_sample(),
            Interleave::PixelSequential => {
                ((y * w + x) * self.bands as usize + band) * self.bytes_per_sample()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_depth_byte_size() {
        assert_eq!(SampleDepth::U8.byte_size(), 1);
        assert_eq!(SampleDepth::U16.byte_size(), 2);
        assert_eq!(SampleDepth::F32.byte_size(), 4);
    }

    #[test]
    fn color_model_bands() {
        assert_eq!(ColorModel::Gray.bands(), 1);
        assert_eq!(ColorModel::Rgb.bands(), 3);
    }

    #[test]
    fn pixel_arithmetic() {
        let m = SampleModel::new(3, SampleDepth::U8, Interleave::PixelSequential);
        assert_eq!(m.bytes_per_sample(), 1);
        assert_eq!(m.bytes_per_pixel(), 3);

        let m = SampleModel::band_sequential(2, SampleDepth::U16);
        assert_eq!(m.bytes_per_sample(), 2);
        assert_eq!(m.bytes_per_pixel(), 4);
    }

    #[test]
    fn pixel_interleaved_target() {
        let m = SampleModel::pixel_interleaved(ColorModel::Rgb);
        assert_eq!(m.bands, 3);
        assert_eq!(m.depth, SampleDepth::U8);
        assert_eq!(m.interleave, Interleave::PixelSequential);
    }

    #[test]
    fn buffer_len_exact() {
        let m = SampleModel::band_sequential(3, SampleDepth::U8);
        assert_eq!(m.buffer_len(4, 2), Some(24));

        let m = SampleModel::new(2, SampleDepth::U16, Interleave::PixelSequential);
        assert_eq!(m.buffer_len(4, 2), Some(32));

        // Zero-sized rasters are representable.
        assert_eq!(m.buffer_len(0, 0), Some(0));
    }

    #[test]
    fn buffer_len_rejects_zero_bands_and_overflow() {
        let m = SampleModel::new(0, SampleDepth::U8, Interleave::PixelSequential);
        assert_eq!(m.buffer_len(4, 2), None);

        let m = SampleModel::new(4, SampleDepth::F32, Interleave::PixelSequential);
        assert_eq!(m.buffer_len(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn row_contiguity() {
        assert!(SampleModel::pixel_interleaved(ColorModel::Rgb).is_row_contiguous());
        assert!(SampleModel::band_sequential(1, SampleDepth::U16).is_row_contiguous());
        assert!(!SampleModel::band_sequential(3, SampleDepth::U8).is_row_contiguous());
    }

    #[test]
    fn row_and_plane_strides() {
        let m = SampleModel::pixel_interleaved(ColorModel::Rgb);
        assert_eq!(m.row_stride(10), 30);

        let m = SampleModel::band_sequential(3, SampleDepth::U16);
        assert_eq!(m.row_stride(10), 20);
        assert_eq!(m.plane_stride(10, 4), 80);
    }

    #[test]
    fn band_sequential_offsets() {
        // 4x2, 2 bands, u8: plane 0 occupies bytes 0..8, plane 1 bytes 8..16.
        let m = SampleModel::band_sequential(2, SampleDepth::U8);
        assert_eq!(m.sample_offset(4, 2, 0, 0, 0), 0);
        assert_eq!(m.sample_offset(4, 2, 3, 0, 0), 3);
        assert_eq!(m.sample_offset(4, 2, 0, 1, 0), 4);
        assert_eq!(m.sample_offset(4, 2, 0, 0, 1), 8);
        assert_eq!(m.sample_offset(4, 2, 3, 1, 1), 15);
    }

    #[test]
    fn pixel_sequential_offsets() {
        // 4x2, 3 bands, u8: pixel (x, y) starts at (y*4 + x) * 3.
        let m = SampleModel::pixel_interleaved(ColorModel::Rgb);
        assert_eq!(m.sample_offset(4, 2, 0, 0, 0), 0);
        assert_eq!(m.sample_offset(4, 2, 0, 0, 2), 2);
        assert_eq!(m.sample_offset(4, 2, 1, 0, 0), 3);
        assert_eq!(m.sample_offset(4, 2, 0, 1, 1), 13);
    }

    #[test]
    fn sixteen_bit_offsets() {
        let m = SampleModel::new(2, SampleDepth::U16, Interleave::PixelSequential);
        assert_eq!(m.sample_offset(4, 2, 1, 0, 1), 6);
    }
}
