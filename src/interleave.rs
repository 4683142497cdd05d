//! Band-to-pixel interleave conversion.
//!
//! Rewrites a raster's sample storage order so that all bands of a pixel are
//! contiguous, under a caller-chosen target [`ColorModel`]. This is a pure
//! re-layout: every sample byte is moved, none is transformed.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use imgref::ImgVec;
use log::trace;
use rgb::Rgb;

use crate::buffer::RasterBuffer;
use crate::model::{ColorModel, Interleave, SampleDepth, SampleModel};

// ---------------------------------------------------------------------------
// InterleaveError
// ---------------------------------------------------------------------------

/// Band or sample-depth configurations that cannot be mapped onto the
/// requested color model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InterleaveError {
    /// The source has more bands than the target color model.
    BandCount { source: u8, target: ColorModel },
    /// The source sample depth cannot be re-laid out into the 8-bit target.
    Depth { depth: SampleDepth },
}

impl fmt::Display for InterleaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BandCount { source, target } => write!(
                f,
                "cannot map {source} source bands onto {target:?} ({} bands)",
                target.bands()
            ),
            Self::Depth { depth } => {
                write!(f, "cannot re-lay {depth:?} samples out into an 8-bit color model")
            }
        }
    }
}

impl core::error::Error for InterleaveError {}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

impl RasterBuffer {
    /// Re-lay the raster's samples out pixel-sequentially under `target`.
    ///
    /// The output has the same width, height, and origin. Sample values are
    /// copied exactly, with no scaling and no color transform: for every band the
    /// source has, output band `b` of pixel (x, y) equals source band `b` of
    /// pixel (x, y). Target bands past the source band count repeat the last
    /// source band, so a gray source expands to R=G=B.
    ///
    /// Allocates the one output buffer; the source is untouched.
    ///
    /// # Errors
    ///
    /// [`InterleaveError::Depth`] unless the source is 8-bit, and
    /// [`InterleaveError::BandCount`] when the source has more bands than
    /// `target`.
    pub fn to_pixel_interleave(
        &self,
        target: ColorModel,
    ) -> Result<RasterBuffer, InterleaveError> {
        let model = self.model();
        if model.depth != SampleDepth::U8 {
            return Err(InterleaveError::Depth { depth: model.depth });
        }
        if model.bands > target.bands() {
            return Err(InterleaveError::BandCount {
                source: model.bands,
                target,
            });
        }
        trace!(
            "interleaving {}x{} raster: {}-band {:?} -> {:?}",
            self.width(),
            self.height(),
            model.bands,
            model.interleave,
            target
        );

        let target_bands = target.bands() as usize;
        let pixels = self.width() as usize * self.height() as usize;
        let mut out = vec![0u8; pixels * target_bands];
        match model.interleave {
            // Planar source: one pass per output band, reading the covering
            // plane sequentially and scattering into the band's lane.
            Interleave::BandSequential => {
                for band in 0..target.bands() {
                    let source_band = band.min(model.bands - 1);
                    let plane = self.plane(source_band);
                    let lane = out[band as usize..].iter_mut().step_by(target_bands);
                    for (dst, &sample) in lane.zip(plane) {
                        *dst = sample;
                    }
                }
            }
            // Interleaved source: re-pack pixel by pixel, padding the tail
            // bands from the last source band.
            Interleave::PixelSequential => {
                let source_bands = model.bands as usize;
                let src_pixels = self.samples().chunks_exact(source_bands);
                for (src, dst) in src_pixels.zip(out.chunks_exact_mut(target_bands)) {
                    dst[..source_bands].copy_from_slice(src);
                    for slot in &mut dst[source_bands..] {
                        *slot = src[source_bands - 1];
                    }
                }
            }
        }

        let converted = RasterBuffer::from_exact_vec(
            out,
            self.width(),
            self.height(),
            SampleModel::pixel_interleaved(target),
        );
        Ok(converted.with_origin(self.min_x(), self.min_y()))
    }

    /// Hand the raster to imgref-speaking consumers as interleaved 8-bit RGB.
    ///
    /// Converts through [`to_pixel_interleave`](Self::to_pixel_interleave)
    /// with an [`Rgb`](ColorModel::Rgb) target, so the same band rules and
    /// errors apply.
    pub fn to_rgb8(&self) -> Result<ImgVec<Rgb<u8>>, InterleaveError> {
        let rgb = self.to_pixel_interleave(ColorModel::Rgb)?;
        let pixels: Vec<Rgb<u8>> = rgb
            .samples()
            .chunks_exact(3)
            .map(|c| Rgb {
                r: c[0],
                g: c[1],
                b: c[2],
            })
            .collect();
        Ok(ImgVec::new(pixels, rgb.width() as usize, rgb.height() as usize))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
