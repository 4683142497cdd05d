//! Tiled raster re-layout: interleave conversion and tile regridding.
//!
//! This crate reformats in-memory tiled rasters without altering a single
//! pixel value:
//!
//! - [`RasterBuffer::to_pixel_interleave`] — rewrite band-sequential
//!   (planar) sample storage as pixel-sequential (interleaved) storage
//!   under a target [`ColorModel`]
//! - [`TiledRaster::to_tile_height`] — repartition a strip grid into a
//!   smaller tile height that divides the original, aliasing the same
//!   sample bytes
//!
//! Both operations are pure: the input is never mutated, the output is a
//! fresh buffer or an aliased view over shared sample memory, and calls on
//! independent inputs can run concurrently with no coordination.
//!
//! Decoding and encoding raster formats are out of scope. Callers hand
//! pixel data in and out through [`RasterBuffer`] and the [`imgref`] types
//! re-exported below.
//!
//! ```
//! use zentile::{ColorModel, RasterBuffer, SampleDepth, SampleModel, TiledRaster};
//!
//! // A 4x4 planar RGB raster in one 4-row strip, re-laid out as
//! // pixel-interleaved 2-row strips.
//! let planar = SampleModel::band_sequential(3, SampleDepth::U8);
//! let source = RasterBuffer::from_vec(vec![0u8; 48], 4, 4, planar)?;
//! let interleaved = source.to_pixel_interleave(ColorModel::Rgb)?;
//! let restriped = TiledRaster::strips(interleaved, 4)?.to_tile_height(2)?;
//! assert_eq!(restriped.tile_count(), 2);
//! # Ok::<(), Box<dyn core::error::Error>>(())
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

mod buffer;
mod grid;
mod interleave;
mod model;
mod regrid;

pub use buffer::{RasterBuffer, RasterError, SampleRegion};
pub use grid::{GridError, Tile, TileGrid, TileView, TiledRaster};
pub use interleave::InterleaveError;
pub use model::{ColorModel, Interleave, SampleDepth, SampleModel};
pub use regrid::RegridError;

// Re-exports for callers at the raster I/O seam.
pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb;
pub use rgb::{Gray, Rgb};
