//! Tile grid repartitioning.
//!
//! Replaces a strip grid's tile height with a smaller height that divides
//! it, by installing aliased sub-views of the existing tiles. The sample
//! array is shared, not copied; only the tile table is new.

use alloc::vec::Vec;
use core::fmt;

use log::{debug, trace};

use crate::grid::{TileGrid, TiledRaster};

// ---------------------------------------------------------------------------
// RegridError
// ---------------------------------------------------------------------------

/// Caller-configuration errors from tile regridding. None are retryable;
/// the input raster or the requested height has to change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegridError {
    /// The pixel origin or the tile-matrix origin is not (0, 0).
    UnsupportedOrigin { pixel: (i32, i32), tile: (i32, i32) },
    /// Tiles do not span the full raster width (not a strip grid).
    UnsupportedTileShape { tile_width: u32, raster_width: u32 },
    /// The requested height does not evenly divide the current tile height.
    IncompatibleTileHeight { tile_height: u32, requested: u32 },
}

impl fmt::Display for RegridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedOrigin { pixel, tile } => write!(
                f,
                "pixel origin {pixel:?} and tile matrix origin {tile:?} must both be (0, 0)"
            ),
            Self::UnsupportedTileShape {
                tile_width,
                raster_width,
            } => write!(
                f,
                "tile width {tile_width} does not span the {raster_width} pixel wide raster"
            ),
            Self::IncompatibleTileHeight {
                tile_height,
                requested,
            } => write!(
                f,
                "tile height {requested} does not evenly divide the current tile height {tile_height}"
            ),
        }
    }
}

impl core::error::Error for RegridError {}

// ---------------------------------------------------------------------------
// Regridding
// ---------------------------------------------------------------------------

impl TiledRaster {
    /// Repartition the strip grid into `new_tile_height`-pixel strips.
    ///
    /// Every output tile is an aliased sub-view of the source tile covering
    /// its rows, with its absolute offset preserved; the returned raster
    /// shares this raster's sample array and allocates only the new tile
    /// table. Pixel content is unchanged: for every (x, y, band) the output
    /// sample equals the source sample, and regridding to the current tile
    /// height reproduces the source content exactly.
    ///
    /// # Errors
    ///
    /// [`RegridError::UnsupportedOrigin`] unless the pixel origin and the
    /// tile-matrix origin are both (0, 0), [`RegridError::UnsupportedTileShape`]
    /// unless the grid is a single column of full-width strips, and
    /// [`RegridError::IncompatibleTileHeight`] unless `new_tile_height`
    /// evenly divides the current tile height.
    pub fn to_tile_height(&self, new_tile_height: u32) -> Result<TiledRaster, RegridError> {
        let buffer = self.buffer();
        let grid = self.grid();

        let pixel = (buffer.min_x(), buffer.min_y());
        let tile = (grid.tile_min_x(), grid.tile_min_y());
        if pixel != (0, 0) || tile != (0, 0) {
            return Err(RegridError::UnsupportedOrigin { pixel, tile });
        }
        if grid.tile_width() != buffer.width() || grid.tiles_across() != 1 {
            return Err(RegridError::UnsupportedTileShape {
                tile_width: grid.tile_width(),
                raster_width: buffer.width(),
            });
        }
        let source_tile_height = grid.tile_height();
        if new_tile_height == 0 || !source_tile_height.is_multiple_of(new_tile_height) {
            return Err(RegridError::IncompatibleTileHeight {
                tile_height: source_tile_height,
                requested: new_tile_height,
            });
        }
        trace!(
            "regridding {}x{} raster from {}-pixel to {}-pixel strips",
            buffer.width(),
            buffer.height(),
            source_tile_height,
            new_tile_height
        );

        // Grid construction guarantees height is a multiple of the tile
        // height, so the division is exact.
        let count = buffer.height() / new_tile_height;
        let mut tiles = Vec::with_capacity(count as usize);
        for i in 0..count {
            let y = i * new_tile_height;
            let source = grid.tile(0, y / source_tile_height);
            tiles.push(source.child_rows(y as i32, new_tile_height));
        }
        debug!(
            "regridded {} strips of {} rows into {} strips of {} rows",
            grid.tiles_down(),
            source_tile_height,
            count,
            new_tile_height
        );
        let new_grid = TileGrid::from_tiles(grid.tile_width(), new_tile_height, 1, count, tiles);
        Ok(TiledRaster::from_parts(buffer.clone(), new_grid))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
