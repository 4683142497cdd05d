//! Tile grids over raster buffers.
//!
//! A [`TiledRaster`] pairs a [`RasterBuffer`] with a [`TileGrid`] that
//! partitions it into rectangular tiles. Tiles are descriptors (byte offset,
//! row stride, extent) into the buffer's shared sample arena, resolved
//! on demand to borrowed [`TileView`]s. Deriving a sub-view or a whole new
//! grid never copies sample data.

use alloc::vec::Vec;
use core::fmt;

use crate::buffer::{RasterBuffer, SampleRegion};

// ---------------------------------------------------------------------------
// GridError
// ---------------------------------------------------------------------------

/// Errors from tile grid construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum GridError {
    /// A tile dimension is zero or exceeds the raster.
    InvalidTileSize { tile_width: u32, tile_height: u32 },
    /// Raster dimensions are not whole multiples of the tile size, which
    /// would leave trailing pixels outside every tile.
    UnalignedGrid {
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    },
    /// Multi-band band-sequential rasters have no row-contiguous tiles;
    /// convert to pixel interleave first.
    InterleaveRequired,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileSize {
                tile_width,
                tile_height,
            } => {
                write!(f, "tile size {tile_width}x{tile_height} is empty or exceeds the raster")
            }
            Self::UnalignedGrid {
                width,
                height,
                tile_width,
                tile_height,
            } => write!(
                f,
                "raster {width}x{height} is not a whole multiple of the {tile_width}x{tile_height} tile size"
            ),
            Self::InterleaveRequired => write!(
                f,
                "multi-band band-sequential raster cannot be tiled; convert to pixel interleave first"
            ),
        }
    }
}

impl core::error::Error for GridError {}

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// Non-owning tile descriptor: a window into a raster's sample arena.
///
/// Holds the byte offset of the tile's first sample, the byte stride between
/// its rows, and the tile's absolute pixel rectangle. A descriptor is only
/// meaningful together with the raster it was derived from; resolve it with
/// [`TiledRaster::tile`] to read samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    offset: usize,
    row_stride: usize,
    min_x: i32,
    min_y: i32,
    width: u32,
    height: u32,
}

impl Tile {
    /// Absolute X of the tile's leftmost column.
    #[inline]
    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Absolute Y of the tile's topmost row.
    #[inline]
    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Tile width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Tile height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub(crate) fn new(
        offset: usize,
        row_stride: usize,
        min_x: i32,
        min_y: i32,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            offset,
            row_stride,
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Derive the aliased sub-view covering rows `[y, y + height)` of this
    /// tile at full tile width.
    ///
    /// `y` is absolute; the child keeps the parent's column origin and byte
    /// stride, and its own absolute row origin. No sample data is copied.
    ///
    /// # Panics
    ///
    /// Panics if the requested rows are not fully inside this tile.
    pub fn child_rows(&self, y: i32, height: u32) -> Tile {
        let end = y as i64 + height as i64;
        assert!(
            y >= self.min_y && end <= self.min_y as i64 + self.height as i64,
            "child rows {y}..{end} outside tile rows {}..{}",
            self.min_y,
            self.min_y as i64 + self.height as i64,
        );
        let delta = (y - self.min_y) as usize;
        Tile {
            offset: self.offset + delta * self.row_stride,
            row_stride: self.row_stride,
            min_x: self.min_x,
            min_y: y,
            width: self.width,
            height,
        }
    }
}

// ---------------------------------------------------------------------------
// TileView
// ---------------------------------------------------------------------------

/// Borrowed view of one tile's samples.
///
/// Rows are `row_stride` bytes apart in the parent raster but exposed
/// tightly: [`row`](Self::row) returns exactly the tile's pixels. The
/// lifetime ties every view to the raster it aliases.
pub struct TileView<'a> {
    data: &'a [u8],
    row_stride: usize,
    row_bytes: usize,
    min_x: i32,
    min_y: i32,
    width: u32,
    height: u32,
    bands: u8,
    bytes_per_sample: usize,
}

impl<'a> TileView<'a> {
    /// Absolute X of the tile's leftmost column.
    #[inline]
    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Absolute Y of the tile's topmost row.
    #[inline]
    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Tile width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Tile height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bands per pixel.
    #[inline]
    pub fn bands(&self) -> u8 {
        self.bands
    }

    /// Pixel bytes of tile-relative row `y` (no stride padding).
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [u8] {
        assert!(y < self.height, "row index {y} out of bounds (rows: {})", self.height);
        let start = y as usize * self.row_stride;
        &self.data[start..start + self.row_bytes]
    }

    /// Raw bytes of sample (x, y, band), tile-relative coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `x`, `y`, or `band` is out of bounds.
    #[inline]
    pub fn sample_bytes(&self, x: u32, y: u32, band: u8) -> &'a [u8] {
        assert!(x < self.width, "sample x {x} out of bounds (width: {})", self.width);
        assert!(
            band < self.bands,
            "band {band} out of bounds (bands: {})",
            self.bands
        );
        let row = self.row(y);
        let start = (x as usize * self.bands as usize + band as usize) * self.bytes_per_sample;
        &row[start..start + self.bytes_per_sample]
    }
}

impl SampleRegion for TileView<'_> {
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
        self.bands
    }

    fn sample_bytes(&self, x: u32, y: u32, band: u8) -> &[u8] {
        TileView::sample_bytes(self, x, y, band)
    }
}

impl fmt::Debug for TileView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TileView({}x{} @ ({}, {}))",
            self.width, self.height, self.min_x, self.min_y
        )
    }
}

// ---------------------------------------------------------------------------
// TileGrid
// ---------------------------------------------------------------------------

/// The tile partition of a raster: uniform tile size, matrix origin, and the
/// tile array in row-major tile order.
#[derive(Clone)]
pub struct TileGrid {
    tile_width: u32,
    tile_height: u32,
    tile_min_x: i32,
    tile_min_y: i32,
    tiles_across: u32,
    tiles_down: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub(crate) fn from_tiles(
        tile_width: u32,
        tile_height: u32,
        tiles_across: u32,
        tiles_down: u32,
        tiles: Vec<Tile>,
    ) -> Self {
        debug_assert_eq!(tiles.len(), (tiles_across * tiles_down) as usize);
        Self {
            tile_width,
            tile_height,
            tile_min_x: 0,
            tile_min_y: 0,
            tiles_across,
            tiles_down,
            tiles,
        }
    }

    /// Tile width in pixels.
    #[inline]
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Tile height in pixels.
    #[inline]
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Column index of the first tile in the matrix.
    #[inline]
    pub fn tile_min_x(&self) -> i32 {
        self.tile_min_x
    }

    /// Row index of the first tile in the matrix.
    #[inline]
    pub fn tile_min_y(&self) -> i32 {
        self.tile_min_y
    }

    pub(crate) fn set_tile_origin(&mut self, tile_min_x: i32, tile_min_y: i32) {
        self.tile_min_x = tile_min_x;
        self.tile_min_y = tile_min_y;
    }

    /// Number of tile columns.
    #[inline]
    pub fn tiles_across(&self) -> u32 {
        self.tiles_across
    }

    /// Number of tile rows.
    #[inline]
    pub fn tiles_down(&self) -> u32 {
        self.tiles_down
    }

    /// Total number of tiles.
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Tile descriptors in row-major tile order.
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile descriptor at zero-based matrix position (tx, ty).
    ///
    /// # Panics
    ///
    /// Panics if `tx` or `ty` is out of bounds.
    #[inline]
    pub fn tile(&self, tx: u32, ty: u32) -> &Tile {
        assert!(
            tx < self.tiles_across,
            "tile x {tx} out of bounds (columns: {})",
            self.tiles_across
        );
        assert!(
            ty < self.tiles_down,
            "tile y {ty} out of bounds (rows: {})",
            self.tiles_down
        );
        &self.tiles[(ty * self.tiles_across + tx) as usize]
    }
}

impl fmt::Debug for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TileGrid({}x{} tiles of {}x{})",
            self.tiles_across, self.tiles_down, self.tile_width, self.tile_height
        )
    }
}

// ---------------------------------------------------------------------------
// TiledRaster
// ---------------------------------------------------------------------------

/// A raster buffer together with its tile partition.
#[derive(Clone)]
pub struct TiledRaster {
    buffer: RasterBuffer,
    grid: TileGrid,
}

impl TiledRaster {
    /// Partition a raster into a single column of full-width strips.
    ///
    /// # Errors
    ///
    /// See [`tiled`](Self::tiled).
    pub fn strips(buffer: RasterBuffer, tile_height: u32) -> Result<Self, GridError> {
        let tile_width = buffer.width();
        Self::tiled(buffer, tile_width, tile_height)
    }

    /// Partition a raster into a 2-D grid of `tile_width` × `tile_height`
    /// tiles.
    ///
    /// The grid must cover the raster exactly; rasters whose dimensions are
    /// not whole multiples of the tile size are rejected rather than losing
    /// trailing pixels.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidTileSize`] for empty or oversized tiles,
    /// [`GridError::UnalignedGrid`] when the grid would not cover the raster
    /// exactly, and [`GridError::InterleaveRequired`] for multi-band
    /// band-sequential rasters, whose tiles have no contiguous rows.
    pub fn tiled(
        buffer: RasterBuffer,
        tile_width: u32,
        tile_height: u32,
    ) -> Result<Self, GridError> {
        let (width, height) = (buffer.width(), buffer.height());
        if tile_width == 0 || tile_height == 0 || tile_width > width || tile_height > height {
            return Err(GridError::InvalidTileSize {
                tile_width,
                tile_height,
            });
        }
        if !width.is_multiple_of(tile_width) || !height.is_multiple_of(tile_height) {
            return Err(GridError::UnalignedGrid {
                width,
                height,
                tile_width,
                tile_height,
            });
        }
        let model = buffer.model();
        if !model.is_row_contiguous() {
            return Err(GridError::InterleaveRequired);
        }

        let tiles_across = width / tile_width;
        let tiles_down = height / tile_height;
        let row_stride = model.row_stride(width);
        let mut tiles = Vec::with_capacity((tiles_across * tiles_down) as usize);
        for ty in 0..tiles_down {
            for tx in 0..tiles_across {
                let offset =
                    model.sample_offset(width, height, tx * tile_width, ty * tile_height, 0);
                tiles.push(Tile::new(
                    offset,
                    row_stride,
                    buffer.min_x() + (tx * tile_width) as i32,
                    buffer.min_y() + (ty * tile_height) as i32,
                    tile_width,
                    tile_height,
                ));
            }
        }
        let grid = TileGrid::from_tiles(tile_width, tile_height, tiles_across, tiles_down, tiles);
        Ok(Self { buffer, grid })
    }

    pub(crate) fn from_parts(buffer: RasterBuffer, grid: TileGrid) -> Self {
        Self { buffer, grid }
    }

    /// Label the tile matrix as starting at the given tile indices, for
    /// interop with sources whose tile numbering does not begin at zero.
    #[must_use]
    pub fn with_tile_origin(mut self, tile_min_x: i32, tile_min_y: i32) -> Self {
        self.grid.set_tile_origin(tile_min_x, tile_min_y);
        self
    }

    /// The underlying raster buffer.
    #[inline]
    pub fn buffer(&self) -> &RasterBuffer {
        &self.buffer
    }

    /// The tile partition.
    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Total number of tiles.
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.grid.tile_count()
    }

    /// Resolve the tile at zero-based matrix position (tx, ty) to a view.
    ///
    /// # Panics
    ///
    /// Panics if `tx` or `ty` is out of bounds.
    pub fn tile(&self, tx: u32, ty: u32) -> TileView<'_> {
        self.resolve(self.grid.tile(tx, ty))
    }

    /// Views of all tiles in row-major tile order.
    pub fn tiles(&self) -> impl Iterator<Item = TileView<'_>> {
        self.grid.tiles.iter().map(|tile| self.resolve(tile))
    }

    /// Contiguous pixel bytes of buffer-local row `y`, read through the
    /// covering tile.
    ///
    /// # Panics
    ///
    /// Panics if the grid is not a single strip column or `y` is out of
    /// bounds.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(
            self.grid.tiles_across == 1,
            "row access requires a strip grid (single tile column)"
        );
        assert!(
            y < self.buffer.height(),
            "row index {y} out of bounds (height: {})",
            self.buffer.height()
        );
        let ty = y / self.grid.tile_height;
        let tile = &self.grid.tiles[ty as usize];
        let within = (y % self.grid.tile_height) as usize;
        let row_bytes = tile.width() as usize * self.buffer.model().bytes_per_pixel();
        let start = tile.offset() + within * tile.row_stride();
        &self.buffer.samples()[start..start + row_bytes]
    }

    /// Raw bytes of sample (x, y, band) in buffer-local coordinates, read
    /// through the covering tile.
    ///
    /// # Panics
    ///
    /// Panics if `x`, `y`, or `band` is out of bounds.
    pub fn sample_bytes(&self, x: u32, y: u32, band: u8) -> &[u8] {
        assert!(
            x < self.buffer.width(),
            "sample x {x} out of bounds (width: {})",
            self.buffer.width()
        );
        assert!(
            y < self.buffer.height(),
            "sample y {y} out of bounds (height: {})",
            self.buffer.height()
        );
        let tx = x / self.grid.tile_width;
        let ty = y / self.grid.tile_height;
        let view = self.resolve(self.grid.tile(tx, ty));
        let rel_x = x % self.grid.tile_width;
        let rel_y = y % self.grid.tile_height;
        view.sample_bytes(rel_x, rel_y, band)
    }

    fn resolve<'a>(&'a self, tile: &Tile) -> TileView<'a> {
        let model = self.buffer.model();
        let row_bytes = tile.width() as usize * model.bytes_per_pixel();
        let end = tile.offset() + (tile.height() as usize - 1) * tile.row_stride() + row_bytes;
        TileView {
            data: &self.buffer.samples()[tile.offset()..end],
            row_stride: tile.row_stride(),
            row_bytes,
            min_x: tile.min_x(),
            min_y: tile.min_y(),
            width: tile.width(),
            height: tile.height(),
            bands: model.bands,
            bytes_per_sample: model.bytes_per_sample(),
        }
    }
}

impl fmt::Debug for TiledRaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TiledRaster({}x{}, {}x{} tiles of {}x{})",
            self.buffer.width(),
            self.buffer.height(),
            self.grid.tiles_across,
            self.grid.tiles_down,
            self.grid.tile_width,
            self.grid.tile_height
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorModel, SampleDepth, SampleModel};
    use alloc::format;
    use alloc::vec::Vec;

    fn counting(len: usize) -> Vec<u8> {
        (0..len).map(|i| i as u8).collect()
    }

    fn gray(width: u32, height: u32) -> RasterBuffer {
        let model = SampleModel::pixel_interleaved(ColorModel::Gray);
        RasterBuffer::from_vec(counting((width * height) as usize), width, height, model).unwrap()
    }

    #[test]
    fn strips_partition_exactly() {
        let tiled = TiledRaster::strips(gray(4, 6), 2).unwrap();
        assert_eq!(tiled.tile_count(), 3);
        assert_eq!(tiled.grid().tiles_across(), 1);
        assert_eq!(tiled.grid().tiles_down(), 3);
        assert_eq!(tiled.grid().tile_width(), 4);
        assert_eq!(tiled.grid().tile_height(), 2);

        let mins: Vec<i32> = tiled.tiles().map(|t| t.min_y()).collect();
        assert_eq!(mins, [0, 2, 4]);
        for view in tiled.tiles() {
            assert_eq!(view.width(), 4);
            assert_eq!(view.height(), 2);
        }
    }

    #[test]
    fn strip_rows_match_buffer_rows() {
        let buffer = gray(4, 6);
        let expected: Vec<Vec<u8>> = (0..6).map(|y| buffer.row(y).to_vec()).collect();
        let tiled = TiledRaster::strips(buffer, 3).unwrap();
        for y in 0..6 {
            assert_eq!(tiled.row(y), expected[y as usize].as_slice(), "row {y}");
        }
        // Row 4 belongs to the second strip, local row 1.
        assert_eq!(tiled.tile(0, 1).row(1), expected[4].as_slice());
    }

    #[test]
    fn two_dimensional_grid() {
        let model = SampleModel::pixel_interleaved(ColorModel::Rgb);
        let buffer = RasterBuffer::from_vec(counting(48), 4, 4, model).unwrap();
        let expected: Vec<Vec<u8>> = (0..4)
            .flat_map(|y| {
                (0..4).flat_map(move |x| (0..3).map(move |b| (x, y, b)))
            })
            .map(|(x, y, b)| buffer.sample_bytes(x, y, b).to_vec())
            .collect();

        let tiled = TiledRaster::tiled(buffer, 2, 2).unwrap();
        assert_eq!(tiled.tile_count(), 4);
        assert_eq!(tiled.grid().tile(1, 1).min_x(), 2);
        assert_eq!(tiled.grid().tile(1, 1).min_y(), 2);

        let mut i = 0;
        for y in 0..4 {
            for x in 0..4 {
                for b in 0..3 {
                    assert_eq!(tiled.sample_bytes(x, y, b), expected[i].as_slice());
                    i += 1;
                }
            }
        }
    }

    #[test]
    fn unaligned_grid_rejected() {
        let err = TiledRaster::strips(gray(4, 5), 2).unwrap_err();
        assert_eq!(
            err,
            GridError::UnalignedGrid {
                width: 4,
                height: 5,
                tile_width: 4,
                tile_height: 2
            }
        );
    }

    #[test]
    fn empty_or_oversized_tiles_rejected() {
        let err = TiledRaster::strips(gray(4, 4), 0).unwrap_err();
        assert!(matches!(err, GridError::InvalidTileSize { .. }));

        let err = TiledRaster::strips(gray(4, 4), 8).unwrap_err();
        assert!(matches!(err, GridError::InvalidTileSize { .. }));
    }

    #[test]
    fn planar_multiband_rejected() {
        let model = SampleModel::band_sequential(3, SampleDepth::U8);
        let buffer = RasterBuffer::from_vec(counting(48), 4, 4, model).unwrap();
        let err = TiledRaster::strips(buffer, 2).unwrap_err();
        assert_eq!(err, GridError::InterleaveRequired);
    }

    #[test]
    fn planar_single_band_accepted() {
        let model = SampleModel::band_sequential(1, SampleDepth::U16);
        let buffer = RasterBuffer::from_vec(counting(48), 4, 6, model).unwrap();
        let expected_row: Vec<u8> = buffer.row(3).to_vec();
        let tiled = TiledRaster::strips(buffer, 2).unwrap();
        assert_eq!(tiled.tile_count(), 3);
        assert_eq!(tiled.row(3), expected_row.as_slice());
        assert_eq!(tiled.tile(0, 1).sample_bytes(2, 1, 0), &[28, 29]);
    }

    #[test]
    fn child_rows_alias_parent() {
        let tiled = TiledRaster::strips(gray(4, 8), 4).unwrap();
        let parent = *tiled.grid().tile(0, 1);
        let child = parent.child_rows(6, 2);
        assert_eq!(child.min_y(), 6);
        assert_eq!(child.height(), 2);
        assert_eq!(child.width(), 4);

        // Resolve the child against the same raster via a grid of its own.
        let regrid = TiledRaster::from_parts(
            tiled.buffer().clone(),
            TileGrid::from_tiles(4, 2, 1, 1, alloc::vec![child]),
        );
        assert_eq!(regrid.tile(0, 0).row(0), tiled.row(6));
        assert_eq!(regrid.tile(0, 0).row(1), tiled.row(7));
    }

    #[test]
    #[should_panic(expected = "outside tile rows")]
    fn child_rows_out_of_bounds() {
        let tiled = TiledRaster::strips(gray(4, 8), 4).unwrap();
        let parent = *tiled.grid().tile(0, 0);
        let _ = parent.child_rows(2, 4);
    }

    #[test]
    fn tile_origin_label() {
        let tiled = TiledRaster::strips(gray(4, 4), 2).unwrap().with_tile_origin(0, 3);
        assert_eq!(tiled.grid().tile_min_x(), 0);
        assert_eq!(tiled.grid().tile_min_y(), 3);
    }

    #[test]
    fn pixel_origin_offsets_tile_rectangles() {
        let buffer = gray(4, 4).with_origin(10, 20);
        let tiled = TiledRaster::strips(buffer, 2).unwrap();
        let view = tiled.tile(0, 1);
        assert_eq!((view.min_x(), view.min_y()), (10, 22));
    }

    #[test]
    fn view_region_surface() {
        let tiled = TiledRaster::strips(gray(4, 4), 2).unwrap();
        let view = tiled.tile(0, 1);
        let region: &dyn SampleRegion = &view;
        assert_eq!(region.min_y(), 2);
        assert_eq!(region.bands(), 1);
        assert_eq!(region.sample_bytes(3, 0, 0), &[11]);
    }

    #[test]
    fn debug_and_display_formats() {
        let tiled = TiledRaster::strips(gray(4, 6), 2).unwrap();
        assert_eq!(format!("{tiled:?}"), "TiledRaster(4x6, 1x3 tiles of 4x2)");
        assert_eq!(format!("{:?}", tiled.grid()), "TileGrid(1x3 tiles of 4x2)");
        assert_eq!(format!("{:?}", tiled.tile(0, 2)), "TileView(4x2 @ (0, 4))");

        let msg = format!(
            "{}",
            GridError::UnalignedGrid {
                width: 4,
                height: 5,
                tile_width: 4,
                tile_height: 2
            }
        );
        assert!(msg.contains("whole multiple"));
        let msg = format!("{}", GridError::InterleaveRequired);
        assert!(msg.contains("pixel interleave"));
    }
}
