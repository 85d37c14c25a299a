use glam::Vec2;
use voxdraw_core::constants::ATLAS_GRID_TILES;
use voxdraw_core::error::DrawError;

/// Normalized UV rectangle of one atlas tile.
///
/// Stored as two corners so neighboring tiles share edges bit for bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub origin: Vec2,
    pub end: Vec2,
}

impl UvRect {
    /// Point inside the rectangle for in-quad coordinates in [0, 1].
    /// Exact at the corners.
    pub fn lerp(&self, uv: Vec2) -> Vec2 {
        self.origin * (Vec2::ONE - uv) + self.end * uv
    }

    pub fn size(&self) -> Vec2 {
        self.end - self.origin
    }

    pub fn max(&self) -> Vec2 {
        self.end
    }
}

/// Square grid atlas addressed by tile id, row-major from the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasGrid {
    tiles_per_axis: u32,
}

impl Default for AtlasGrid {
    fn default() -> Self {
        Self {
            tiles_per_axis: ATLAS_GRID_TILES,
        }
    }
}

impl AtlasGrid {
    /// Fails unless `tiles_per_axis` is non-zero and its square fits a u32.
    pub fn new(tiles_per_axis: u32) -> Result<Self, DrawError> {
        match tiles_per_axis.checked_mul(tiles_per_axis) {
            Some(count) if count > 0 => Ok(Self { tiles_per_axis }),
            _ => Err(DrawError::out_of_range(
                "atlas_grid_size",
                tiles_per_axis,
                u16::MAX as u32,
            )),
        }
    }

    pub fn tiles_per_axis(&self) -> u32 {
        self.tiles_per_axis
    }

    /// Number of addressable tiles (grid squared).
    pub fn tile_count(&self) -> u32 {
        self.tiles_per_axis * self.tiles_per_axis
    }

    /// UV rectangle of `tile`. Fails for ids outside the grid.
    pub fn tile_to_uv(&self, tile: u32) -> Result<UvRect, DrawError> {
        let count = self.tile_count();
        if tile >= count {
            return Err(DrawError::out_of_range("tile", tile, count - 1));
        }
        Ok(self.tile_to_uv_unchecked(tile))
    }

    /// Closed-form rectangle with no domain check. Ids past the grid land
    /// below the unit square; the decoder relies on this never panicking.
    pub fn tile_to_uv_unchecked(&self, tile: u32) -> UvRect {
        let n = self.tiles_per_axis as f32;
        let col = tile % self.tiles_per_axis;
        let row = tile / self.tiles_per_axis;
        UvRect {
            origin: Vec2::new(col as f32 / n, row as f32 / n),
            end: Vec2::new((col as f32 + 1.0) / n, (row as f32 + 1.0) / n),
        }
    }
}
