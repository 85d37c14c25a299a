//! Single source of truth for shared constants.
//! These values are used by both Rust and the generated WGSL preamble
//! (see `voxdraw_codec::shader`), so a change here changes both sides.

/// Default side length of a chunk in voxels.
pub const CHUNK_SIZE: u32 = 32;

/// Number of faces on a voxel (and entries in the normal table).
pub const FACE_COUNT: usize = 6;

/// Number of corners on a quad. Encoded in 2 bits.
pub const QUAD_CORNERS: u32 = 4;

/// Indices emitted per quad (two triangles).
pub const INDICES_PER_QUAD: u32 = 6;

/// Atlas image side length in pixels.
pub const ATLAS_SIZE_PX: u32 = 256;

/// Side length of one atlas tile in pixels.
pub const ATLAS_TILE_PX: u32 = 16;

/// Tiles per atlas axis (256 / 16 = 16, so 256 tiles total).
pub const ATLAS_GRID_TILES: u32 = ATLAS_SIZE_PX / ATLAS_TILE_PX;

/// Default number of placement slots (chunk-cache capacity).
/// 16 x 16 loaded chunks, one slot per face batch.
pub const MAX_PLACEMENT_SLOTS: u32 = 16 * 16 * FACE_COUNT as u32;

/// Default capacity of the shared vertex buffer, in packed vertices (64 MB).
pub const DEFAULT_VERTEX_CAPACITY: u32 = 16 * 1024 * 1024;

/// Default capacity of the shared index buffer, in u32 indices (32 MB).
pub const DEFAULT_INDEX_CAPACITY: u32 = 8 * 1024 * 1024;

/// Size in bytes of one packed vertex.
pub const PACKED_VERTEX_BYTES: u32 = 4;

/// Size in bytes of one GPU placement entry (std430: 4 x i32).
pub const PLACEMENT_ENTRY_BYTES: u32 = 16;

/// Size in bytes of one indirect draw command (5 draw words + 4 metadata words).
pub const DRAW_COMMAND_BYTES: u32 = 36;

/// Face value stored in a GPU placement entry that carries no face.
pub const NO_FACE: i32 = -1;
