//! CPU rendition of the per-vertex decode stage.
//!
//! Mirrors what the vertex shader does with a packed word: fetch the
//! placement for the current draw index, unpack local fields, rebuild the
//! world-space position, normal, atlas UV and LOD tint. Everything here is
//! total; stale data produces a wrong vertex, never a panic.

use glam::{Vec2, Vec3};
use voxdraw_core::types::{FormatVersion, PlacementEntry};

use crate::atlas::AtlasGrid;
use crate::codec::{corner_expansion, corner_offset, decode, face_normal, PackedVertex};
use crate::lod::lod_debug_color;

/// Resolves the placement for a draw index.
///
/// Stands in for the shader's indexed read of the placement buffer. It has
/// no error channel: implementations return some entry for any index.
pub trait PlacementLookup {
    fn placement(&self, draw_index: u32) -> PlacementEntry;
}

impl<F> PlacementLookup for F
where
    F: Fn(u32) -> PlacementEntry,
{
    fn placement(&self, draw_index: u32) -> PlacementEntry {
        self(draw_index)
    }
}

/// Decoded vertex as the rasterizer would see it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub lod_color: Vec3,
}

/// Decode one vertex of draw `draw_index`.
pub fn shade_vertex<L: PlacementLookup + ?Sized>(
    version: FormatVersion,
    packed: PackedVertex,
    draw_index: u32,
    lookup: &L,
    atlas: &AtlasGrid,
) -> ShadedVertex {
    let fields = decode(version, packed);
    let placement = lookup.placement(draw_index);

    let local = match version {
        FormatVersion::Legacy => {
            fields.local + corner_expansion(fields.face as u32, fields.corner as u32)
        }
        FormatVersion::CornerBit => fields.local,
    };
    let position = local.as_vec3() + placement.offset.as_vec3();

    let corner_uv = corner_offset(fields.corner as u32).as_vec2();
    let uv = atlas
        .tile_to_uv_unchecked(fields.tile as u32)
        .lerp(corner_uv);

    ShadedVertex {
        position,
        normal: face_normal(fields.face as u32),
        uv,
        lod_color: lod_debug_color(fields.lod as u32),
    }
}
