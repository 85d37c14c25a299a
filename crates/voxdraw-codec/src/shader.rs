//! WGSL source composition.
//!
//! The decoder's bit positions, normals and LOD colors are injected as a
//! constants preamble generated from the same tables the encoder uses, so
//! the shader never carries its own copy of the layout.

use std::fmt::Write;

use glam::Vec3;
use voxdraw_core::face::FACE_NORMALS;
use voxdraw_core::layout::BitField;
use voxdraw_core::types::FormatVersion;

use crate::atlas::AtlasGrid;
use crate::lod::{DEFAULT_LOD_COLOR, LOD_COLORS};

const CHUNK_DRAW_WGSL: &str = include_str!("../../../shaders/chunk_draw.wgsl");

fn vec3_literal(v: Vec3) -> String {
    format!("vec3<f32>({:?}, {:?}, {:?})", v.x, v.y, v.z)
}

fn push_field(out: &mut String, name: &str, field: BitField) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "const {name}_SHIFT: u32 = {}u;", field.shift);
    let _ = writeln!(out, "const {name}_MASK: u32 = {}u;", field.mask());
}

/// Constants preamble for one format version and atlas grid.
pub fn wgsl_preamble(version: FormatVersion, atlas: &AtlasGrid) -> String {
    let layout = version.layout();
    let mut out = String::new();
    let _ = writeln!(out, "const FORMAT_TAG: u32 = {}u;", version.tag());
    let _ = writeln!(
        out,
        "const LEGACY_CORNER_EXPANSION: bool = {};",
        version == FormatVersion::Legacy
    );
    push_field(&mut out, "FACE", layout.face);
    push_field(&mut out, "X", layout.x);
    push_field(&mut out, "Y", layout.y);
    push_field(&mut out, "Z", layout.z);
    push_field(&mut out, "TILE", layout.tile);
    push_field(&mut out, "CORNER", layout.corner);
    push_field(&mut out, "LOD", layout.lod);
    let _ = writeln!(
        out,
        "const ATLAS_GRID_TILES: u32 = {}u;",
        atlas.tiles_per_axis()
    );

    let normals: Vec<String> = FACE_NORMALS.iter().map(|n| vec3_literal(*n)).collect();
    let _ = writeln!(
        out,
        "const FACE_NORMALS = array<vec3<f32>, {}>({});",
        normals.len(),
        normals.join(", ")
    );
    let colors: Vec<String> = LOD_COLORS.iter().map(|c| vec3_literal(*c)).collect();
    let _ = writeln!(
        out,
        "const LOD_COLORS = array<vec3<f32>, {}>({});",
        colors.len(),
        colors.join(", ")
    );
    let _ = writeln!(
        out,
        "const DEFAULT_LOD_COLOR: vec3<f32> = {};",
        vec3_literal(DEFAULT_LOD_COLOR)
    );
    out
}

/// Full chunk draw shader: preamble followed by the decode stage.
pub fn chunk_draw_source(version: FormatVersion, atlas: &AtlasGrid) -> String {
    format!("{}\n{CHUNK_DRAW_WGSL}", wgsl_preamble(version, atlas))
}
