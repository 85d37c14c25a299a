use glam::{UVec2, UVec3, Vec3};
use voxdraw_core::error::DrawError;
use voxdraw_core::face::{Face, FACE_NORMALS};
use voxdraw_core::layout::BitField;
use voxdraw_core::types::FormatVersion;

/// One packed quad vertex. The version it was packed with travels out of band.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedVertex(pub u32);

/// Unpacked fields of one quad vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VertexFields {
    /// Quad corner 0..4. Bit 0 selects u (x), bit 1 selects v (z).
    pub corner: u8,
    /// Local coordinate inside the chunk.
    pub local: UVec3,
    /// Wire face id. Ids 0..6 name a `Face`.
    pub face: u8,
    /// Atlas tile id.
    pub tile: u8,
    /// LOD class, debug coloring only. Always 0 on Legacy.
    pub lod: u8,
}

impl VertexFields {
    pub fn new(corner: u8, local: UVec3, face: Face, tile: u8) -> Self {
        Self {
            corner,
            local,
            face: face as u8,
            tile,
            lod: 0,
        }
    }

    pub fn with_lod(mut self, lod: u8) -> Self {
        self.lod = lod;
        self
    }
}

fn check(field: &'static str, bits: BitField, value: u32) -> Result<(), DrawError> {
    if bits.fits(value) {
        Ok(())
    } else {
        Err(DrawError::out_of_range(field, value, bits.max_value()))
    }
}

/// Pack vertex fields with the given format version.
///
/// Fails with `OutOfRange` if any field does not fit its bit width.
pub fn encode(version: FormatVersion, fields: &VertexFields) -> Result<PackedVertex, DrawError> {
    let layout = version.layout();
    check("corner", layout.corner, fields.corner as u32)?;
    check("local_x", layout.x, fields.local.x)?;
    check("local_y", layout.y, fields.local.y)?;
    check("local_z", layout.z, fields.local.z)?;
    check("face", layout.face, fields.face as u32)?;
    check("tile", layout.tile, fields.tile as u32)?;
    check("lod_tag", layout.lod, fields.lod as u32)?;

    let mut word = 0u32;
    word = layout.face.insert(word, fields.face as u32);
    word = layout.x.insert(word, fields.local.x);
    word = layout.y.insert(word, fields.local.y);
    word = layout.z.insert(word, fields.local.z);
    word = layout.tile.insert(word, fields.tile as u32);
    word = layout.corner.insert(word, fields.corner as u32);
    word = layout.lod.insert(word, fields.lod as u32);
    Ok(PackedVertex(word))
}

/// Unpack a vertex word. Total: any bit pattern yields some fields.
pub fn decode(version: FormatVersion, packed: PackedVertex) -> VertexFields {
    let layout = version.layout();
    let word = packed.0;
    VertexFields {
        corner: layout.corner.extract(word) as u8,
        local: UVec3::new(
            layout.x.extract(word),
            layout.y.extract(word),
            layout.z.extract(word),
        ),
        face: layout.face.extract(word) as u8,
        tile: layout.tile.extract(word) as u8,
        lod: layout.lod.extract(word) as u8,
    }
}

/// Encoder bound to one format version and chunk extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexCodec {
    version: FormatVersion,
    chunk_extent: u32,
}

impl VertexCodec {
    /// Fails if the chunk extent exceeds what the version can represent.
    pub fn new(version: FormatVersion, chunk_extent: u32) -> Result<Self, DrawError> {
        let max = version.max_chunk_extent();
        if chunk_extent == 0 || chunk_extent > max {
            return Err(DrawError::out_of_range("chunk_extent", chunk_extent, max));
        }
        Ok(Self {
            version,
            chunk_extent,
        })
    }

    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn chunk_extent(&self) -> u32 {
        self.chunk_extent
    }

    /// Encode, also bounding local coordinates by the chunk extent.
    pub fn encode(&self, fields: &VertexFields) -> Result<PackedVertex, DrawError> {
        let max = self.version.max_coordinate(self.chunk_extent);
        for (name, value) in [
            ("local_x", fields.local.x),
            ("local_y", fields.local.y),
            ("local_z", fields.local.z),
        ] {
            if value > max {
                return Err(DrawError::out_of_range(name, value, max));
            }
        }
        encode(self.version, fields)
    }

    pub fn decode(&self, packed: PackedVertex) -> VertexFields {
        decode(self.version, packed)
    }
}

/// Normal for a wire face id. Ids past the table give the zero vector.
pub fn face_normal(face_id: u32) -> Vec3 {
    FACE_NORMALS
        .get(face_id as usize)
        .copied()
        .unwrap_or(Vec3::ZERO)
}

/// In-quad (u, v) offset of a corner, each 0 or 1.
pub fn corner_offset(corner: u32) -> UVec2 {
    UVec2::new(corner & 1, (corner >> 1) & 1)
}

/// Legacy face-dependent corner expansion.
///
/// Starts from (u, 0, v) and swizzles/shifts per face. Faces 1, 3 and 5
/// take the +1 step on their axis while 0, 2 and 4 do not; the table is
/// kept exactly as the Legacy decoder has always applied it.
pub fn corner_expansion(face_id: u32, corner: u32) -> UVec3 {
    let uv = corner_offset(corner);
    let (u, v) = (uv.x, uv.y);
    match face_id {
        1 => UVec3::new(u, 1, v),
        2 => UVec3::new(u, v, 0),
        3 => UVec3::new(u, v, 1),
        4 => UVec3::new(0, u, v),
        5 => UVec3::new(1, u, v),
        _ => UVec3::new(u, 0, v),
    }
}
