use glam::{IVec3, UVec3};
use voxdraw_codec::codec::{corner_expansion, VertexFields};
use voxdraw_core::constants::{FACE_COUNT, QUAD_CORNERS};
use voxdraw_core::face::Face;
use voxdraw_core::types::{FormatVersion, SlotId};

/// Index pattern of one quad over corners (0,0) (1,0) (0,1) (1,1).
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 1, 3];

/// One registered draw range: a chunk face (or whole chunk) that shares a
/// single placement entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkMeshBatch {
    /// Placement slot the decoder resolves for this draw.
    pub slot: SlotId,
    /// First index in the shared index buffer.
    pub first_index: u32,
    pub index_count: u32,
    /// Added to every index; face-local indices start at 0.
    pub base_vertex: i32,
    pub lod_level: u32,
}

/// Mesher output for one face direction of a chunk.
/// Indices are local to `vertices`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceMesh {
    pub vertices: Vec<VertexFields>,
    pub indices: Vec<u32>,
}

impl FaceMesh {
    /// Append a quad given its four corners in corner-id order.
    pub fn push_quad(&mut self, corners: [VertexFields; QUAD_CORNERS as usize]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / QUAD_CORNERS as usize
    }
}

/// Mesher output for one chunk at one LOD, split per face so every face
/// can be drawn (or culled) as its own batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkMesh {
    /// World-space origin of the chunk, in voxels.
    pub offset: IVec3,
    /// Also written as each CornerBit vertex's LOD tag, unclamped, so a
    /// level past the 2-bit field fails at encode. Legacy vertices carry 0.
    pub lod_level: u32,
    /// Indexed by face id.
    pub faces: [FaceMesh; FACE_COUNT],
}

impl ChunkMesh {
    pub fn new(offset: IVec3, lod_level: u32) -> Self {
        Self {
            offset,
            lod_level,
            faces: Default::default(),
        }
    }

    /// Emit the quad covering `face` of the voxel at `voxel`.
    ///
    /// Legacy vertices keep the voxel coordinate and rely on corner
    /// expansion at decode time; CornerBit vertices carry the lattice
    /// position of the corner itself.
    pub fn push_voxel_face(&mut self, version: FormatVersion, voxel: UVec3, face: Face, tile: u8) {
        let lod = match version {
            FormatVersion::Legacy => 0,
            FormatVersion::CornerBit => u8::try_from(self.lod_level).unwrap_or(u8::MAX),
        };
        let corners = [0u8, 1, 2, 3].map(|corner| {
            let local = match version {
                FormatVersion::Legacy => voxel,
                FormatVersion::CornerBit => voxel + corner_expansion(face.id(), corner as u32),
            };
            VertexFields::new(corner, local, face, tile).with_lod(lod)
        });
        self.faces[face as usize].push_quad(corners);
    }

    pub fn face(&self, face: Face) -> &FaceMesh {
        &self.faces[face as usize]
    }

    pub fn vertex_count(&self) -> usize {
        self.faces.iter().map(|f| f.vertices.len()).sum()
    }

    pub fn index_count(&self) -> usize {
        self.faces.iter().map(|f| f.indices.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.iter().all(FaceMesh::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxdraw_codec::codec::encode;
    use voxdraw_core::error::DrawError;

    #[test]
    fn test_push_quad_offsets_indices() {
        let mut mesh = FaceMesh::default();
        let v = VertexFields::default();
        mesh.push_quad([v; 4]);
        mesh.push_quad([v; 4]);
        assert_eq!(mesh.quad_count(), 2);
        assert_eq!(&mesh.indices[..6], &[0, 1, 2, 2, 1, 3]);
        assert_eq!(&mesh.indices[6..], &[4, 5, 6, 6, 5, 7]);
    }

    #[test]
    fn test_voxel_face_goes_to_its_bucket() {
        let mut chunk = ChunkMesh::new(IVec3::ZERO, 0);
        chunk.push_voxel_face(FormatVersion::CornerBit, UVec3::new(1, 2, 3), Face::East, 4);
        chunk.push_voxel_face(FormatVersion::CornerBit, UVec3::new(1, 2, 3), Face::Up, 4);
        assert_eq!(chunk.face(Face::East).quad_count(), 1);
        assert_eq!(chunk.face(Face::Up).quad_count(), 1);
        assert!(chunk.face(Face::Down).is_empty());
        assert_eq!(chunk.vertex_count(), 8);
        assert_eq!(chunk.index_count(), 12);

        // Face 4 takes no step along x in the expansion table
        for v in &chunk.face(Face::East).vertices {
            assert_eq!(v.local.x, 1);
            assert_eq!(v.face, Face::East as u8);
        }
    }

    #[test]
    fn test_legacy_keeps_voxel_coordinate() {
        let mut chunk = ChunkMesh::new(IVec3::ZERO, 3);
        chunk.push_voxel_face(FormatVersion::Legacy, UVec3::new(5, 6, 7), Face::Up, 0);
        for (corner, v) in chunk.face(Face::Up).vertices.iter().enumerate() {
            assert_eq!(v.local, UVec3::new(5, 6, 7));
            assert_eq!(v.corner as usize, corner);
            // No LOD field on Legacy
            assert_eq!(v.lod, 0);
        }
    }

    #[test]
    fn test_lod_tag_past_field_fails_encode() {
        let mut chunk = ChunkMesh::new(IVec3::ZERO, 7);
        chunk.push_voxel_face(FormatVersion::CornerBit, UVec3::ZERO, Face::Down, 0);
        let vertices = &chunk.face(Face::Down).vertices;
        assert!(vertices.iter().all(|v| v.lod == 7));
        assert_eq!(
            encode(FormatVersion::CornerBit, &vertices[0]),
            Err(DrawError::OutOfRange { field: "lod_tag", value: 7, max: 3 })
        );

        let mut chunk = ChunkMesh::new(IVec3::ZERO, 3);
        chunk.push_voxel_face(FormatVersion::CornerBit, UVec3::ZERO, Face::Down, 0);
        let packed = encode(FormatVersion::CornerBit, &chunk.face(Face::Down).vertices[0]);
        assert!(packed.is_ok());
    }
}
