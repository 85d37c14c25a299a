use std::collections::HashMap;

use voxdraw_codec::codec::{PackedVertex, VertexCodec};
use voxdraw_core::config::DrawConfig;
use voxdraw_core::error::DrawError;
use voxdraw_core::face::ALL_FACES;
use voxdraw_core::types::{ChunkCoord, PlacementEntry, SlotId};

use crate::chunk::{ChunkMesh, ChunkMeshBatch};
use crate::heap::{GeometryHeap, HeapRegion};
use crate::placement::PlacementTable;

/// Everything one uploaded chunk holds in the shared buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkAllocation {
    pub vertex_region: HeapRegion,
    pub index_region: HeapRegion,
    pub lod_level: u32,
    /// One batch per non-empty face, in face id order.
    pub batches: Vec<ChunkMeshBatch>,
}

/// Owner of the shared vertex/index buffers and the placement table.
///
/// All mutation goes through `&mut self` between frames.
pub struct ChunkMeshStore {
    codec: VertexCodec,
    vertex_heap: GeometryHeap,
    index_heap: GeometryHeap,
    table: PlacementTable,
    vertices: Vec<PackedVertex>,
    indices: Vec<u32>,
    chunks: HashMap<ChunkCoord, ChunkAllocation>,
}

impl ChunkMeshStore {
    pub fn new(config: &DrawConfig) -> Result<Self, DrawError> {
        config.validate()?;
        let codec = VertexCodec::new(config.format, config.chunk_max_extent)?;
        log::info!(
            "Chunk mesh store: {:?} format, extent {}, {} vertices, {} indices, {} slots",
            config.format,
            config.chunk_max_extent,
            config.vertex_capacity,
            config.index_capacity,
            config.slot_capacity
        );
        Ok(Self {
            codec,
            vertex_heap: GeometryHeap::new("vertex", config.vertex_capacity),
            index_heap: GeometryHeap::new("index", config.index_capacity),
            table: PlacementTable::with_capacity(config.slot_capacity),
            vertices: Vec::new(),
            indices: Vec::new(),
            chunks: HashMap::new(),
        })
    }

    /// Encode and place a chunk mesh, replacing any previous upload of `coord`.
    ///
    /// Validation (encoding and index bounds) happens before anything is
    /// touched; on heap or table exhaustion the partial upload is rolled
    /// back and the chunk ends up unloaded.
    pub fn upload(
        &mut self,
        coord: ChunkCoord,
        mesh: &ChunkMesh,
    ) -> Result<&[ChunkMeshBatch], DrawError> {
        let mut packed = Vec::with_capacity(mesh.vertex_count());
        for face_mesh in &mesh.faces {
            let face_vertices = face_mesh.vertices.len() as u32;
            for &index in &face_mesh.indices {
                if index >= face_vertices {
                    return Err(DrawError::out_of_range(
                        "index",
                        index,
                        face_vertices.saturating_sub(1),
                    ));
                }
            }
            for fields in &face_mesh.vertices {
                packed.push(self.codec.encode(fields)?);
            }
        }

        self.unload(coord)?;

        let vertex_region = self.vertex_heap.alloc(packed.len() as u32)?;
        let index_region = match self.index_heap.alloc(mesh.index_count() as u32) {
            Ok(region) => region,
            Err(e) => {
                self.vertex_heap.free(vertex_region)?;
                return Err(e);
            }
        };

        write_at(&mut self.vertices, vertex_region.offset, &packed);
        let mut batches = Vec::new();
        let mut vertex_cursor = vertex_region.offset;
        let mut index_cursor = index_region.offset;
        for (face, face_mesh) in ALL_FACES.iter().zip(mesh.faces.iter()) {
            write_at(&mut self.indices, index_cursor, &face_mesh.indices);
            if !face_mesh.is_empty() {
                let entry = PlacementEntry::with_face(mesh.offset, *face);
                let slot = match self.table.register(entry) {
                    Ok(slot) => slot,
                    Err(e) => {
                        self.rollback(&batches, vertex_region, index_region)?;
                        return Err(e);
                    }
                };
                batches.push(ChunkMeshBatch {
                    slot,
                    first_index: index_cursor,
                    index_count: face_mesh.indices.len() as u32,
                    base_vertex: vertex_cursor as i32,
                    lod_level: mesh.lod_level,
                });
            }
            vertex_cursor += face_mesh.vertices.len() as u32;
            index_cursor += face_mesh.indices.len() as u32;
        }

        log::debug!(
            "Uploaded chunk {coord}: {} vertices at {}, {} indices at {}, {} batches",
            vertex_region.len,
            vertex_region.offset,
            index_region.len,
            index_region.offset,
            batches.len()
        );
        let allocation = self.chunks.entry(coord).or_insert(ChunkAllocation {
            vertex_region,
            index_region,
            lod_level: mesh.lod_level,
            batches,
        });
        Ok(&allocation.batches)
    }

    fn rollback(
        &mut self,
        batches: &[ChunkMeshBatch],
        vertex_region: HeapRegion,
        index_region: HeapRegion,
    ) -> Result<(), DrawError> {
        for batch in batches {
            self.table.release(batch.slot)?;
        }
        self.vertex_heap.free(vertex_region)?;
        self.index_heap.free(index_region)
    }

    /// Release a chunk's regions and slots. Returns whether it was loaded.
    pub fn unload(&mut self, coord: ChunkCoord) -> Result<bool, DrawError> {
        let Some(allocation) = self.chunks.remove(&coord) else {
            return Ok(false);
        };
        for batch in &allocation.batches {
            self.table.release(batch.slot)?;
        }
        self.vertex_heap.free(allocation.vertex_region)?;
        self.index_heap.free(allocation.index_region)?;
        log::debug!("Unloaded chunk {coord}");
        Ok(true)
    }

    /// Drop every chunk, region and slot in one step.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.table.clear();
        self.vertex_heap.clear();
        self.index_heap.clear();
        self.vertices.clear();
        self.indices.clear();
        log::debug!("Cleared chunk mesh store");
    }

    /// Batches of the given chunks, skipping chunks that are not loaded.
    pub fn batches_for<'a, I>(&self, coords: I) -> Vec<ChunkMeshBatch>
    where
        I: IntoIterator<Item = &'a ChunkCoord>,
    {
        coords
            .into_iter()
            .filter_map(|coord| self.chunks.get(coord))
            .flat_map(|a| a.batches.iter().copied())
            .collect()
    }

    /// Batches of every loaded chunk, ordered by slot.
    pub fn all_batches(&self) -> Vec<ChunkMeshBatch> {
        let mut batches: Vec<ChunkMeshBatch> = self
            .chunks
            .values()
            .flat_map(|a| a.batches.iter().copied())
            .collect();
        batches.sort_by_key(|b| b.slot);
        batches
    }

    pub fn allocation(&self, coord: ChunkCoord) -> Option<&ChunkAllocation> {
        self.chunks.get(&coord)
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn slot_owner(&self, slot: SlotId) -> Option<ChunkCoord> {
        self.chunks
            .iter()
            .find(|(_, a)| a.batches.iter().any(|b| b.slot == slot))
            .map(|(coord, _)| *coord)
    }

    pub fn table(&self) -> &PlacementTable {
        &self.table
    }

    /// Mutable table access for the upload step that clears its dirty flag.
    pub(crate) fn table_mut(&mut self) -> &mut PlacementTable {
        &mut self.table
    }

    pub fn vertex_heap(&self) -> &GeometryHeap {
        &self.vertex_heap
    }

    pub fn index_heap(&self) -> &GeometryHeap {
        &self.index_heap
    }

    pub fn vertices(&self) -> &[PackedVertex] {
        &self.vertices
    }

    /// Vertex buffer contents as raw words.
    pub fn vertex_words(&self) -> &[u32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer contents. Indices are face-local; commands add `base_vertex`.
    pub fn index_data(&self) -> &[u32] {
        &self.indices
    }
}

/// Copy `data` into `buf` at `offset`, growing `buf` with zeroes as needed.
fn write_at<T: Copy + Default>(buf: &mut Vec<T>, offset: u32, data: &[T]) {
    let start = offset as usize;
    let end = start + data.len();
    if buf.len() < end {
        buf.resize(end, T::default());
    }
    buf[start..end].copy_from_slice(data);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec3, UVec3};
    use voxdraw_codec::codec::VertexFields;
    use voxdraw_core::config::ConfigError;
    use voxdraw_core::face::Face;
    use voxdraw_core::types::FormatVersion;

    fn config() -> DrawConfig {
        DrawConfig {
            chunk_max_extent: 16,
            slot_capacity: 32,
            vertex_capacity: 1024,
            index_capacity: 1536,
            ..Default::default()
        }
    }

    fn cube_mesh(offset: IVec3, lod_level: u32) -> ChunkMesh {
        let mut mesh = ChunkMesh::new(offset, lod_level);
        for face in ALL_FACES {
            mesh.push_voxel_face(FormatVersion::CornerBit, UVec3::new(1, 1, 1), face, 3);
        }
        mesh
    }

    #[test]
    fn test_upload_registers_one_slot_per_face() {
        let mut store = ChunkMeshStore::new(&config()).expect("valid config");
        let coord = IVec3::new(1, 0, 0);
        let batches = store
            .upload(coord, &cube_mesh(IVec3::new(16, 0, 0), 0))
            .expect("fits")
            .to_vec();
        assert_eq!(batches.len(), 6);
        assert_eq!(store.table().live_count(), 6);
        for (i, batch) in batches.iter().enumerate() {
            assert_eq!(batch.index_count, 6);
            assert_eq!(batch.first_index, i as u32 * 6);
            assert_eq!(batch.base_vertex, i as i32 * 4);
            let entry = store.table().get(batch.slot).expect("registered");
            assert_eq!(entry.offset, IVec3::new(16, 0, 0));
            assert_eq!(entry.face, Face::from_id(i as u32));
        }
        assert_eq!(store.vertex_words().len(), 24);
        assert_eq!(store.index_data().len(), 36);
        assert_eq!(store.slot_owner(batches[3].slot), Some(coord));
    }

    #[test]
    fn test_empty_faces_get_no_batch() {
        let mut store = ChunkMeshStore::new(&config()).expect("valid config");
        let mut mesh = ChunkMesh::new(IVec3::ZERO, 0);
        mesh.push_voxel_face(FormatVersion::CornerBit, UVec3::ZERO, Face::Up, 0);
        mesh.push_voxel_face(FormatVersion::CornerBit, UVec3::ZERO, Face::West, 0);
        let batches = store.upload(IVec3::ZERO, &mesh).expect("fits").to_vec();
        assert_eq!(batches.len(), 2);
        let faces: Vec<_> = batches
            .iter()
            .map(|b| store.table().get(b.slot).and_then(|e| e.face))
            .collect();
        assert_eq!(faces, vec![Some(Face::Up), Some(Face::West)]);
        // West quad follows the Up quad in both buffers
        assert_eq!(batches[1].base_vertex, 4);
        assert_eq!(batches[1].first_index, 6);
    }

    #[test]
    fn test_reupload_replaces_and_unload_frees() {
        let mut store = ChunkMeshStore::new(&config()).expect("valid config");
        let coord = IVec3::ZERO;
        store.upload(coord, &cube_mesh(IVec3::ZERO, 0)).expect("fits");
        store.upload(coord, &cube_mesh(IVec3::ZERO, 1)).expect("fits");
        assert_eq!(store.loaded_count(), 1);
        assert_eq!(store.table().live_count(), 6);
        assert_eq!(store.vertex_heap().used(), 24);
        assert_eq!(store.allocation(coord).expect("loaded").lod_level, 1);

        assert_eq!(store.unload(coord), Ok(true));
        assert_eq!(store.unload(coord), Ok(false));
        assert_eq!(store.table().live_count(), 0);
        assert_eq!(store.vertex_heap().used(), 0);
        assert_eq!(store.index_heap().used(), 0);
    }

    #[test]
    fn test_invalid_mesh_leaves_store_untouched() {
        let mut store = ChunkMeshStore::new(&config()).expect("valid config");
        store.upload(IVec3::ZERO, &cube_mesh(IVec3::ZERO, 0)).expect("fits");

        // Coordinate past the 16-voxel extent
        let mut bad = ChunkMesh::new(IVec3::ZERO, 0);
        bad.faces[0].push_quad([VertexFields::new(0, UVec3::new(17, 0, 0), Face::Down, 0); 4]);
        assert!(matches!(
            store.upload(IVec3::ZERO, &bad),
            Err(DrawError::OutOfRange { field: "local_x", .. })
        ));

        // Index past the face's vertices
        let mut bad = ChunkMesh::new(IVec3::ZERO, 0);
        bad.faces[1].vertices.push(VertexFields::default());
        bad.faces[1].indices.extend([0, 1, 0]);
        assert!(matches!(
            store.upload(IVec3::ZERO, &bad),
            Err(DrawError::OutOfRange { field: "index", value: 1, max: 0 })
        ));

        // LOD level past the 2-bit tag
        assert_eq!(
            store.upload(IVec3::ZERO, &cube_mesh(IVec3::ZERO, 7)).err(),
            Some(DrawError::OutOfRange { field: "lod_tag", value: 7, max: 3 })
        );

        assert!(store.is_loaded(IVec3::ZERO));
        assert_eq!(store.table().live_count(), 6);
    }

    #[test]
    fn test_heap_exhaustion_rolls_back() {
        let mut small = config();
        small.vertex_capacity = 30;
        let mut store = ChunkMeshStore::new(&small).expect("valid config");
        store.upload(IVec3::ZERO, &cube_mesh(IVec3::ZERO, 0)).expect("fits");
        let result = store.upload(IVec3::X, &cube_mesh(IVec3::new(16, 0, 0), 0));
        assert!(matches!(result, Err(DrawError::HeapExhausted { heap: "vertex", .. })));
        assert!(!store.is_loaded(IVec3::X));
        assert_eq!(store.index_heap().used(), 36);
    }

    #[test]
    fn test_table_full_rolls_back() {
        let mut small = config();
        small.slot_capacity = 8;
        let mut store = ChunkMeshStore::new(&small).expect("valid config");
        store.upload(IVec3::ZERO, &cube_mesh(IVec3::ZERO, 0)).expect("fits");
        let result = store.upload(IVec3::X, &cube_mesh(IVec3::new(16, 0, 0), 0));
        assert_eq!(result.err(), Some(DrawError::TableFull { capacity: 8 }));
        assert_eq!(store.table().live_count(), 6);
        assert_eq!(store.vertex_heap().used(), 24);
        assert_eq!(store.index_heap().used(), 36);
    }

    #[test]
    fn test_slots_reused_after_unload() {
        let mut store = ChunkMeshStore::new(&config()).expect("valid config");
        store.upload(IVec3::ZERO, &cube_mesh(IVec3::ZERO, 0)).expect("fits");
        store.upload(IVec3::X, &cube_mesh(IVec3::new(16, 0, 0), 0)).expect("fits");
        store.unload(IVec3::ZERO).expect("consistent");
        let batches = store
            .upload(IVec3::Z, &cube_mesh(IVec3::new(0, 0, 16), 0))
            .expect("fits")
            .to_vec();
        let slots: Vec<u32> = batches.iter().map(|b| b.slot.0).collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 4, 5]);
        // Reused vertex region too
        assert_eq!(batches[0].base_vertex, 0);
    }

    #[test]
    fn test_batches_for_visible_set() {
        let mut store = ChunkMeshStore::new(&config()).expect("valid config");
        store.upload(IVec3::ZERO, &cube_mesh(IVec3::ZERO, 0)).expect("fits");
        store.upload(IVec3::X, &cube_mesh(IVec3::new(16, 0, 0), 1)).expect("fits");
        let visible = store.batches_for(&[IVec3::X, IVec3::new(9, 9, 9)]);
        assert_eq!(visible.len(), 6);
        assert!(visible.iter().all(|b| b.lod_level == 1));
        assert_eq!(store.all_batches().len(), 12);
    }

    #[test]
    fn test_clear_frees_all_storage() {
        let mut store = ChunkMeshStore::new(&config()).expect("valid config");
        store.upload(IVec3::ZERO, &cube_mesh(IVec3::ZERO, 0)).expect("fits");
        store.upload(IVec3::X, &cube_mesh(IVec3::new(16, 0, 0), 0)).expect("fits");
        store.clear();
        assert_eq!(store.loaded_count(), 0);
        assert_eq!(store.table().live_count(), 0);
        assert_eq!(store.vertex_heap().used(), 0);
        assert_eq!(store.index_heap().used(), 0);
        assert!(store.vertex_words().is_empty());
        assert!(store.index_data().is_empty());
        assert!(store.all_batches().is_empty());

        // Storage is reusable from offset 0 afterwards
        let batches = store
            .upload(IVec3::Z, &cube_mesh(IVec3::new(0, 0, 16), 0))
            .expect("fits")
            .to_vec();
        assert_eq!(batches[0].slot, SlotId(0));
        assert_eq!(batches[0].base_vertex, 0);
        assert_eq!(batches[0].first_index, 0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut zero_slots = config();
        zero_slots.slot_capacity = 0;
        assert!(matches!(
            ChunkMeshStore::new(&zero_slots),
            Err(DrawError::Config(ConfigError::Invalid(_)))
        ));
        let mut zero_indices = config();
        zero_indices.index_capacity = 0;
        assert!(ChunkMeshStore::new(&zero_indices).is_err());
    }
}
