pub mod chunk;
pub mod draw;
pub mod heap;
pub mod index_map;
pub mod placement;
pub mod resolve;
pub mod store;

use glam::Vec3;
use voxdraw_codec::atlas::AtlasGrid;
use voxdraw_codec::codec::PackedVertex;
use voxdraw_codec::shade::{shade_vertex, ShadedVertex};
use voxdraw_codec::shader::chunk_draw_source;
use voxdraw_core::config::DrawConfig;
use voxdraw_core::error::DrawError;
use voxdraw_core::types::{ChunkCoord, GpuPlacement};

pub use chunk::{ChunkMesh, ChunkMeshBatch, FaceMesh};
pub use draw::{DrawCommand, DrawList, DrawListBuilder};
pub use heap::{GeometryHeap, HeapRegion};
pub use index_map::IndirectionMap;
pub use placement::PlacementTable;
pub use resolve::DrawResolver;
pub use store::{ChunkAllocation, ChunkMeshStore};

/// Primary public struct for the voxdraw-world crate.
/// Owns the chunk mesh store and builds one draw list per frame.
pub struct DrawWorld {
    config: DrawConfig,
    store: ChunkMeshStore,
    builder: DrawListBuilder,
    atlas: AtlasGrid,
}

impl DrawWorld {
    pub fn new(config: DrawConfig) -> Result<Self, DrawError> {
        let store = ChunkMeshStore::new(&config)?;
        let builder = DrawListBuilder::from_config(&config);
        let atlas = AtlasGrid::new(config.atlas_grid_size)?;
        Ok(Self {
            config,
            store,
            builder,
            atlas,
        })
    }

    /// Upload (or re-upload) a chunk mesh. Returns the number of batches.
    pub fn upload_chunk(
        &mut self,
        coord: ChunkCoord,
        mesh: &ChunkMesh,
    ) -> Result<usize, DrawError> {
        self.store.upload(coord, mesh).map(|batches| batches.len())
    }

    pub fn unload_chunk(&mut self, coord: ChunkCoord) -> Result<bool, DrawError> {
        self.store.unload(coord)
    }

    /// Unload every chunk, e.g. on teleport or world switch.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Placement buffer contents if the table changed since the last call.
    pub fn placement_upload(&mut self) -> Option<Vec<GpuPlacement>> {
        let table = self.store.table_mut();
        if !table.is_dirty() {
            return None;
        }
        let data = table.gpu_data();
        table.clear_dirty();
        Some(data)
    }

    /// Draw list for the chunks that survived culling this frame.
    pub fn build_frame(&self, visible: &[ChunkCoord], eye: Vec3) -> DrawList {
        let batches = self.store.batches_for(visible);
        self.builder.build(self.store.table(), &batches, eye)
    }

    /// Draw list for every loaded chunk.
    pub fn build_all(&self, eye: Vec3) -> DrawList {
        let batches = self.store.all_batches();
        self.builder.build(self.store.table(), &batches, eye)
    }

    /// Decode one vertex of `list` the way the vertex stage would.
    pub fn shade(&self, list: &DrawList, packed: PackedVertex, draw_index: u32) -> ShadedVertex {
        shade_vertex(
            self.config.format,
            packed,
            draw_index,
            &list.resolver(self.store.table()),
            &self.atlas,
        )
    }

    /// WGSL source for this world's vertex format and atlas.
    pub fn shader_source(&self) -> String {
        chunk_draw_source(self.config.format, &self.atlas)
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn store(&self) -> &ChunkMeshStore {
        &self.store
    }

    pub fn atlas(&self) -> &AtlasGrid {
        &self.atlas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec3, UVec3};
    use voxdraw_codec::shade::PlacementLookup;
    use voxdraw_core::config::ConfigError;
    use voxdraw_core::face::{Face, ALL_FACES};
    use voxdraw_core::types::{DrawOrder, FormatVersion, PlacementEntry, SlotId};

    #[test]
    fn test_three_chunk_indirection_scenario() {
        let mut table = PlacementTable::with_capacity(8);
        let slots: Vec<SlotId> = [(0, 0), (16, 0), (0, 16)]
            .into_iter()
            .map(|(x, z)| table.register(PlacementEntry::flat(x, z)).expect("slot"))
            .collect();
        assert_eq!(slots, vec![SlotId(0), SlotId(1), SlotId(2)]);

        let map = IndirectionMap::build([SlotId(2), SlotId(0), SlotId(1)]);
        let resolver = DrawResolver::new(&table, Some(&map));
        assert_eq!(resolver.placement(0).offset, IVec3::new(0, 0, 16));
        assert_eq!(resolver.placement(1).offset, IVec3::new(0, 0, 0));
        assert_eq!(resolver.placement(2).offset, IVec3::new(16, 0, 0));
    }

    fn single_quad(offset: IVec3, format: FormatVersion) -> ChunkMesh {
        let mut mesh = ChunkMesh::new(offset, 0);
        mesh.push_voxel_face(format, UVec3::new(2, 0, 3), Face::Up, 7);
        mesh
    }

    #[test]
    fn test_world_end_to_end_decode() {
        let config = DrawConfig {
            chunk_max_extent: 16,
            draw_order: DrawOrder::FrontToBack,
            ..Default::default()
        };
        let mut world = DrawWorld::new(config).expect("valid config");
        let coords = [IVec3::new(0, 0, 0), IVec3::new(1, 0, 0), IVec3::new(0, 0, 1)];
        for coord in coords {
            world
                .upload_chunk(coord, &single_quad(coord * 16, FormatVersion::CornerBit))
                .expect("fits");
        }

        let list = world.build_frame(&coords, Vec3::new(0.0, 8.0, 40.0));
        assert_eq!(list.draw_count(), 3);
        let map = list.index_map.as_ref().expect("index map mode");
        assert_eq!(map.gpu_data(), &[2, 0, 1]);

        // First vertex of the first draw lands in the chunk at z = 16
        let cmd = list.commands[0];
        let first = world.store().index_data()[cmd.first_index as usize];
        let packed = world.store().vertices()[(cmd.base_vertex as u32 + first) as usize];
        let v = world.shade(&list, packed, 0);
        assert_eq!(v.position, Vec3::new(2.0, 1.0, 19.0));
        assert_eq!(v.normal, Vec3::Y);
        assert_eq!(v.uv, world.atlas().tile_to_uv(7).expect("in range").origin);
    }

    #[test]
    fn test_formats_produce_same_world_quads() {
        let mut worlds = Vec::new();
        for format in [FormatVersion::Legacy, FormatVersion::CornerBit] {
            let config = DrawConfig {
                format,
                ..Default::default()
            };
            let mut world = DrawWorld::new(config).expect("valid config");
            let mut mesh = ChunkMesh::new(IVec3::new(32, 0, -32), 2);
            for face in ALL_FACES {
                mesh.push_voxel_face(format, UVec3::new(4, 5, 6), face, 1);
            }
            world.upload_chunk(IVec3::new(1, 0, -1), &mesh).expect("fits");
            worlds.push(world);
        }

        let positions: Vec<Vec<Vec3>> = worlds
            .iter()
            .map(|world| {
                let list = world.build_all(Vec3::ZERO);
                let mut out = Vec::new();
                for (draw, cmd) in list.commands.iter().enumerate() {
                    for i in 0..cmd.index_count {
                        let local = world.store().index_data()[(cmd.first_index + i) as usize];
                        let packed =
                            world.store().vertices()[(cmd.base_vertex as u32 + local) as usize];
                        out.push(world.shade(&list, packed, draw as u32).position);
                    }
                }
                out
            })
            .collect();
        assert_eq!(positions[0].len(), 36);
        assert_eq!(positions[0], positions[1]);
    }

    #[test]
    fn test_unloaded_chunk_leaves_draw_list() {
        let mut world = DrawWorld::new(DrawConfig::default()).expect("valid config");
        world
            .upload_chunk(IVec3::ZERO, &single_quad(IVec3::ZERO, FormatVersion::CornerBit))
            .expect("fits");
        assert_eq!(world.build_all(Vec3::ZERO).draw_count(), 1);
        assert_eq!(world.unload_chunk(IVec3::ZERO), Ok(true));
        let list = world.build_frame(&[IVec3::ZERO], Vec3::ZERO);
        assert_eq!(list.draw_count(), 0);
        assert!(list.issues.is_empty());
    }

    #[test]
    fn test_shader_source_follows_format() {
        let config = DrawConfig {
            format: FormatVersion::Legacy,
            ..Default::default()
        };
        let world = DrawWorld::new(config).expect("valid config");
        assert!(world.shader_source().contains("const FORMAT_TAG: u32 = 1u;"));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let bad = [
            DrawConfig {
                atlas_grid_size: 0,
                ..Default::default()
            },
            DrawConfig {
                atlas_grid_size: 70_000,
                ..Default::default()
            },
            DrawConfig {
                slot_capacity: 0,
                ..Default::default()
            },
            DrawConfig {
                vertex_capacity: 0,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(matches!(
                DrawWorld::new(config),
                Err(DrawError::Config(ConfigError::Invalid(_)))
            ));
        }
    }

    #[test]
    fn test_clear_and_placement_upload() {
        let mut world = DrawWorld::new(DrawConfig::default()).expect("valid config");
        assert_eq!(world.placement_upload(), None);
        for coord in [IVec3::ZERO, IVec3::X] {
            world
                .upload_chunk(coord, &single_quad(coord * 16, FormatVersion::CornerBit))
                .expect("fits");
        }
        let data = world.placement_upload().expect("table changed");
        assert_eq!(data.len(), 2);
        assert_eq!(data[1], PlacementEntry::with_face(IVec3::new(16, 0, 0), Face::Up).to_gpu());
        assert_eq!(world.placement_upload(), None);

        world.clear();
        assert_eq!(world.store().loaded_count(), 0);
        assert_eq!(world.build_all(Vec3::ZERO).draw_count(), 0);
        assert_eq!(world.placement_upload(), Some(Vec::new()));
        world
            .upload_chunk(IVec3::Z, &single_quad(IVec3::new(0, 0, 16), FormatVersion::CornerBit))
            .expect("fits");
        assert_eq!(world.store().allocation(IVec3::Z).expect("loaded").batches[0].slot, SlotId(0));
    }
}
