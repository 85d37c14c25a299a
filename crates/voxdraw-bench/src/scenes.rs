use glam::{IVec3, UVec3};
use voxdraw_core::constants::CHUNK_SIZE;
use voxdraw_core::face::Face;
use voxdraw_core::types::{ChunkCoord, DrawOrder, FormatVersion};
use voxdraw_world::ChunkMesh;

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    /// Chunks per horizontal axis. The scene is a flat square of chunks.
    pub grid_side: u32,
    /// Tallest terrain column, in voxels.
    pub max_height: u32,
    pub format: FormatVersion,
    pub use_index_map: bool,
    pub draw_order: DrawOrder,
    pub camera_position: [f32; 3],
}

/// Return the standard suite of benchmark scenes (16 to 256 chunks).
pub fn standard_scenes() -> Vec<SceneConfig> {
    let center = |side: u32| (side * CHUNK_SIZE) as f32 / 2.0;

    vec![
        SceneConfig {
            name: "4x4",
            grid_side: 4,
            max_height: 16,
            format: FormatVersion::CornerBit,
            use_index_map: true,
            draw_order: DrawOrder::FrontToBack,
            camera_position: [center(4), 48.0, center(4)],
        },
        SceneConfig {
            name: "8x8",
            grid_side: 8,
            max_height: 16,
            format: FormatVersion::CornerBit,
            use_index_map: true,
            draw_order: DrawOrder::FrontToBack,
            camera_position: [center(8), 48.0, center(8)],
        },
        SceneConfig {
            name: "16x16",
            grid_side: 16,
            max_height: 24,
            format: FormatVersion::CornerBit,
            use_index_map: true,
            draw_order: DrawOrder::FrontToBack,
            camera_position: [center(16), 64.0, center(16)],
        },
        SceneConfig {
            name: "16x16-direct",
            grid_side: 16,
            max_height: 24,
            format: FormatVersion::CornerBit,
            use_index_map: false,
            draw_order: DrawOrder::Submission,
            camera_position: [center(16), 64.0, center(16)],
        },
        SceneConfig {
            name: "16x16-legacy",
            grid_side: 16,
            max_height: 24,
            format: FormatVersion::Legacy,
            use_index_map: true,
            draw_order: DrawOrder::FrontToBack,
            camera_position: [center(16), 64.0, center(16)],
        },
    ]
}

/// Chunk coordinates of a scene, row by row.
pub fn scene_coords(config: &SceneConfig) -> Vec<ChunkCoord> {
    let side = config.grid_side as i32;
    (0..side)
        .flat_map(|z| (0..side).map(move |x| IVec3::new(x, 0, z)))
        .collect()
}

/// Deterministic column height in `1..=max_height`, constant over 4x4 blocks.
fn column_height(chunk_index: u32, x: u32, z: u32, max_height: u32) -> u32 {
    let hash = (chunk_index as usize).wrapping_mul(31337)
        ^ ((x / 4) as usize).wrapping_mul(7919)
        ^ ((z / 4) as usize).wrapping_mul(104_729);
    1 + (hash % max_height.max(1) as usize) as u32
}

/// Generate a heightmap terrain mesh for one chunk.
///
/// Emits the top face of every column and the side faces exposed by a
/// lower neighbor. Columns past the chunk border count as empty.
pub fn generate_bench_mesh(
    chunk_index: u32,
    coord: ChunkCoord,
    max_height: u32,
    version: FormatVersion,
) -> ChunkMesh {
    let extent = CHUNK_SIZE;
    let max_height = max_height.min(extent);
    let mut mesh = ChunkMesh::new(coord * extent as i32, 0);

    let height = |x: i32, z: i32| -> u32 {
        if x < 0 || z < 0 || x >= extent as i32 || z >= extent as i32 {
            0
        } else {
            column_height(chunk_index, x as u32, z as u32, max_height)
        }
    };

    for z in 0..extent {
        for x in 0..extent {
            let h = height(x as i32, z as i32);
            let tile = ((x + z + chunk_index) % 16) as u8;
            mesh.push_voxel_face(version, UVec3::new(x, h - 1, z), Face::Up, tile);

            for face in [Face::South, Face::North, Face::East, Face::West] {
                let step = face.offset();
                let neighbor = height(x as i32 + step.x, z as i32 + step.z);
                for y in neighbor..h {
                    mesh.push_voxel_face(version, UVec3::new(x, y, z), face, tile);
                }
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_coords_cover_grid() {
        let scenes = standard_scenes();
        let coords = scene_coords(&scenes[1]);
        assert_eq!(coords.len(), 64);
        assert_eq!(coords[0], IVec3::ZERO);
        assert_eq!(coords[9], IVec3::new(1, 0, 1));
    }

    #[test]
    fn test_column_height_in_range() {
        for x in 0..CHUNK_SIZE {
            let h = column_height(3, x, 7, 16);
            assert!((1..=16).contains(&h));
        }
    }

    #[test]
    fn test_mesh_is_deterministic() {
        let a = generate_bench_mesh(5, IVec3::new(1, 0, 2), 16, FormatVersion::CornerBit);
        let b = generate_bench_mesh(5, IVec3::new(1, 0, 2), 16, FormatVersion::CornerBit);
        assert_eq!(a.vertex_count(), b.vertex_count());
        assert_eq!(a.offset, IVec3::new(32, 0, 64));
    }

    #[test]
    fn test_mesh_has_no_bottom_faces() {
        let mesh = generate_bench_mesh(0, IVec3::ZERO, 8, FormatVersion::Legacy);
        assert!(mesh.face(Face::Down).is_empty());
        assert_eq!(
            mesh.face(Face::Up).quad_count(),
            (CHUNK_SIZE * CHUNK_SIZE) as usize
        );
        // Border columns always expose their full height
        assert!(!mesh.face(Face::West).is_empty());
    }
}
