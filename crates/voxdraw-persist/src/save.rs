use voxdraw_codec::shade::PlacementLookup;
use voxdraw_core::types::{FormatVersion, GpuPlacement, PlacementEntry};
use voxdraw_world::{DrawCommand, DrawList, DrawWorld};

use crate::compress;
use crate::format::*;

/// Every buffer the rasterizer consumes for one frame, in GPU layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSnapshot {
    pub format: FormatVersion,
    pub frame: u32,
    pub vertices: Vec<u32>,
    pub indices: Vec<u32>,
    pub placements: Vec<GpuPlacement>,
    /// `None` when draws index placements directly.
    pub index_map: Option<Vec<u32>>,
    pub commands: Vec<DrawCommand>,
}

impl FrameSnapshot {
    /// Copy the current buffers of `world` together with a built draw list.
    pub fn capture(world: &DrawWorld, list: &DrawList, frame: u32) -> Self {
        let store = world.store();
        Self {
            format: world.config().format,
            frame,
            vertices: store.vertex_words().to_vec(),
            indices: store.index_data().to_vec(),
            placements: store.table().gpu_data(),
            index_map: list.index_map.as_ref().map(|m| m.gpu_data().to_vec()),
            commands: list.commands.clone(),
        }
    }

    fn element_counts(&self) -> [u32; SECTION_COUNT] {
        [
            self.vertices.len() as u32,
            self.indices.len() as u32,
            self.placements.len() as u32,
            self.index_map.as_ref().map_or(0, |m| m.len() as u32),
            self.commands.len() as u32,
        ]
    }
}

/// Offline draw index resolution over the captured buffers, with the same
/// zeroed fallback a GPU read past the end would give.
impl PlacementLookup for FrameSnapshot {
    fn placement(&self, draw_index: u32) -> PlacementEntry {
        let slot = match &self.index_map {
            Some(map) => map.get(draw_index as usize).copied(),
            None => Some(draw_index),
        };
        slot.and_then(|s| self.placements.get(s as usize))
            .map(|gpu| gpu.to_entry())
            .unwrap_or_default()
    }
}

/// Serialize a frame snapshot into the voxdraw binary format.
///
/// Layout: header (64B) + LZ4 sections in `Section` order.
pub fn save(snapshot: &FrameSnapshot) -> Vec<u8> {
    let empty: &[u32] = &[];
    let index_map = snapshot.index_map.as_deref().unwrap_or(empty);
    let blocks: [Vec<u8>; SECTION_COUNT] = [
        compress::compress_section(bytemuck::cast_slice(&snapshot.vertices)),
        compress::compress_section(bytemuck::cast_slice(&snapshot.indices)),
        compress::compress_section(bytemuck::cast_slice(&snapshot.placements)),
        compress::compress_section(bytemuck::cast_slice(index_map)),
        compress::compress_section(bytemuck::cast_slice(&snapshot.commands)),
    ];

    let header = SnapshotHeader {
        magic: MAGIC,
        version: CONTAINER_VERSION,
        format_tag: snapshot.format.tag(),
        flags: if snapshot.index_map.is_some() {
            FLAG_INDEX_MAP
        } else {
            0
        },
        frame: snapshot.frame,
        element_counts: snapshot.element_counts(),
        compressed_sizes: blocks.each_ref().map(|b| b.len() as u32),
        _reserved: [0; 2],
    };

    let mut output = Vec::with_capacity(header.file_size());
    output.extend_from_slice(bytemuck::bytes_of(&header));
    for block in &blocks {
        output.extend_from_slice(block);
    }

    log::debug!(
        "Saved frame {} snapshot: {} commands, {} bytes",
        snapshot.frame,
        snapshot.commands.len(),
        output.len()
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    fn sample_snapshot(index_map: bool) -> FrameSnapshot {
        FrameSnapshot {
            format: FormatVersion::CornerBit,
            frame: 12,
            vertices: vec![0x0400_0011, 0x0800_0021, 0x0C00_0031, 0x0000_0001],
            indices: vec![0, 1, 2, 2, 1, 3],
            placements: vec![
                PlacementEntry::flat(0, 0).to_gpu(),
                PlacementEntry::flat(16, 0).to_gpu(),
                PlacementEntry::flat(0, 16).to_gpu(),
            ],
            index_map: index_map.then(|| vec![2, 0, 1]),
            commands: vec![
                DrawCommand {
                    index_count: 6,
                    instance_count: 1,
                    ..Default::default()
                };
                3
            ],
        }
    }

    #[test]
    fn test_save_header_fields_correct() {
        let snapshot = sample_snapshot(true);
        let data = save(&snapshot);

        let header: SnapshotHeader = bytemuck::pod_read_unaligned(&data[..HEADER_SIZE]);
        assert_eq!(&data[0..4], b"VXDR");
        assert_eq!(header.version, CONTAINER_VERSION);
        assert_eq!(header.format_tag, 2);
        assert!(header.has_index_map());
        assert_eq!(header.frame, 12);
        assert_eq!(header.element_counts, [4, 6, 3, 3, 3]);
        assert_eq!(header.file_size(), data.len());
    }

    #[test]
    fn test_direct_mode_clears_flag() {
        let data = save(&sample_snapshot(false));
        let header: SnapshotHeader = bytemuck::pod_read_unaligned(&data[..HEADER_SIZE]);
        assert!(!header.has_index_map());
        assert_eq!(header.element_counts[Section::IndexMap as usize], 0);
    }

    #[test]
    fn test_snapshot_lookup() {
        let indirect = sample_snapshot(true);
        assert_eq!(indirect.placement(0).offset, IVec3::new(0, 0, 16));
        assert_eq!(indirect.placement(2).offset, IVec3::new(16, 0, 0));
        assert_eq!(indirect.placement(3), PlacementEntry::default());

        let direct = sample_snapshot(false);
        assert_eq!(direct.placement(1).offset, IVec3::new(16, 0, 0));
    }
}
