use glam::{IVec3, Vec3};
use voxdraw_core::config::DrawConfig;
use voxdraw_core::constants::CHUNK_SIZE;
use voxdraw_core::error::DrawError;
use voxdraw_core::types::{DrawOrder, PlacementEntry, SlotId};

use crate::chunk::ChunkMeshBatch;
use crate::index_map::IndirectionMap;
use crate::placement::PlacementTable;
use crate::resolve::DrawResolver;

/// One indexed indirect draw plus culling metadata. 36 bytes.
///
/// The first five fields are the standard indexed-indirect record; the
/// trailing center and LOD are read only by a later cull/LOD pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawCommand {
    pub index_count: u32,
    pub instance_count: u32,
    pub first_index: u32,
    pub base_vertex: i32,
    /// Draw position of this command; read as `instance_index` by the shader.
    pub base_instance: u32,
    pub chunk_center_x: i32,
    pub chunk_center_y: i32,
    pub chunk_center_z: i32,
    pub lod_level: i32,
}

impl DrawCommand {
    /// Placeholder that rasterizes nothing, used to keep positions aligned
    /// with slot ids in direct mode.
    pub fn empty(position: u32) -> Self {
        Self {
            base_instance: position,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.index_count == 0 || self.instance_count == 0
    }

    pub fn chunk_center(&self) -> IVec3 {
        IVec3::new(self.chunk_center_x, self.chunk_center_y, self.chunk_center_z)
    }
}

/// Commands for one frame, plus the map and diagnostics that go with them.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
    /// Present in index-map mode.
    pub index_map: Option<IndirectionMap>,
    /// Batches that were skipped, one `DanglingBatch` per batch.
    pub issues: Vec<DrawError>,
}

impl DrawList {
    /// Number of records in the command buffer (the multi-draw count).
    pub fn draw_count(&self) -> u32 {
        self.commands.len() as u32
    }

    /// Commands that actually rasterize something.
    pub fn visible_count(&self) -> usize {
        self.commands.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn commands_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.commands)
    }

    /// Per-draw placement lookup matching this list.
    pub fn resolver<'a>(&'a self, table: &'a PlacementTable) -> DrawResolver<'a> {
        DrawResolver::new(table, self.index_map.as_ref())
    }
}

/// Builds per-frame draw lists from visible batches.
#[derive(Debug, Clone, Copy)]
pub struct DrawListBuilder {
    pub use_index_map: bool,
    pub order: DrawOrder,
    pub chunk_extent: u32,
}

impl Default for DrawListBuilder {
    fn default() -> Self {
        Self {
            use_index_map: true,
            order: DrawOrder::Submission,
            chunk_extent: CHUNK_SIZE,
        }
    }
}

struct Candidate {
    batch: ChunkMeshBatch,
    center: IVec3,
}

impl DrawListBuilder {
    pub fn from_config(config: &DrawConfig) -> Self {
        Self {
            use_index_map: config.use_index_map,
            order: config.draw_order,
            chunk_extent: config.chunk_max_extent,
        }
    }

    fn chunk_center(&self, entry: &PlacementEntry) -> IVec3 {
        entry.offset + IVec3::splat((self.chunk_extent / 2) as i32)
    }

    /// Emit one command per batch whose slot is registered in `table`.
    ///
    /// `eye` is only used for `DrawOrder::FrontToBack`.
    pub fn build(&self, table: &PlacementTable, batches: &[ChunkMeshBatch], eye: Vec3) -> DrawList {
        let mut list = DrawList::default();
        let mut candidates = Vec::with_capacity(batches.len());
        for batch in batches {
            match table.get(batch.slot) {
                Some(entry) => candidates.push(Candidate {
                    batch: *batch,
                    center: self.chunk_center(entry),
                }),
                None => {
                    log::warn!("Skipping batch for unregistered slot {}", batch.slot);
                    list.issues.push(DrawError::DanglingBatch(batch.slot));
                }
            }
        }

        if self.use_index_map {
            self.sort(&mut candidates, eye);
            list.commands = candidates
                .iter()
                .enumerate()
                .map(|(position, c)| command(c, position as u32))
                .collect();
            list.index_map = Some(IndirectionMap::build(
                candidates.iter().map(|c| c.batch.slot),
            ));
        } else {
            list.commands = direct_commands(&mut candidates);
        }

        log::debug!(
            "Built draw list: {} commands, {} visible, {} skipped",
            list.draw_count(),
            list.visible_count(),
            list.issues.len()
        );
        list
    }

    fn sort(&self, candidates: &mut [Candidate], eye: Vec3) {
        match self.order {
            DrawOrder::Submission => {}
            DrawOrder::SlotAscending => candidates.sort_by_key(|c| c.batch.slot),
            DrawOrder::LodAscending => candidates.sort_by_key(|c| c.batch.lod_level),
            DrawOrder::FrontToBack => candidates.sort_by(|a, b| {
                let da = a.center.as_vec3().distance_squared(eye);
                let db = b.center.as_vec3().distance_squared(eye);
                da.total_cmp(&db)
            }),
        }
    }
}

fn command(c: &Candidate, position: u32) -> DrawCommand {
    DrawCommand {
        index_count: c.batch.index_count,
        instance_count: 1,
        first_index: c.batch.first_index,
        base_vertex: c.batch.base_vertex,
        base_instance: position,
        chunk_center_x: c.center.x,
        chunk_center_y: c.center.y,
        chunk_center_z: c.center.z,
        lod_level: c.batch.lod_level as i32,
    }
}

/// Direct mode: the draw position is the slot id, so commands go in slot
/// order and free or culled slots below the highest one get empty commands.
fn direct_commands(candidates: &mut [Candidate]) -> Vec<DrawCommand> {
    candidates.sort_by_key(|c| c.batch.slot);
    let mut commands = Vec::with_capacity(candidates.len());
    let mut last: Option<SlotId> = None;
    for c in candidates.iter() {
        if last == Some(c.batch.slot) {
            log::warn!(
                "Slot {} already has a draw; direct mode allows one batch per slot",
                c.batch.slot
            );
            continue;
        }
        while (commands.len() as u32) < c.batch.slot.0 {
            commands.push(DrawCommand::empty(commands.len() as u32));
        }
        commands.push(command(c, c.batch.slot.0));
        last = Some(c.batch.slot);
    }
    commands
}
