use voxdraw_codec::shade::PlacementLookup;
use voxdraw_core::types::{PlacementEntry, SlotId};

use crate::index_map::IndirectionMap;
use crate::placement::PlacementTable;

/// Draw index to placement resolution for one frame, as the vertex stage
/// performs it. Borrows the table, so the table cannot change while a
/// resolver is alive.
#[derive(Clone, Copy)]
pub struct DrawResolver<'a> {
    table: &'a PlacementTable,
    index_map: Option<&'a IndirectionMap>,
}

impl<'a> DrawResolver<'a> {
    /// Without a map, the draw index is the slot id.
    pub fn new(table: &'a PlacementTable, index_map: Option<&'a IndirectionMap>) -> Self {
        Self { table, index_map }
    }

    pub fn slot_for(&self, draw_index: u32) -> Option<SlotId> {
        match self.index_map {
            Some(map) => map.resolve(draw_index),
            None => Some(SlotId(draw_index)),
        }
    }

    /// Placement for a draw, or `None` if it resolves to nothing registered.
    pub fn try_placement(&self, draw_index: u32) -> Option<PlacementEntry> {
        self.slot_for(draw_index)
            .and_then(|slot| self.table.get(slot))
            .copied()
    }
}

impl PlacementLookup for DrawResolver<'_> {
    /// Unresolvable draws read a zeroed entry, like an out-of-range buffer
    /// read on the GPU.
    fn placement(&self, draw_index: u32) -> PlacementEntry {
        self.try_placement(draw_index).unwrap_or_default()
    }
}
