use voxdraw_core::types::SlotId;

/// Draw position to placement slot mapping for one frame.
///
/// Rebuilt wholesale after every cull/sort pass; the placement table
/// itself never reorders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndirectionMap {
    slots: Vec<u32>,
}

impl IndirectionMap {
    pub fn build<I>(ordered_slots: I) -> Self
    where
        I: IntoIterator<Item = SlotId>,
    {
        Self {
            slots: ordered_slots.into_iter().map(|s| s.0).collect(),
        }
    }

    /// Slot drawn at `draw_index`, if that draw exists this frame.
    pub fn resolve(&self, draw_index: u32) -> Option<SlotId> {
        self.slots.get(draw_index as usize).copied().map(SlotId)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Storage buffer contents, one u32 slot id per draw.
    pub fn gpu_data(&self) -> &[u32] {
        &self.slots
    }
}
