use std::collections::BTreeSet;

use voxdraw_core::constants::MAX_PLACEMENT_SLOTS;
use voxdraw_core::error::DrawError;
use voxdraw_core::types::{GpuPlacement, PlacementEntry, SlotId};

/// Dense table of per-batch placements, addressed by slot id.
///
/// Entries never move. Released slots go back to a free set and the lowest
/// free id is handed out first, so the table stays compact and its length
/// is bounded by the chunk-cache capacity.
pub struct PlacementTable {
    /// Indexed by slot id, `None` for free slots below the high-water mark.
    entries: Vec<Option<PlacementEntry>>,
    /// Free ids below `entries.len()`.
    free_slots: BTreeSet<u32>,
    capacity: u32,
    live: u32,
    dirty: bool,
}

impl Default for PlacementTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementTable {
    pub fn new() -> Self {
        Self::with_capacity(MAX_PLACEMENT_SLOTS)
    }

    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            entries: Vec::new(),
            free_slots: BTreeSet::new(),
            capacity,
            live: 0,
            dirty: false,
        }
    }

    /// Store `entry` in the lowest free slot.
    pub fn register(&mut self, entry: PlacementEntry) -> Result<SlotId, DrawError> {
        let slot = match self.free_slots.pop_first() {
            Some(slot) => slot,
            None => {
                let next = self.entries.len() as u32;
                if next >= self.capacity {
                    return Err(DrawError::TableFull {
                        capacity: self.capacity,
                    });
                }
                self.entries.push(None);
                next
            }
        };
        self.entries[slot as usize] = Some(entry);
        self.live += 1;
        self.dirty = true;
        Ok(SlotId(slot))
    }

    /// Replace the entry of a registered slot (chunk moved or re-meshed).
    pub fn update(&mut self, slot: SlotId, entry: PlacementEntry) -> Result<(), DrawError> {
        match self.entries.get_mut(slot.0 as usize) {
            Some(existing @ Some(_)) => {
                *existing = Some(entry);
                self.dirty = true;
                Ok(())
            }
            _ => Err(DrawError::InvalidSlot(slot)),
        }
    }

    /// Free a slot for reuse. Fails on unregistered or already released slots.
    pub fn release(&mut self, slot: SlotId) -> Result<PlacementEntry, DrawError> {
        let entry = self
            .entries
            .get_mut(slot.0 as usize)
            .and_then(Option::take)
            .ok_or(DrawError::InvalidSlot(slot))?;
        self.free_slots.insert(slot.0);
        self.live -= 1;
        self.dirty = true;
        self.trim_tail();
        Ok(entry)
    }

    /// Drop trailing free slots so the GPU buffer shrinks with the table.
    fn trim_tail(&mut self) {
        while let Some(None) = self.entries.last() {
            let tail = self.entries.len() as u32 - 1;
            self.entries.pop();
            self.free_slots.remove(&tail);
        }
    }

    /// Release every slot at once. The next registration gets slot 0.
    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.clear();
        self.free_slots.clear();
        self.live = 0;
        self.dirty = true;
    }

    pub fn get(&self, slot: SlotId) -> Option<&PlacementEntry> {
        self.entries.get(slot.0 as usize).and_then(Option::as_ref)
    }

    pub fn is_registered(&self, slot: SlotId) -> bool {
        self.get(slot).is_some()
    }

    /// Number of registered slots.
    pub fn live_count(&self) -> u32 {
        self.live
    }

    /// One past the highest slot id in use; the length of `gpu_data`.
    pub fn high_water(&self) -> u32 {
        self.entries.len() as u32
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Registered slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &PlacementEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (SlotId(i as u32), e)))
    }

    /// Storage buffer contents. Free slots are zeroed.
    pub fn gpu_data(&self) -> Vec<GpuPlacement> {
        self.entries
            .iter()
            .map(|e| e.map(PlacementEntry::to_gpu).unwrap_or_default())
            .collect()
    }

    /// Whether the table changed since the last `clear_dirty`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
