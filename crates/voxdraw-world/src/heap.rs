use std::collections::BTreeMap;

use voxdraw_core::error::DrawError;

/// A live range of elements inside a geometry heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapRegion {
    pub offset: u32,
    pub len: u32,
}

impl HeapRegion {
    pub fn end(&self) -> u32 {
        self.offset + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// First-fit range allocator over one shared buffer, counted in elements
/// (vertices or indices). Freed ranges merge with free neighbors.
pub struct GeometryHeap {
    name: &'static str,
    capacity: u32,
    /// offset -> len, disjoint and never adjacent.
    free: BTreeMap<u32, u32>,
    /// offset -> len of live regions.
    live: BTreeMap<u32, u32>,
    used: u32,
}

impl GeometryHeap {
    pub fn new(name: &'static str, capacity: u32) -> Self {
        let mut free = BTreeMap::new();
        if capacity > 0 {
            free.insert(0, capacity);
        }
        Self {
            name,
            capacity,
            free,
            live: BTreeMap::new(),
            used: 0,
        }
    }

    /// Reserve `len` contiguous elements at the lowest offset that fits.
    /// Zero-length requests succeed with an empty region and reserve nothing.
    pub fn alloc(&mut self, len: u32) -> Result<HeapRegion, DrawError> {
        if len == 0 {
            return Ok(HeapRegion::default());
        }
        let found = self
            .free
            .iter()
            .find(|(_, free_len)| **free_len >= len)
            .map(|(&offset, &free_len)| (offset, free_len));
        let Some((offset, free_len)) = found else {
            log::warn!(
                "{} heap exhausted: requested {}, {} free ({} largest)",
                self.name,
                len,
                self.available(),
                self.largest_free()
            );
            return Err(DrawError::HeapExhausted {
                heap: self.name,
                requested: len,
                available: self.available(),
            });
        };

        self.free.remove(&offset);
        if free_len > len {
            self.free.insert(offset + len, free_len - len);
        }
        self.live.insert(offset, len);
        self.used += len;
        Ok(HeapRegion { offset, len })
    }

    /// Return a region. It must match a live allocation exactly.
    pub fn free(&mut self, region: HeapRegion) -> Result<(), DrawError> {
        if region.is_empty() {
            return Ok(());
        }
        match self.live.get(&region.offset) {
            Some(&len) if len == region.len => {}
            _ => {
                return Err(DrawError::InvalidRegion {
                    offset: region.offset,
                })
            }
        }
        self.live.remove(&region.offset);
        self.used -= region.len;

        let mut start = region.offset;
        let mut len = region.len;
        // Merge with the free range ending at our start
        if let Some((&prev_offset, &prev_len)) = self.free.range(..start).next_back() {
            if prev_offset + prev_len == start {
                self.free.remove(&prev_offset);
                start = prev_offset;
                len += prev_len;
            }
        }
        // Merge with the free range starting at our end
        if let Some(next_len) = self.free.remove(&(region.end())) {
            len += next_len;
        }
        self.free.insert(start, len);
        Ok(())
    }

    /// Drop every allocation.
    pub fn clear(&mut self) {
        self.live.clear();
        self.free.clear();
        if self.capacity > 0 {
            self.free.insert(0, self.capacity);
        }
        self.used = 0;
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn available(&self) -> u32 {
        self.capacity - self.used
    }

    pub fn largest_free(&self) -> u32 {
        self.free.values().copied().max().unwrap_or(0)
    }

    pub fn active_allocations(&self) -> usize {
        self.live.len()
    }

    /// Percentage of the capacity in use, 0..=100.
    pub fn health(&self) -> u32 {
        if self.capacity == 0 {
            return 100;
        }
        ((self.used as u64 * 100) / self.capacity as u64) as u32
    }
}
