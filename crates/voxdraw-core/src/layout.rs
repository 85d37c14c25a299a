//! Bit layouts of the packed vertex word, one table per format version.
//!
//! Legacy (v1), 23 + 2 bits used:
//!   [0:3]   face id
//!   [4:8]   local x (5-bit)
//!   [9:13]  local y (5-bit)
//!   [14:18] local z (5-bit)
//!   [19:22] tile id
//!   [23:24] corner (bit 0 = u/x, bit 1 = v/z)
//!
//! CornerBit (v2), 30 bits used:
//!   [0:3]   face id
//!   [4:9]   local x (6-bit)
//!   [10:15] local y (6-bit)
//!   [16:21] local z (6-bit)
//!   [22:25] tile id
//!   [26:27] corner (bit 0 = u, bit 1 = v)
//!   [28:29] lod tag
//!
//! Legacy stores voxel coordinates and expands corners per face at decode
//! time. CornerBit stores lattice coordinates of the vertex itself and uses
//! the corner bits only for texture coordinates.

use crate::types::FormatVersion;

/// A contiguous run of bits inside a u32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub shift: u32,
    pub width: u32,
}

impl BitField {
    pub const fn new(shift: u32, width: u32) -> Self {
        Self { shift, width }
    }

    /// Field mask before shifting (e.g. 0x3F for a 6-bit field).
    pub const fn mask(self) -> u32 {
        if self.width == 0 {
            0
        } else if self.width >= 32 {
            u32::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    /// Largest value the field can hold.
    pub const fn max_value(self) -> u32 {
        self.mask()
    }

    /// Whether `value` fits in the field without truncation.
    pub const fn fits(self, value: u32) -> bool {
        value <= self.mask()
    }

    /// Mask of the field in place within the word.
    pub const fn word_mask(self) -> u32 {
        if self.width == 0 {
            0
        } else {
            self.mask() << self.shift
        }
    }

    /// Write `value` into `word`. Bits above the width are dropped.
    pub const fn insert(self, word: u32, value: u32) -> u32 {
        if self.width == 0 {
            return word;
        }
        (word & !self.word_mask()) | ((value & self.mask()) << self.shift)
    }

    /// Read the field out of `word`.
    pub const fn extract(self, word: u32) -> u32 {
        if self.width == 0 {
            return 0;
        }
        (word >> self.shift) & self.mask()
    }
}

/// Field positions of one vertex format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub face: BitField,
    pub x: BitField,
    pub y: BitField,
    pub z: BitField,
    pub tile: BitField,
    pub corner: BitField,
    /// Width 0 on versions without LOD tagging.
    pub lod: BitField,
}

pub const LEGACY_LAYOUT: VertexLayout = VertexLayout {
    face: BitField::new(0, 4),
    x: BitField::new(4, 5),
    y: BitField::new(9, 5),
    z: BitField::new(14, 5),
    tile: BitField::new(19, 4),
    corner: BitField::new(23, 2),
    lod: BitField::new(25, 0),
};

pub const CORNER_BIT_LAYOUT: VertexLayout = VertexLayout {
    face: BitField::new(0, 4),
    x: BitField::new(4, 6),
    y: BitField::new(10, 6),
    z: BitField::new(16, 6),
    tile: BitField::new(22, 4),
    corner: BitField::new(26, 2),
    lod: BitField::new(28, 2),
};

impl VertexLayout {
    /// All fields with their names, in bit order.
    pub fn fields(&self) -> [(&'static str, BitField); 7] {
        [
            ("face", self.face),
            ("local_x", self.x),
            ("local_y", self.y),
            ("local_z", self.z),
            ("tile", self.tile),
            ("corner", self.corner),
            ("lod_tag", self.lod),
        ]
    }

    /// Total bits used by the layout.
    pub fn used_bits(&self) -> u32 {
        self.fields().iter().map(|(_, f)| f.width).sum()
    }

    /// Per-axis coordinate width. All three axes share it.
    pub fn coord_bits(&self) -> u32 {
        self.x.width
    }
}

impl FormatVersion {
    pub fn layout(self) -> &'static VertexLayout {
        match self {
            FormatVersion::Legacy => &LEGACY_LAYOUT,
            FormatVersion::CornerBit => &CORNER_BIT_LAYOUT,
        }
    }

    /// Largest chunk extent whose coordinates this version can carry.
    ///
    /// Legacy stores voxel coordinates `0..extent`, so the full 2^W range.
    /// CornerBit stores lattice coordinates `0..=extent`, one less.
    pub fn max_chunk_extent(self) -> u32 {
        let span = 1u32 << self.layout().coord_bits();
        match self {
            FormatVersion::Legacy => span,
            FormatVersion::CornerBit => span - 1,
        }
    }

    /// Largest local coordinate allowed for a chunk of `extent` voxels.
    pub fn max_coordinate(self, extent: u32) -> u32 {
        match self {
            FormatVersion::Legacy => extent.saturating_sub(1),
            FormatVersion::CornerBit => extent,
        }
    }
}
