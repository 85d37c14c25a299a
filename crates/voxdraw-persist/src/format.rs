use voxdraw_core::constants::{DRAW_COMMAND_BYTES, PACKED_VERTEX_BYTES, PLACEMENT_ENTRY_BYTES};

/// Magic bytes identifying a voxdraw frame snapshot.
pub const MAGIC: [u8; 4] = *b"VXDR";

/// Current snapshot container version.
pub const CONTAINER_VERSION: u16 = 1;

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 64;

/// Set when the frame was drawn through an indirection map.
pub const FLAG_INDEX_MAP: u32 = 1;

/// All flag bits this version understands.
pub const KNOWN_FLAGS: u32 = FLAG_INDEX_MAP;

pub const SECTION_COUNT: usize = 5;

/// Compressed sections, stored back to back after the header in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Vertices = 0,
    Indices = 1,
    Placements = 2,
    IndexMap = 3,
    Commands = 4,
}

pub const ALL_SECTIONS: [Section; SECTION_COUNT] = [
    Section::Vertices,
    Section::Indices,
    Section::Placements,
    Section::IndexMap,
    Section::Commands,
];

impl Section {
    pub fn name(self) -> &'static str {
        match self {
            Section::Vertices => "vertices",
            Section::Indices => "indices",
            Section::Placements => "placements",
            Section::IndexMap => "index map",
            Section::Commands => "commands",
        }
    }

    /// Bytes per element once decompressed.
    pub fn element_size(self) -> usize {
        match self {
            Section::Vertices => PACKED_VERTEX_BYTES as usize,
            Section::Indices | Section::IndexMap => 4,
            Section::Placements => PLACEMENT_ENTRY_BYTES as usize,
            Section::Commands => DRAW_COMMAND_BYTES as usize,
        }
    }
}

/// Snapshot header. Fixed 64 bytes, repr(C) for byte-level serialization.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u16,
    /// `FormatVersion::tag` of every vertex in the file.
    pub format_tag: u16,
    pub flags: u32,
    pub frame: u32,
    /// Element count per section, indexed by `Section`.
    pub element_counts: [u32; SECTION_COUNT],
    /// Compressed byte length per section, indexed by `Section`.
    pub compressed_sizes: [u32; SECTION_COUNT],
    pub _reserved: [u32; 2],
}

impl SnapshotHeader {
    pub fn has_index_map(&self) -> bool {
        self.flags & FLAG_INDEX_MAP != 0
    }

    /// Total bytes of header plus all sections.
    pub fn file_size(&self) -> usize {
        HEADER_SIZE
            + self
                .compressed_sizes
                .iter()
                .map(|s| *s as usize)
                .sum::<usize>()
    }
}
