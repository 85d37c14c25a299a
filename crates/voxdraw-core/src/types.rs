use std::fmt;

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::constants::NO_FACE;
use crate::face::Face;

/// Newtype for placement table slot identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SlotId(pub u32);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chunk coordinate in chunk-space (each unit = one chunk extent).
pub type ChunkCoord = IVec3;

/// Packed vertex format version.
///
/// The two versions are not binary compatible. A buffer holds exactly one
/// version and consumers are told which one out of band (see `tag`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FormatVersion {
    /// 5 bits per axis, absolute voxel coordinates, face-dependent corner expansion.
    Legacy,
    /// 6 bits per axis, explicit per-vertex corner bits, 2-bit LOD tag.
    #[default]
    CornerBit,
}

impl FormatVersion {
    /// Numeric tag written next to buffers of this version.
    pub fn tag(self) -> u16 {
        match self {
            FormatVersion::Legacy => 1,
            FormatVersion::CornerBit => 2,
        }
    }

    pub fn from_tag(tag: u16) -> Option<FormatVersion> {
        match tag {
            1 => Some(FormatVersion::Legacy),
            2 => Some(FormatVersion::CornerBit),
            _ => None,
        }
    }
}

/// Draw ordering applied by the draw list builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawOrder {
    /// Keep the order batches were handed in.
    #[default]
    Submission,
    /// Ascending placement slot.
    SlotAscending,
    /// Finest LOD first.
    LodAscending,
    /// Nearest chunk center first.
    FrontToBack,
}

/// Where one chunk mesh batch sits in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementEntry {
    /// World-space offset of the chunk origin, in voxels.
    /// Flat (2D) layouts leave `y` at 0.
    pub offset: IVec3,
    /// Face shared by every quad in the batch, for per-face batches.
    pub face: Option<Face>,
}

impl PlacementEntry {
    pub fn new(offset: IVec3) -> Self {
        Self { offset, face: None }
    }

    pub fn with_face(offset: IVec3, face: Face) -> Self {
        Self {
            offset,
            face: Some(face),
        }
    }

    /// Flat variant: x/z offset only.
    pub fn flat(x: i32, z: i32) -> Self {
        Self::new(IVec3::new(x, 0, z))
    }

    pub fn to_gpu(self) -> GpuPlacement {
        GpuPlacement {
            x: self.offset.x,
            y: self.offset.y,
            z: self.offset.z,
            face: self.face.map_or(NO_FACE, |f| f.id() as i32),
        }
    }
}

/// GPU form of a placement entry. 16 bytes, std430 compatible.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuPlacement {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// Face id, or NO_FACE.
    pub face: i32,
}

impl GpuPlacement {
    /// Read back into the API form. Out-of-table face ids read as no face.
    pub fn to_entry(self) -> PlacementEntry {
        let face = u32::try_from(self.face).ok().and_then(Face::from_id);
        PlacementEntry {
            offset: IVec3::new(self.x, self.y, self.z),
            face,
        }
    }
}
