use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// One of the 6 axis-aligned quad faces.
///
/// Discriminants are the wire face ids. The order is fixed by the vertex
/// format and must never change: {-Y, +Y, +Z, -Z, +X, -X}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Face {
    Down = 0,
    Up = 1,
    South = 2,
    North = 3,
    East = 4,
    West = 5,
}

/// All 6 faces in wire order.
pub const ALL_FACES: [Face; 6] = [
    Face::Down,
    Face::Up,
    Face::South,
    Face::North,
    Face::East,
    Face::West,
];

/// Normal table indexed by face id. Mirrored in the WGSL preamble.
pub const FACE_NORMALS: [Vec3; 6] = [
    Vec3::new(0.0, -1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
];

impl Face {
    /// Face for a wire id, or None for ids 6 and above.
    pub fn from_id(id: u32) -> Option<Face> {
        ALL_FACES.get(id as usize).copied()
    }

    /// Wire id of this face.
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Unit offset toward the neighbor this face looks at. Y-up.
    pub fn offset(self) -> IVec3 {
        match self {
            Face::Down => IVec3::new(0, -1, 0),
            Face::Up => IVec3::new(0, 1, 0),
            Face::South => IVec3::new(0, 0, 1),
            Face::North => IVec3::new(0, 0, -1),
            Face::East => IVec3::new(1, 0, 0),
            Face::West => IVec3::new(-1, 0, 0),
        }
    }
}
