use glam::Vec3;

/// Debug tint per LOD tag. Mirrored in the WGSL preamble.
pub const LOD_COLORS: [Vec3; 4] = [
    Vec3::new(0.1, 0.1, 0.1),
    Vec3::new(1.0, 0.1, 0.1),
    Vec3::new(0.0, 1.0, 0.1),
    Vec3::new(0.1, 0.1, 1.0),
];

/// Tint for tags outside the table.
pub const DEFAULT_LOD_COLOR: Vec3 = Vec3::new(1.0, 1.0, 0.3);

/// Visualization color for a LOD tag. Total over u32.
pub fn lod_debug_color(lod_tag: u32) -> Vec3 {
    LOD_COLORS
        .get(lod_tag as usize)
        .copied()
        .unwrap_or(DEFAULT_LOD_COLOR)
}
