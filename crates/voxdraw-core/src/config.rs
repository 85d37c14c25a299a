use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ATLAS_GRID_TILES, CHUNK_SIZE, DEFAULT_INDEX_CAPACITY, DEFAULT_VERTEX_CAPACITY,
    MAX_PLACEMENT_SLOTS,
};
use crate::types::{DrawOrder, FormatVersion};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to parse draw config RON: {0}")]
    Parse(String),
    #[error("Invalid draw config: {0}")]
    Invalid(String),
}

/// Configuration surface of the encoder, tables and draw builder.
///
/// Loaded from RON; every field has a default so partial files work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Remap draw positions through an indirection map.
    pub use_index_map: bool,
    /// Chunk side length in voxels. Bounds the local coordinate width.
    pub chunk_max_extent: u32,
    /// Tiles per atlas axis.
    pub atlas_grid_size: u32,
    /// Packed vertex format of every buffer this config produces.
    pub format: FormatVersion,
    /// Ordering applied when building draw lists in index-map mode.
    pub draw_order: DrawOrder,
    /// Placement table capacity.
    pub slot_capacity: u32,
    /// Shared vertex buffer capacity, in vertices.
    pub vertex_capacity: u32,
    /// Shared index buffer capacity, in indices.
    pub index_capacity: u32,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            use_index_map: true,
            chunk_max_extent: CHUNK_SIZE,
            atlas_grid_size: ATLAS_GRID_TILES,
            format: FormatVersion::CornerBit,
            draw_order: DrawOrder::Submission,
            slot_capacity: MAX_PLACEMENT_SLOTS,
            vertex_capacity: DEFAULT_VERTEX_CAPACITY,
            index_capacity: DEFAULT_INDEX_CAPACITY,
        }
    }
}

impl DrawConfig {
    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_extent = self.format.max_chunk_extent();
        if self.chunk_max_extent == 0 || self.chunk_max_extent > max_extent {
            return Err(ConfigError::Invalid(format!(
                "chunk_max_extent {} not in 1..={} for {:?}",
                self.chunk_max_extent, max_extent, self.format
            )));
        }
        if self.atlas_grid_size == 0 {
            return Err(ConfigError::Invalid("atlas_grid_size must be > 0".into()));
        }
        // Tile ids must stay addressable as u32 after squaring.
        if self.atlas_grid_size > u16::MAX as u32 {
            return Err(ConfigError::Invalid(format!(
                "atlas_grid_size {} too large",
                self.atlas_grid_size
            )));
        }
        if self.slot_capacity == 0 {
            return Err(ConfigError::Invalid("slot_capacity must be > 0".into()));
        }
        if self.vertex_capacity == 0 || self.index_capacity == 0 {
            return Err(ConfigError::Invalid(
                "vertex_capacity and index_capacity must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Parse and validate a draw config from a RON string.
pub fn load_config_from_str(ron_str: &str) -> Result<DrawConfig, ConfigError> {
    let options = ron::Options::default();
    let config: DrawConfig = options
        .from_str(ron_str)
        .map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
