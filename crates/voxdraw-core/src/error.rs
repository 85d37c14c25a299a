use thiserror::Error;

use crate::config::ConfigError;
use crate::types::SlotId;

/// Errors raised while encoding vertices, registering placements or
/// building draw lists.
///
/// All of these are recoverable and surface to the meshing/streaming
/// layer. Nothing past encode/registration time has an error channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("{field} value {value} out of range (max {max})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("placement slot {0} is not registered")]
    InvalidSlot(SlotId),

    #[error("batch references slot {0} which has no placement entry")]
    DanglingBatch(SlotId),

    #[error("placement table full ({capacity} slots)")]
    TableFull { capacity: u32 },

    #[error("{heap} heap exhausted: requested {requested}, {available} available")]
    HeapExhausted {
        heap: &'static str,
        requested: u32,
        available: u32,
    },

    #[error("no live heap region at offset {offset}")]
    InvalidRegion { offset: u32 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DrawError {
    /// Shorthand for a field that exceeded its maximum.
    pub fn out_of_range(field: &'static str, value: u32, max: u32) -> Self {
        DrawError::OutOfRange { field, value, max }
    }
}
