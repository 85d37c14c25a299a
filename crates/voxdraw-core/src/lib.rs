pub mod config;
pub mod constants;
pub mod error;
pub mod face;
pub mod layout;
pub mod types;

pub use config::{load_config_from_str, ConfigError, DrawConfig};
pub use error::DrawError;
pub use face::Face;
pub use types::{DrawOrder, FormatVersion, GpuPlacement, PlacementEntry, SlotId};
