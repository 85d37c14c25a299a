pub mod compat;
pub mod compress;
pub mod error;
pub mod format;
pub mod load;
pub mod save;

pub use error::PersistError;
pub use format::{Section, SnapshotHeader};
pub use load::{load, LoadedSnapshot};
pub use save::{save, FrameSnapshot};
