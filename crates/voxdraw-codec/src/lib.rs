pub mod atlas;
pub mod codec;
pub mod lod;
pub mod shade;
pub mod shader;

pub use atlas::{AtlasGrid, UvRect};
pub use codec::{decode, encode, PackedVertex, VertexCodec, VertexFields};
pub use lod::lod_debug_color;
pub use shade::{shade_vertex, PlacementLookup, ShadedVertex};
pub use shader::{chunk_draw_source, wgsl_preamble};
