//! Source texture ingestion.

/// Image decoding into straight-alpha RGBA8 textures.
pub mod decode;

pub use decode::{Texture, decode_texture};
