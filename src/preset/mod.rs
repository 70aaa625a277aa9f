//! Parameter model: the serializable [`Preset`](model::Preset) and its load/update contract.

/// Factory bank of named presets.
pub mod factory;
pub(crate) mod load;
/// Preset schema types.
pub mod model;
