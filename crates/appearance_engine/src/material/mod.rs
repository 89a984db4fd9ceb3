//! Material properties and parent/child inheritance

mod inheritance;
mod params;
mod property;

pub use inheritance::{
    apply_edit, compute_independence, effective_parent, parent_chain, resolve_effective,
    resolve_parent, toggle_independence, IndependenceSet, ResolvedMaterial, ValueSource,
    MAX_CHAIN_DEPTH,
};
pub use params::{PbrMaterialParams, TextureTransform};
pub use property::{PropertyKind, PropertyName, PropertyValue, RawValue, Rgb, NO_TEXTURE};
