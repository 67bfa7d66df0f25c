//! Permission policy synthesis
//!
//! Stack names are mapped to rule sets through a [`StackPermissionTable`] and
//! folded together with the append-if-absent [`merge`]. The same merge combines
//! a freshly generated policy with the one already on disk, so repeated runs
//! never reorder or duplicate rules.

pub mod policy;
pub mod synthesizer;
pub mod table;

pub use policy::{merge, PermissionCategory, PermissionPolicy};
pub use synthesizer::PermissionSynthesizer;
pub use table::{PermissionSource, StackPermissionTable};
