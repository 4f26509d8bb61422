// Entity Models
// "Identity persists, values change"
//
// Each entity has:
// - Stable identity that NEVER changes
// - Values (name, aliases) owned and updated by the caller
// - Registry for ordered lookups

pub mod child;

pub use child::{Child, ChildRegistry};
