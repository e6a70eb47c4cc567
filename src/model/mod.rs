pub mod gene;
pub mod namespace;
pub mod types;

pub use gene::GeneGroup;
pub use namespace::{Namespace, NamespaceOrigin, NamespaceRef, NamespaceRegistry, SYMBOL_NAMESPACE};
pub use types::{BuildInfo, ChangeEvent, GroupId, NamespaceId};
