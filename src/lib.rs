//! gene_alias_index
//!
//! Offline translation of gene identifiers. Every gene is one group holding
//! its canonical symbol, its aliases and its IDs in any number of external
//! namespaces (Ensembl, Entrez, HGNC, UniProt, or user tables), so any
//! namespace translates into any other through the shared group.

pub mod types;
pub mod error;
pub mod model;
pub mod index;
pub mod table;
pub mod translate;

#[cfg(test)]
mod test_support;

pub use index::{AliasIndex, IndexInfo};

pub use table::{AddDbReport, IndexBuilder, LoadReport, ReferenceKeys, TableFormat};

pub use translate::{EngineConfig, TranslateOptions, Translator};

pub use types::{Ids, Shaped, Translation};

pub use error::{BuildError, IndexError};

pub use model::gene::GeneGroup;
pub use model::namespace::{Namespace, NamespaceOrigin, NamespaceRef, SYMBOL_NAMESPACE};
pub use model::types::{ChangeEvent, GroupId, NamespaceId};
