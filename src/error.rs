//! Error types for the alias index, the translator and the builder.

use thiserror::Error;

use crate::model::types::GroupId;
use crate::table::io::ParseError;

/// Errors raised by the alias index and the translation engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A query or merge named a namespace that is not registered.
    #[error("unknown namespace '{name}' (known: {known})")]
    UnknownNamespace { name: String, known: String },

    /// A new group was requested for a symbol that already anchors a group.
    #[error("canonical symbol '{symbol}' already exists")]
    DuplicateCanonicalSymbol { symbol: String },

    /// An identifier is already owned by another group.
    ///
    /// `owner` is the canonical symbol of the group holding the identifier,
    /// `target` the one the caller tried to attach it to.
    #[error("identifier '{identifier}' in namespace '{namespace}' belongs to {owner}, not {target}")]
    ConflictingAlias {
        namespace: String,
        identifier: String,
        owner: String,
        target: String,
    },

    /// A gene group needs a non-blank canonical symbol.
    #[error("empty canonical symbol")]
    EmptySymbol,

    #[error("no gene group with id {id}")]
    UnknownGroup { id: GroupId },

    /// The symbol namespace cannot be registered as an external namespace.
    #[error("'{name}' is reserved for canonical symbols")]
    ReservedNamespace { name: String },
}

/// Errors raised while building or extending an index from files.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A row could not be merged. Rows before it stay committed.
    #[error("line {line_no}: {source} ({rows_committed} earlier rows committed)")]
    Row {
        line_no: usize,
        rows_committed: usize,
        #[source]
        source: IndexError,
    },

    #[error(transparent)]
    Index(#[from] IndexError),
}

impl BuildError {
    /// The index error behind this failure, if any.
    pub fn index_error(&self) -> Option<&IndexError> {
        match self {
            BuildError::Row { source, .. } => Some(source),
            BuildError::Index(e) => Some(e),
            BuildError::Parse(_) => None,
        }
    }
}
