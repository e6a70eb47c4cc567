use std::collections::HashMap;
use std::fmt;

use crate::model::types::NamespaceId;
use serde::{Deserialize, Serialize};

/// Name of the canonical-symbol namespace.
///
/// It is implicit: every index has it, it is never stored in the registry,
/// and it resolves through the alias set rather than through external IDs.
pub const SYMBOL_NAMESPACE: &str = "symbol";

/// Namespaces the translator has named shortcuts for.
pub const ENSEMBL_GENE: &str = "ensembl_gene";
pub const ENTREZ: &str = "entrez";
pub const HGNC: &str = "hgnc";
pub const UNIPROT: &str = "uniprot";

/// Where a namespace came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamespaceOrigin {
    /// A column of the reference dump.
    Reference,
    /// A user-supplied two-column table.
    User,
}

/// A registered external namespace plus display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: NamespaceId,
    pub name: String,
    pub label: String,
    pub origin: NamespaceOrigin,
}

impl Namespace {
    fn new(id: NamespaceId, name: &str, origin: NamespaceOrigin) -> Self {
        Self {
            id,
            name: name.to_string(),
            label: default_label(name),
            origin,
        }
    }
}

fn default_label(name: &str) -> String {
    match name {
        ENSEMBL_GENE => "Ensembl gene".to_string(),
        ENTREZ => "NCBI Gene (Entrez)".to_string(),
        HGNC => "HGNC ID".to_string(),
        UNIPROT => "UniProt accession".to_string(),
        other => other.to_string(),
    }
}

/// Resolved namespace argument of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceRef {
    Symbol,
    External(NamespaceId),
}

/// External namespaces, in registration order.
///
/// Namespaces are created once and never removed; names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceRegistry {
    namespaces: Vec<Namespace>,
    name_to_id: HashMap<String, NamespaceId>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` if new; returns its id either way.
    pub fn intern(&mut self, name: &str, origin: NamespaceOrigin) -> NamespaceId {
        if let Some(&id) = self.name_to_id.get(name) {
            return id;
        }
        let id = self.namespaces.len();
        self.namespaces.push(Namespace::new(id, name, origin));
        self.name_to_id.insert(name.to_string(), id);
        id
    }

    /// Remove the most recently registered namespace.
    pub(crate) fn pop_last(&mut self) -> Option<Namespace> {
        let ns = self.namespaces.pop()?;
        self.name_to_id.remove(&ns.name);
        Some(ns)
    }

    pub fn id(&self, name: &str) -> Option<NamespaceId> {
        self.name_to_id.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }

    pub fn get(&self, id: NamespaceId) -> Option<&Namespace> {
        self.namespaces.get(id)
    }

    pub fn name(&self, id: NamespaceId) -> &str {
        self.namespaces.get(id).map(|n| n.name.as_str()).unwrap_or("?")
    }

    /// Look up a query namespace. The symbol namespace is always known.
    pub fn lookup(&self, name: &str) -> Option<NamespaceRef> {
        if name == SYMBOL_NAMESPACE {
            return Some(NamespaceRef::Symbol);
        }
        self.id(name).map(NamespaceRef::External)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.iter()
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// All query namespace names, symbol namespace first.
    pub fn names(&self) -> Vec<String> {
        std::iter::once(SYMBOL_NAMESPACE.to_string())
            .chain(self.namespaces.iter().map(|n| n.name.clone()))
            .collect()
    }
}

impl fmt::Display for NamespaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceRef::Symbol => write!(f, "{SYMBOL_NAMESPACE}"),
            NamespaceRef::External(id) => write!(f, "#{id}"),
        }
    }
}
