use std::collections::BTreeMap;

use crate::model::types::{GroupId, NamespaceId};
use serde::{Deserialize, Serialize};

/// Gene group: one gene, all of its symbols and all of its external IDs.
///
/// Notes:
/// - `aliases[0]` is the canonical symbol; it is set on creation and never changes.
/// - further aliases keep insertion order (deduped).
/// - external IDs are kept per namespace, in insertion order (deduped).
///
/// Ownership of a name across groups is enforced by the owning
/// [`AliasIndex`](crate::AliasIndex), not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneGroup {
    pub id: GroupId,
    aliases: Vec<String>,
    external_ids: BTreeMap<NamespaceId, Vec<String>>,
}

impl GeneGroup {
    pub fn new(id: GroupId, canonical_symbol: impl Into<String>) -> Self {
        Self {
            id,
            aliases: vec![canonical_symbol.into()],
            external_ids: BTreeMap::new(),
        }
    }

    pub fn canonical_symbol(&self) -> &str {
        &self.aliases[0]
    }

    /// All symbols, canonical first.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Aliases other than the canonical symbol.
    pub fn synonyms(&self) -> &[String] {
        &self.aliases[1..]
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }

    /// Add an alias (deduped). Returns true if it was new.
    pub(crate) fn add_alias(&mut self, alias: &str) -> bool {
        let alias = alias.trim();
        if alias.is_empty() || self.has_alias(alias) {
            return false;
        }
        self.aliases.push(alias.to_string());
        true
    }

    /// IDs in `ns`, empty if the gene was never linked to that namespace.
    pub fn ids(&self, ns: NamespaceId) -> &[String] {
        self.external_ids.get(&ns).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn has_id(&self, ns: NamespaceId, id: &str) -> bool {
        self.ids(ns).iter().any(|x| x == id)
    }

    /// Namespaces this gene has at least one ID in.
    pub fn linked_namespaces(&self) -> impl Iterator<Item = NamespaceId> + '_ {
        self.external_ids
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(&ns, _)| ns)
    }

    /// Add an external ID (deduped). Returns true if it was new.
    pub(crate) fn add_id(&mut self, ns: NamespaceId, id: &str) -> bool {
        let id = id.trim();
        if id.is_empty() {
            return false;
        }
        let ids = self.external_ids.entry(ns).or_default();
        if ids.iter().any(|x| x == id) {
            return false;
        }
        ids.push(id.to_string());
        true
    }
}
