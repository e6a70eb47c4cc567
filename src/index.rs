use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::IndexError;
use crate::model::gene::GeneGroup;
use crate::model::namespace::{
    Namespace, NamespaceOrigin, NamespaceRef, NamespaceRegistry, SYMBOL_NAMESPACE,
};
use crate::model::types::{BuildInfo, ChangeEvent, GroupId, NamespaceId};

const MAGIC: &[u8; 4] = b"GAX1";
const VERSION_STR: &str = env!("CARGO_PKG_VERSION");

/// Reporting view of an index: version, build date, namespaces, change log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexInfo {
    pub version: String,
    pub build_date: DateTime<Utc>,
    /// Query namespace names, `symbol` first.
    pub namespaces: Vec<String>,
    pub change_log: Vec<ChangeEvent>,
}

impl fmt::Display for IndexInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "version: {}", self.version)?;
        writeln!(f, "date: {}", self.build_date.format("%c"))?;
        writeln!(f, "namespaces: {}", self.namespaces.join(", "))?;
        writeln!(f, "log:")?;
        for ev in &self.change_log {
            writeln!(f, "  - {ev}")?;
        }
        Ok(())
    }
}

/// The owning index type:
/// - namespace registry (name -> NamespaceId)
/// - gene groups, each anchored on one canonical symbol
/// - reverse maps: alias -> group, and per namespace external id -> group
///
/// Invariant: every alias and every (namespace, id) pair is owned by at most
/// one group. All mutation goes through [`AliasIndex::add_group`] and
/// [`AliasIndex::merge_into`], which check ownership before writing anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasIndex {
    namespaces: NamespaceRegistry,
    groups: Vec<GeneGroup>,

    alias_to_group: HashMap<String, GroupId>,
    // indexed by NamespaceId
    id_to_group: Vec<HashMap<String, GroupId>>,

    info: BuildInfo,
}

impl Default for AliasIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable summary of the `AliasIndex`.
///
/// Prints the totals, then one line per namespace with the number of IDs,
/// the number of genes linked to it and the mean IDs per linked gene.
impl fmt::Display for AliasIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "AliasIndex: {} genes, {} symbols, {} namespaces (+{})",
            self.groups.len(),
            self.alias_to_group.len(),
            self.namespaces.len(),
            SYMBOL_NAMESPACE
        )?;

        for ns in self.namespaces.iter() {
            let n_ids = self.id_to_group.get(ns.id).map(|m| m.len()).unwrap_or(0);
            let n_genes = self
                .groups
                .iter()
                .filter(|g| !g.ids(ns.id).is_empty())
                .count();
            let mean = if n_genes == 0 {
                0.0
            } else {
                n_ids as f64 / n_genes as f64
            };
            writeln!(
                f,
                "  - {} ({}, {:?}): ids={}, genes={}, mean_ids/gene={:.3}",
                ns.name, ns.label, ns.origin, n_ids, n_genes, mean
            )?;
        }

        Ok(())
    }
}

impl AliasIndex {
    pub fn new() -> Self {
        Self {
            namespaces: NamespaceRegistry::new(),
            groups: Vec::new(),
            alias_to_group: HashMap::new(),
            id_to_group: Vec::new(),
            info: BuildInfo::default(),
        }
    }

    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    /// Register an external namespace if new; returns its id either way.
    pub fn add_namespace(
        &mut self,
        name: &str,
        origin: NamespaceOrigin,
    ) -> Result<NamespaceId, IndexError> {
        let name = name.trim();
        if name == SYMBOL_NAMESPACE || name.is_empty() {
            return Err(IndexError::ReservedNamespace {
                name: name.to_string(),
            });
        }
        let id = self.namespaces.intern(name, origin);
        if self.id_to_group.len() <= id {
            self.id_to_group.resize_with(id + 1, HashMap::new);
        }
        Ok(id)
    }

    /// Resolve a namespace name as used in queries.
    pub fn namespace(&self, name: &str) -> Result<NamespaceRef, IndexError> {
        self.namespaces
            .lookup(name)
            .ok_or_else(|| IndexError::UnknownNamespace {
                name: name.to_string(),
                known: self.namespaces.names().join(", "),
            })
    }

    pub fn namespace_name(&self, ns: NamespaceRef) -> &str {
        match ns {
            NamespaceRef::Symbol => SYMBOL_NAMESPACE,
            NamespaceRef::External(id) => self.namespaces.name(id),
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[GeneGroup] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&GeneGroup> {
        self.groups.get(id)
    }

    /// Look up any identifier: aliases first, then every namespace in
    /// registration order.
    pub fn resolve(&self, identifier: &str) -> Option<&GeneGroup> {
        self.resolve_symbol(identifier).or_else(|| {
            self.namespaces
                .iter()
                .find_map(|ns| self.resolve_in(NamespaceRef::External(ns.id), identifier))
        })
    }

    /// Look up a canonical symbol or alias.
    pub fn resolve_symbol(&self, symbol: &str) -> Option<&GeneGroup> {
        self.resolve_in(NamespaceRef::Symbol, symbol)
    }

    /// Look up an identifier within one namespace.
    pub fn resolve_in(&self, ns: NamespaceRef, identifier: &str) -> Option<&GeneGroup> {
        self.owner(ns, identifier).map(|gid| &self.groups[gid])
    }

    fn owner(&self, ns: NamespaceRef, identifier: &str) -> Option<GroupId> {
        match ns {
            NamespaceRef::Symbol => self.alias_to_group.get(identifier).copied(),
            NamespaceRef::External(id) => self.id_to_group.get(id)?.get(identifier).copied(),
        }
    }

    /// Owner of `identifier` in `ns`, if it is not `target`.
    fn foreign_owner(&self, ns: NamespaceRef, identifier: &str, target: Option<GroupId>) -> Option<GroupId> {
        self.owner(ns, identifier).filter(|&gid| Some(gid) != target)
    }

    fn conflict(
        &self,
        ns: NamespaceRef,
        identifier: &str,
        owner: GroupId,
        target: &str,
    ) -> IndexError {
        IndexError::ConflictingAlias {
            namespace: self.namespace_name(ns).to_string(),
            identifier: identifier.to_string(),
            owner: self.groups[owner].canonical_symbol().to_string(),
            target: target.to_string(),
        }
    }

    fn check_namespace(&self, ns: NamespaceRef) -> Result<(), IndexError> {
        match ns {
            NamespaceRef::External(id) if self.namespaces.get(id).is_none() => {
                Err(IndexError::UnknownNamespace {
                    name: format!("#{id}"),
                    known: self.namespaces.names().join(", "),
                })
            }
            _ => Ok(()),
        }
    }

    /// Create a new group.
    ///
    /// Fails with `EmptySymbol` for a blank symbol, with
    /// `DuplicateCanonicalSymbol` if `canonical_symbol` already anchors a
    /// group, and with `ConflictingAlias` if any alias or ID is
    /// owned by an existing group. Nothing is written on failure.
    pub fn add_group(
        &mut self,
        canonical_symbol: &str,
        aliases: &[&str],
        external_ids: &[(NamespaceId, &[&str])],
    ) -> Result<GroupId, IndexError> {
        let canonical = canonical_symbol.trim();
        if canonical.is_empty() {
            return Err(IndexError::EmptySymbol);
        }

        if let Some(owner) = self.owner(NamespaceRef::Symbol, canonical) {
            if self.groups[owner].canonical_symbol() == canonical {
                return Err(IndexError::DuplicateCanonicalSymbol {
                    symbol: canonical.to_string(),
                });
            }
            return Err(self.conflict(NamespaceRef::Symbol, canonical, owner, canonical));
        }
        for alias in aliases {
            if let Some(owner) = self.foreign_owner(NamespaceRef::Symbol, alias.trim(), None) {
                return Err(self.conflict(NamespaceRef::Symbol, alias.trim(), owner, canonical));
            }
        }
        for (ns, ids) in external_ids {
            let ns = NamespaceRef::External(*ns);
            self.check_namespace(ns)?;
            for id in ids.iter() {
                if let Some(owner) = self.foreign_owner(ns, id.trim(), None) {
                    return Err(self.conflict(ns, id.trim(), owner, canonical));
                }
            }
        }

        let gid = self.groups.len();
        self.groups.push(GeneGroup::new(gid, canonical));
        self.alias_to_group.insert(canonical.to_string(), gid);

        for alias in aliases {
            self.attach(gid, NamespaceRef::Symbol, alias);
        }
        for (ns, ids) in external_ids {
            for id in ids.iter() {
                self.attach(gid, NamespaceRef::External(*ns), id);
            }
        }

        Ok(gid)
    }

    /// Attach identifiers to an existing group.
    ///
    /// `ns` may be the symbol namespace, in which case the identifiers become
    /// aliases. IDs the group already holds are skipped. Fails with
    /// `ConflictingAlias` if any identifier belongs to a different group; in
    /// that case nothing is written. Returns the number of new identifiers.
    pub fn merge_into(
        &mut self,
        group: GroupId,
        ns: NamespaceRef,
        new_ids: &[&str],
    ) -> Result<usize, IndexError> {
        if group >= self.groups.len() {
            return Err(IndexError::UnknownGroup { id: group });
        }
        self.check_namespace(ns)?;

        for id in new_ids {
            if let Some(owner) = self.foreign_owner(ns, id.trim(), Some(group)) {
                let target = self.groups[group].canonical_symbol().to_string();
                return Err(self.conflict(ns, id.trim(), owner, &target));
            }
        }

        Ok(new_ids
            .iter()
            .filter(|id| self.attach(group, ns, id))
            .count())
    }

    /// Write one identifier into a group and the reverse map.
    /// Callers have checked ownership.
    fn attach(&mut self, gid: GroupId, ns: NamespaceRef, identifier: &str) -> bool {
        let identifier = identifier.trim();
        let added = match ns {
            NamespaceRef::Symbol => self.groups[gid].add_alias(identifier),
            NamespaceRef::External(id) => self.groups[gid].add_id(id, identifier),
        };
        if added {
            match ns {
                NamespaceRef::Symbol => {
                    self.alias_to_group.insert(identifier.to_string(), gid);
                }
                NamespaceRef::External(id) => {
                    self.id_to_group[id].insert(identifier.to_string(), gid);
                }
            }
        }
        added
    }

    pub fn info(&self) -> IndexInfo {
        IndexInfo {
            version: self.info.version.clone(),
            build_date: self.info.build_date,
            namespaces: self.namespaces.names(),
            change_log: self.info.change_log.clone(),
        }
    }

    pub fn namespace_details(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.iter()
    }

    /// Unregister `ns` if it is the latest namespace and holds no IDs.
    pub(crate) fn forget_namespace(&mut self, ns: NamespaceId) -> bool {
        let is_last = ns + 1 == self.namespaces.len();
        let unused = self.id_to_group.get(ns).is_some_and(|m| m.is_empty());
        if !(is_last && unused) {
            return false;
        }
        self.namespaces.pop_last();
        self.id_to_group.truncate(ns);
        true
    }

    pub(crate) fn record(&mut self, event: ChangeEvent) {
        self.info.change_log.push(event);
    }

    pub(crate) fn stamp_build_date(&mut self, at: DateTime<Utc>) {
        self.info.build_date = at;
    }

    /// Serialize this index with a small header (magic + crate version) and a bincode payload.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut f = BufWriter::new(
            File::create(path).with_context(|| format!("create {}", path.display()))?,
        );

        f.write_all(MAGIC)?;

        let v = VERSION_STR.as_bytes();
        let len = v.len() as u16;
        f.write_all(&len.to_le_bytes())?;
        f.write_all(v)?;

        bincode::serialize_into(&mut f, self)?;
        f.flush()?;

        info!(path = %path.display(), genes = self.groups.len(), "index written");
        Ok(())
    }

    /// Load an index written by `save()`. Rejects wrong file types and version mismatches.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut f = BufReader::new(
            File::open(path).with_context(|| format!("open {}", path.display()))?,
        );

        let mut magic = [0u8; 4];
        f.read_exact(&mut magic)?;
        if &magic != MAGIC {
            bail!("Not an AliasIndex file (bad magic)");
        }

        let mut len_buf = [0u8; 2];
        f.read_exact(&mut len_buf)?;
        let len = u16::from_le_bytes(len_buf) as usize;

        let mut ver_buf = vec![0u8; len];
        f.read_exact(&mut ver_buf)?;
        let file_version = std::str::from_utf8(&ver_buf)?;

        if file_version != VERSION_STR {
            bail!(
                "Index version mismatch: file={}, binary={}",
                file_version,
                VERSION_STR
            );
        }

        let idx: Self = bincode::deserialize_from(&mut f)?;
        info!(path = %path.display(), genes = idx.groups.len(), "index loaded");
        Ok(idx)
    }

    /// Panics if the reverse maps disagree with the groups.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut n_ids = vec![0usize; self.id_to_group.len()];
        let mut n_aliases = 0;
        for g in &self.groups {
            for a in g.aliases() {
                assert_eq!(self.alias_to_group.get(a), Some(&g.id), "alias {a}");
                n_aliases += 1;
            }
            for ns in g.linked_namespaces() {
                for id in g.ids(ns) {
                    assert_eq!(self.id_to_group[ns].get(id), Some(&g.id), "id {id}");
                    n_ids[ns] += 1;
                }
            }
        }
        assert_eq!(n_aliases, self.alias_to_group.len());
        for (ns, map) in self.id_to_group.iter().enumerate() {
            assert_eq!(n_ids[ns], map.len());
        }
    }
}
