use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::BuildError;
use crate::index::AliasIndex;
use crate::model::namespace::{NamespaceOrigin, NamespaceRef};
use crate::model::types::{ChangeEvent, NamespaceId};
use crate::table::io::{
    namespace_for_column, open_text, ReferenceKeys, ReferenceReader, TableFormat, TableReader,
    TableRow,
};

/// Outcome of a reference load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub genes: usize,
    /// Rows whose symbol was already loaded by an earlier row.
    pub duplicate_rows: usize,
    /// Aliases already claimed by an earlier gene.
    pub dropped_aliases: usize,
    /// IDs already claimed by an earlier gene in the same namespace.
    pub dropped_ids: usize,
}

/// Outcome of merging one user table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddDbReport {
    pub namespace: String,
    /// Rows applied (including no-op rows).
    pub rows: usize,
    /// Rows attached to an existing gene.
    pub merged_rows: usize,
    /// Rows that created a new gene.
    pub new_groups: usize,
    pub ids_added: usize,
    /// Rows for known genes with an empty `external` column.
    pub empty_rows: usize,
}

/// Builds and extends an [`AliasIndex`].
///
/// The builder owns its working copy. Nothing a caller already holds sees
/// the changes until it takes the result with [`IndexBuilder::finish`]:
///
/// ```
/// use std::io::Cursor;
/// use gene_alias_index::{IndexBuilder, Translator};
///
/// let mut builder = IndexBuilder::new();
/// builder
///     .add_db_reader(Cursor::new("symbol\texternal\nMYC\ta,b\n"), "toy")
///     .unwrap();
/// let index = builder.finish();
///
/// let tr = Translator::new(&index);
/// let sym = tr.id_to_symbol("b", "toy").unwrap();
/// assert_eq!(sym.into_one().unwrap().value(), Some("MYC"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    index: AliasIndex,
    pub format: TableFormat,
}

impl IndexBuilder {
    /// Start from an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing index (pass a clone to build speculatively).
    pub fn from_index(index: AliasIndex) -> Self {
        Self {
            index,
            format: TableFormat::default(),
        }
    }

    /// Convenience: separator between IDs in the `external` column.
    pub fn id_delimiter(mut self, delimiter: char) -> Self {
        self.format.id_delimiter = delimiter;
        self
    }

    /// Convenience: whether user tables start with a header line.
    pub fn has_header(mut self, has_header: bool) -> Self {
        self.format.has_header = has_header;
        self
    }

    pub fn index(&self) -> &AliasIndex {
        &self.index
    }

    /// Hand over the built index.
    pub fn finish(self) -> AliasIndex {
        self.index
    }

    /// Replace the working index with one built from a reference dump file.
    ///
    /// `.gz` paths are decompressed on the fly.
    pub fn load_reference<P: AsRef<Path>>(
        &mut self,
        path: P,
        keys: &ReferenceKeys,
    ) -> Result<LoadReport, BuildError> {
        let path = path.as_ref();
        let reader = open_text(path)?;
        self.load_reference_reader(reader, keys, &path.display().to_string())
    }

    /// Replace the working index with one built from a reference dump.
    ///
    /// Policy:
    /// - a gene's aliases are its alias and previous symbols, deduped and
    ///   sorted; strings that are the canonical symbol of any row are not
    ///   used as aliases
    /// - an alias or ID claimed by an earlier row is dropped for later rows
    /// - a repeated symbol row is skipped
    ///
    /// On error the working index is left untouched.
    pub fn load_reference_reader<R: BufRead>(
        &mut self,
        reader: R,
        keys: &ReferenceKeys,
        source: &str,
    ) -> Result<LoadReport, BuildError> {
        let records = ReferenceReader::new(reader, keys)?
            .records()
            .collect::<Result<Vec<_>, _>>()?;

        let canonical: HashSet<&str> = records.iter().map(|r| r.symbol.as_str()).collect();

        let mut index = AliasIndex::new();
        let namespaces: Vec<NamespaceId> = keys
            .id_keys
            .iter()
            .map(|k| index.add_namespace(&namespace_for_column(k), NamespaceOrigin::Reference))
            .collect::<Result<_, _>>()?;

        let mut report = LoadReport::default();

        for rec in &records {
            if index.resolve_symbol(&rec.symbol).is_some() {
                debug!(symbol = %rec.symbol, line = rec.line_no, "duplicate reference row skipped");
                report.duplicate_rows += 1;
                continue;
            }

            let mut synonyms: Vec<&str> = rec
                .synonyms
                .iter()
                .map(String::as_str)
                .filter(|s| *s != rec.symbol && !canonical.contains(s))
                .collect();
            synonyms.sort_unstable();
            synonyms.dedup();

            let before = synonyms.len();
            synonyms.retain(|s| index.resolve_symbol(s).is_none());
            if synonyms.len() < before {
                debug!(symbol = %rec.symbol, dropped = before - synonyms.len(), "ambiguous aliases dropped");
                report.dropped_aliases += before - synonyms.len();
            }

            let mut ids: Vec<(NamespaceId, Vec<&str>)> = Vec::with_capacity(namespaces.len());
            for (&ns, values) in namespaces.iter().zip(&rec.ids) {
                let kept: Vec<&str> = values
                    .iter()
                    .map(String::as_str)
                    .filter(|v| index.resolve_in(NamespaceRef::External(ns), v).is_none())
                    .collect();
                report.dropped_ids += values.len() - kept.len();
                ids.push((ns, kept));
            }
            let ids: Vec<(NamespaceId, &[&str])> =
                ids.iter().map(|(ns, v)| (*ns, v.as_slice())).collect();

            index
                .add_group(&rec.symbol, &synonyms, &ids)
                .map_err(|source| BuildError::Row {
                    line_no: rec.line_no,
                    rows_committed: report.genes,
                    source,
                })?;
            report.genes += 1;
        }

        if report.dropped_aliases > 0 || report.dropped_ids > 0 {
            warn!(
                aliases = report.dropped_aliases,
                ids = report.dropped_ids,
                "identifiers shared by several genes were kept by the first gene only"
            );
        }

        let now = Utc::now();
        index.stamp_build_date(now);
        index.record(ChangeEvent::ReferenceLoaded {
            source: source.to_string(),
            groups: report.genes,
            at: now,
        });
        info!(source, genes = report.genes, "reference loaded");

        self.index = index;
        Ok(report)
    }

    /// Merge a two-column table file into the working index under `name`.
    ///
    /// Rows are applied one at a time. A row that conflicts with the index
    /// fails the call with [`BuildError::Row`]; it is not applied at all,
    /// and rows before it stay applied.
    ///
    /// The `NamespaceAdded`/`NamespaceExtended` log entry is written once a
    /// row is committed or the call completes. A new namespace whose first
    /// row already fails is unregistered again.
    pub fn add_db<P: AsRef<Path>>(&mut self, path: P, name: &str) -> Result<AddDbReport, BuildError> {
        let reader = open_text(path.as_ref())?;
        self.add_db_reader(reader, name)
    }

    /// Same as [`IndexBuilder::add_db`], reading from any `BufRead`.
    pub fn add_db_reader<R: BufRead>(&mut self, reader: R, name: &str) -> Result<AddDbReport, BuildError> {
        let rows = TableReader::new(reader, self.format.clone())
            .records()
            .map(|row| row.map_err(BuildError::from));
        self.merge_rows(rows, name)
    }

    /// Merge already-parsed rows under `name`; same policy as `add_db`.
    pub fn add_rows<I>(&mut self, rows: I, name: &str) -> Result<AddDbReport, BuildError>
    where
        I: IntoIterator<Item = TableRow>,
    {
        self.merge_rows(rows.into_iter().map(Ok), name)
    }

    fn merge_rows<I>(&mut self, rows: I, name: &str) -> Result<AddDbReport, BuildError>
    where
        I: Iterator<Item = Result<TableRow, BuildError>>,
    {
        let name = name.trim();
        let existed = self.index.namespaces().contains(name);
        let ns = self.index.add_namespace(name, NamespaceOrigin::User)?;
        let mut report = AddDbReport {
            namespace: name.to_string(),
            ..Default::default()
        };

        let mut outcome: Result<(), BuildError> = Ok(());
        for row in rows {
            outcome = row.and_then(|row| self.apply_row(ns, &row, &mut report));
            if outcome.is_err() {
                break;
            }
        }

        if let Err(err) = outcome {
            if report.rows > 0 {
                self.record_namespace(name, existed);
            } else if !existed {
                self.index.forget_namespace(ns);
            }
            return Err(err);
        }

        self.record_namespace(name, existed);
        info!(
            namespace = %report.namespace,
            rows = report.rows,
            new_genes = report.new_groups,
            ids = report.ids_added,
            "table merged"
        );
        Ok(report)
    }

    fn record_namespace(&mut self, name: &str, existed: bool) {
        let at = Utc::now();
        let name = name.to_string();
        if existed {
            info!(namespace = %name, "extending namespace");
            self.index.record(ChangeEvent::NamespaceExtended { name, at });
        } else {
            info!(namespace = %name, "adding namespace");
            self.index.record(ChangeEvent::NamespaceAdded { name, at });
        }
    }

    fn apply_row(
        &mut self,
        ns: NamespaceId,
        row: &TableRow,
        report: &mut AddDbReport,
    ) -> Result<(), BuildError> {
        let symbol = row.symbol.trim();
        let ids: Vec<&str> = row.ids.iter().map(String::as_str).collect();

        let applied = match self.index.resolve_symbol(symbol).map(|g| g.id) {
            Some(_) if ids.is_empty() => {
                debug!(symbol, line = row.line_no, "row without ids");
                report.empty_rows += 1;
                Ok(())
            }
            Some(gid) => self
                .index
                .merge_into(gid, NamespaceRef::External(ns), &ids)
                .map(|added| {
                    report.merged_rows += 1;
                    report.ids_added += added;
                }),
            None => self
                .index
                .add_group(symbol, &[], &[(ns, ids.as_slice())])
                .map(|gid| {
                    debug!(symbol, line = row.line_no, "new gene group from user table");
                    report.new_groups += 1;
                    report.ids_added += self.index.group(gid).map_or(0, |g| g.ids(ns).len());
                }),
        };

        applied.map_err(|source| BuildError::Row {
            line_no: row.line_no,
            rows_committed: report.rows,
            source,
        })?;
        report.rows += 1;
        Ok(())
    }
}

// -------------------- tests --------------------
