//! Query surface over an [`AliasIndex`].
//!
//! Every operation resolves each input identifier to its gene group and reads
//! the answer off that group, so any two namespaces (user-added ones
//! included) translate into each other without pairwise tables.

use crate::error::IndexError;
use crate::index::{AliasIndex, IndexInfo};
use crate::model::gene::GeneGroup;
use crate::model::namespace::{NamespaceRef, ENSEMBL_GENE, ENTREZ, HGNC, SYMBOL_NAMESPACE, UNIPROT};
use crate::types::{Ids, Shaped, Translation};

/// Caller-owned engine settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Returned for identifiers that do not resolve. `None` is the explicit
    /// "no match" marker.
    pub default_null_id: Option<String>,
}

/// Options controlling how one translation call picks its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Collapse each candidate list to its first element.
    pub select_one: bool,

    /// When translating into the symbol namespace, return every alias
    /// (canonical symbol first) instead of only the canonical symbol.
    pub all_synonyms: bool,

    /// Bias list. Candidates found here win, in this list's order; if none
    /// match, the normal candidates are used.
    pub preferred_ids: Vec<String>,

    /// Overrides [`EngineConfig::default_null_id`] for this call.
    pub default_null_id: Option<String>,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            select_one: true,
            all_synonyms: false,
            preferred_ids: Vec::new(),
            default_null_id: None,
        }
    }
}

impl TranslateOptions {
    /// Keep full candidate lists.
    pub fn select_all(mut self) -> Self {
        self.select_one = false;
        self
    }

    pub fn with_all_synonyms(mut self) -> Self {
        self.all_synonyms = true;
        self
    }

    pub fn preferring<S: AsRef<str>>(mut self, ids: &[S]) -> Self {
        self.preferred_ids = ids.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    pub fn with_null_id(mut self, null: impl Into<String>) -> Self {
        self.default_null_id = Some(null.into());
        self
    }
}

/// Read-only translator borrowing an index.
///
/// # Example
/// ```
/// use std::io::Cursor;
/// use gene_alias_index::{IndexBuilder, ReferenceKeys, Translator};
///
/// let tsv = "\
/// symbol\talias_symbol\tprev_symbol\tentrez_id
/// MYC\tc-Myc|bHLHe39\tMYCC\t4609
/// ";
/// let keys = ReferenceKeys { id_keys: vec!["entrez_id".into()], ..Default::default() };
/// let mut builder = IndexBuilder::new();
/// builder.load_reference_reader(Cursor::new(tsv), &keys, "inline").unwrap();
/// let index = builder.finish();
///
/// let mut tr = Translator::new(&index);
/// let out = tr.symbol_to_entrez(vec!["c-Myc", "FAKE"]).unwrap().into_vec();
/// assert_eq!(out[0].value(), Some("4609"));
/// assert_eq!(out[1].value(), None);
///
/// tr.set_default_null_id(Some("unknown"));
/// let miss = tr.entrez_to_symbol("0").unwrap().into_one().unwrap();
/// assert_eq!(miss.value(), Some("unknown"));
/// ```
#[derive(Debug, Clone)]
pub struct Translator<'a> {
    index: &'a AliasIndex,
    config: EngineConfig,
}

impl<'a> Translator<'a> {
    pub fn new(index: &'a AliasIndex) -> Self {
        Self::with_config(index, EngineConfig::default())
    }

    pub fn with_config(index: &'a AliasIndex, config: EngineConfig) -> Self {
        Self { index, config }
    }

    pub fn index(&self) -> &'a AliasIndex {
        self.index
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Change the value returned for misses by later calls.
    pub fn set_default_null_id(&mut self, null: Option<&str>) {
        self.config.default_null_id = null.map(str::to_string);
    }

    pub fn info(&self) -> IndexInfo {
        self.index.info()
    }

    /// Translate identifiers from one namespace into another.
    ///
    /// Steps, per input identifier:
    /// 1) resolve it in `from` (aliases for the symbol namespace); a miss
    ///    yields the null id and does not affect other inputs
    /// 2) gather candidates in `to`: the canonical symbol, all aliases, or
    ///    the group's IDs in that namespace
    /// 3) apply `preferred_ids`, then `select_one`
    ///
    /// Fails only for unknown namespace names, before anything is resolved.
    pub fn translate(
        &self,
        ids: impl Into<Ids>,
        from: &str,
        to: &str,
        opts: &TranslateOptions,
    ) -> Result<Shaped<Translation>, IndexError> {
        let from = self.index.namespace(from)?;
        let to = self.index.namespace(to)?;
        let null = self.null_id(opts);
        let ids: Ids = ids.into();

        Ok(ids.map(|id| self.translate_one(id, from, to, opts, &null)))
    }

    fn null_id(&self, opts: &TranslateOptions) -> Option<String> {
        opts.default_null_id
            .clone()
            .or_else(|| self.config.default_null_id.clone())
    }

    fn translate_one(
        &self,
        id: &str,
        from: NamespaceRef,
        to: NamespaceRef,
        opts: &TranslateOptions,
        null: &Option<String>,
    ) -> Translation {
        let Some(group) = self.index.resolve_in(from, id.trim()) else {
            return Translation::Missing(null.clone());
        };

        let picked = candidates(group, to, opts);
        if picked.is_empty() {
            Translation::Missing(null.clone())
        } else if opts.select_one {
            Translation::One(picked[0].to_string())
        } else {
            Translation::All(picked.into_iter().map(str::to_string).collect())
        }
    }

    /// Symbols to IDs of `namespace`.
    pub fn symbol_to_id(
        &self,
        ids: impl Into<Ids>,
        namespace: &str,
        select_one: bool,
    ) -> Result<Shaped<Translation>, IndexError> {
        let opts = TranslateOptions {
            select_one,
            ..Default::default()
        };
        self.translate(ids, SYMBOL_NAMESPACE, namespace, &opts)
    }

    /// IDs of `namespace` to canonical symbols.
    pub fn id_to_symbol(
        &self,
        ids: impl Into<Ids>,
        namespace: &str,
    ) -> Result<Shaped<Translation>, IndexError> {
        self.id_to_symbol_with(ids, namespace, &TranslateOptions::default())
    }

    /// [`Translator::id_to_symbol`] with `preferred_ids`, `all_synonyms` and
    /// the other options.
    pub fn id_to_symbol_with(
        &self,
        ids: impl Into<Ids>,
        namespace: &str,
        opts: &TranslateOptions,
    ) -> Result<Shaped<Translation>, IndexError> {
        self.translate(ids, namespace, SYMBOL_NAMESPACE, opts)
    }

    /// Translate between two external namespaces through the shared gene.
    pub fn cross_id(
        &self,
        ids: impl Into<Ids>,
        from: &str,
        to: &str,
        select_one: bool,
    ) -> Result<Shaped<Translation>, IndexError> {
        let opts = TranslateOptions {
            select_one,
            ..Default::default()
        };
        self.cross_id_with(ids, from, to, &opts)
    }

    pub fn cross_id_with(
        &self,
        ids: impl Into<Ids>,
        from: &str,
        to: &str,
        opts: &TranslateOptions,
    ) -> Result<Shaped<Translation>, IndexError> {
        self.translate(ids, from, to, opts)
    }

    /// Aliases of each symbol, without the canonical symbol and without the
    /// queried name itself, in stored order.
    pub fn synonyms(&self, ids: impl Into<Ids>) -> Shaped<Translation> {
        let null = self.config.default_null_id.clone();
        let ids: Ids = ids.into();
        ids.map(|id| {
            let id = id.trim();
            match self.index.resolve_symbol(id) {
                Some(group) => Translation::All(
                    group
                        .synonyms()
                        .iter()
                        .filter(|s| s.as_str() != id)
                        .cloned()
                        .collect(),
                ),
                None => Translation::Missing(null.clone()),
            }
        })
    }

    /// Canonical symbol for any alias.
    pub fn official_symbol(&self, ids: impl Into<Ids>) -> Shaped<Translation> {
        let null = self.config.default_null_id.clone();
        let ids: Ids = ids.into();
        ids.map(|id| match self.index.resolve_symbol(id.trim()) {
            Some(group) => Translation::One(group.canonical_symbol().to_string()),
            None => Translation::Missing(null.clone()),
        })
    }

    // Built-in namespaces

    pub fn symbol_to_ensembl_gene(&self, ids: impl Into<Ids>) -> Result<Shaped<Translation>, IndexError> {
        self.symbol_to_id(ids, ENSEMBL_GENE, true)
    }

    pub fn ensembl_gene_to_symbol(&self, ids: impl Into<Ids>) -> Result<Shaped<Translation>, IndexError> {
        self.id_to_symbol(ids, ENSEMBL_GENE)
    }

    pub fn ensembl_gene_to_symbol_with(
        &self,
        ids: impl Into<Ids>,
        opts: &TranslateOptions,
    ) -> Result<Shaped<Translation>, IndexError> {
        self.id_to_symbol_with(ids, ENSEMBL_GENE, opts)
    }

    pub fn symbol_to_entrez(&self, ids: impl Into<Ids>) -> Result<Shaped<Translation>, IndexError> {
        self.symbol_to_id(ids, ENTREZ, true)
    }

    pub fn entrez_to_symbol(&self, ids: impl Into<Ids>) -> Result<Shaped<Translation>, IndexError> {
        self.id_to_symbol(ids, ENTREZ)
    }

    pub fn entrez_to_symbol_with(
        &self,
        ids: impl Into<Ids>,
        opts: &TranslateOptions,
    ) -> Result<Shaped<Translation>, IndexError> {
        self.id_to_symbol_with(ids, ENTREZ, opts)
    }

    pub fn symbol_to_hgnc(&self, ids: impl Into<Ids>) -> Result<Shaped<Translation>, IndexError> {
        self.symbol_to_id(ids, HGNC, true)
    }

    pub fn hgnc_to_symbol(&self, ids: impl Into<Ids>) -> Result<Shaped<Translation>, IndexError> {
        self.id_to_symbol(ids, HGNC)
    }

    pub fn hgnc_to_symbol_with(
        &self,
        ids: impl Into<Ids>,
        opts: &TranslateOptions,
    ) -> Result<Shaped<Translation>, IndexError> {
        self.id_to_symbol_with(ids, HGNC, opts)
    }

    pub fn symbol_to_uniprot(&self, ids: impl Into<Ids>) -> Result<Shaped<Translation>, IndexError> {
        self.symbol_to_id(ids, UNIPROT, true)
    }

    pub fn uniprot_to_symbol(&self, ids: impl Into<Ids>) -> Result<Shaped<Translation>, IndexError> {
        self.id_to_symbol(ids, UNIPROT)
    }

    pub fn uniprot_to_symbol_with(
        &self,
        ids: impl Into<Ids>,
        opts: &TranslateOptions,
    ) -> Result<Shaped<Translation>, IndexError> {
        self.id_to_symbol_with(ids, UNIPROT, opts)
    }
}

/// Candidate values of `group` in `to`, after the preference rule.
///
/// For the symbol namespace the pool is widened to every alias whenever a
/// preference list is given, so a preferred alias can win even without
/// `all_synonyms`. Without a preferred hit the result is the canonical
/// symbol alone, or all aliases if `all_synonyms` is set.
fn candidates<'g>(group: &'g GeneGroup, to: NamespaceRef, opts: &TranslateOptions) -> Vec<&'g str> {
    let preferring = !opts.preferred_ids.is_empty();

    let (pool, fallback): (&[String], &[String]) = match to {
        NamespaceRef::Symbol => {
            let all = group.aliases();
            let fallback = if opts.all_synonyms { all } else { &all[..1] };
            (if preferring { all } else { fallback }, fallback)
        }
        NamespaceRef::External(ns) => (group.ids(ns), group.ids(ns)),
    };

    if preferring {
        let mut hits: Vec<&'g str> = Vec::new();
        for p in &opts.preferred_ids {
            if let Some(c) = pool.iter().find(|c| *c == p) {
                if !hits.contains(&c.as_str()) {
                    hits.push(c.as_str());
                }
            }
        }
        if !hits.is_empty() {
            return hits;
        }
    }

    fallback.iter().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{reference_builder, reference_index};
    use std::io::Cursor;

    fn values(res: Shaped<Translation>) -> Vec<Option<String>> {
        res.into_vec()
            .iter()
            .map(|t| t.value().map(str::to_string))
            .collect()
    }

    fn some(v: &[&str]) -> Vec<Option<String>> {
        v.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn end_to_end_scenario() {
        let idx = reference_index();
        let tr = Translator::new(&idx);

        let ens = tr.symbol_to_ensembl_gene("MYC").unwrap();
        assert_eq!(ens, Shaped::One(Translation::One("ENSG00000136997".into())));
        let back = tr.ensembl_gene_to_symbol(ens.to_ids()).unwrap();
        assert_eq!(back, Shaped::One(Translation::One("MYC".into())));

        assert_eq!(
            tr.synonyms("MYC"),
            Shaped::One(Translation::All(vec![
                "MYCC".into(),
                "bHLHe39".into(),
                "c-Myc".into()
            ]))
        );

        let entrez = tr.symbol_to_entrez(vec!["FOXP2", "MYC", "CEBPA"]).unwrap();
        assert_eq!(values(entrez), some(&["93986", "4609", "1050"]));
    }

    #[test]
    fn round_trip_returns_canonical_symbol() {
        let idx = reference_index();
        let tr = Translator::new(&idx);

        for group in idx.groups() {
            for ns in group.linked_namespaces() {
                let ns_name = idx.namespaces().name(ns);
                for input in group.aliases() {
                    let there = tr.symbol_to_id(input.as_str(), ns_name, true).unwrap();
                    let back = tr.id_to_symbol(there.to_ids(), ns_name).unwrap();
                    assert_eq!(
                        back.into_one().unwrap().value(),
                        Some(group.canonical_symbol()),
                        "{input} via {ns_name}"
                    );
                }
            }
        }
    }

    #[test]
    fn synonyms_never_contain_the_query() {
        let idx = reference_index();
        let tr = Translator::new(&idx);

        for group in idx.groups() {
            for s in group.aliases() {
                let all = tr
                    .translate(s.as_str(), "symbol", "symbol", &TranslateOptions::default().with_all_synonyms().select_all())
                    .unwrap()
                    .into_one()
                    .unwrap();
                assert!(all.values().contains(&s.as_str()));

                let syn = tr.synonyms(s.as_str()).into_one().unwrap();
                assert!(!syn.values().contains(&s.as_str()));
                assert!(!syn.values().contains(&group.canonical_symbol()));
            }
        }

        // queried through an alias: the other aliases only
        assert_eq!(
            values(tr.synonyms(vec!["MYCC"])),
            vec![Some("bHLHe39".to_string())]
        );
        assert_eq!(
            tr.synonyms(["MYCC"]).into_vec()[0].values(),
            vec!["bHLHe39", "c-Myc"]
        );
    }

    #[test]
    fn shape_is_preserved() {
        let idx = reference_index();
        let tr = Translator::new(&idx);

        assert!(tr.symbol_to_entrez("MYC").unwrap().is_one());

        let one_list = tr.symbol_to_entrez(["MYC"]).unwrap();
        assert!(!one_list.is_one());
        assert_eq!(one_list.len(), 1);

        let mixed = tr.symbol_to_entrez(vec!["FAKE", "TP53", "MYC", "FAKE"]).unwrap();
        assert_eq!(
            values(mixed),
            vec![None, Some("7157".into()), Some("4609".into()), None]
        );

        let empty = tr.symbol_to_entrez(Vec::<String>::new()).unwrap();
        assert!(empty.is_empty());

        assert!(tr.synonyms("FOXP2").is_one());
        assert_eq!(tr.official_symbol(vec!["c-Myc", "TNRC10"]).len(), 2);
    }

    #[test]
    fn missing_ids_use_the_configured_null() {
        let idx = reference_index();
        let mut tr = Translator::new(&idx);

        let out = tr.ensembl_gene_to_symbol(vec!["FAKE1", "FAKE2"]).unwrap();
        assert_eq!(
            out,
            Shaped::Many(vec![Translation::Missing(None), Translation::Missing(None)])
        );

        tr.set_default_null_id(Some("unknown"));
        let out = tr.ensembl_gene_to_symbol(vec!["FAKE1", "FAKE2"]).unwrap();
        assert_eq!(values(out), some(&["unknown", "unknown"]));
        assert_eq!(tr.synonyms("FAKE1").into_one().unwrap().value(), Some("unknown"));

        // per-call override wins over the engine setting
        let opts = TranslateOptions::default().with_null_id("NA");
        let out = tr.translate("FAKE1", "ensembl_gene", "symbol", &opts).unwrap();
        assert_eq!(out.into_one().unwrap().value(), Some("NA"));

        // a second engine over the same index is unaffected
        let other = Translator::new(&idx);
        assert_eq!(other.config().default_null_id, None);
    }

    #[test]
    fn empty_candidate_set_is_a_miss() {
        let idx = reference_index();
        let tr = Translator::with_config(
            &idx,
            EngineConfig {
                default_null_id: Some("-".into()),
            },
        );

        // KRT7 has no Ensembl ID in the fixture
        let out = tr.symbol_to_ensembl_gene("KRT7").unwrap();
        assert_eq!(out, Shaped::One(Translation::Missing(Some("-".into()))));
        let out = tr.symbol_to_id("KRT7", "ensembl_gene", false).unwrap();
        assert_eq!(out, Shaped::One(Translation::Missing(Some("-".into()))));
    }

    #[test]
    fn preferred_ids_bias_selection() {
        let idx = reference_index();
        let tr = Translator::new(&idx);
        let foxp2_ens = "ENSG00000128573";

        let opts = TranslateOptions::default().preferring(&["CAGH44"]);
        let out = tr.translate(foxp2_ens, "ensembl_gene", "symbol", &opts).unwrap();
        assert_eq!(out.into_one().unwrap().value(), Some("CAGH44"));

        // no preferred candidate: back to the first-element rule
        let opts = TranslateOptions::default().preferring(&["NOPE"]);
        let out = tr.translate(foxp2_ens, "ensembl_gene", "symbol", &opts).unwrap();
        assert_eq!(out.into_one().unwrap().value(), Some("FOXP2"));

        // several hits follow the preference order
        let opts = TranslateOptions::default()
            .preferring(&["TNRC10", "X", "CAGH44"])
            .select_all();
        let out = tr.translate(foxp2_ens, "ensembl_gene", "symbol", &opts).unwrap();
        assert_eq!(
            out.into_one().unwrap(),
            Translation::All(vec!["TNRC10".into(), "CAGH44".into()])
        );

        // one preference list across many genes
        let ens = tr.symbol_to_ensembl_gene(vec!["FOXP2", "MYC", "CEBPA"]).unwrap();
        let opts = TranslateOptions::default().preferring(&["CAGH44", "MYCC", "C/EBP-alpha"]);
        let out = tr.translate(ens.to_ids(), "ensembl_gene", "symbol", &opts).unwrap();
        assert_eq!(values(out), some(&["CAGH44", "MYCC", "C/EBP-alpha"]));
    }

    #[test]
    fn preferred_ids_in_external_namespaces() {
        let idx = reference_index();
        let tr = Translator::new(&idx);

        let opts = TranslateOptions::default().preferring(&["K7PPA8"]);
        let out = tr.translate("TP53", "symbol", "uniprot", &opts).unwrap();
        assert_eq!(out.into_one().unwrap().value(), Some("K7PPA8"));

        let out = tr.symbol_to_uniprot("TP53").unwrap();
        assert_eq!(out.into_one().unwrap().value(), Some("P04637"));
    }

    #[test]
    fn select_all_returns_lists_per_input() {
        let idx = reference_index();
        let tr = Translator::new(&idx);

        let out = tr.symbol_to_id(vec!["TP53", "MYC", "FAKE"], "uniprot", false).unwrap();
        assert_eq!(
            out,
            Shaped::Many(vec![
                Translation::All(vec!["P04637".into(), "K7PPA8".into()]),
                Translation::All(vec!["P01106".into()]),
                Translation::Missing(None),
            ])
        );
    }

    #[test]
    fn all_synonyms_puts_canonical_first() {
        let idx = reference_index();
        let tr = Translator::new(&idx);
        let opts = TranslateOptions::default().with_all_synonyms().select_all();

        let out = tr.translate("4609", "entrez", "symbol", &opts).unwrap();
        assert_eq!(
            out.into_one().unwrap().values(),
            vec!["MYC", "MYCC", "bHLHe39", "c-Myc"]
        );

        let opts = TranslateOptions::default().with_all_synonyms();
        let out = tr.translate("4609", "entrez", "symbol", &opts).unwrap();
        assert_eq!(out.into_one().unwrap(), Translation::One("MYC".into()));
    }

    #[test]
    fn official_symbol_resolves_aliases() {
        let idx = reference_index();
        let tr = Translator::new(&idx);
        let out = tr.official_symbol(vec!["c-Myc", "SPCH1", "TP53", "nope"]);
        assert_eq!(values(out), vec![
            Some("MYC".into()),
            Some("FOXP2".into()),
            Some("TP53".into()),
            None
        ]);
    }

    #[test]
    fn unknown_namespace_is_an_error() {
        let idx = reference_index();
        let tr = Translator::new(&idx);

        let err = tr.symbol_to_id(vec!["MYC", "FOXP2"], "refseq", true).unwrap_err();
        assert!(matches!(err, IndexError::UnknownNamespace { ref name, .. } if name == "refseq"));
        assert!(tr.cross_id("4609", "entrez", "nope", true).is_err());
        assert!(tr.id_to_symbol("x", "toy").is_err());
    }

    #[test]
    fn cross_id_is_transitive() {
        let idx = reference_index();
        let tr = Translator::new(&idx);
        let names: Vec<String> = idx.namespaces().iter().map(|n| n.name.clone()).collect();

        for group in idx.groups() {
            for a in &names {
                for b in &names {
                    let a_id = idx.namespaces().id(a).unwrap();
                    let b_id = idx.namespaces().id(b).unwrap();
                    if group.ids(a_id).is_empty() || group.ids(b_id).is_empty() {
                        continue;
                    }
                    for x in group.ids(a_id) {
                        let there = tr.cross_id(x.as_str(), a, b, true).unwrap();
                        let back = tr.cross_id(there.to_ids(), b, a, true).unwrap();
                        let back = back.into_one().unwrap();
                        let landed = idx.resolve_in(NamespaceRef::External(a_id), back.value().unwrap());
                        assert_eq!(landed.map(|g| g.id), Some(group.id), "{x}: {a} -> {b} -> {a}");
                    }
                }
            }
        }
    }

    #[test]
    fn user_namespace_translates_like_builtins() {
        let mut builder = reference_builder();
        builder
            .add_db_reader(
                Cursor::new("symbol\texternal\nFOXP2\ta,b,c\nMYC\td,e\nCEBPA\tf\n"),
                "toy",
            )
            .unwrap();
        let idx = builder.finish();
        let tr = Translator::new(&idx);

        let out = tr.symbol_to_id(vec!["FOXP2", "MYC", "CEBPA"], "toy", false).unwrap();
        assert_eq!(out.into_vec()[1], Translation::All(vec!["d".into(), "e".into()]));

        let out = tr.id_to_symbol(vec!["a", "d", "g"], "toy").unwrap();
        assert_eq!(values(out), vec![Some("FOXP2".into()), Some("MYC".into()), None]);

        let ens = tr.symbol_to_ensembl_gene("FOXP2").unwrap();
        let toy = tr.cross_id(ens.to_ids(), "ensembl_gene", "toy", true).unwrap();
        assert_eq!(toy.into_one().unwrap().value(), Some("a"));

        assert!(tr.info().namespaces.contains(&"toy".to_string()));
    }

    #[test]
    fn to_symbol_shortcuts_take_options() {
        let idx = reference_index();
        let tr = Translator::new(&idx);

        let ens = tr.symbol_to_ensembl_gene(vec!["FOXP2", "MYC", "CEBPA"]).unwrap();
        let opts = TranslateOptions::default().preferring(&["CAGH44", "MYCC", "C/EBP-alpha"]);
        let out = tr.ensembl_gene_to_symbol_with(ens.to_ids(), &opts).unwrap();
        assert_eq!(values(out), some(&["CAGH44", "MYCC", "C/EBP-alpha"]));

        let opts = TranslateOptions::default().with_all_synonyms().select_all();
        let out = tr.ensembl_gene_to_symbol_with("ENSG00000136997", &opts).unwrap();
        assert_eq!(
            out.into_one().unwrap().values(),
            vec!["MYC", "MYCC", "bHLHe39", "c-Myc"]
        );

        let opts = TranslateOptions::default().preferring(&["SPCH1"]);
        for out in [
            tr.entrez_to_symbol_with("93986", &opts).unwrap(),
            tr.hgnc_to_symbol_with("HGNC:13875", &opts).unwrap(),
            tr.uniprot_to_symbol_with("O15409", &opts).unwrap(),
            tr.id_to_symbol_with("O15409", "uniprot", &opts).unwrap(),
        ] {
            assert_eq!(out.into_one().unwrap().value(), Some("SPCH1"));
        }

        // plain shortcuts keep the canonical symbol
        assert_eq!(
            tr.entrez_to_symbol("93986").unwrap().into_one().unwrap().value(),
            Some("FOXP2")
        );

        let opts = TranslateOptions::default().with_null_id("NA");
        let out = tr.hgnc_to_symbol_with(vec!["HGNC:0"], &opts).unwrap();
        assert_eq!(values(out), some(&["NA"]));
    }

    #[test]
    fn cross_id_takes_options() {
        let idx = reference_index();
        let tr = Translator::new(&idx);

        let opts = TranslateOptions::default().preferring(&["K7PPA8"]);
        let out = tr.cross_id_with("7157", "entrez", "uniprot", &opts).unwrap();
        assert_eq!(out.into_one().unwrap().value(), Some("K7PPA8"));

        let out = tr.cross_id("7157", "entrez", "uniprot", true).unwrap();
        assert_eq!(out.into_one().unwrap().value(), Some("P04637"));

        let opts = TranslateOptions::default().with_all_synonyms().select_all();
        let out = tr.cross_id_with("7157", "entrez", "symbol", &opts).unwrap();
        assert_eq!(out.into_one().unwrap().values(), vec!["TP53", "LFS1", "p53"]);

        assert!(tr.cross_id_with("7157", "entrez", "refseq", &opts).is_err());
    }
}
