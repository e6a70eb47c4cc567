//! Shared fixtures for unit tests.

use std::io::Cursor;

use crate::index::AliasIndex;
use crate::table::builder::IndexBuilder;
use crate::table::io::ReferenceKeys;

/// Five genes in HGNC dump layout. KRT7 has no Ensembl ID, TP53 two UniProt
/// accessions.
pub(crate) const REFERENCE_TSV: &str = "\
hgnc_id\tsymbol\talias_symbol\tprev_symbol\tentrez_id\tensembl_gene_id\tuniprot_ids
HGNC:7553\tMYC\t\"c-Myc|bHLHe39\"\tMYCC\t4609\tENSG00000136997\tP01106
HGNC:13875\tFOXP2\t\"CAGH44|TNRC10\"\tSPCH1\t93986\tENSG00000128573\tO15409
HGNC:1833\tCEBPA\t\"C/EBP-alpha|CEBP\"\t\t1050\tENSG00000245848\tP49715
HGNC:11998\tTP53\t\"p53|LFS1\"\t\t7157\tENSG00000141510\t\"P04637|K7PPA8\"
HGNC:6445\tKRT7\t\tK2C7\t3855\t\tP08729
";

pub(crate) fn reference_builder() -> IndexBuilder {
    let mut builder = IndexBuilder::new();
    builder
        .load_reference_reader(
            Cursor::new(REFERENCE_TSV.as_bytes()),
            &ReferenceKeys::default(),
            "fixture",
        )
        .unwrap();
    builder
}

pub(crate) fn reference_index() -> AliasIndex {
    reference_builder().finish()
}
