use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gene_alias_index::{
    AliasIndex, EngineConfig, IndexBuilder, ReferenceKeys, TableFormat, TranslateOptions,
    Translation, Translator,
};

/// Build, extend, inspect or query a gene alias index.
#[derive(Parser, Debug)]
#[command(name = "gene-alias")]
#[command(author, version, about)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build an index from an HGNC-style reference dump and write it to disk
    Build(BuildArgs),

    /// Merge a two-column symbol/external table into an index
    AddDb(AddDbArgs),

    /// Print version, build date, namespaces and change log
    Info(InfoArgs),

    /// Translate identifiers between two namespaces
    Translate(TranslateArgs),

    /// List the synonyms of gene symbols
    Synonyms(SynonymsArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Reference dump (.tsv or .tsv.gz)
    #[arg(long, short)]
    reference: PathBuf,

    /// Output serialized index file
    #[arg(long, short)]
    index: PathBuf,

    // -------------------------
    // Column options
    // -------------------------

    /// Column holding the canonical symbol
    #[arg(long, default_value = "symbol")]
    symbol_key: String,

    /// Column holding alias symbols
    #[arg(long, default_value = "alias_symbol")]
    alias_key: String,

    /// Column holding previous symbols
    #[arg(long, default_value = "prev_symbol")]
    prev_key: String,

    /// External-ID columns (repeatable); `uniprot_ids` becomes namespace `uniprot`
    #[arg(
        long = "id-key",
        value_name = "KEY",
        num_args = 1..,
        default_values_t = vec![
            "ensembl_gene_id".to_string(),
            "entrez_id".to_string(),
            "hgnc_id".to_string(),
            "uniprot_ids".to_string(),
        ]
    )]
    id_keys: Vec<String>,

    /// Separator inside multi-valued cells
    #[arg(long, default_value_t = '|')]
    separator: char,
}

#[derive(Args, Debug)]
struct AddDbArgs {
    /// Serialized index to extend
    #[arg(long, short)]
    index: PathBuf,

    /// Two-column table (tab or comma separated, optionally .gz)
    #[arg(long, short)]
    table: PathBuf,

    /// Namespace name for the table's IDs
    #[arg(long, short)]
    name: String,

    /// Where to write the result (default: overwrite --index)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Delimiter between IDs in the external column
    #[arg(long, default_value_t = ',')]
    id_delimiter: char,

    /// The table has no header line
    #[arg(long)]
    no_header: bool,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Serialized index file
    #[arg(long, short)]
    index: PathBuf,

    /// Also print per-namespace statistics
    #[arg(long)]
    stats: bool,
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Serialized index file
    #[arg(long, short)]
    index: PathBuf,

    /// Source namespace
    #[arg(long, default_value = "symbol")]
    from: String,

    /// Target namespace
    #[arg(long)]
    to: String,

    /// Print every candidate instead of the first one
    #[arg(long)]
    all: bool,

    /// When translating to symbols, include all aliases
    #[arg(long)]
    all_synonyms: bool,

    /// Preferred result identifiers (repeatable)
    #[arg(long = "prefer", value_name = "ID")]
    prefer: Vec<String>,

    /// Printed for identifiers without a match
    #[arg(long, default_value = "NA")]
    null_id: String,

    /// Identifiers to translate; read from stdin (one per line) when omitted
    ids: Vec<String>,
}

#[derive(Args, Debug)]
struct SynonymsArgs {
    /// Serialized index file
    #[arg(long, short)]
    index: PathBuf,

    /// Printed for symbols without a match
    #[arg(long, default_value = "NA")]
    null_id: String,

    /// Symbols; read from stdin (one per line) when omitted
    ids: Vec<String>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_index(path: &Path) -> Result<AliasIndex> {
    AliasIndex::load(path).with_context(|| format!("reading index {}", path.display()))
}

fn input_ids(ids: Vec<String>) -> Result<Vec<String>> {
    if !ids.is_empty() {
        return Ok(ids);
    }
    let mut out = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("reading identifiers from stdin")?;
        let line = line.trim();
        if !line.is_empty() {
            out.push(line.to_string());
        }
    }
    Ok(out)
}

fn print_results(inputs: &[String], results: Vec<Translation>, null_id: &str) {
    for (input, res) in inputs.iter().zip(results) {
        let shown = match &res {
            Translation::Missing(null) => null.as_deref().unwrap_or(null_id).to_string(),
            found => found.values().join("\t"),
        };
        println!("{input}\t{shown}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Command::Build(args) => {
            let keys = ReferenceKeys {
                symbol_key: args.symbol_key,
                alias_key: args.alias_key,
                prev_key: args.prev_key,
                id_keys: args.id_keys,
                separator: args.separator,
            };

            let mut builder = IndexBuilder::new();
            let report = builder
                .load_reference(&args.reference, &keys)
                .with_context(|| format!("building index from {}", args.reference.display()))?;
            let idx = builder.finish();

            println!("{idx}");
            info!(
                duplicate_rows = report.duplicate_rows,
                dropped_aliases = report.dropped_aliases,
                dropped_ids = report.dropped_ids,
                "reference summary"
            );

            idx.save(&args.index)
                .with_context(|| format!("writing index to {}", args.index.display()))?;
        }

        Command::AddDb(args) => {
            let idx = load_index(&args.index)?;
            let mut builder = IndexBuilder::from_index(idx);
            builder.format = TableFormat {
                has_header: !args.no_header,
                id_delimiter: args.id_delimiter,
            };

            builder
                .add_db(&args.table, &args.name)
                .with_context(|| format!("merging {} as '{}'", args.table.display(), args.name))?;
            let idx = builder.finish();
            println!("{idx}");

            let out = args.output.unwrap_or(args.index);
            idx.save(&out)
                .with_context(|| format!("writing index to {}", out.display()))?;
        }

        Command::Info(args) => {
            let idx = load_index(&args.index)?;
            print!("{}", idx.info());
            if args.stats {
                print!("{idx}");
            }
        }

        Command::Translate(args) => {
            let idx = load_index(&args.index)?;
            let tr = Translator::new(&idx);
            let opts = TranslateOptions {
                select_one: !args.all,
                all_synonyms: args.all_synonyms,
                preferred_ids: args.prefer,
                default_null_id: Some(args.null_id.clone()),
            };

            let inputs = input_ids(args.ids)?;
            let results = tr.translate(inputs.clone(), &args.from, &args.to, &opts)?;
            print_results(&inputs, results.into_vec(), &args.null_id);
        }

        Command::Synonyms(args) => {
            let idx = load_index(&args.index)?;
            let config = EngineConfig {
                default_null_id: Some(args.null_id.clone()),
            };
            let tr = Translator::with_config(&idx, config);

            let inputs = input_ids(args.ids)?;
            let results = tr.synonyms(inputs.clone());
            print_results(&inputs, results.into_vec(), &args.null_id);
        }
    }

    Ok(())
}
