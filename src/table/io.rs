use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

/// Column separator detected from the first line of a table.
///
/// - tab wins if the line contains one
/// - otherwise comma
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Tab,
    Comma,
}

impl Dialect {
    pub fn detect(line: &str) -> Self {
        if line.contains('\t') || !line.contains(',') {
            Dialect::Tab
        } else {
            Dialect::Comma
        }
    }

    pub fn separator(self) -> char {
        match self {
            Dialect::Tab => '\t',
            Dialect::Comma => ',',
        }
    }
}

/// Layout of a two-column `symbol` / `external` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFormat {
    /// First content line is a header and is skipped.
    pub has_header: bool,
    /// Separator between IDs inside the `external` column.
    pub id_delimiter: char,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            has_header: true,
            id_delimiter: ',',
        }
    }
}

/// Column names of an HGNC-style reference dump.
///
/// - `symbol_key` holds the canonical symbol (required)
/// - `alias_key` / `prev_key` hold synonym symbols (optional columns)
/// - `id_keys` are external-ID columns; each becomes a namespace named by
///   [`namespace_for_column`] (required columns)
/// - multi-valued cells are split on `separator`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceKeys {
    pub symbol_key: String,
    pub alias_key: String,
    pub prev_key: String,
    pub id_keys: Vec<String>,
    pub separator: char,
}

impl Default for ReferenceKeys {
    fn default() -> Self {
        Self {
            symbol_key: "symbol".into(),
            alias_key: "alias_symbol".into(),
            prev_key: "prev_symbol".into(),
            id_keys: vec![
                "ensembl_gene_id".into(),
                "entrez_id".into(),
                "hgnc_id".into(),
                "uniprot_ids".into(),
            ],
            separator: '|',
        }
    }
}

/// Namespace name for a reference column: everything before the first `_id`.
///
/// `ensembl_gene_id` -> `ensembl_gene`, `uniprot_ids` -> `uniprot`.
pub fn namespace_for_column(column: &str) -> String {
    let cut = column.find("_id").map(|i| &column[..i]).unwrap_or(column);
    cut.trim().to_string()
}

/// One data row of a two-column table, IDs already split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub line_no: usize,
    pub symbol: String,
    pub ids: Vec<String>,
}

/// One data row of a reference dump.
///
/// `ids[i]` belongs to `ReferenceKeys::id_keys[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
    pub line_no: usize,
    pub symbol: String,
    /// Alias then previous symbols, as found in the file.
    pub synonyms: Vec<String>,
    pub ids: Vec<Vec<String>>,
}

/// Parsing errors for builder tables and reference dumps.
#[derive(Debug)]
pub enum ParseError {
    IoPath { path: String, source: std::io::Error },
    MalformedLine { line_no: usize, problem: &'static str, line: String },
    MissingColumn { column: String, header: String },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IoPath { path, source } => {
                write!(f, "I/O error while reading '{}': {}", path, source)
            }
            ParseError::MalformedLine { line_no, problem, line } => {
                write!(f, "line {}: {}: {}", line_no, problem, line)
            }
            ParseError::MissingColumn { column, header } => {
                write!(f, "column '{}' not found in header: {}", column, header)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::IoPath { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Open a text file as `BufRead`; `.gz` files are decompressed on the fly.
pub fn open_text(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    let file = File::open(path).map_err(|e| ParseError::IoPath {
        path: path.display().to_string(),
        source: e,
    })?;

    let is_gz = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    if is_gz {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Line source shared by both readers: numbers lines (1-based) and skips
/// blank lines and `#` comments.
struct Lines<R: BufRead> {
    reader: R,
    buf: String,
    line_no: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_no: 0,
        }
    }

    fn next_line(&mut self) -> Option<Result<(usize, &str), ParseError>> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line_no += 1,
                Err(e) => {
                    return Some(Err(ParseError::IoPath {
                        path: "<reader>".to_string(),
                        source: e,
                    }))
                }
            }

            let line = self.buf.trim_end_matches(&['\n', '\r'][..]);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            // borrow again: the returned slice must not be live on the `continue` path
            let line = self.buf.trim_end_matches(&['\n', '\r'][..]);
            return Some(Ok((self.line_no, line)));
        }
    }
}

/// Streaming reader for two-column `symbol` / `external` tables.
///
/// # Example
/// ```
/// use std::io::Cursor;
/// use gene_alias_index::table::io::{TableFormat, TableReader};
///
/// let data = "symbol\texternal\nMYC\ta,b\nFOXP2\tc\n";
/// let rows: Vec<_> = TableReader::new(Cursor::new(data), TableFormat::default())
///     .records()
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].ids, vec!["a", "b"]);
/// ```
pub struct TableReader<R: BufRead> {
    lines: Lines<R>,
    format: TableFormat,
    dialect: Option<Dialect>,
}

impl<R: BufRead> TableReader<R> {
    pub fn new(reader: R, format: TableFormat) -> Self {
        Self {
            lines: Lines::new(reader),
            format,
            dialect: None,
        }
    }

    /// Returns an iterator over parsed rows.
    ///
    /// The column separator is detected on the first content line; a header
    /// line, if configured, is skipped.
    pub fn records(mut self) -> impl Iterator<Item = Result<TableRow, ParseError>> {
        std::iter::from_fn(move || loop {
            let (line_no, line) = match self.lines.next_line()? {
                Ok(x) => x,
                Err(e) => return Some(Err(e)),
            };

            if self.dialect.is_none() {
                self.dialect = Some(Dialect::detect(line));
                if self.format.has_header {
                    continue;
                }
            }
            let dialect = self.dialect.unwrap_or(Dialect::Tab);

            return Some(parse_table_line(line_no, line, dialect, self.format.id_delimiter));
        })
    }
}

/// Parse one data line into a `TableRow`.
///
/// The line is split once, at the first separator: everything after it is
/// the `external` column, so a comma-separated file may still carry
/// comma-delimited IDs.
pub fn parse_table_line(
    line_no: usize,
    line: &str,
    dialect: Dialect,
    id_delimiter: char,
) -> Result<TableRow, ParseError> {
    let mut it = line.splitn(2, dialect.separator());
    let symbol = unquote(it.next().unwrap_or(""));
    let external = unquote(it.next().unwrap_or(""));

    if symbol.is_empty() {
        return Err(ParseError::MalformedLine {
            line_no,
            problem: "empty symbol column",
            line: line.to_string(),
        });
    }

    Ok(TableRow {
        line_no,
        symbol,
        ids: split_ids(&external, id_delimiter),
    })
}

/// Split a multi-valued cell; trims, drops empties, dedups keeping first-seen order.
pub fn split_ids(raw: &str, delimiter: char) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in raw.split(delimiter) {
        let part = part.trim();
        if !part.is_empty() && !out.iter().any(|x| x == part) {
            out.push(part.to_string());
        }
    }
    out
}

/// Streaming reader for HGNC-style reference dumps (tab-separated, with header).
pub struct ReferenceReader<R: BufRead> {
    lines: Lines<R>,
    separator: char,
    symbol_col: usize,
    synonym_cols: Vec<usize>,
    id_cols: Vec<usize>,
}

impl<R: BufRead> ReferenceReader<R> {
    /// Reads the header line and maps the configured columns.
    pub fn new(reader: R, keys: &ReferenceKeys) -> Result<Self, ParseError> {
        let mut lines = Lines::new(reader);
        let header: Vec<String> = match lines.next_line() {
            Some(Ok((_, line))) => line.split('\t').map(unquote).collect(),
            Some(Err(e)) => return Err(e),
            None => Vec::new(),
        };

        let find = |key: &str| header.iter().position(|h| h == key);
        let missing = |key: &str| ParseError::MissingColumn {
            column: key.to_string(),
            header: header.join("\t"),
        };

        let symbol_col = find(&keys.symbol_key).ok_or_else(|| missing(&keys.symbol_key))?;
        let synonym_cols = [&keys.alias_key, &keys.prev_key]
            .iter()
            .filter_map(|k| find(k))
            .collect();
        let id_cols = keys
            .id_keys
            .iter()
            .map(|k| find(k).ok_or_else(|| missing(k)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            lines,
            separator: keys.separator,
            symbol_col,
            synonym_cols,
            id_cols,
        })
    }

    pub fn records(mut self) -> impl Iterator<Item = Result<ReferenceRecord, ParseError>> {
        std::iter::from_fn(move || {
            let (line_no, line) = match self.lines.next_line()? {
                Ok(x) => x,
                Err(e) => return Some(Err(e)),
            };
            let cells: Vec<&str> = line.split('\t').collect();
            let cell = |i: usize| cells.get(i).map(|c| unquote(c)).unwrap_or_default();

            let symbol = cell(self.symbol_col);
            if symbol.is_empty() {
                return Some(Err(ParseError::MalformedLine {
                    line_no,
                    problem: "empty symbol column",
                    line: line.to_string(),
                }));
            }

            let mut synonyms: Vec<String> = Vec::new();
            for &col in &self.synonym_cols {
                synonyms.extend(split_ids(&cell(col), self.separator));
            }
            let ids = self
                .id_cols
                .iter()
                .map(|&col| split_ids(&cell(col), self.separator))
                .collect();

            Some(Ok(ReferenceRecord {
                line_no,
                symbol,
                synonyms,
                ids,
            }))
        })
    }
}

fn unquote(v: &str) -> String {
    let v = v.trim();
    let v = v.strip_prefix('"').unwrap_or(v);
    let v = v.strip_suffix('"').unwrap_or(v);
    v.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn rows(data: &str, format: TableFormat) -> Vec<TableRow> {
        TableReader::new(Cursor::new(data.as_bytes()), format)
            .records()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn tab_table_with_header() {
        let data = "symbol\texternal\nFOXP2\ta,b\n# comment\n\nMYC\tc\nCEBPA\t\n";
        let rows = rows(data, TableFormat::default());

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].symbol, "FOXP2");
        assert_eq!(rows[0].ids, vec!["a", "b"]);
        assert_eq!(rows[0].line_no, 2);
        assert_eq!(rows[1].line_no, 5);
        assert!(rows[2].ids.is_empty());
    }

    #[test]
    fn comma_table_keeps_comma_ids_in_second_column() {
        let data = "symbol,external\nFOXP2,a,b,a\n\"MYC\",\"c\"\n";
        let rows = rows(data, TableFormat::default());

        assert_eq!(rows[0].ids, vec!["a", "b"]);
        assert_eq!(rows[1].symbol, "MYC");
        assert_eq!(rows[1].ids, vec!["c"]);
    }

    #[test]
    fn colon_delimited_ids_without_header() {
        let format = TableFormat {
            has_header: false,
            id_delimiter: ':',
        };
        let rows = rows("FOXP2\ta:b\nMYC\tc\n", format);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ids, vec!["a", "b"]);
    }

    #[test]
    fn empty_symbol_is_malformed() {
        let data = "symbol\texternal\n\ta\n";
        let res: Result<Vec<_>, _> =
            TableReader::new(Cursor::new(data.as_bytes()), TableFormat::default())
                .records()
                .collect();
        let err = res.unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { line_no: 2, .. }));
    }

    #[test]
    fn namespace_names_from_columns() {
        assert_eq!(namespace_for_column("ensembl_gene_id"), "ensembl_gene");
        assert_eq!(namespace_for_column("entrez_id"), "entrez");
        assert_eq!(namespace_for_column("uniprot_ids"), "uniprot");
        assert_eq!(namespace_for_column("refseq"), "refseq");
    }

    #[test]
    fn reference_reader_maps_columns() {
        let data = "\
hgnc_id\tsymbol\talias_symbol\tprev_symbol\tentrez_id\tensembl_gene_id\tuniprot_ids
HGNC:7553\tMYC\t\"c-Myc|bHLHe39\"\tMYCC\t4609\tENSG00000136997\tP01106
HGNC:1833\tCEBPA\tC/EBP-alpha\t\t1050\tENSG00000245848\tP49715
";
        let keys = ReferenceKeys::default();
        let recs: Vec<_> = ReferenceReader::new(Cursor::new(data.as_bytes()), &keys)
            .unwrap()
            .records()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].symbol, "MYC");
        assert_eq!(recs[0].synonyms, vec!["c-Myc", "bHLHe39", "MYCC"]);
        // id_keys order: ensembl_gene, entrez, hgnc, uniprot
        assert_eq!(recs[0].ids[0], vec!["ENSG00000136997"]);
        assert_eq!(recs[0].ids[1], vec!["4609"]);
        assert_eq!(recs[0].ids[2], vec!["HGNC:7553"]);
        assert_eq!(recs[1].synonyms, vec!["C/EBP-alpha"]);
    }

    #[test]
    fn reference_reader_requires_id_columns() {
        let data = "symbol\talias_symbol\nMYC\tMYCC\n";
        let err = ReferenceReader::new(Cursor::new(data.as_bytes()), &ReferenceKeys::default())
            .err()
            .unwrap();
        assert!(matches!(err, ParseError::MissingColumn { ref column, .. } if column == "ensembl_gene_id"));
    }
}
