use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use flate2::read::MultiGzDecoder;

use super::model::Table;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the sample attributes table.
///
/// Plain tab-separated text: the first line is the header (must include the
/// sample id and group columns), every further line is one sample.
pub fn load_samples(path: &Path) -> Result<Table> {
    let file = File::open(path)
        .with_context(|| format!("opening sample attributes file {}", path.display()))?;
    read_table(file, 0).with_context(|| format!("reading sample attributes file {}", path.display()))
}

/// Load the gzip-compressed gene read-count table (GCT layout).
///
/// The first `preamble_lines` lines (version and dimensions in GCT) are
/// skipped; the next line is the header whose leading fields name the gene
/// columns and whose remaining fields are sample ids.
pub fn load_reads(path: &Path, preamble_lines: usize) -> Result<Table> {
    let file = File::open(path).with_context(|| format!("opening gene reads file {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let magic = reader
        .fill_buf()
        .with_context(|| format!("reading gene reads file {}", path.display()))?;
    if !magic.starts_with(&GZIP_MAGIC) {
        bail!("{} is not a gzip-compressed file", path.display());
    }

    read_table(MultiGzDecoder::new(reader), preamble_lines)
        .with_context(|| format!("reading gene reads file {}", path.display()))
}

// ---------------------------------------------------------------------------
// TSV reader
// ---------------------------------------------------------------------------

/// Read tab-separated lines into a [`Table`], skipping `skip` leading lines.
///
/// Fields are split on tabs only; quotes are kept verbatim and rows may differ
/// in length.
pub fn read_table<R: Read>(reader: R, skip: usize) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut records = reader.records().skip(skip);

    let header: Vec<String> = match records.next() {
        Some(record) => record
            .context("reading header line")?
            .iter()
            .map(|h| h.to_string())
            .collect(),
        None => bail!("missing header line (expected after {skip} preamble lines)"),
    };

    let mut rows = Vec::new();
    for (row_no, result) in records.enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    Ok(Table::new(header, rows))
}
