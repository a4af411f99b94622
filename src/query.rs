//! Query pipeline: join sample attributes to read counts for one gene.

use std::path::Path;

use anyhow::Context;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::data::filter::filter_by_threshold;
use crate::data::group::group_by;
use crate::data::model::{GroupCounts, Table};
use crate::data::search::{SortedIndex, binary_search, index_list, linear_search};
use crate::error::{ErrorKind, GtexError, Result};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Column names and options for a query. Missing keys in a config file take
/// the GTEx defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Sample identifier column of the sample attributes table.
    pub sample_id_column: String,
    /// Category column samples are grouped by.
    pub group_column: String,
    /// Gene name column of the read-count table.
    pub gene_column: String,
    /// Lines before the read-count header.
    pub preamble_lines: usize,
    /// Drop groups whose mean count is below this.
    pub min_mean: Option<f64>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            sample_id_column: "SAMPID".to_string(),
            group_column: "SMTS".to_string(),
            gene_column: "Description".to_string(),
            preamble_lines: 2,
            min_mean: None,
        }
    }
}

impl QueryConfig {
    /// Read a JSON config file.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Collect the read counts of `gene` for every sample group.
///
/// Groups come out in first-seen order from the sample table. A missing
/// structural column or gene aborts the query; a sample that has no column
/// in the read-count table is left out of its group.
pub fn run_query(samples: &Table, reads: &Table, gene: &str, config: &QueryConfig) -> Result<Vec<GroupCounts>> {
    let group_col = linear_search(config.group_column.as_str(), &samples.header)
        .map_err(|e| missing_column(e, "tissue group", &config.group_column, "sample attributes"))?;
    let id_col = linear_search(config.sample_id_column.as_str(), &samples.header)
        .map_err(|e| missing_column(e, "sample id", &config.sample_id_column, "sample attributes"))?;

    let groups = group_by(&samples.rows, |row| field(row, id_col), |row| field(row, group_col));
    info!("Grouped {} samples into {} groups", samples.len(), groups.len());

    let indexed_header = index_list(&reads.header)?;
    let gene_col = binary_search(&config.gene_column, &indexed_header)
        .map_err(|e| missing_column(e, "gene name", &config.gene_column, "gene reads"))?;
    let header_index = SortedIndex::new(indexed_header);

    let genes: Vec<&str> = reads.rows.iter().map(|row| field(row, gene_col)).collect();
    let gene_row = linear_search(&gene, &genes)?;
    let gene_reads = &reads.rows[gene_row];
    debug!("Gene {gene} found at row {gene_row}");

    let mut dropped = 0usize;
    let mut grouped = Vec::with_capacity(groups.len());
    for group in groups {
        let mut counts = Vec::with_capacity(group.members.len());
        for member in &group.members {
            let Ok(sample_col) = header_index.find(member) else {
                debug!("Sample {member} has no read counts");
                dropped += 1;
                continue;
            };
            counts.push(parse_count(gene_reads, sample_col, gene, member)?);
        }
        grouped.push(GroupCounts::new(group.label, counts));
    }

    if dropped > 0 {
        info!("{dropped} samples have no column in the gene reads table and were left out");
    }

    Ok(grouped)
}

/// Apply the optional mean threshold from the config.
pub fn apply_min_mean(grouped: Vec<GroupCounts>, config: &QueryConfig) -> Result<Vec<GroupCounts>> {
    match config.min_mean {
        Some(threshold) if !grouped.is_empty() => {
            let kept = filter_by_threshold(&grouped, &threshold)?;
            info!("{} of {} groups have mean >= {threshold}", kept.len(), grouped.len());
            Ok(kept)
        }
        _ => Ok(grouped),
    }
}

fn field(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn missing_column(error: GtexError, role: &str, column: &str, table: &str) -> GtexError {
    match error.kind() {
        ErrorKind::NotFound => GtexError::MissingColumn {
            role: role.to_string(),
            column: column.to_string(),
            table: table.to_string(),
        },
        _ => error,
    }
}

fn parse_count(row: &[String], col: usize, gene: &str, sample: &str) -> Result<i64> {
    let raw = row.get(col).ok_or_else(|| {
        GtexError::invalid_argument(format!("row for {gene} has no field for sample {sample}"))
    })?;
    raw.trim().parse::<i64>().map_err(|_| {
        GtexError::type_wrong(format!("read count '{raw}' of {gene} in sample {sample} is not an integer"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(header: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            header.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn samples() -> Table {
        table(&["SAMPID", "SMTS"], &[&["S1", "Blood"], &["S2", "Brain"], &["S3", "Blood"]])
    }

    fn reads() -> Table {
        table(&["Description", "S1", "S2", "S3"], &[&["GENE1", "5", "7", "9"]])
    }

    #[test]
    fn test_grouped_counts_in_first_seen_order() {
        let grouped = run_query(&samples(), &reads(), "GENE1", &QueryConfig::default()).unwrap();
        assert_eq!(
            grouped,
            vec![GroupCounts::new("Blood", vec![5, 9]), GroupCounts::new("Brain", vec![7])]
        );
    }

    #[test]
    fn test_sample_without_counts_is_dropped() {
        let mut samples = samples();
        samples.rows.push(vec!["S4".to_string(), "Blood".to_string()]);
        let grouped = run_query(&samples, &reads(), "GENE1", &QueryConfig::default()).unwrap();
        assert_eq!(
            grouped,
            vec![GroupCounts::new("Blood", vec![5, 9]), GroupCounts::new("Brain", vec![7])]
        );
    }

    #[test]
    fn test_group_with_no_matched_samples_is_kept_empty() {
        let mut samples = samples();
        samples.rows.push(vec!["S9".to_string(), "Lung".to_string()]);
        let grouped = run_query(&samples, &reads(), "GENE1", &QueryConfig::default()).unwrap();
        assert_eq!(grouped[2], GroupCounts::new("Lung", vec![]));
    }

    #[test]
    fn test_missing_gene_is_not_found() {
        let err = run_query(&samples(), &reads(), "GENE2", &QueryConfig::default()).unwrap_err();
        assert_eq!(err, GtexError::NotFound { target: "GENE2".to_string() });
    }

    #[test]
    fn test_missing_structural_columns() {
        let no_group = table(&["SAMPID", "SMTSD"], &[&["S1", "Whole Blood"]]);
        let err = run_query(&no_group, &reads(), "GENE1", &QueryConfig::default()).unwrap_err();
        assert!(matches!(err, GtexError::MissingColumn { ref column, .. } if column == "SMTS"));

        let no_id = table(&["ID", "SMTS"], &[&["S1", "Blood"]]);
        let err = run_query(&no_id, &reads(), "GENE1", &QueryConfig::default()).unwrap_err();
        assert!(matches!(err, GtexError::MissingColumn { ref column, .. } if column == "SAMPID"));

        let no_gene_col = table(&["Name", "S1"], &[&["ENSG1", "5"]]);
        let err = run_query(&samples(), &no_gene_col, "GENE1", &QueryConfig::default()).unwrap_err();
        assert!(matches!(err, GtexError::MissingColumn { ref column, .. } if column == "Description"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_header_order_is_irrelevant() {
        let samples = table(&["SMTS", "SAMPID"], &[&["Blood", "S3"], &["Blood", "S1"]]);
        let reads = table(
            &["Name", "Description", "S3", "S1"],
            &[&["ENSG0", "GENE0", "0", "0"], &["ENSG1", "GENE1", "9", "5"]],
        );
        let grouped = run_query(&samples, &reads, "GENE1", &QueryConfig::default()).unwrap();
        assert_eq!(grouped, vec![GroupCounts::new("Blood", vec![9, 5])]);
    }

    #[test]
    fn test_custom_columns() {
        let config = QueryConfig {
            sample_id_column: "sample".to_string(),
            group_column: "tissue".to_string(),
            gene_column: "gene".to_string(),
            ..QueryConfig::default()
        };
        let samples = table(&["sample", "tissue"], &[&["A", "Liver"]]);
        let reads = table(&["gene", "A"], &[&["TP53", "12"]]);
        let grouped = run_query(&samples, &reads, "TP53", &config).unwrap();
        assert_eq!(grouped, vec![GroupCounts::new("Liver", vec![12])]);
    }

    #[test]
    fn test_non_integer_count() {
        let reads = table(&["Description", "S1", "S2", "S3"], &[&["GENE1", "5", "x", "9"]]);
        let err = run_query(&samples(), &reads, "GENE1", &QueryConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeWrong);
    }

    #[test]
    fn test_empty_read_table() {
        let reads = table(&["Description", "S1"], &[]);
        let err = run_query(&samples(), &reads, "GENE1", &QueryConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn test_apply_min_mean() {
        let grouped = run_query(&samples(), &reads(), "GENE1", &QueryConfig::default()).unwrap();
        let config = QueryConfig { min_mean: Some(7.0), ..QueryConfig::default() };
        assert_eq!(apply_min_mean(grouped.clone(), &config).unwrap(), grouped);

        let config = QueryConfig { min_mean: Some(7.5), ..QueryConfig::default() };
        assert!(apply_min_mean(grouped.clone(), &config).unwrap().is_empty());

        assert_eq!(apply_min_mean(grouped.clone(), &QueryConfig::default()).unwrap(), grouped);
    }

    #[test]
    fn test_config_defaults_fill_missing_keys() {
        let config: QueryConfig = serde_json::from_str(r#"{"group_column": "SMTSD"}"#).unwrap();
        assert_eq!(config.group_column, "SMTSD");
        assert_eq!(config.sample_id_column, "SAMPID");
        assert_eq!(config.preamble_lines, 2);
        assert_eq!(config.min_mean, None);
    }
}
