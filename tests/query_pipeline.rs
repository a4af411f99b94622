use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tempfile::TempDir;

use gtex_plot::data::loader::{load_reads, load_samples};
use gtex_plot::query::{QueryConfig, apply_min_mean, run_query};
use gtex_plot::render::{PlotOptions, render_box_plot};
use gtex_plot::report::{read_json_report, write_report};
use gtex_plot::{ErrorKind, GroupCounts, GtexError};

fn write_samples(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("samples.txt");
    let mut file = File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    path
}

fn write_reads(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("reads.gct.gz");
    let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    for line in lines {
        writeln!(encoder, "{line}").unwrap();
    }
    encoder.finish().unwrap();
    path
}

fn fixture() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let samples = write_samples(
        dir.path(),
        &[
            "SAMPID\tSMTS\tSMTSD",
            "S1\tBlood\tWhole Blood",
            "S2\tBrain\tBrain - Cortex",
            "S3\tBlood\tWhole Blood",
            "S4\tBlood\tWhole Blood",
        ],
    );
    let reads = write_reads(
        dir.path(),
        &[
            "#1.2",
            "2\t3",
            "Name\tDescription\tS1\tS2\tS3",
            "ENSG0\tGENE0\t1\t1\t1",
            "ENSG1\tGENE1\t5\t7\t11",
        ],
    );
    (dir, samples, reads)
}

#[test]
fn query_groups_counts_and_drops_unsequenced_samples() {
    let (_dir, samples, reads) = fixture();
    let config = QueryConfig::default();

    let samples = load_samples(&samples).unwrap();
    let reads = load_reads(&reads, config.preamble_lines).unwrap();
    let grouped = run_query(&samples, &reads, "GENE1", &config).unwrap();

    assert_eq!(
        grouped,
        vec![GroupCounts::new("Blood", vec![5, 11]), GroupCounts::new("Brain", vec![7])]
    );
}

#[test]
fn missing_gene_aborts_the_query() {
    let (_dir, samples, reads) = fixture();
    let config = QueryConfig::default();

    let samples = load_samples(&samples).unwrap();
    let reads = load_reads(&reads, config.preamble_lines).unwrap();
    let err = run_query(&samples, &reads, "GENE2", &config).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err, GtexError::NotFound { target: "GENE2".to_string() });
}

#[test]
fn grouping_by_detailed_tissue_column() {
    let (_dir, samples, reads) = fixture();
    let config = QueryConfig {
        group_column: "SMTSD".to_string(),
        ..QueryConfig::default()
    };

    let samples = load_samples(&samples).unwrap();
    let reads = load_reads(&reads, config.preamble_lines).unwrap();
    let grouped = run_query(&samples, &reads, "GENE0", &config).unwrap();

    let labels: Vec<&str> = grouped.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["Whole Blood", "Brain - Cortex"]);
}

#[test]
fn shuffled_read_columns_give_the_same_groups() {
    let dir = tempfile::tempdir().unwrap();
    let ids: Vec<String> = (0..30).map(|i| format!("S{i:02}")).collect();

    let mut sample_lines = vec!["SAMPID\tSMTS".to_string()];
    sample_lines.extend(ids.iter().enumerate().map(|(i, id)| format!("{id}\tT{}", i % 3)));
    let sample_refs: Vec<&str> = sample_lines.iter().map(String::as_str).collect();
    let samples = load_samples(&write_samples(dir.path(), &sample_refs)).unwrap();

    let mut columns: Vec<usize> = (0..ids.len()).collect();
    columns.shuffle(&mut StdRng::seed_from_u64(11));
    let header = format!(
        "Name\tDescription\t{}",
        columns.iter().map(|&c| ids[c].as_str()).collect::<Vec<_>>().join("\t")
    );
    let row = format!(
        "ENSG1\tGENE1\t{}",
        columns.iter().map(|c| c.to_string()).collect::<Vec<_>>().join("\t")
    );
    let dims = format!("1\t{}", ids.len());
    let reads = load_reads(&write_reads(dir.path(), &["#1.2", dims.as_str(), header.as_str(), row.as_str()]), 2).unwrap();

    let grouped = run_query(&samples, &reads, "GENE1", &QueryConfig::default()).unwrap();
    assert_eq!(grouped.len(), 3);
    for (t, group) in grouped.iter().enumerate() {
        assert_eq!(group.label, format!("T{t}"));
        let expected: Vec<i64> = (0..ids.len() as i64).filter(|i| i % 3 == t as i64).collect();
        assert_eq!(group.counts, expected);
    }
}

#[test]
fn json_report_round_trips_through_replot() {
    let (dir, samples, reads) = fixture();
    let config = QueryConfig {
        min_mean: Some(7.0),
        ..QueryConfig::default()
    };

    let samples = load_samples(&samples).unwrap();
    let reads = load_reads(&reads, config.preamble_lines).unwrap();
    let grouped = apply_min_mean(run_query(&samples, &reads, "GENE1", &config).unwrap(), &config).unwrap();
    assert_eq!(grouped.len(), 2);

    let report = dir.path().join("groups.json");
    write_report(&report, &grouped).unwrap();

    let kept = read_json_report(&report, 7.5).unwrap();
    assert_eq!(kept, vec![GroupCounts::new("Blood", vec![5, 11])]);

    let plot = dir.path().join("groups.svg");
    render_box_plot(&plot, &kept, &PlotOptions::new("GENE1", "SMTS")).unwrap();
    assert!(std::fs::metadata(&plot).unwrap().len() > 0);
}

#[test]
fn tsv_report_lists_every_group() {
    let (dir, samples, reads) = fixture();
    let config = QueryConfig::default();

    let samples = load_samples(&samples).unwrap();
    let reads = load_reads(&reads, config.preamble_lines).unwrap();
    let grouped = run_query(&samples, &reads, "GENE1", &config).unwrap();

    let report = dir.path().join("groups.tsv");
    write_report(&report, &grouped).unwrap();

    let text = std::fs::read_to_string(&report).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Blood\t2\t8\t"));
    assert!(lines[2].starts_with("Brain\t1\t7\t"));
}
