//! Grouped count sinks: summary TSV, JSON and Parquet, plus JSON re-ingestion.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Float64Array, Int64Builder, ListBuilder, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::ArrowWriter;
use serde_json::Value as JsonValue;

use crate::data::filter::filter_by_threshold;
use crate::data::model::{Container, GroupCounts};
use crate::data::stats::{BoxSummary, mean};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write grouped counts to `path`.  Dispatch by extension.
///
/// Supported formats:
/// * `.tsv` / `.txt` – one summary line per group
/// * `.json`         – `[["Blood", [5, 9]], ["Brain", [7]]]`
/// * `.parquet`      – `group`, `n`, `mean` and a `counts` list column
pub fn write_report(path: &Path, grouped: &[GroupCounts]) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "tsv" | "txt" => write_summary_tsv(create(path)?, grouped),
        "json" => write_json(create(path)?, grouped),
        "parquet" | "pq" => write_parquet(path, grouped),
        other => bail!("Unsupported report extension: .{other}"),
    }?;

    info!("Wrote {} groups to {}", grouped.len(), path.display());
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}

// ---------------------------------------------------------------------------
// TSV summary
// ---------------------------------------------------------------------------

/// One line per group: `group n mean median q1 q3 min max`. Statistics of a
/// group without counts are left blank (mean is 0).
pub fn write_summary_tsv<W: Write>(writer: W, grouped: &[GroupCounts]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    writer.write_record(["group", "n", "mean", "median", "q1", "q3", "min", "max"])?;

    for group in grouped {
        let mut record = vec![group.label.clone(), group.counts.len().to_string()];
        match BoxSummary::from_counts(&group.counts) {
            Some(s) => {
                record.push(s.mean.to_string());
                for v in [s.median, s.q1, s.q3, s.min, s.max] {
                    record.push(v.to_string());
                }
            }
            None => {
                record.push("0".to_string());
                record.extend(std::iter::repeat(String::new()).take(5));
            }
        }
        writer.write_record(&record)?;
    }

    writer.flush().context("flushing TSV report")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Write `[[label, [counts...]], ...]`.
pub fn write_json<W: Write>(mut writer: W, grouped: &[GroupCounts]) -> Result<()> {
    let entries: Vec<(&str, &[i64])> = grouped
        .iter()
        .map(|g| (g.label.as_str(), g.counts.as_slice()))
        .collect();
    serde_json::to_writer_pretty(&mut writer, &entries).context("writing JSON report")?;
    writer.flush().context("flushing JSON report")?;
    Ok(())
}

/// Read a JSON report back, keeping groups whose mean is at least `threshold`.
///
/// The file is parsed without a schema, so a top-level object, a missing
/// label or a non-numeric count are reported as type errors rather than
/// deserialization failures.
pub fn read_json_report(path: &Path, threshold: f64) -> Result<Vec<GroupCounts>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    let container = Container::from(root);

    let kept = filter_by_threshold(&container, &threshold)
        .with_context(|| format!("filtering groups in {}", path.display()))?;

    kept.iter()
        .map(|entry| GroupCounts::try_from(entry).map_err(anyhow::Error::from))
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("converting groups in {}", path.display()))
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Write one row per group with its label, sample count, mean and counts.
pub fn write_parquet(path: &Path, grouped: &[GroupCounts]) -> Result<()> {
    let mut counts_builder = ListBuilder::new(Int64Builder::new());
    for group in grouped {
        let values = counts_builder.values();
        for &c in &group.counts {
            values.append_value(c);
        }
        counts_builder.append(true);
    }
    let counts_array = counts_builder.finish();

    let label_array = StringArray::from(grouped.iter().map(|g| g.label.as_str()).collect::<Vec<_>>());
    let n_array = UInt64Array::from(grouped.iter().map(|g| g.counts.len() as u64).collect::<Vec<_>>());
    let means = grouped
        .iter()
        .map(|g| mean(&g.counts))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let mean_array = Float64Array::from(means);

    let schema = Arc::new(Schema::new(vec![
        Field::new("group", DataType::Utf8, false),
        Field::new("n", DataType::UInt64, false),
        Field::new("mean", DataType::Float64, false),
        Field::new("counts", DataType::List(Arc::new(Field::new("item", DataType::Int64, true))), false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(label_array),
            Arc::new(n_array),
            Arc::new(mean_array),
            Arc::new(counts_array),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
