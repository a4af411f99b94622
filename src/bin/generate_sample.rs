//! Write a toy sample attributes table and gzipped GCT read-count file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flate2::Compression;
use flate2::write::GzEncoder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate a small GTEx-shaped dataset for trying `gtex-plot query`.
#[derive(Parser, Debug)]
#[command(name = "generate_sample", version)]
struct Args {
    /// Output directory
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Samples per tissue
    #[arg(long, default_value_t = 12)]
    samples_per_tissue: usize,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// (SMTS, SMTSD, expression scale)
const TISSUES: [(&str, &str, f64); 5] = [
    ("Blood", "Whole Blood", 0.4),
    ("Brain", "Brain - Cortex", 1.6),
    ("Lung", "Lung", 1.0),
    ("Liver", "Liver", 0.7),
    ("Muscle", "Muscle - Skeletal", 2.2),
];

/// (Name, Description, baseline count)
const GENES: [(&str, &str, f64); 6] = [
    ("ENSG00000075624.13", "ACTB", 9000.0),
    ("ENSG00000111640.14", "GAPDH", 12000.0),
    ("ENSG00000141510.16", "TP53", 800.0),
    ("ENSG00000117118.9", "SDHB", 1500.0),
    ("ENSG00000012048.20", "BRCA1", 150.0),
    ("ENSG00000139618.14", "BRCA2", 60.0),
];

struct Sample {
    id: String,
    tissue: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut samples = Vec::new();
    for (tissue, _) in TISSUES.iter().enumerate() {
        for i in 0..args.samples_per_tissue {
            let donor: u32 = rng.random_range(1000..10000);
            let serial = samples.len();
            samples.push(Sample {
                id: format!("GTEX-{donor:04X}-{:04}-SM-{serial:05}", tissue * 100 + i),
                tissue,
            });
        }
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    // Sample attributes: every sample, including those without sequencing data.
    let attributes_path = args.out_dir.join("sample_attributes.txt");
    let mut out = BufWriter::new(
        File::create(&attributes_path).with_context(|| format!("creating {}", attributes_path.display()))?,
    );
    writeln!(out, "SAMPID\tSMTS\tSMTSD")?;
    for sample in &samples {
        let (smts, smtsd, _) = TISSUES[sample.tissue];
        writeln!(out, "{}\t{smts}\t{smtsd}", sample.id)?;
    }
    out.flush()?;

    // Read counts: roughly one sample in ten was never sequenced.
    let sequenced: Vec<&Sample> = samples.iter().filter(|_| rng.random_range(0..10) != 0).collect();

    let reads_path = args.out_dir.join("gene_reads.gct.gz");
    let file = File::create(&reads_path).with_context(|| format!("creating {}", reads_path.display()))?;
    let mut out = GzEncoder::new(BufWriter::new(file), Compression::default());
    writeln!(out, "#1.2")?;
    writeln!(out, "{}\t{}", GENES.len(), sequenced.len())?;

    let ids: Vec<&str> = sequenced.iter().map(|s| s.id.as_str()).collect();
    writeln!(out, "Name\tDescription\t{}", ids.join("\t"))?;

    for (name, description, baseline) in GENES {
        let counts: Vec<String> = sequenced
            .iter()
            .map(|sample| {
                let scale = TISSUES[sample.tissue].2;
                let noise: f64 = rng.random_range(0.6..1.4);
                let spike = if rng.random_range(0..25) == 0 { 3.0 } else { 1.0 };
                ((baseline * scale * noise * spike).round() as i64).to_string()
            })
            .collect();
        writeln!(out, "{name}\t{description}\t{}", counts.join("\t"))?;
    }
    out.finish()?.flush()?;

    println!(
        "Wrote {} samples to {} and {} genes x {} samples to {}",
        samples.len(),
        attributes_path.display(),
        GENES.len(),
        sequenced.len(),
        reads_path.display()
    );
    Ok(())
}
