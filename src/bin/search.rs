//! Look up a value in a word list or JSON array with linear or binary search.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde_json::Value as JsonValue;

use gtex_plot::data::model::{Container, FieldValue, IndexedEntry};
use gtex_plot::data::search::{binary_search, index_list, linear_search};
use gtex_plot::{ErrorKind, GtexError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Linear,
    Binary,
}

/// Print the position of a target value in the input data.
#[derive(Parser, Debug)]
#[command(name = "search", version)]
struct Args {
    /// Text file (split into words, `.` and `,` removed) or `.json` array
    #[arg(short, long)]
    input: PathBuf,

    /// Value to find; in a JSON array it also matches numbers and booleans
    #[arg(short, long)]
    target: String,

    /// Search algorithm
    #[arg(short, long, value_enum, default_value_t = Algorithm::Linear)]
    algorithm: Algorithm,

    /// Shuffle the data before searching
    #[arg(short, long)]
    shuffle: bool,

    /// Seed for --shuffle
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let typed = is_json(&args.input);
    let mut data = match load_input(&args.input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if args.shuffle {
        if let Container::List(items) = &mut data {
            match args.seed {
                Some(seed) => items.shuffle(&mut StdRng::seed_from_u64(seed)),
                None => items.shuffle(&mut rand::rng()),
            }
            debug!("Shuffled {} items", items.len());
        }
    }

    match search(&data, &args.target, args.algorithm, typed) {
        Ok(index) => {
            println!("{index}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", failure_message(&e, &args.target, args.algorithm));
            ExitCode::FAILURE
        }
    }
}

/// Read the input as a JSON value or as a whitespace-separated word list.
fn load_input(path: &Path) -> Result<Container> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    if is_json(path) {
        let value: JsonValue =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        return Ok(Container::from(value));
    }

    let words = words(&text);
    info!("Read {} words from {}", words.len(), path.display());
    Ok(Container::List(words.into_iter().map(FieldValue::Text).collect()))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn words(text: &str) -> Vec<String> {
    text.trim_end_matches('\n')
        .replace(|c: char| c == '.' || c == ',', "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Search `data` for `target`. With `typed`, a linear search reads the target
/// as the narrowest scalar type so `2` matches a JSON number.
fn search(data: &Container, target: &str, algorithm: Algorithm, typed: bool) -> gtex_plot::Result<usize> {
    match algorithm {
        Algorithm::Linear if typed => linear_search(&FieldValue::guess(target), data),
        Algorithm::Linear => linear_search(target, data),
        Algorithm::Binary => {
            let indexed = index_list(data)?
                .into_iter()
                .map(|entry| match entry.value {
                    FieldValue::Text(value) => Ok(IndexedEntry { value, position: entry.position }),
                    other => Err(GtexError::TypeWrong {
                        reason: format!("binary search compares text, found {other}"),
                    }),
                })
                .collect::<gtex_plot::Result<Vec<_>>>()?;
            binary_search(target, &indexed)
        }
    }
}

fn failure_message(error: &GtexError, target: &str, algorithm: Algorithm) -> String {
    match error.kind() {
        ErrorKind::NotFound => format!("NotFound: Unable to find target value `{target}`"),
        ErrorKind::InvalidArgument => "InvalidArgument: Provided data is not a list".to_string(),
        ErrorKind::EmptyInput => {
            let name = match algorithm {
                Algorithm::Linear => "linear",
                Algorithm::Binary => "binary",
            };
            format!("EmptyInput: Empty list provided for {name} search")
        }
        ErrorKind::TypeWrong => format!("TypeWrong: {error}"),
    }
}
