/// Bank Trainer — builds a narrative bank from a corpus of parsed documents.
///
/// Usage: bank_trainer --corpus <dir> --output <bank.ron> [--mode dep|token] [--typed]
use std::env;
use std::path::Path;
use std::process;

use narrative_bank::{AggregationMode, BankConfig, NarrativeBank};

const USAGE: &str =
    "Usage: bank_trainer --corpus <dir> --output <bank.ron> [--mode dep|token] [--typed]";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut corpus = None;
    let mut output = None;
    let mut mode = AggregationMode::DependencyRelation;
    let mut typed = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--corpus" => {
                i += 1;
                corpus = Some(args[i].clone());
            }
            "--output" => {
                i += 1;
                output = Some(args[i].clone());
            }
            "--mode" => {
                i += 1;
                mode = match args[i].as_str() {
                    "dep" => AggregationMode::DependencyRelation,
                    "token" => AggregationMode::TokenAdjacency,
                    other => {
                        eprintln!("Error: unknown mode '{}', expected dep or token", other);
                        process::exit(1);
                    }
                };
            }
            "--typed" => {
                typed = true;
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let corpus_dir = corpus.unwrap_or_else(|| {
        eprintln!("Error: --corpus is required");
        eprintln!("{}", USAGE);
        process::exit(1);
    });

    let output_path = output.unwrap_or_else(|| {
        eprintln!("Error: --output is required");
        eprintln!("{}", USAGE);
        process::exit(1);
    });

    let mut bank = NarrativeBank::with_config(BankConfig { mode, typed });

    println!("Ingesting parsed documents from '{}'...", corpus_dir);
    let report = bank.ingest_dir(Path::new(&corpus_dir)).unwrap_or_else(|e| {
        eprintln!("Error reading corpus directory '{}': {}", corpus_dir, e);
        process::exit(1);
    });

    println!(
        "Ingested {} documents ({} skipped): {} unique events, {} unique pairs",
        report.ingested,
        report.skipped,
        bank.unique_events(),
        bank.unique_pairs()
    );

    bank.save(Path::new(&output_path)).unwrap_or_else(|e| {
        eprintln!("Error saving bank to '{}': {}", output_path, e);
        process::exit(1);
    });

    println!("Bank saved to '{}'", output_path);
}
