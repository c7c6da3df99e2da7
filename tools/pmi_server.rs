/// PMI Server — line-delimited TCP queries against a pre-built bank.
///
/// Usage: pmi_server --bank <bank.ron> [--addr 127.0.0.1:8989]
///
/// Protocol, one request per line:
///   pmi <verb1> <verb2> [entity]     -> score, or "NaN" when undefined
///   chain <head> [entity]            -> space-joined chain
///
/// The bank is loaded once and served read-only; each connection gets
/// its own thread.
use std::env;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::thread;

use log::{debug, error, info};
use narrative_bank::{ChainOptions, NarrativeBank};

const USAGE: &str = "Usage: pmi_server --bank <bank.ron> [--addr 127.0.0.1:8989]";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut bank_path = None;
    let mut addr = "127.0.0.1:8989".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bank" => {
                i += 1;
                bank_path = Some(args[i].clone());
            }
            "--addr" => {
                i += 1;
                addr = args[i].clone();
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

    let bank_path = bank_path.unwrap_or_else(|| {
        eprintln!("Error: --bank is required");
        eprintln!("{}", USAGE);
        process::exit(1);
    });

    let bank = NarrativeBank::load(Path::new(&bank_path)).unwrap_or_else(|e| {
        eprintln!("Error loading bank from '{}': {}", bank_path, e);
        process::exit(1);
    });
    let bank = Arc::new(bank);
    info!(
        "loaded bank: {} unique events, {} unique pairs",
        bank.unique_events(),
        bank.unique_pairs()
    );

    let listener = TcpListener::bind(&addr).unwrap_or_else(|e| {
        eprintln!("Error binding {}: {}", addr, e);
        process::exit(1);
    });
    println!("Listening on {}", addr);

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let bank = Arc::clone(&bank);
                thread::spawn(move || {
                    if let Err(e) = handle(stream, &bank) {
                        error!("connection error: {}", e);
                    }
                });
            }
            Err(e) => error!("accept failed: {}", e),
        }
    }
}

fn handle(stream: TcpStream, bank: &NarrativeBank) -> std::io::Result<()> {
    let peer = stream.peer_addr()?;
    debug!("connected {}", peer);

    let reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;

    for line in reader.lines() {
        let line = line?;
        let reply = respond(bank, &line);
        debug!("{} -> {}", line, reply);
        writeln!(writer, "{}", reply)?;
    }

    debug!("closing {}", peer);
    Ok(())
}

/// One request line in, one reply line out. Undefined PMI is reported
/// as the literal "NaN", never as a numeric zero.
fn respond(bank: &NarrativeBank, line: &str) -> String {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["pmi", verb1, verb2] => format_score(bank.pmi(verb1, verb2, None)),
        ["pmi", verb1, verb2, entity] => format_score(bank.pmi(verb1, verb2, Some(*entity))),
        ["chain", head] => bank.chain(head, None, ChainOptions::default()).join(" "),
        ["chain", head, entity] => bank
            .chain(head, Some(*entity), ChainOptions::default())
            .join(" "),
        _ => "ERR expected: pmi <v1> <v2> [entity] | chain <head> [entity]".to_string(),
    }
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(value) => format!("{}", value),
        None => "NaN".to_string(),
    }
}
