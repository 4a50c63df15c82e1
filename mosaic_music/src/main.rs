// Mosaic music generator CLI.
//
// Loads a JSON generator config, runs it through the generator facade and
// writes the result as a MIDI file. A second subcommand measures how
// thoroughly random operator sequences scramble a grid of a given size.
//
// Usage:
//   cargo run -p mosaic_music -- generate CONFIG [--output PATH] [--seed N] [--print]
//   cargo run -p mosaic_music -- similarity WIDTH HEIGHT LENGTH TRIALS [--seed N]
//
// Set RUST_LOG=debug for per-step logging.

use mosaic_music::analysis::average_similarity;
use mosaic_music::config::GeneratorConfig;
use mosaic_music::error::MosaicError;
use mosaic_music::events::{EventSink, NoteEvent};
use mosaic_music::generator::Generators;
use mosaic_music::grid::{element_count, identity};
use mosaic_music::midi::MidiFileSink;
use mosaic_music::operators::operations;
use mosaic_prng::MosaicRng;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const USAGE: &str = "usage:
  mosaic generate CONFIG [--output PATH] [--seed N] [--print]
  mosaic similarity WIDTH HEIGHT LENGTH TRIALS [--seed N]";

fn main() {
    pretty_env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    let result = match args.get(1).map(|s| s.as_str()) {
        Some("generate") => run_generate(&args),
        Some("similarity") => run_similarity(&args),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run_generate(args: &[String]) -> Result<(), MosaicError> {
    let Some(config_path) = positional(args, 0) else {
        eprintln!("{USAGE}");
        std::process::exit(1);
    };
    let config = GeneratorConfig::load(Path::new(config_path))?;
    let seed = parse_flag(args, "--seed")
        .or(config.seed)
        .unwrap_or_else(clock_seed);
    let output: PathBuf =
        parse_flag(args, "--output").unwrap_or_else(|| config.filename.clone().into());

    println!("=== Mosaic ===");
    println!("Algorithm: {:?}", config.algorithm());
    println!("Author: {}", config.author);
    println!("Steps: {}", config.steps);
    println!("Seed: {}", seed);
    println!("Output: {}", output.display());
    println!();

    let mut rng = MosaicRng::new(seed);
    let mut sink = MidiFileSink::new(config.program)?;
    let summary = if args.iter().any(|a| a == "--print") {
        Generators::generate(&config, &mut rng, &mut Printing(&mut sink))?
    } else {
        Generators::generate(&config, &mut rng, &mut sink)?
    };
    sink.write(&output)?;

    println!(
        "Wrote {} events over {} steps to {}",
        summary.events,
        summary.steps,
        output.display()
    );
    Ok(())
}

fn run_similarity(args: &[String]) -> Result<(), MosaicError> {
    let numbers: Option<Vec<usize>> = (0..4)
        .map(|i| positional(args, i).and_then(|v| v.parse().ok()))
        .collect();
    let Some([width, height, length, trials]) =
        numbers.and_then(|n| <[usize; 4]>::try_from(n).ok())
    else {
        eprintln!("{USAGE}");
        std::process::exit(1);
    };
    let seed = parse_flag(args, "--seed").unwrap_or_else(clock_seed);

    element_count((width, height))?;
    let mut rng = MosaicRng::new(seed);
    let grid = identity((width, height));
    match average_similarity(&grid, &operations(), length, trials, &mut rng)? {
        Some(avg) => println!(
            "{}x{} grid, {} trials of {} moves: average similarity {:.4}",
            width, height, trials, length, avg
        ),
        None => println!("no trials run"),
    }
    Ok(())
}

/// Prints each event before handing it on.
struct Printing<'a>(&'a mut MidiFileSink);

impl EventSink for Printing<'_> {
    fn emit(&mut self, event: NoteEvent) -> Result<(), MosaicError> {
        println!("{event}");
        self.0.emit(event)
    }
}

/// The `n`th argument after the subcommand that is neither a flag nor a flag's value.
fn positional(args: &[String], n: usize) -> Option<&str> {
    let mut skip_next = false;
    args.iter()
        .skip(2)
        .filter(|a| {
            if skip_next {
                skip_next = false;
                return false;
            }
            if a.starts_with("--") {
                skip_next = a.as_str() != "--print";
                return false;
            }
            true
        })
        .nth(n)
        .map(|s| s.as_str())
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
