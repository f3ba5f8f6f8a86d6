use std::fs;
use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_markov_core::model::generation_input::GenerationInput;
use rs_markov_core::model::generator::Generator;

/// Generate sentences from a word n-gram model trained on plain text files.
#[derive(Parser, Debug)]
#[command(name = "rs-markov", version)]
struct Args {
    /// Training text files
    #[arg(default_value = "books/defiant agents - andre norton.txt")]
    files: Vec<PathBuf>,

    /// Number of lines (sentences) to generate
    #[arg(short, long)]
    lines: Option<usize>,

    /// Seed for reproducible output (system entropy if absent)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON file with generation settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print model statistics as JSON before generating
    #[arg(long)]
    stats: bool,
}

/// Loads generation settings, the command line having the last word.
fn load_input(args: &Args) -> Result<GenerationInput, Box<dyn std::error::Error>> {
    let mut input = match &args.config {
        Some(path) => serde_json::from_str::<GenerationInput>(&fs::read_to_string(path)?)?,
        None => GenerationInput::default(),
    };
    if let Some(lines) = args.lines {
        input.lines = lines;
    }
    input.validate()?;
    Ok(input)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let input = load_input(&args)?;

    // Seed once, every draw below comes from this source
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // An unreadable file is reported and skipped
    let mut generator = Generator::new();
    for file in &args.files {
        if let Err(e) = generator.load_file(file) {
            log::error!("load file failed: {}", e);
        }
    }

    if args.stats {
        println!("{}", serde_json::to_string_pretty(&generator.model().stats())?);
    }

    match generator.generate(&input, &mut rng) {
        Ok(text) => {
            println!();
            println!("generated:");
            println!();
            println!("{}", text);
            println!();
            Ok(())
        }
        Err(e) => {
            log::error!("generation failed: {}", e);
            Err(e.into())
        }
    }
}
