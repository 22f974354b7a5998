// tools/src/main.rs
//
// analyze-residue: run a corpus (one text per line) through the conversion
// pipeline and rank the Hangul syllables that survive it, most frequent
// first, so the dictionary can be patched from the top down.

use anyhow::{Context, Result};
use clap::Parser;
use kanafy_core::{Config, ConvertOptions, IdentityNormalizer, KanaConverter, ResidueCounter};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(about = "Rank residual Hangul syllables across a corpus")]
struct Args {
    /// Corpus file, one text per line
    corpus: PathBuf,

    /// Engine configuration (TOML); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the ranked [{syllable, count}] records as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Skip the normalizer stage and map syllables by spelling only
    #[arg(long)]
    no_normalizer: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_toml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    let converter = KanaConverter::from_config(&config, Arc::new(IdentityNormalizer))
        .context("building converter")?;
    if converter.dict().is_empty() {
        eprintln!(
            "warning: syllable dictionary at {} is empty or missing; every syllable will rank as residue",
            config.dict_path.display()
        );
    }
    let opts = ConvertOptions {
        use_normalizer: !args.no_normalizer,
        ..config.convert_options()
    };

    let content = std::fs::read_to_string(&args.corpus)
        .with_context(|| format!("reading corpus {}", args.corpus.display()))?;

    let mut counter = ResidueCounter::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let converted = converter.convert(line, &opts);
        counter.observe(&converted);
    }

    let ranked = counter.ranked();
    if ranked.is_empty() {
        println!("No residual Hangul found.");
    } else {
        println!("=== Residual Hangul syllables (most frequent first) ===");
        for (i, record) in ranked.iter().enumerate() {
            println!("  {:3}. {}  : {} occurrence(s)", i + 1, record.syllable, record.count);
        }
    }

    if let Some(path) = &args.json {
        let payload = serde_json::to_string_pretty(&ranked)?;
        std::fs::write(path, payload)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("\nWrote JSON to {}", path.display());
    }

    Ok(())
}
