// tools/src/bin/generate_candidates.rs
//
// Propose kana readings for unresolved syllables, tagged with provenance so
// a reviewer knows how much to trust each one before merging it into the
// dictionary or demoting it to an exception entry.

use anyhow::{bail, Context, Result};
use clap::Parser;
use kanafy_core::{curation, Config, IdentityNormalizer, Normalizer, SyllableDict};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Generate kana candidates for unresolved Hangul syllables")]
struct Args {
    /// JSON input: either ["가", ...] or [{"syllable": "가", "count": 3}, ...]
    /// (the analyze-residue output shape)
    input: Option<PathBuf>,

    /// Syllables given directly, repeatable
    #[arg(long = "syllable")]
    syllables: Vec<String>,

    /// Engine configuration (TOML); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the candidate records as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Skip the normalizer route and use codec-only generation
    #[arg(long)]
    no_normalizer: bool,
}

fn collect_syllables(args: &Args) -> Result<Vec<char>> {
    let raw: Vec<String> = if !args.syllables.is_empty() {
        args.syllables.clone()
    } else if let Some(path) = &args.input {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        values
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Object(map) => map
                    .get("syllable")
                    .and_then(|s| s.as_str())
                    .map(str::to_string),
                _ => None,
            })
            .collect()
    } else {
        bail!("provide an input file or at least one --syllable");
    };

    let mut syllables = Vec::with_capacity(raw.len());
    for item in raw {
        let mut chars = item.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => syllables.push(ch),
            _ => eprintln!("skipping {:?}: expected exactly one syllable", item),
        }
    }
    Ok(syllables)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let syllables = collect_syllables(&args)?;
    if syllables.is_empty() {
        println!("No syllables to process.");
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load_toml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    let dict = SyllableDict::load(&config.dict_path).context("loading syllable dictionary")?;
    if dict.is_empty() {
        eprintln!(
            "warning: syllable dictionary at {} is empty or missing; candidates will come from jamo synthesis only",
            config.dict_path.display()
        );
    }

    let identity = IdentityNormalizer;
    let normalizer: Option<&dyn Normalizer> = if args.no_normalizer {
        None
    } else {
        Some(&identity)
    };

    let candidates = curation::generate(&syllables, &dict, normalizer);

    println!("=== Kana candidates ===");
    for c in &candidates {
        let status = if c.kana.is_some() { "+" } else { "?" };
        let kana = c.kana.as_deref().unwrap_or("(none)");
        let jamo = c.jamo.as_deref().unwrap_or("-");
        println!(
            "  {} {} -> {}  [{:?}] jamo={} {}",
            status, c.syllable, kana, c.source, jamo, c.note
        );
    }

    if let Some(path) = &args.json {
        let payload = serde_json::to_string_pretty(&candidates)?;
        std::fs::write(path, payload)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("\nWrote JSON to {}", path.display());
    }

    Ok(())
}
