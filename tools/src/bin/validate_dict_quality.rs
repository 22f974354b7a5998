// tools/src/bin/validate_dict_quality.rs
//
// Quality sweep over the dictionary and exception tables: kana values must
// be pure kana/punctuation, so residual Hangul (an unconverted reading) or
// Latin letters (a romanization that slipped in) flag an entry. --fix blanks
// the offending values so the identity pass-through takes over until the
// entry is re-curated.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kanafy_core::Config;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    Hangul,
    KanaExc,
    UserExc,
    All,
}

#[derive(Parser)]
#[command(about = "Flag dictionary/exception values containing Hangul or Latin letters")]
struct Args {
    /// Blank the offending values and rewrite the files
    #[arg(long)]
    fix: bool,

    /// Which table(s) to inspect
    #[arg(long, value_enum, default_value = "all")]
    dict: Target,

    /// Engine configuration (TOML); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

fn value_issues(value: &str) -> Vec<&'static str> {
    let mut issues = Vec::new();
    if value.chars().any(|ch| ('가'..='힣').contains(&ch)) {
        issues.push("hangul");
    }
    if value.chars().any(|ch| ch.is_ascii_alphabetic()) {
        issues.push("roman");
    }
    issues
}

/// Load a JSON object table; a missing file is skipped, a corrupt user file
/// is treated as empty (same tolerance as the engine).
fn load_table(
    path: &Path,
    tolerate_corrupt: bool,
) -> Result<Option<serde_json::Map<String, serde_json::Value>>> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    match serde_json::from_str(&content) {
        Ok(map) => Ok(Some(map)),
        Err(_) if tolerate_corrupt => Ok(Some(serde_json::Map::new())),
        Err(err) => Err(err).with_context(|| format!("parsing {}", path.display())),
    }
}

fn rewrite(path: &Path, table: &serde_json::Map<String, serde_json::Value>) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let payload = serde_json::to_string_pretty(&serde_json::Value::Object(table.clone()))?;
    std::fs::write(&tmp, payload).with_context(|| format!("writing {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_toml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    let mut targets: Vec<(&str, &Path, serde_json::Map<String, serde_json::Value>)> = Vec::new();
    if matches!(args.dict, Target::Hangul | Target::All) {
        if let Some(table) = load_table(&config.dict_path, false)? {
            targets.push(("syllable dictionary", config.dict_path.as_path(), table));
        }
    }
    if matches!(args.dict, Target::KanaExc | Target::All) {
        if let Some(table) = load_table(&config.builtin_exceptions_path, false)? {
            targets.push((
                "built-in exceptions",
                config.builtin_exceptions_path.as_path(),
                table,
            ));
        }
    }
    if matches!(args.dict, Target::UserExc | Target::All) {
        if let Some(table) = load_table(&config.user_exceptions_path, true)? {
            targets.push((
                "user exceptions",
                config.user_exceptions_path.as_path(),
                table,
            ));
        }
    }

    let mut bad = 0usize;
    for (name, _, table) in &targets {
        for (key, value) in table.iter() {
            let Some(value) = value.as_str() else { continue };
            let issues = value_issues(value);
            if !issues.is_empty() {
                if bad == 0 {
                    println!("=== Entries failing the pure-kana check ===");
                }
                bad += 1;
                println!("  [{}] {:?} -> {:?}  ({})", name, key, value, issues.join(", "));
            }
        }
    }

    if bad == 0 {
        println!("No offending entries found.");
        return Ok(());
    }

    if args.fix {
        println!("\n--fix: blanking {} offending value(s).", bad);
        for (name, path, table) in targets.iter_mut() {
            let mut modified = false;
            for (_, value) in table.iter_mut() {
                let issues = value.as_str().map(value_issues).unwrap_or_default();
                if !issues.is_empty() {
                    *value = serde_json::Value::String(String::new());
                    modified = true;
                }
            }
            if modified {
                rewrite(path, table)?;
                println!("  updated {} ({})", path.display(), name);
            }
        }
    } else {
        println!("\nPass --fix to blank these values.");
    }

    Ok(())
}
