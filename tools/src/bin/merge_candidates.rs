// tools/src/bin/merge_candidates.rs
//
// Fold reviewed kana candidates into the syllable dictionary. Closes the
// curation loop: analyze-residue ranks the gaps, generate_candidates
// proposes readings, this merges the approved ones.
//
// Accepts the generate_candidates JSON output ({"syllable", "kana", ...});
// entries without a kana are skipped. Nothing is written without --merge or
// --interactive, and --dry-run always wins.

use anyhow::{bail, Context, Result};
use clap::Parser;
use kanafy_core::Config;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(about = "Merge approved kana candidates into the syllable dictionary")]
struct Args {
    /// Candidate JSON (the generate_candidates --json output)
    candidates_file: PathBuf,

    /// Merge all candidates without prompting
    #[arg(long)]
    merge: bool,

    /// Confirm each candidate with y/n before merging
    #[arg(long)]
    interactive: bool,

    /// Show what would be merged without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Only the first N candidates in file order (frequency order when the
    /// file came out of the analyze -> generate chain)
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Engine configuration (TOML); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Candidates in file order, one entry per syllable (last value wins).
fn extract_entries(values: &[serde_json::Value]) -> Vec<(char, String)> {
    let mut entries: Vec<(char, String)> = Vec::new();
    for value in values {
        let Some(map) = value.as_object() else { continue };
        let Some(syllable) = map.get("syllable").and_then(|v| v.as_str()) else {
            continue;
        };
        let mut chars = syllable.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            continue;
        };
        let kana = map
            .get("candidate")
            .or_else(|| map.get("kana"))
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let Some(kana) = kana else { continue };
        match entries.iter_mut().find(|(existing, _)| *existing == ch) {
            Some((_, slot)) => *slot = kana.to_string(),
            None => entries.push((ch, kana.to_string())),
        }
    }
    entries
}

fn confirm(ch: char, kana: &str) -> Result<bool> {
    print!("  add {} -> {} ? [y/N]: ", ch, kana);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn write_dictionary(path: &Path, entries: &[(char, String)]) -> Result<usize> {
    let mut dict: serde_json::Map<String, serde_json::Value> = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?
    } else {
        serde_json::Map::new()
    };

    for (ch, kana) in entries {
        dict.insert(ch.to_string(), serde_json::Value::String(kana.clone()));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    let payload = serde_json::to_string_pretty(&serde_json::Value::Object(dict))?;
    std::fs::write(&tmp, payload).with_context(|| format!("writing {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(entries.len())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_toml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    let content = std::fs::read_to_string(&args.candidates_file)
        .with_context(|| format!("reading {}", args.candidates_file.display()))?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", args.candidates_file.display()))?;
    if values.is_empty() {
        bail!("candidate file is empty");
    }

    let mut entries = extract_entries(&values);
    if let Some(top) = args.top {
        entries.truncate(top);
    }
    if entries.is_empty() {
        println!("Nothing to merge; entries without a kana candidate are skipped.");
        return Ok(());
    }

    if args.interactive {
        let mut approved = Vec::with_capacity(entries.len());
        for (ch, kana) in entries {
            if confirm(ch, &kana)? {
                approved.push((ch, kana));
            }
        }
        entries = approved;
        if entries.is_empty() {
            println!("No entries approved.");
            return Ok(());
        }
    }

    println!("=== To merge ===");
    let mut preview = entries.clone();
    preview.sort_by_key(|(ch, _)| *ch);
    for (ch, kana) in &preview {
        println!("  {} -> {}", ch, kana);
    }

    if args.dry_run {
        println!("\n[--dry-run] nothing written.");
        return Ok(());
    }
    if !args.merge && !args.interactive {
        println!("\nPass --merge to write these entries.");
        return Ok(());
    }

    let count = write_dictionary(&config.dict_path, &entries)?;
    println!("\nMerged {} entries into {}.", count, config.dict_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entries_keep_file_order_and_last_value_wins() {
        let values = vec![
            json!({"syllable": "갂", "candidate": "カッ"}),
            json!({"syllable": "꺅", "kana": "キャク"}),
            json!({"syllable": "갂", "candidate": "ガッ"}),
            json!({"syllable": "없음", "candidate": "ナシ"}),
            json!({"syllable": "핧", "candidate": "  "}),
            json!({"syllable": "뷁"}),
        ];
        let entries = extract_entries(&values);
        assert_eq!(
            entries,
            vec![('갂', "ガッ".to_string()), ('꺅', "キャク".to_string())]
        );
    }

    #[test]
    fn merge_preserves_existing_dictionary_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.json");
        std::fs::write(&path, r#"{"가": "カ", "나": "ナ"}"#).unwrap();

        let written = write_dictionary(
            &path,
            &[('나', "ダ".to_string()), ('다', "ダ".to_string())],
        )
        .unwrap();
        assert_eq!(written, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let dict: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&content).unwrap();
        assert_eq!(dict["가"], "カ");
        assert_eq!(dict["나"], "ダ");
        assert_eq!(dict["다"], "ダ");
        assert!(!path.with_extension("json.tmp").exists());
    }
}
