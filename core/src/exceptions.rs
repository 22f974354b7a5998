// core/src/exceptions.rs
//
// Exception table: manually curated Hangul span -> kana overrides applied
// before the normalizer runs. Two layers: an immutable built-in table loaded
// at start, and a durable user table that grows from missed-conversion
// reports. User entries win on conflict.
//
// The user file is human-editable JSON and is re-read before every addition,
// so external edits between requests are picked up. Writes go through an
// atomic replace (sibling tmp file + rename); the merged snapshot cache is
// invalidated only after the rename commits, so readers see either the old
// or the new table, never a torn one.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{info, warn};

use crate::error::Error;
use crate::utils;

type Entries = Vec<(String, String)>;

pub struct ExceptionTable {
    builtin: Entries,
    user_path: PathBuf,
    // Serializes read-modify-persist cycles; a single writer at a time.
    write_lock: Mutex<()>,
    // Bumped after every committed write. Snapshots record the generation
    // they were built against; a snapshot from an older generation is stale.
    generation: AtomicU64,
    // Merged snapshot tagged with its generation, rebuilt lazily.
    cache: RwLock<Option<(u64, Arc<Entries>)>>,
}

impl ExceptionTable {
    /// Build a table from in-memory built-ins and a user file path.
    pub fn new<P: AsRef<Path>>(builtin: Entries, user_path: P) -> Self {
        Self {
            builtin,
            user_path: user_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
            cache: RwLock::new(None),
        }
    }

    /// Load built-ins from a JSON object file. The built-in table is a
    /// release resource: a missing file means an empty table, but a corrupt
    /// one is a packaging defect and fails startup.
    pub fn load<P: AsRef<Path>>(builtin_path: P, user_path: P) -> Result<Self, Error> {
        let builtin_path = builtin_path.as_ref();
        let builtin = if builtin_path.exists() {
            let content = std::fs::read_to_string(builtin_path)?;
            let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content)?;
            raw.into_iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                .collect()
        } else {
            warn!(path = %builtin_path.display(), "built-in exception table not found, starting empty");
            Vec::new()
        };
        info!(entries = builtin.len(), "loaded built-in exception table");
        Ok(Self::new(builtin, user_path))
    }

    /// Read the durable user table; missing or corrupt files yield an empty
    /// map so a bad edit never takes conversions down.
    fn read_user(&self) -> serde_json::Map<String, serde_json::Value> {
        match std::fs::read_to_string(&self.user_path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(map) => map,
                Err(err) => {
                    warn!(path = %self.user_path.display(), %err, "user exception table unreadable, treating as empty");
                    serde_json::Map::new()
                }
            },
            Err(_) => serde_json::Map::new(),
        }
    }

    /// The merged view: built-in order with user overrides substituted in
    /// place, then user-only spans appended in user-file order. Cached until
    /// the next successful addition.
    ///
    /// `apply` iterates this order when rewriting overlapping spans; it is
    /// deliberately the file/insertion order, not longest-match-first.
    pub fn merged(&self) -> Arc<Entries> {
        // The generation must be observed before the user file is read: if a
        // write commits in between, the snapshot built here is stale and
        // `store_snapshot` will refuse to publish it.
        let observed = self.generation.load(Ordering::Acquire);
        if let Ok(cache) = self.cache.read() {
            if let Some((gen, snapshot)) = cache.as_ref() {
                if *gen == observed {
                    return Arc::clone(snapshot);
                }
            }
        }

        let snapshot = Arc::new(self.build_merged());
        self.store_snapshot(observed, &snapshot);
        snapshot
    }

    fn build_merged(&self) -> Entries {
        let user = self.read_user();
        let mut merged: Entries = Vec::with_capacity(self.builtin.len() + user.len());
        for (span, kana) in &self.builtin {
            let kana = user
                .get(span)
                .and_then(|v| v.as_str())
                .unwrap_or(kana.as_str());
            merged.push((span.clone(), kana.to_string()));
        }
        for (span, value) in &user {
            if self.builtin.iter().any(|(b, _)| b == span) {
                continue;
            }
            if let Some(kana) = value.as_str() {
                merged.push((span.clone(), kana.to_string()));
            }
        }
        merged
    }

    /// Publish a rebuilt snapshot unless a write committed since `observed`
    /// was loaded. A stale snapshot is still returned to its own caller but
    /// never cached, so later readers rebuild against the new file.
    fn store_snapshot(&self, observed: u64, snapshot: &Arc<Entries>) {
        if let Ok(mut cache) = self.cache.write() {
            if self.generation.load(Ordering::Acquire) == observed {
                *cache = Some((observed, Arc::clone(snapshot)));
            }
        }
    }

    /// Add (or overwrite) a user exception and persist it.
    ///
    /// Inputs are NFC-normalized and trimmed; empty values are a correctable
    /// caller error. The user file is re-read first so concurrent external
    /// edits are not clobbered, then rewritten as an all-or-nothing replace.
    pub fn add(&self, hangul: &str, kana: &str) -> Result<(), Error> {
        let hangul = utils::normalize(hangul);
        let kana = utils::normalize(kana);
        if hangul.is_empty() || kana.is_empty() {
            return Err(Error::InvalidArgument(
                "hangul and kana must be non-empty".to_string(),
            ));
        }

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut user = self.read_user();
        user.insert(hangul.clone(), serde_json::Value::String(kana.clone()));

        if let Some(parent) = self.user_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp_path = self.user_path.with_extension("json.tmp");
        let payload = serde_json::to_string_pretty(&serde_json::Value::Object(user))?;
        std::fs::write(&tmp_path, payload)?;
        std::fs::rename(&tmp_path, &self.user_path)?;

        // Invalidate only after the rename commits. Bumping the generation
        // outdates every snapshot built before this write, including one a
        // concurrent reader has built but not yet published.
        self.generation.fetch_add(1, Ordering::Release);
        info!(hangul = %hangul, kana = %kana, "added user exception");
        Ok(())
    }

    /// Replace every literal occurrence of each merged span with its kana.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (span, kana) in self.merged().iter() {
            if out.contains(span.as_str()) {
                out = out.replace(span.as_str(), kana);
            }
        }
        out
    }
}

impl std::fmt::Debug for ExceptionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExceptionTable")
            .field("builtin_entries", &self.builtin.len())
            .field("user_path", &self.user_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_in(dir: &tempfile::TempDir, builtin: Entries) -> ExceptionTable {
        ExceptionTable::new(builtin, dir.path().join("user_exceptions.json"))
    }

    #[test]
    fn apply_replaces_spans_in_merged_order() {
        let dir = tempfile::tempdir().unwrap();
        let table = table_in(
            &dir,
            vec![("내".into(), "ネ".into()), ("노래".into(), "ノレ".into())],
        );
        assert_eq!(table.apply("내 노래 내"), "ネ ノレ ネ");
    }

    #[test]
    fn add_validates_after_trim() {
        let dir = tempfile::tempdir().unwrap();
        let table = table_in(&dir, Vec::new());
        assert!(matches!(
            table.add("  ", "カナ"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            table.add("한", "\t "),
            Err(Error::InvalidArgument(_))
        ));
        assert!(table.add(" 한 ", " ハン ").is_ok());
        let merged = table.merged();
        assert_eq!(merged.as_slice(), &[("한".to_string(), "ハン".to_string())]);
    }

    #[test]
    fn user_entry_overrides_builtin_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let table = table_in(
            &dir,
            vec![("가".into(), "ガ".into()), ("나".into(), "ナ".into())],
        );
        table.add("가", "カ").unwrap();
        let merged = table.merged();
        assert_eq!(
            merged.as_slice(),
            &[
                ("가".to_string(), "カ".to_string()),
                ("나".to_string(), "ナ".to_string()),
            ]
        );
    }

    #[test]
    fn snapshot_built_before_a_commit_is_never_cached() {
        let dir = tempfile::tempdir().unwrap();
        let table = table_in(&dir, vec![("가".into(), "ガ".into())]);

        // A reader rebuilds: it observes the generation, then reads the
        // user file.
        let observed = table.generation.load(Ordering::Acquire);
        let stale = Arc::new(table.build_merged());

        // A write commits before the reader publishes its snapshot.
        table.add("가", "カ").unwrap();

        // The late publish must be refused; otherwise the committed entry
        // would stay invisible until the next write.
        table.store_snapshot(observed, &stale);
        let merged = table.merged();
        let hit = merged.iter().find(|(span, _)| span == "가").unwrap();
        assert_eq!(hit.1, "カ");
    }

    #[test]
    fn corrupt_user_file_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_exceptions.json");
        std::fs::write(&path, "{not json").unwrap();
        let table = ExceptionTable::new(vec![("가".into(), "ガ".into())], &path);
        assert_eq!(table.merged().len(), 1);
        // A subsequent add recovers the file.
        table.add("나", "ナ").unwrap();
        assert_eq!(table.merged().len(), 2);
    }
}
