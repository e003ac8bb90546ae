//! Guide-document persistence helpers.
//!
//! Manual save/load, autosave naming and discovery, and quest-database
//! import/export. Everything here is plain JSON on disk; the in-memory model
//! is only replaced after a document parses cleanly, so a bad file never
//! clobbers current work.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};
use std::time::SystemTime;

use anyhow::{Context, Result};
use log::{info, warn};
use phermuth_data::{GuideDoc, GuideMeta, QuestId, QuestRecord};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// File-name suffix marking autosave documents.
pub const AUTOSAVE_SUFFIX: &str = ".autosave.json";

const DOC_TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const AUTOSAVE_DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year][month][day]");

static ACTIVE_AUTOSAVE_DIR: LazyLock<RwLock<PathBuf>> =
    LazyLock::new(|| RwLock::new(default_autosave_dir()));

fn default_autosave_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("phermuth").join("autosave"))
        .unwrap_or_else(|| PathBuf::from("autosave"))
}

/// Return the active autosave directory.
pub fn autosave_dir() -> PathBuf {
    ACTIVE_AUTOSAVE_DIR
        .read()
        .map(|guard| guard.clone())
        .unwrap_or_else(|_| default_autosave_dir())
}

/// Override the autosave directory for this process.
pub fn set_autosave_dir(path: PathBuf) {
    if let Ok(mut guard) = ACTIVE_AUTOSAVE_DIR.write() {
        *guard = path;
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Current wall-clock time in the document's `YYYY-MM-DD HH:MM:SS` form.
pub fn document_timestamp() -> String {
    now().format(DOC_TIMESTAMP_FORMAT).unwrap_or_else(|err| {
        warn!("failed to format document timestamp: {err}");
        String::new()
    })
}

/// Autosave file name for a guide: metadata-derived when zone and level range
/// are set, else a date-stamped fallback.
pub fn autosave_file_name(meta: &GuideMeta) -> String {
    let stem = meta.file_stem().unwrap_or_else(|| {
        let date = now().format(AUTOSAVE_DATE_FORMAT).unwrap_or_else(|err| {
            warn!("failed to format autosave date: {err}");
            String::new()
        });
        format!("autosave_{date}")
    });
    format!("{stem}{AUTOSAVE_SUFFIX}")
}

/// Default `.json` name for a manual save.
pub fn default_guide_file_name(meta: &GuideMeta) -> String {
    meta.file_stem()
        .map_or_else(|| "phermuth_guide_data.json".to_string(), |stem| format!("{stem}.json"))
}

/// Default `.lua` name for an exported script.
pub fn default_lua_file_name(meta: &GuideMeta) -> String {
    meta.file_stem()
        .map_or_else(|| "phermuth_guide.lua".to_string(), |stem| format!("{stem}.lua"))
}

/// Write a guide document to `path` as pretty-printed JSON.
///
/// # Errors
/// Returns an error if serialization or any filesystem operation fails.
pub fn save_document(path: &Path, doc: &GuideDoc) -> Result<()> {
    let json = serde_json::to_string_pretty(doc).context("serializing guide document")?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!("guide document saved to {}", path.display());
    Ok(())
}

/// Load a guide document from `path`.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a guide document.
pub fn load_document(path: &Path) -> Result<GuideDoc> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing guide document {}", path.display()))
}

/// Stamp `doc` with the current time and write it into `dir` under its
/// autosave name. Returns the file written.
///
/// # Errors
/// Returns an error if the directory cannot be created or the write fails.
pub fn autosave_into(dir: &Path, doc: &mut GuideDoc) -> Result<PathBuf> {
    doc.timestamp = Some(document_timestamp());
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(autosave_file_name(&doc.metadata));
    let json = serde_json::to_string_pretty(doc).context("serializing autosave document")?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    info!("autosaved guide to {}", path.display());
    Ok(path)
}

/// Autosave into the active autosave directory.
///
/// # Errors
/// See [`autosave_into`].
pub fn autosave(doc: &mut GuideDoc) -> Result<PathBuf> {
    autosave_into(&autosave_dir(), doc)
}

/// Find the most recently modified autosave in `dir`, if any.
///
/// Files with unreadable metadata are skipped with a warning rather than
/// failing the whole scan.
///
/// # Errors
/// Returns an error if the directory exists but cannot be enumerated.
pub fn latest_autosave_in(dir: &Path) -> Result<Option<PathBuf>> {
    if !dir.exists() {
        return Ok(None);
    }
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.with_context(|| format!("enumerating {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if !name.ends_with(AUTOSAVE_SUFFIX) {
            continue;
        }
        let Some(modified) = entry.metadata().ok().and_then(|meta| meta.modified().ok()) else {
            warn!("skipping autosave with unreadable metadata: {}", path.display());
            continue;
        };
        let newer = newest
            .as_ref()
            .is_none_or(|(current, _)| modified > *current);
        if newer {
            newest = Some((modified, path));
        }
    }
    Ok(newest.map(|(_, path)| path))
}

/// Find the most recent autosave in the active autosave directory.
///
/// # Errors
/// See [`latest_autosave_in`].
pub fn latest_autosave() -> Result<Option<PathBuf>> {
    latest_autosave_in(&autosave_dir())
}

/// Export the bare quest-history mapping to `path`.
///
/// # Errors
/// Returns an error if serialization or the write fails.
pub fn export_quest_db(path: &Path, quests: &BTreeMap<QuestId, QuestRecord>) -> Result<()> {
    let json = serde_json::to_string_pretty(quests).context("serializing quest database")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!("quest database exported to {}", path.display());
    Ok(())
}

/// Import a bare quest-history mapping from `path`.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a quest database.
pub fn import_quest_db(path: &Path) -> Result<BTreeMap<QuestId, QuestRecord>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing quest database {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use phermuth_data::Step;
    use tempfile::tempdir;

    fn sample_doc() -> GuideDoc {
        GuideDoc {
            metadata: GuideMeta {
                zone: "The Barrens".into(),
                level_range: "10-25".into(),
                next_zone: "Thousand Needles".into(),
                faction: "Horde".into(),
            },
            steps: vec![Step {
                action: "A".into(),
                quest_name: "Plainstrider Menace".into(),
                quest_id: "844".into(),
                ..Step::default()
            }],
            ..GuideDoc::default()
        }
    }

    #[test]
    fn save_and_load_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("guide.json");
        let doc = sample_doc();
        save_document(&path, &doc)?;
        let loaded = load_document(&path)?;
        assert_eq!(loaded, doc);
        Ok(())
    }

    #[test]
    fn load_rejects_malformed_documents() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("broken.json");
        fs::write(&path, "this is not json")?;
        assert!(load_document(&path).is_err());
        Ok(())
    }

    #[test]
    fn autosave_name_derives_from_metadata() {
        let doc = sample_doc();
        assert_eq!(autosave_file_name(&doc.metadata), "10_25_The_Barrens.autosave.json");
        let fallback = autosave_file_name(&GuideMeta::default());
        assert!(fallback.starts_with("autosave_"));
        assert!(fallback.ends_with(AUTOSAVE_SUFFIX));
    }

    #[test]
    fn autosave_stamps_a_timestamp() -> Result<()> {
        let dir = tempdir()?;
        let mut doc = sample_doc();
        assert_eq!(doc.timestamp, None);
        let path = autosave_into(dir.path(), &mut doc)?;
        assert!(path.ends_with("10_25_The_Barrens.autosave.json"));
        let loaded = load_document(&path)?;
        assert!(loaded.timestamp.is_some());
        Ok(())
    }

    #[test]
    fn latest_autosave_handles_missing_directory() -> Result<()> {
        let dir = tempdir()?;
        let missing = dir.path().join("nowhere");
        assert_eq!(latest_autosave_in(&missing)?, None);
        Ok(())
    }

    #[test]
    fn latest_autosave_picks_the_newest_file() -> Result<()> {
        let dir = tempdir()?;
        let mut older = sample_doc();
        autosave_into(dir.path(), &mut older)?;
        std::thread::sleep(std::time::Duration::from_millis(20));

        let mut newer = sample_doc();
        newer.metadata.zone = "Stonetalon Mountains".into();
        let newest_path = autosave_into(dir.path(), &mut newer)?;

        fs::write(dir.path().join("notes.txt"), "ignore me")?;
        assert_eq!(latest_autosave_in(dir.path())?, Some(newest_path));
        Ok(())
    }

    #[test]
    fn quest_db_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("quest_db.json");
        let quests: BTreeMap<QuestId, QuestRecord> = BTreeMap::from([(
            "844".to_string(),
            QuestRecord {
                name: "Plainstrider Menace".into(),
                actions_used: vec!["A".into(), "C".into()],
                ..QuestRecord::default()
            },
        )]);
        export_quest_db(&path, &quests)?;
        let imported = import_quest_db(&path)?;
        assert_eq!(imported, quests);
        Ok(())
    }
}
