//! Editor session state: the guide under edit plus the quest history.
//!
//! The session is the single source of truth. The prompt layer reads and
//! mutates guide and history only through it, and the core types stay
//! I/O-free; autosaving is the one place the session touches disk.

use std::path::PathBuf;

use anyhow::Result;
use log::info;
use phermuth_data::{GuideDoc, GuideMeta, Step};

use crate::guide::{Guide, GuideError};
use crate::history::QuestHistory;
use crate::save_files;

/// All state owned by one editing session.
#[derive(Debug, Default)]
pub struct Session {
    pub guide: Guide,
    pub history: QuestHistory,
}

impl Session {
    pub fn new() -> Self {
        Self {
            guide: Guide::new(),
            history: QuestHistory::new(),
        }
    }

    /// Append a new step and record its quest in the history.
    ///
    /// # Errors
    /// Rejects the step (and records nothing) when a required field is empty.
    pub fn commit_new_step(&mut self, mut step: Step) -> Result<(), GuideError> {
        step.sync_legacy_coords();
        self.guide.add_step(step.clone())?;
        self.history.record_step(&step);
        Ok(())
    }

    /// Replace the step at `index` in place and record the (possibly changed)
    /// quest in the history.
    ///
    /// # Errors
    /// Fails when the index is out of range or a required field is empty;
    /// nothing is recorded on failure.
    pub fn commit_edited_step(&mut self, index: usize, mut step: Step) -> Result<(), GuideError> {
        step.sync_legacy_coords();
        self.guide.update_step(index, step.clone())?;
        self.history.record_step(&step);
        Ok(())
    }

    /// Snapshot the full session as a persistable document.
    pub fn document(&self) -> GuideDoc {
        let mut doc = self.guide.to_document();
        doc.quest_history = self.history.all_quests().clone();
        doc
    }

    /// Replace the guide from a loaded document and merge its embedded quest
    /// history into the live one.
    pub fn load_document(&mut self, doc: GuideDoc) {
        let quest_history = doc.quest_history.clone();
        self.guide.load_document(doc);
        self.history.merge_imported(quest_history);
    }

    /// Start a fresh guide. The quest history survives; it is cross-guide
    /// memory, cleared only on explicit request.
    pub fn reset_guide(&mut self) {
        self.guide.clear();
        self.guide.set_metadata(GuideMeta::default());
        info!("started a new guide");
    }

    /// Write the current state to the active autosave directory.
    ///
    /// # Errors
    /// Propagates filesystem and serialization failures.
    pub fn autosave(&self) -> Result<PathBuf> {
        let mut doc = self.document();
        save_files::autosave(&mut doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(action: &str, name: &str, quest_id: &str) -> Step {
        Step {
            action: action.into(),
            quest_name: name.into(),
            quest_id: quest_id.into(),
            ..Step::default()
        }
    }

    #[test]
    fn committing_a_step_records_its_quest() {
        let mut session = Session::new();
        session
            .commit_new_step(step("A", "Sarkoth", "4641"))
            .expect("valid step");
        assert!(session.history.has_quest("4641"));
        assert_eq!(session.history.suggest_next_action("4641"), Some("C"));
    }

    #[test]
    fn rejected_step_records_nothing() {
        let mut session = Session::new();
        assert!(session.commit_new_step(step("", "Sarkoth", "4641")).is_err());
        assert!(session.guide.is_empty());
        assert!(!session.history.has_quest("4641"));
    }

    #[test]
    fn committed_coords_sync_the_legacy_label() {
        let mut session = Session::new();
        let mut entry = step("A", "Lazy Peons", "5441");
        entry.coord_x = "50.2".into();
        entry.coord_y = "43.1".into();
        session.commit_new_step(entry).expect("valid step");
        assert_eq!(session.guide.step(0).map(|s| s.coords.as_str()), Some("50.2, 43.1"));
    }

    #[test]
    fn document_embeds_the_quest_history() {
        let mut session = Session::new();
        session
            .commit_new_step(step("A", "Sarkoth", "4641"))
            .expect("valid step");
        let doc = session.document();
        assert!(doc.quest_history.contains_key("4641"));
        assert_eq!(doc.timestamp, None);
    }

    #[test]
    fn loading_a_document_merges_embedded_history() {
        let mut session = Session::new();
        session
            .commit_new_step(step("A", "Sarkoth", "4641"))
            .expect("valid step");
        let doc = session.document();

        let mut restored = Session::new();
        restored
            .commit_new_step(step("A", "Rite of Strength", "756"))
            .expect("valid step");
        restored.load_document(doc);

        // Guide contents replaced, history merged across both sources.
        assert_eq!(restored.guide.len(), 1);
        assert!(restored.history.has_quest("4641"));
        assert!(restored.history.has_quest("756"));
    }

    #[test]
    fn reset_guide_keeps_the_history() {
        let mut session = Session::new();
        session
            .commit_new_step(step("A", "Sarkoth", "4641"))
            .expect("valid step");
        session.reset_guide();
        assert!(session.guide.is_empty());
        assert_eq!(session.guide.metadata().faction, "Horde");
        assert!(session.history.has_quest("4641"));
    }
}
