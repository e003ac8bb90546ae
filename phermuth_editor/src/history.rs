//! Cross-guide quest memory: which actions have been recorded per quest,
//! where they happened, and any class restriction seen.
//!
//! Live observations merge field by field ([`QuestHistory::add_quest`]);
//! imported databases replace whole entries ([`QuestHistory::merge_imported`]).
//! The two deliberately stay separate operations.

use std::collections::BTreeMap;

use phermuth_data::{QuestCoords, QuestId, QuestRecord, Step};

/// The canonical quest lifecycle codes driving next-action suggestions.
const ACCEPT: &str = "A";
const COMPLETE: &str = "C";
const TURN_IN: &str = "T";

/// Everything remembered about quests across guides, keyed by quest id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestHistory {
    quests: BTreeMap<QuestId, QuestRecord>,
}

impl QuestHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation of a quest.
    ///
    /// No-op when `quest_id` is empty (steps without a stable key are not
    /// tracked). On repeat sightings the name always takes the latest value,
    /// the action is appended only if new, and the class keeps its first
    /// recorded value. Coordinates are stored per action code whenever both
    /// parts are supplied, overwriting earlier ones for the same action.
    pub fn add_quest(
        &mut self,
        quest_id: &str,
        quest_name: &str,
        action: &str,
        coord_x: Option<&str>,
        coord_y: Option<&str>,
        quest_class: Option<&str>,
    ) {
        if quest_id.is_empty() {
            return;
        }
        let entry = self.quests.entry(quest_id.to_string()).or_default();

        entry.name = quest_name.to_string();

        if !entry.actions_used.iter().any(|a| a == action) {
            entry.actions_used.push(action.to_string());
        }

        if entry.class.is_none()
            && let Some(class) = quest_class
            && !class.is_empty()
        {
            entry.class = Some(class.to_string());
        }

        if let (Some(x), Some(y)) = (coord_x, coord_y)
            && !x.is_empty()
            && !y.is_empty()
        {
            entry.coords.insert(
                action.to_string(),
                QuestCoords {
                    x: x.to_string(),
                    y: y.to_string(),
                },
            );
        }
    }

    /// Record a guide step as an observation of its quest.
    pub fn record_step(&mut self, step: &Step) {
        let (x, y) = step
            .coord_pair()
            .map_or((None, None), |(x, y)| (Some(x), Some(y)));
        self.add_quest(
            &step.quest_id,
            &step.quest_name,
            &step.action,
            x.as_deref(),
            y.as_deref(),
            Some(&step.class),
        );
    }

    /// Suggest the next action for a quest along the accept → complete →
    /// turn-in lifecycle. Any other action sequence yields no suggestion.
    pub fn suggest_next_action(&self, quest_id: &str) -> Option<&'static str> {
        let record = self.quests.get(quest_id)?;
        let used = |code: &str| record.actions_used.iter().any(|a| a == code);
        if used(ACCEPT) && !used(COMPLETE) {
            Some(COMPLETE)
        } else if used(COMPLETE) && !used(TURN_IN) {
            Some(TURN_IN)
        } else {
            None
        }
    }

    /// Coordinates recorded for `action` on a quest.
    ///
    /// A turn-in with no coordinates of its own falls back to the accept
    /// coordinates: quests are usually turned in where they were picked up.
    pub fn quest_coords(&self, quest_id: &str, action: &str) -> Option<(&str, &str)> {
        let record = self.quests.get(quest_id)?;
        if let Some(coords) = record.coords.get(action) {
            return Some((&coords.x, &coords.y));
        }
        if action == TURN_IN
            && let Some(coords) = record.coords.get(ACCEPT)
        {
            return Some((&coords.x, &coords.y));
        }
        None
    }

    pub fn has_quest(&self, quest_id: &str) -> bool {
        self.quests.contains_key(quest_id)
    }

    /// Name recorded for a quest, or `""` when unknown.
    pub fn quest_name(&self, quest_id: &str) -> &str {
        self.quests.get(quest_id).map_or("", |record| record.name.as_str())
    }

    /// Class restriction recorded for a quest, if any.
    pub fn quest_class(&self, quest_id: &str) -> Option<&str> {
        self.quests.get(quest_id)?.class.as_deref()
    }

    /// All quests, keyed by id.
    pub fn all_quests(&self) -> &BTreeMap<QuestId, QuestRecord> {
        &self.quests
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    /// Merge an imported quest database. Entries with an id already present
    /// replace the existing entry wholesale; there is no field-level merge on
    /// import, unlike [`QuestHistory::add_quest`].
    pub fn merge_imported(&mut self, imported: BTreeMap<QuestId, QuestRecord>) {
        self.quests.extend(imported);
    }

    pub fn clear(&mut self) {
        self.quests.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sighting_creates_an_entry() {
        let mut history = QuestHistory::new();
        history.add_quest("4641", "Sarkoth", "A", None, None, None);
        assert!(history.has_quest("4641"));
        assert_eq!(history.quest_name("4641"), "Sarkoth");
        assert_eq!(history.all_quests()["4641"].actions_used, vec!["A"]);
    }

    #[test]
    fn empty_quest_id_is_ignored() {
        let mut history = QuestHistory::new();
        history.add_quest("", "Unkeyed", "A", None, None, None);
        assert!(history.is_empty());
    }

    #[test]
    fn name_is_last_write_wins_and_actions_deduplicate() {
        let mut history = QuestHistory::new();
        history.add_quest("4641", "Sarkoth", "A", None, None, None);
        history.add_quest("4641", "Sarkoth (corrected)", "A", None, None, None);
        history.add_quest("4641", "Sarkoth (corrected)", "C", None, None, None);
        let record = &history.all_quests()["4641"];
        assert_eq!(record.name, "Sarkoth (corrected)");
        assert_eq!(record.actions_used, vec!["A", "C"]);
    }

    #[test]
    fn class_is_first_write_wins() {
        let mut history = QuestHistory::new();
        history.add_quest("780", "The Hunt Begins", "A", None, None, Some("Hunter"));
        history.add_quest("780", "The Hunt Begins", "C", None, None, Some("Warrior"));
        history.add_quest("780", "The Hunt Begins", "T", None, None, None);
        assert_eq!(history.quest_class("780"), Some("Hunter"));
    }

    #[test]
    fn class_ignores_empty_values() {
        let mut history = QuestHistory::new();
        history.add_quest("780", "The Hunt Begins", "A", None, None, Some(""));
        assert_eq!(history.quest_class("780"), None);
        history.add_quest("780", "The Hunt Begins", "C", None, None, Some("Hunter"));
        assert_eq!(history.quest_class("780"), Some("Hunter"));
    }

    #[test]
    fn suggestion_follows_accept_complete_turn_in() {
        let mut history = QuestHistory::new();
        history.add_quest("4641", "Sarkoth", "A", None, None, None);
        assert_eq!(history.suggest_next_action("4641"), Some("C"));
        history.add_quest("4641", "Sarkoth", "C", None, None, None);
        assert_eq!(history.suggest_next_action("4641"), Some("T"));
        history.add_quest("4641", "Sarkoth", "T", None, None, None);
        assert_eq!(history.suggest_next_action("4641"), None);
    }

    #[test]
    fn unrelated_action_sequences_suggest_nothing() {
        let mut history = QuestHistory::new();
        history.add_quest("99", "Grind Spot", "K", None, None, None);
        assert_eq!(history.suggest_next_action("99"), None);
        assert_eq!(history.suggest_next_action("unknown"), None);
    }

    #[test]
    fn coords_require_both_parts() {
        let mut history = QuestHistory::new();
        history.add_quest("4641", "Sarkoth", "A", Some("10"), None, None);
        assert_eq!(history.quest_coords("4641", "A"), None);
        history.add_quest("4641", "Sarkoth", "A", Some("10"), Some("20"), None);
        assert_eq!(history.quest_coords("4641", "A"), Some(("10", "20")));
    }

    #[test]
    fn turn_in_falls_back_to_accept_coords() {
        let mut history = QuestHistory::new();
        history.add_quest("4641", "Sarkoth", "A", Some("10"), Some("20"), None);
        assert_eq!(history.quest_coords("4641", "T"), Some(("10", "20")));
        history.add_quest("4641", "Sarkoth", "T", Some("33"), Some("44"), None);
        assert_eq!(history.quest_coords("4641", "T"), Some(("33", "44")));
        assert_eq!(history.quest_coords("4641", "C"), None);
    }

    #[test]
    fn merge_imported_replaces_entries_wholesale() {
        let mut history = QuestHistory::new();
        history.add_quest("4641", "Sarkoth", "A", None, None, None);
        history.add_quest("4641", "Sarkoth", "C", None, None, None);

        let imported: BTreeMap<QuestId, QuestRecord> = BTreeMap::from([(
            "4641".to_string(),
            QuestRecord {
                name: "Sarkoth".into(),
                actions_used: vec!["T".into()],
                ..QuestRecord::default()
            },
        )]);
        history.merge_imported(imported);

        let record = &history.all_quests()["4641"];
        assert_eq!(record.actions_used, vec!["T"]);
    }

    #[test]
    fn clear_empties_the_history() {
        let mut history = QuestHistory::new();
        history.add_quest("4641", "Sarkoth", "A", None, None, None);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.quest_name("4641"), "");
    }

    #[test]
    fn record_step_uses_step_fields() {
        let mut history = QuestHistory::new();
        let step = Step {
            action: "A".into(),
            quest_name: "Lazy Peons".into(),
            quest_id: "5441".into(),
            coord_x: "50.2".into(),
            coord_y: "43.1".into(),
            class: "Warrior".into(),
            ..Step::default()
        };
        history.record_step(&step);
        assert_eq!(history.quest_coords("5441", "A"), Some(("50.2", "43.1")));
        assert_eq!(history.quest_class("5441"), Some("Warrior"));
    }
}
