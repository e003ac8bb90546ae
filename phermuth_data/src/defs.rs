use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quest identifier used to key history entries.
pub type QuestId = String;

/// One instruction line in a guide.
///
/// Every field is a string because the persisted document and the addon's
/// guide grammar are both untyped text; empty means "not set". `action` and
/// `quest_name` are the only required fields (see [`crate::validate_step`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub quest_name: String,
    #[serde(default)]
    pub quest_id: String,
    #[serde(default)]
    pub note: String,
    /// Combined `"X, Y"` label written by older builds. Kept so their
    /// documents still load; `coord_x`/`coord_y` are authoritative when set.
    #[serde(default)]
    pub coords: String,
    #[serde(default)]
    pub coord_x: String,
    #[serde(default)]
    pub coord_y: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub obj_id: String,
}

impl Step {
    /// Coordinate label in the `"X, Y"` form the addon expects.
    ///
    /// Prefers the split fields; falls back to the legacy combined string.
    /// Returns `None` when the step carries no coordinates at all.
    pub fn coord_label(&self) -> Option<String> {
        if !self.coord_x.is_empty() && !self.coord_y.is_empty() {
            return Some(format!("{}, {}", self.coord_x, self.coord_y));
        }
        if !self.coords.is_empty() {
            return Some(self.coords.clone());
        }
        None
    }

    /// Coordinates as an `(x, y)` pair, splitting the legacy combined string
    /// when the split fields are empty.
    pub fn coord_pair(&self) -> Option<(String, String)> {
        if !self.coord_x.is_empty() && !self.coord_y.is_empty() {
            return Some((self.coord_x.clone(), self.coord_y.clone()));
        }
        let (x, y) = self.coords.split_once(',')?;
        let (x, y) = (x.trim(), y.trim());
        if x.is_empty() || y.is_empty() {
            return None;
        }
        Some((x.to_string(), y.to_string()))
    }

    /// Refresh the legacy combined label from the split fields.
    ///
    /// Older consumers read `coords`, so it is rewritten whenever both split
    /// fields are present.
    pub fn sync_legacy_coords(&mut self) {
        if !self.coord_x.is_empty() && !self.coord_y.is_empty() {
            self.coords = format!("{}, {}", self.coord_x, self.coord_y);
        }
    }
}

fn default_faction() -> String {
    "Horde".to_string()
}

/// Guide-level metadata: the zone covered, its level range, the follow-up
/// zone, and the faction the guide is written for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideMeta {
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub level_range: String,
    #[serde(default)]
    pub next_zone: String,
    #[serde(default = "default_faction")]
    pub faction: String,
}

impl Default for GuideMeta {
    fn default() -> Self {
        Self {
            zone: String::new(),
            level_range: String::new(),
            next_zone: String::new(),
            faction: default_faction(),
        }
    }
}

impl GuideMeta {
    /// Display name of the guide: `"Zone (range)"`, or `"Custom Guide"` when
    /// either part is missing.
    pub fn guide_name(&self) -> String {
        if self.zone.is_empty() || self.level_range.is_empty() {
            return "Custom Guide".to_string();
        }
        format!("{} ({})", self.zone, self.level_range)
    }

    /// Label of the follow-up guide: `"Next Zone (max-XX)"`, where `max` is
    /// the text after the last `-` in the level range. The addon expects the
    /// literal `"nil"` when there is no follow-up.
    pub fn next_zone_label(&self) -> String {
        if !self.next_zone.is_empty()
            && let Some((_, max_level)) = self.level_range.rsplit_once('-')
        {
            return format!("{} ({}-XX)", self.next_zone, max_level);
        }
        "nil".to_string()
    }

    /// File stem like `30_32_Desolace`, derived from the level range and
    /// zone. `None` when either is empty (callers fall back to a fixed name).
    pub fn file_stem(&self) -> Option<String> {
        if self.zone.is_empty() || self.level_range.is_empty() {
            return None;
        }
        Some(format!(
            "{}_{}",
            self.level_range.replace('-', "_"),
            self.zone.replace(' ', "_")
        ))
    }
}

/// Coordinates remembered for one action on one quest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestCoords {
    pub x: String,
    pub y: String,
}

/// Everything remembered about a single quest across guides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRecord {
    #[serde(default)]
    pub name: String,
    /// Action codes in first-seen order, never duplicated.
    #[serde(default)]
    pub actions_used: Vec<String>,
    /// Coordinates keyed by the action they were recorded with.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub coords: BTreeMap<String, QuestCoords>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

/// The persisted guide document, used for manual save/load and autosave.
///
/// `quest_history` and `timestamp` are optional on read; unknown keys are
/// ignored so documents from newer builds still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideDoc {
    #[serde(default)]
    pub metadata: GuideMeta,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub quest_history: BTreeMap<QuestId, QuestRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_step_deserializes_with_empty_fields() {
        let step: Step = serde_json::from_str(r#"{"action": "A", "quest_name": "Rite of Strength"}"#)
            .expect("sparse step should parse");
        assert_eq!(step.action, "A");
        assert_eq!(step.quest_name, "Rite of Strength");
        assert!(step.quest_id.is_empty());
        assert!(step.coords.is_empty());
    }

    #[test]
    fn coord_label_prefers_split_fields() {
        let step = Step {
            coords: "1, 2".into(),
            coord_x: "36.5".into(),
            coord_y: "52.1".into(),
            ..Step::default()
        };
        assert_eq!(step.coord_label().as_deref(), Some("36.5, 52.1"));
    }

    #[test]
    fn coord_pair_splits_legacy_label() {
        let step = Step {
            coords: "44.3 , 68.9".into(),
            ..Step::default()
        };
        assert_eq!(step.coord_pair(), Some(("44.3".into(), "68.9".into())));
        assert_eq!(Step::default().coord_pair(), None);
    }

    #[test]
    fn metadata_defaults_to_horde() {
        let meta: GuideMeta = serde_json::from_str("{}").expect("empty metadata should parse");
        assert_eq!(meta.faction, "Horde");
        assert!(meta.zone.is_empty());
    }

    #[test]
    fn guide_name_falls_back_to_custom() {
        let meta = GuideMeta {
            zone: "Elwynn Forest".into(),
            level_range: "1-10".into(),
            ..GuideMeta::default()
        };
        assert_eq!(meta.guide_name(), "Elwynn Forest (1-10)");
        assert_eq!(GuideMeta::default().guide_name(), "Custom Guide");
        let partial = GuideMeta {
            zone: "Elwynn Forest".into(),
            ..GuideMeta::default()
        };
        assert_eq!(partial.guide_name(), "Custom Guide");
    }

    #[test]
    fn next_zone_label_uses_max_level() {
        let meta = GuideMeta {
            zone: "Elwynn Forest".into(),
            level_range: "1-10".into(),
            next_zone: "Westfall".into(),
            ..GuideMeta::default()
        };
        assert_eq!(meta.next_zone_label(), "Westfall (10-XX)");
    }

    #[test]
    fn next_zone_label_is_nil_without_range_separator() {
        let meta = GuideMeta {
            level_range: "60".into(),
            next_zone: "Silithus".into(),
            ..GuideMeta::default()
        };
        assert_eq!(meta.next_zone_label(), "nil");
        assert_eq!(GuideMeta::default().next_zone_label(), "nil");
    }

    #[test]
    fn file_stem_requires_zone_and_range() {
        let mut meta = GuideMeta {
            zone: "The Barrens".into(),
            level_range: "10-25".into(),
            ..GuideMeta::default()
        };
        assert_eq!(meta.file_stem().as_deref(), Some("10_25_The_Barrens"));
        meta.level_range.clear();
        assert_eq!(meta.file_stem(), None);
    }

    #[test]
    fn empty_document_parses_to_defaults() {
        let doc: GuideDoc = serde_json::from_str("{}").expect("empty document should parse");
        assert!(doc.steps.is_empty());
        assert!(doc.quest_history.is_empty());
        assert_eq!(doc.metadata.faction, "Horde");
        assert_eq!(doc.timestamp, None);
    }
}
