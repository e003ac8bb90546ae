//! Predefined entry tables: action types and the class/race/zone lists.
//!
//! Tables live in JSON files under the crate's `data/` directory so they can
//! be extended without recompiling. Any read or parse failure logs a warning
//! and falls back to the built-in tables; the editor always starts.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::{env, fs};

use log::warn;
use serde::Deserialize;

/// Cached path to the directory containing the editor's resource tables.
static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(detect_data_root);

/// Construct a resource path relative to the resolved data root.
pub fn data_path(relative: impl AsRef<Path>) -> PathBuf {
    DATA_ROOT.join(relative)
}

/// Resolve the most likely location of the resource directory: workspace
/// root, flattened `data/`, or next to the executable.
fn detect_data_root() -> PathBuf {
    let mut candidates = vec![PathBuf::from("phermuth_editor/data"), PathBuf::from("data")];

    if let Ok(exe_path) = env::current_exe()
        && let Some(dir) = exe_path.parent()
    {
        candidates.push(dir.join("phermuth_editor/data"));
        candidates.push(dir.join("data"));
        if let Some(parent) = dir.parent() {
            candidates.push(parent.join("phermuth_editor/data"));
            candidates.push(parent.join("data"));
        }
    }

    candidates
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| PathBuf::from("phermuth_editor/data"))
}

/// One entry in the action-type table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionType {
    pub code: String,
    pub label: String,
}

/// All entry tables the editor offers at the prompt.
#[derive(Debug, Clone)]
pub struct Resources {
    pub action_types: Vec<ActionType>,
    pub classes: Vec<String>,
    pub races: Vec<String>,
    pub zones: Vec<String>,
}

impl Resources {
    /// Load every table, falling back to the built-ins per file on failure.
    pub fn load() -> Self {
        Self {
            action_types: load_table("action_types.json", default_action_types),
            classes: load_table("class_list.json", default_classes),
            races: load_table("race_list.json", default_races),
            zones: load_table("zone_list.json", default_zones),
        }
    }

    /// Description of an action code, if the table knows it.
    pub fn action_label(&self, code: &str) -> Option<&str> {
        self.action_types
            .iter()
            .find(|action| action.code == code)
            .map(|action| action.label.as_str())
    }
}

fn load_table<T>(file: &str, fallback: fn() -> T) -> T
where
    T: for<'de> Deserialize<'de>,
{
    let path = data_path(file);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("failed to read resource {}: {err}; using built-in table", path.display());
            return fallback();
        },
    };
    match serde_json::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("failed to parse resource {}: {err}; using built-in table", path.display());
            fallback()
        },
    }
}

fn default_action_types() -> Vec<ActionType> {
    let table = [
        ("A", "Accept Quest - Accept a new quest from an NPC"),
        ("C", "Complete Quest - Fulfill quest objectives (kill mobs, collect items, etc.)"),
        ("T", "Turn in Quest - Return to quest giver to complete quest"),
        ("K", "Kill Mob - Kill a specific monster or NPC"),
        ("R", "Run to Location - Travel to a specific location"),
        ("H", "Use Hearthstone - Use hearthstone to return to your inn"),
        ("h", "Set Hearthstone - Set your hearthstone at an innkeeper"),
        ("G", "Grind - Kill mobs to gain XP until a specific level"),
        ("F", "Fly to Location - Use a flight path to travel"),
        ("f", "Get Flight Point - Discover a new flight master"),
        ("N", "Note - General information or instruction"),
        ("B", "Buy Item - Purchase an item from a vendor"),
        ("b", "Take Boat/Zeppelin - Use boat or zeppelin transport"),
        ("U", "Use Item - Use a specific item in your inventory"),
        ("P", "Pet Skill - Learn or use a hunter pet skill"),
        ("D", "Die and Respawn - Intentionally die to save time"),
        ("MAP", "Look at Map - Check the map for a location"),
    ];
    table
        .into_iter()
        .map(|(code, label)| ActionType {
            code: code.to_string(),
            label: label.to_string(),
        })
        .collect()
}

fn default_classes() -> Vec<String> {
    [
        "Warrior", "Paladin", "Hunter", "Rogue", "Priest", "Shaman", "Mage", "Warlock", "Druid",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_races() -> Vec<String> {
    ["Human", "Dwarf", "NightElf", "Gnome", "Orc", "Troll", "Tauren", "Undead"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_zones() -> Vec<String> {
    [
        "Durotar",
        "Mulgore",
        "Tirisfal Glades",
        "Elwynn Forest",
        "Dun Morogh",
        "Teldrassil",
        "The Barrens",
        "Silverpine Forest",
        "Westfall",
        "Loch Modan",
        "Darkshore",
        "Redridge Mountains",
        "Stonetalon Mountains",
        "Ashenvale",
        "Thousand Needles",
        "Hillsbrad Foothills",
        "Arathi Highlands",
        "Stranglethorn Vale",
        "Orgrimmar",
        "Thunder Bluff",
        "Undercity",
        "Stormwind",
        "Ironforge",
        "Darnassus",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
