//! phermuth_lua: Lua guide-script generation for the GuiaPhermuth addon.
//!
//! Turns an ordered list of guide steps into the text script the addon loads:
//! a `RegisterGuide` header naming the guide, its follow-up zone, and its
//! faction, then one line per step using the addon's tag grammar
//! (`|QID|…|`, `|N|…|`, `|C|…|`, `|R|…|`, `|Z|…|`, `|OBJ|…|`), closed by the
//! long-bracket terminator.
//!
//! Generation is pure and order-preserving: the same steps always produce the
//! same script, byte for byte.

use std::fs;
use std::path::{Path, PathBuf};

use phermuth_data::{GuideDoc, Step};
use thiserror::Error;

/// Guide name used when zone/level metadata is missing.
pub const DEFAULT_GUIDE_NAME: &str = "Custom Guide";

/// Literal the addon expects when a guide has no follow-up zone.
pub const NO_NEXT_ZONE: &str = "nil";

/// Errors produced when exporting a guide document to Lua.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("guide has no steps to export")]
    EmptyGuide,
    #[error("unable to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("'{}' is not a valid guide document: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Render a single step as one guide line.
///
/// The line starts with `"{action} {quest_name}"`; each tag segment is
/// appended only when its field is non-empty, in the fixed order the addon
/// parses: quest id, note, class, race, zone, object id. Coordinates ride
/// inside the note segment, just before its closing `|` -- a step with
/// coordinates but no note emits no coordinates at all, matching what the
/// addon has always been fed.
pub fn step_line(step: &Step) -> String {
    let mut line = format!("{} {}", step.action, step.quest_name);

    if !step.quest_id.is_empty() {
        line.push_str(&format!(" |QID|{}|", step.quest_id));
    }

    if !step.note.is_empty() {
        line.push_str(&format!(" |N|{}", step.note));
        if let Some(coords) = step.coord_label() {
            line.push_str(&format!(" ({coords})"));
        }
        line.push('|');
    }

    if !step.class.is_empty() {
        line.push_str(&format!(" |C|{}|", step.class));
    }
    if !step.race.is_empty() {
        line.push_str(&format!(" |R|{}|", step.race));
    }
    if !step.zone.is_empty() {
        line.push_str(&format!(" |Z|{}|", step.zone));
    }
    if !step.obj_id.is_empty() {
        line.push_str(&format!(" |OBJ|{}|", step.obj_id));
    }

    line
}

/// Generate the complete Lua guide script.
///
/// Empty `guide_name` renders as [`DEFAULT_GUIDE_NAME`]; an empty `next_zone`
/// renders as the literal [`NO_NEXT_ZONE`].
pub fn generate_guide(steps: &[Step], guide_name: &str, next_zone: &str, faction: &str) -> String {
    let name = if guide_name.is_empty() {
        DEFAULT_GUIDE_NAME
    } else {
        guide_name
    };
    let next = if next_zone.is_empty() { NO_NEXT_ZONE } else { next_zone };

    let mut lua = format!("GuiaPhermuth:RegisterGuide(\"{name}\", \"{next}\", \"{faction}\",function()\n\n");
    lua.push_str("return [[\n\n");
    for step in steps {
        lua.push_str(&step_line(step));
        lua.push('\n');
    }
    lua.push_str("\n]]\nend)\n");
    lua
}

/// Generate the script for a saved guide document.
///
/// # Errors
/// Returns [`ExportError::EmptyGuide`] when the document holds no steps.
pub fn export_document(doc: &GuideDoc) -> Result<String, ExportError> {
    if doc.steps.is_empty() {
        return Err(ExportError::EmptyGuide);
    }
    Ok(generate_guide(
        &doc.steps,
        &doc.metadata.guide_name(),
        &doc.metadata.next_zone_label(),
        &doc.metadata.faction,
    ))
}

/// Read a guide document from disk and generate its script.
///
/// # Errors
/// Fails when the file cannot be read, is not a guide document, or holds no
/// steps.
pub fn export_file(path: &Path) -> Result<String, ExportError> {
    let raw = fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: GuideDoc = serde_json::from_str(&raw).map_err(|source| ExportError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    export_document(&doc)
}
