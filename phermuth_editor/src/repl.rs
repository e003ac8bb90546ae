//! The interactive editor loop.
//!
//! Reads commands, dispatches to handlers that mutate the [`Session`], and
//! autosaves after every structural change. Every error is reported at the
//! prompt and the loop continues; nothing here ends the process.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use phermuth_data::Step;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::command::{Command, parse_command};
use crate::guide::MoveDir;
use crate::history::QuestHistory;
use crate::resources::Resources;
use crate::save_files;
use crate::session::Session;
use crate::style::UiStyle;

/// Run the editor loop until the user quits.
///
/// # Errors
/// Only setup failures (initializing the line editor) escape; command errors
/// are reported at the prompt.
pub fn run_repl(session: &mut Session) -> Result<()> {
    let resources = Resources::load();
    let mut editor = DefaultEditor::new().context("initializing line editor")?;
    let history_path = save_files::autosave_dir().with_file_name("repl_history");
    let _ = editor.load_history(&history_path);

    loop {
        let prompt = format!("[{} | {} steps]> ", session.guide.guide_name(), session.guide.len());
        let line = match editor.readline(&prompt.prompt_style().to_string()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                warn!("failed to read command: {err}");
                break;
            },
        };
        let _ = editor.add_history_entry(line.as_str());

        let command = parse_command(&line);
        if command == Command::Quit {
            break;
        }
        if let Err(err) = dispatch(session, &resources, &mut editor, command) {
            println!("{} {err:#}", "error:".error_style());
        }
    }

    let _ = editor.save_history(&history_path);
    Ok(())
}

fn dispatch(
    session: &mut Session,
    resources: &Resources,
    editor: &mut DefaultEditor,
    command: Command,
) -> Result<()> {
    match command {
        Command::Add => add_handler(session, resources, editor),
        Command::Edit(index) => edit_handler(session, resources, editor, index),
        Command::Remove(index) => remove_handler(session, index),
        Command::Move { index, dir } => move_handler(session, index, dir),
        Command::List => {
            list_handler(session);
            Ok(())
        },
        Command::Meta => meta_handler(session, editor),
        Command::NewGuide => new_guide_handler(session, editor),
        Command::Lua { out } => lua_handler(session, out.as_deref()),
        Command::Save { file } => save_handler(session, file.as_deref()),
        Command::Load { file } => load_handler(session, &file),
        Command::Autosave => {
            let path = session.autosave()?;
            println!("{} {}", "autosaved to".success_style(), path.display());
            Ok(())
        },
        Command::Restore => restore_handler(session),
        Command::History => {
            history_handler(&session.history);
            Ok(())
        },
        Command::Suggest { quest_id } => {
            suggest_handler(&session.history, &quest_id);
            Ok(())
        },
        Command::ExportDb { file } => export_db_handler(session, &file),
        Command::ImportDb { file } => import_db_handler(session, &file),
        Command::Actions => {
            actions_handler(resources);
            Ok(())
        },
        Command::Help => {
            help_handler();
            Ok(())
        },
        Command::Empty | Command::Quit => Ok(()),
        Command::Unknown => {
            println!("{}", "Unrecognized command -- try 'help'.".hint_style());
            Ok(())
        },
    }
}

/// Prompt for one field. An empty entry keeps `default`; a single `-` clears
/// the field.
fn prompt_field(editor: &mut DefaultEditor, label: &str, default: &str) -> Result<String> {
    let prompt = if default.is_empty() {
        format!("  {label}: ")
    } else {
        format!("  {label} [{default}]: ")
    };
    match editor.readline(&prompt) {
        Ok(line) => {
            let line = line.trim();
            if line == "-" {
                Ok(String::new())
            } else if line.is_empty() {
                Ok(default.to_string())
            } else {
                Ok(line.to_string())
            }
        },
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Err(anyhow!("entry canceled")),
        Err(err) => Err(err).context("reading field"),
    }
}

/// Walk the step form. `defaults` seeds every field (empty for a new step);
/// quest-history recall fills in known names, the suggested next action, and
/// turn-in coordinates.
fn collect_step(
    editor: &mut DefaultEditor,
    resources: &Resources,
    history: &QuestHistory,
    defaults: &Step,
) -> Result<Step> {
    let quest_id = prompt_field(editor, "Quest ID", &defaults.quest_id)?;

    let mut name_default = defaults.quest_name.clone();
    let mut action_default = if defaults.action.is_empty() {
        "A".to_string()
    } else {
        defaults.action.clone()
    };
    if !quest_id.is_empty() && history.has_quest(&quest_id) {
        let known_name = history.quest_name(&quest_id);
        if !known_name.is_empty() {
            name_default = known_name.to_string();
        }
        if let Some(next) = history.suggest_next_action(&quest_id) {
            println!(
                "  {} {}",
                "known quest; suggested action:".hint_style(),
                next.action_style()
            );
            action_default = next.to_string();
        }
    }

    let action = prompt_field(editor, "Action", &action_default)?;
    if let Some(label) = resources.action_label(&action) {
        println!("  {}", label.hint_style());
    }
    let quest_name = prompt_field(editor, "Quest Name", &name_default)?;
    let note = prompt_field(editor, "Note", &defaults.note)?;

    let mut x_default = defaults.coord_x.clone();
    let mut y_default = defaults.coord_y.clone();
    if action == "T"
        && x_default.is_empty()
        && y_default.is_empty()
        && let Some((x, y)) = history.quest_coords(&quest_id, "T")
    {
        println!("  {}", "recalled turn-in coordinates from history".hint_style());
        x_default = x.to_string();
        y_default = y.to_string();
    }
    let coord_x = prompt_field(editor, "Coord X", &x_default)?;
    let coord_y = prompt_field(editor, "Coord Y", &y_default)?;

    let class = prompt_field(editor, "Class", &defaults.class)?;
    let race = prompt_field(editor, "Race", &defaults.race)?;
    let zone = prompt_field(editor, "Zone", &defaults.zone)?;
    let obj_id = prompt_field(editor, "Object ID", &defaults.obj_id)?;

    Ok(Step {
        action,
        quest_name,
        quest_id,
        note,
        coords: String::new(),
        coord_x,
        coord_y,
        class,
        race,
        zone,
        obj_id,
    })
}

fn add_handler(session: &mut Session, resources: &Resources, editor: &mut DefaultEditor) -> Result<()> {
    let step = collect_step(editor, resources, &session.history, &Step::default())?;
    let quest_id = step.quest_id.clone();
    session.commit_new_step(step)?;
    println!(
        "{} step {} added",
        "ok:".success_style(),
        session.guide.len()
    );
    if let Some(next) = session.history.suggest_next_action(&quest_id) {
        println!(
            "  {} {}",
            "next action for this quest:".hint_style(),
            next.action_style()
        );
    }
    autosave_session(session);
    Ok(())
}

fn edit_handler(
    session: &mut Session,
    resources: &Resources,
    editor: &mut DefaultEditor,
    index: usize,
) -> Result<()> {
    let Some(current) = session.guide.step(index).cloned() else {
        println!("{} no step {}", "error:".error_style(), index + 1);
        return Ok(());
    };
    let step = collect_step(editor, resources, &session.history, &current)?;
    session.commit_edited_step(index, step)?;
    println!("{} step {} updated", "ok:".success_style(), index + 1);
    autosave_session(session);
    Ok(())
}

fn remove_handler(session: &mut Session, index: usize) -> Result<()> {
    if session.guide.remove_step(index) {
        println!("{} step {} removed", "ok:".success_style(), index + 1);
        autosave_session(session);
    } else {
        println!("{} no step {}", "error:".error_style(), index + 1);
    }
    Ok(())
}

fn move_handler(session: &mut Session, index: usize, dir: MoveDir) -> Result<()> {
    match session.guide.move_step(index, dir) {
        Some(new_index) => {
            println!(
                "{} step {} is now step {}",
                "ok:".success_style(),
                index + 1,
                new_index + 1
            );
            autosave_session(session);
        },
        None => println!("{}", "Can't move that step any further.".hint_style()),
    }
    Ok(())
}

fn list_handler(session: &Session) {
    if session.guide.is_empty() {
        println!("{}", "No steps yet -- 'add' records the first one.".hint_style());
        return;
    }
    println!(
        "{}  ({} -> {})",
        session.guide.guide_name().heading_style(),
        session.guide.metadata().faction,
        session.guide.next_zone_name()
    );
    for (i, step) in session.guide.steps().iter().enumerate() {
        let mut extras = Vec::new();
        if !step.quest_id.is_empty() {
            extras.push(format!("QID {}", step.quest_id));
        }
        if !step.note.is_empty() {
            extras.push(step.note.clone());
        }
        if let Some(coords) = step.coord_label() {
            extras.push(format!("({coords})"));
        }
        if !step.class.is_empty() {
            extras.push(step.class.clone());
        }
        if !step.race.is_empty() {
            extras.push(step.race.clone());
        }
        if !step.zone.is_empty() {
            extras.push(step.zone.clone());
        }
        if !step.obj_id.is_empty() {
            extras.push(format!("OBJ {}", step.obj_id));
        }
        let trailer = if extras.is_empty() {
            String::new()
        } else {
            format!("  [{}]", extras.join(" | "))
        };
        println!(
            "{:>3}. {} {}{}",
            i + 1,
            step.action.action_style(),
            step.quest_name.quest_style(),
            trailer.tag_style()
        );
    }
}

fn meta_handler(session: &mut Session, editor: &mut DefaultEditor) -> Result<()> {
    let mut meta = session.guide.metadata().clone();
    meta.zone = prompt_field(editor, "Zone", &meta.zone)?;
    meta.level_range = prompt_field(editor, "Level Range", &meta.level_range)?;
    meta.next_zone = prompt_field(editor, "Next Zone", &meta.next_zone)?;
    let faction = prompt_field(editor, "Faction (Horde/Alliance/Both)", &meta.faction)?;
    if !faction.is_empty() {
        meta.faction = faction;
    }
    session.guide.set_metadata(meta);
    println!("{} guide is now '{}'", "ok:".success_style(), session.guide.guide_name());
    autosave_session(session);
    Ok(())
}

fn new_guide_handler(session: &mut Session, editor: &mut DefaultEditor) -> Result<()> {
    if session.guide.is_empty() {
        session.reset_guide();
        println!("{}", "Started a new guide.".success_style());
        return Ok(());
    }
    let answer = prompt_field(editor, "This clears all current steps. Continue? (yes/no)", "no")?;
    if answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y") {
        session.reset_guide();
        println!("{}", "Started a new guide.".success_style());
    } else {
        println!("{}", "Kept the current guide.".hint_style());
    }
    Ok(())
}

fn lua_handler(session: &Session, out: Option<&str>) -> Result<()> {
    if session.guide.is_empty() {
        println!("{} no quest steps to generate", "error:".error_style());
        return Ok(());
    }
    let lua = phermuth_lua::generate_guide(
        session.guide.steps(),
        &session.guide.guide_name(),
        &session.guide.next_zone_name(),
        &session.guide.metadata().faction,
    );
    match out {
        Some(file) => {
            fs::write(file, &lua).with_context(|| format!("writing {file}"))?;
            println!("{} guide script written to {}", "ok:".success_style(), file);
        },
        None => {
            print!("{lua}");
            println!(
                "{}",
                format!(
                    "('lua {}' writes this to a file)",
                    save_files::default_lua_file_name(session.guide.metadata())
                )
                .hint_style()
            );
        },
    }
    Ok(())
}

fn save_handler(session: &Session, file: Option<&str>) -> Result<()> {
    if session.guide.is_empty() {
        println!("{} no quest steps to save", "error:".error_style());
        return Ok(());
    }
    let default_name = save_files::default_guide_file_name(session.guide.metadata());
    let path = file.unwrap_or(&default_name);
    save_files::save_document(Path::new(path), &session.document())?;
    println!("{} guide saved to {}", "ok:".success_style(), path);
    Ok(())
}

fn load_handler(session: &mut Session, file: &str) -> Result<()> {
    // Parse fully before touching the session; a bad file must not wipe work.
    let doc = save_files::load_document(Path::new(file))?;
    session.load_document(doc);
    println!(
        "{} loaded '{}' with {} steps",
        "ok:".success_style(),
        session.guide.guide_name(),
        session.guide.len()
    );
    Ok(())
}

fn restore_handler(session: &mut Session) -> Result<()> {
    let Some(path) = save_files::latest_autosave()? else {
        println!("{}", "No autosave files available.".hint_style());
        return Ok(());
    };
    let doc = save_files::load_document(&path)?;
    let timestamp = doc.timestamp.clone().unwrap_or_else(|| "unknown".to_string());
    session.load_document(doc);
    println!(
        "{} restored '{}' ({} steps, last modified {})",
        "ok:".success_style(),
        session.guide.guide_name(),
        session.guide.len(),
        timestamp
    );
    Ok(())
}

fn history_handler(history: &QuestHistory) {
    if history.is_empty() {
        println!("{}", "No quests in history yet.".hint_style());
        return;
    }
    println!("{}", "Quest History".heading_style());
    for (quest_id, record) in history.all_quests() {
        let class = record
            .class
            .as_deref()
            .map_or(String::new(), |class| format!("  [{class}]"));
        println!(
            "  {} {} ({}){}",
            quest_id.action_style(),
            record.name.quest_style(),
            record.actions_used.join(", "),
            class.tag_style()
        );
    }
}

fn suggest_handler(history: &QuestHistory, quest_id: &str) {
    match history.suggest_next_action(quest_id) {
        Some(next) => println!(
            "{} {}",
            "suggested next action:".hint_style(),
            next.action_style()
        ),
        None => println!("{}", "No suggestion for that quest.".hint_style()),
    }
}

fn export_db_handler(session: &Session, file: &str) -> Result<()> {
    if session.history.is_empty() {
        println!("{}", "No quests in history to export.".hint_style());
        return Ok(());
    }
    save_files::export_quest_db(Path::new(file), session.history.all_quests())?;
    println!(
        "{} exported {} quests to {}",
        "ok:".success_style(),
        session.history.len(),
        file
    );
    Ok(())
}

fn import_db_handler(session: &mut Session, file: &str) -> Result<()> {
    let imported = save_files::import_quest_db(Path::new(file))?;
    let count = imported.len();
    session.history.merge_imported(imported);
    info!("imported {count} quests from {file}");
    println!("{} imported {} quests from {}", "ok:".success_style(), count, file);
    autosave_session(session);
    Ok(())
}

fn actions_handler(resources: &Resources) {
    println!("{}", "Action Types".heading_style());
    for action in &resources.action_types {
        println!("  {:<4} {}", action.code.action_style(), action.label);
    }
}

fn help_handler() {
    println!("{}", "Commands".heading_style());
    let entries = [
        ("add", "record a new step (prompts for each field; '-' clears one)"),
        ("edit N", "re-prompt step N with its current values"),
        ("rm N", "remove step N"),
        ("up N / down N", "swap step N with its neighbor"),
        ("list", "show all steps"),
        ("meta", "set zone, level range, next zone, and faction"),
        ("new", "start a fresh guide (quest history is kept)"),
        ("lua [file]", "generate the addon script, optionally to a file"),
        ("save [file] / load <file>", "write or read the guide document"),
        ("autosave / restore", "force an autosave, or load the newest one"),
        ("history", "show remembered quests"),
        ("suggest <quest-id>", "suggest the next action for a quest"),
        ("export-db <file> / import-db <file>", "share the quest database"),
        ("actions", "list action codes"),
        ("quit", "leave the editor"),
    ];
    for (cmd, what) in entries {
        println!("  {:<36} {}", cmd.action_style(), what);
    }
}

/// Best-effort autosave after a structural change; failures are logged, not
/// surfaced as command errors.
fn autosave_session(session: &Session) {
    match session.autosave() {
        Ok(path) => info!("autosaved to {}", path.display()),
        Err(err) => warn!("autosave failed: {err:#}"),
    }
}
