//! Commands typed at the editor prompt.

use crate::guide::MoveDir;

/// Commands recognized by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add,
    Edit(usize),
    Remove(usize),
    Move { index: usize, dir: MoveDir },
    List,
    Meta,
    NewGuide,
    Lua { out: Option<String> },
    Save { file: Option<String> },
    Load { file: String },
    Autosave,
    Restore,
    History,
    Suggest { quest_id: String },
    ExportDb { file: String },
    ImportDb { file: String },
    Actions,
    Help,
    Quit,
    Empty,
    Unknown,
}

/// Parse one line of input into a [`Command`].
///
/// Step numbers at the prompt are 1-based, matching what `list` prints; they
/// arrive here already converted to 0-based indices.
pub fn parse_command(input: &str) -> Command {
    let words: Vec<&str> = input.split_whitespace().collect();
    match words.as_slice() {
        [] => Command::Empty,
        ["add" | "a"] => Command::Add,
        ["edit" | "e", n] => step_index(n).map_or(Command::Unknown, Command::Edit),
        ["rm" | "remove" | "del", n] => step_index(n).map_or(Command::Unknown, Command::Remove),
        ["up", n] => step_index(n).map_or(Command::Unknown, |index| Command::Move {
            index,
            dir: MoveDir::Up,
        }),
        ["down", n] => step_index(n).map_or(Command::Unknown, |index| Command::Move {
            index,
            dir: MoveDir::Down,
        }),
        ["list" | "ls" | "l"] => Command::List,
        ["meta" | "info"] => Command::Meta,
        ["new"] => Command::NewGuide,
        ["lua"] => Command::Lua { out: None },
        ["lua", file] => Command::Lua {
            out: Some((*file).to_string()),
        },
        ["save"] => Command::Save { file: None },
        ["save", file] => Command::Save {
            file: Some((*file).to_string()),
        },
        ["load", file] => Command::Load {
            file: (*file).to_string(),
        },
        ["autosave"] => Command::Autosave,
        ["restore"] => Command::Restore,
        ["history" | "hist"] => Command::History,
        ["suggest", quest_id] => Command::Suggest {
            quest_id: (*quest_id).to_string(),
        },
        ["export-db", file] => Command::ExportDb {
            file: (*file).to_string(),
        },
        ["import-db", file] => Command::ImportDb {
            file: (*file).to_string(),
        },
        ["actions"] => Command::Actions,
        ["help" | "?"] => Command::Help,
        ["quit" | "exit" | "q"] => Command::Quit,
        _ => Command::Unknown,
    }
}

/// Convert a 1-based step number from the prompt into a 0-based index.
fn step_index(word: &str) -> Option<usize> {
    word.parse::<usize>().ok().filter(|n| *n >= 1).map(|n| n - 1)
}
