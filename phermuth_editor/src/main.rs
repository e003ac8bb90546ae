#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Phermuth **
//! Terminal guide editor for the GuiaPhermuth addon.

use anyhow::Result;
use colored::Colorize;
use log::info;

use phermuth_editor::style::UiStyle;
use phermuth_editor::{PHERMUTH_VERSION, Session, run_repl};

fn main() -> Result<()> {
    env_logger::init();
    info!("Start: phermuth_editor {PHERMUTH_VERSION}");

    let mut session = Session::new();

    println!(
        "{:^72}",
        format!("PHERMUTH GUIDE CREATOR v{PHERMUTH_VERSION}")
            .bright_yellow()
            .underline()
    );
    println!(
        "\n{}",
        "Type 'help' for commands, 'add' to record the first step, or 'restore' to pick up where you left off."
            .hint_style()
    );

    run_repl(&mut session)
}
