//! CLI entry point for phermuth_lua.
//! Usage: cargo run -p phermuth_lua -- export saved/10_25_The_Barrens.json

use std::path::Path;
use std::{env, fs, process};

use phermuth_lua::export_file;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Accept either:
    // 1) cargo run: <bin> -- export <args>
    // 2) direct:    <bin> export <args>
    let rest: Vec<String> = match args.as_slice() {
        [_, flag, cmd, tail @ ..] if flag == "--" && cmd == "export" => tail.to_vec(),
        [_, cmd, tail @ ..] if cmd == "export" => tail.to_vec(),
        _ => {
            eprintln!("Usage:\n  phermuth_lua export <guide.json> [--out <file.lua>]");
            process::exit(2);
        },
    };

    run_export(&rest);
}

fn run_export(args: &[String]) {
    let mut path: Option<String> = None;
    let mut out_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--out" {
            if i + 1 >= args.len() {
                eprintln!("--out requires a filepath");
                process::exit(2);
            }
            out_path = Some(args[i + 1].clone());
            i += 2;
            continue;
        }
        if path.is_none() {
            path = Some(args[i].clone());
        }
        i += 1;
    }
    let Some(path) = path else {
        eprintln!("Usage: phermuth_lua export <guide.json> [--out <file.lua>]");
        process::exit(2);
    };

    match export_file(Path::new(&path)) {
        Ok(lua) => {
            if let Some(out) = out_path {
                fs::write(&out, lua).unwrap_or_else(|e| {
                    eprintln!("error: writing '{}': {}", &out, e);
                    process::exit(1);
                });
            } else {
                print!("{}", lua);
            }
        },
        Err(e) => {
            eprintln!("export error: {}", e);
            process::exit(1);
        },
    }
}
