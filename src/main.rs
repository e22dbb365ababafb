//! `pack_tool` (pack-tool) - Compendium pack import/export
//!
//! Converts a pack between the runtime's LevelDB store and a portable JSON
//! document. Exactly one of `--import` / `--export` per run.

use pack_tool::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
