//! The `lexirep validate` command.

use std::path::PathBuf;

use anyhow::Result;

use lexirep_core::config::load_config_from;
use lexirep_core::parser::{load_word_directory, parse_word_list, validate_word_list};

use super::Context;

pub fn execute(ctx: &Context, words_path: Option<PathBuf>) -> Result<()> {
    let words_path = match words_path {
        Some(path) => path,
        None => load_config_from(ctx.config_path.as_deref())?.words,
    };

    let lists = if words_path.is_dir() {
        load_word_directory(&words_path)?
    } else {
        vec![parse_word_list(&words_path)?]
    };

    let mut total_warnings = 0;

    for list in &lists {
        println!("Word list: {} ({} words)", list.name, list.len());

        let warnings = validate_word_list(list);
        for w in &warnings {
            let prefix = w
                .item_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All word lists valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
