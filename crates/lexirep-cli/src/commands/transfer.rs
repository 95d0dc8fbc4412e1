//! The `lexirep export` and `lexirep import` commands.

use std::path::PathBuf;

use anyhow::Result;

use lexirep_core::store::Snapshot;

use super::{Context, Workspace};

pub fn export(ctx: &Context, output: PathBuf) -> Result<()> {
    let mut ws = Workspace::open(ctx)?;
    ws.snapshot.progress.total_words = ws.words.len();
    ws.snapshot.save_json(&output, ws.now)?;
    println!(
        "Exported {} item(s) to {}",
        ws.snapshot.memory.len(),
        output.display()
    );
    Ok(())
}

pub fn import(ctx: &Context, input: PathBuf) -> Result<()> {
    let mut ws = Workspace::open(ctx)?;
    // decoding validates every record before anything is overwritten
    let imported = Snapshot::load_json(&input)?;
    ws.snapshot = imported;
    ws.save()?;
    println!(
        "Imported {} item(s) from {}",
        ws.snapshot.memory.len(),
        input.display()
    );
    Ok(())
}
