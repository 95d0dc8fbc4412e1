//! The `lexirep preview` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::{format_date, make_rng, Context, Workspace};

pub fn execute(ctx: &Context, item: String) -> Result<()> {
    let ws = Workspace::open(ctx)?;
    let id = ws.resolve_item(&item)?;
    let state = ws.snapshot.memory.item_state(&id);
    let mut rng = make_rng(None);

    let current = match state.as_reviewed() {
        Some(s) => format!(
            "{} ({}, interval {}d, recall now {:.1}%)",
            ws.label(&id),
            s.memory_strength(),
            s.interval(),
            ws.scheduler.current_retrievability(s, ws.now) * 100.0
        ),
        None => format!("{} (new)", ws.label(&id)),
    };
    println!("{current}");

    let mut table = Table::new();
    table.set_header(vec!["Rating", "Interval", "Next review", "Difficulty", "Stability"]);
    for (rating, next) in ws.scheduler.preview(&state, ws.now, &mut rng) {
        table.add_row(vec![
            Cell::new(rating),
            Cell::new(format!("{}d", next.interval())),
            Cell::new(format_date(next.next_review())),
            Cell::new(format!("{:.2}", next.difficulty())),
            Cell::new(format!("{:.2}", next.stability())),
        ]);
    }
    println!("{table}");

    Ok(())
}
