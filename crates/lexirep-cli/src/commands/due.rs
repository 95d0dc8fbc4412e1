//! The `lexirep due` command.

use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Table};
use serde::Serialize;

use super::{format_date, Context, OutputFormat, Workspace};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DueEntry {
    item: String,
    word: String,
    priority: f64,
    next_review_date: Option<DateTime<Utc>>,
    interval: u32,
}

pub fn execute(ctx: &Context, limit: Option<usize>, format: String) -> Result<()> {
    let format = OutputFormat::parse(&format)?;
    let ws = Workspace::open(ctx)?;

    let mut due = ws.snapshot.memory.due_by_priority(&ws.scheduler, ws.now);
    if let Some(limit) = limit {
        due.truncate(limit);
    }

    let entries: Vec<DueEntry> = due
        .into_iter()
        .filter_map(|(id, priority)| {
            let state = ws.snapshot.memory.get(&id)?;
            Some(DueEntry {
                word: ws.label(&id),
                item: id.to_string(),
                priority,
                next_review_date: state.next_review(),
                interval: state.interval(),
            })
        })
        .collect();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Nothing due.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Item", "Word", "Priority", "Due since", "Interval"]);
        for e in &entries {
            table.add_row(vec![
                Cell::new(&e.item),
                Cell::new(&e.word),
                Cell::new(format!("{:.2}", e.priority)),
                Cell::new(format_date(e.next_review_date)),
                Cell::new(format!("{}d", e.interval)),
            ]);
        }
        println!("{table}");
        println!("{} item(s) due.", entries.len());
    }

    let unseen = ws
        .words
        .words
        .iter()
        .filter(|w| !ws.snapshot.memory.contains(&w.id))
        .count();
    if unseen > 0 {
        println!("{unseen} new word(s) not yet studied.");
    }

    Ok(())
}
