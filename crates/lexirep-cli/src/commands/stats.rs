//! The `lexirep stats` command.

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use lexirep_core::statistics::{MemoryStatistics, StudyProgress};

use super::{Context, OutputFormat, Workspace};

#[derive(Serialize)]
struct StatsReport<'a> {
    memory: MemoryStatistics,
    progress: &'a StudyProgress,
    words: usize,
    unseen: usize,
}

pub fn execute(ctx: &Context, format: String) -> Result<()> {
    let format = OutputFormat::parse(&format)?;
    let ws = Workspace::open(ctx)?;

    let memory = ws.snapshot.memory.statistics(&ws.scheduler, ws.now);
    let unseen = ws
        .words
        .words
        .iter()
        .filter(|w| !ws.snapshot.memory.contains(&w.id))
        .count();
    let report = StatsReport {
        memory,
        progress: &ws.snapshot.progress,
        words: ws.words.len(),
        unseen,
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Words", "Unseen", "New", "Learning", "Mastered", "Review", "Due"]);
    table.add_row(vec![
        Cell::new(report.words),
        Cell::new(report.unseen),
        Cell::new(report.memory.new),
        Cell::new(report.memory.learning),
        Cell::new(report.memory.mastered),
        Cell::new(report.memory.review),
        Cell::new(report.memory.due),
    ]);
    println!("{table}");

    let progress = report.progress;
    println!(
        "Mean recall: {:.1}%",
        report.memory.mean_retrievability * 100.0
    );
    println!(
        "Streak: {} day(s), reviewed today: {}, mastered: {}",
        progress.streak, progress.today_count, progress.mastered_words
    );
    if let Some(last) = progress.last_study_date {
        println!("Last studied: {last}");
    }

    Ok(())
}
