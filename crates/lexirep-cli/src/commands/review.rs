//! The `lexirep review` command.

use anyhow::Result;

use lexirep_core::Rating;

use super::{format_date, make_rng, Context, Workspace};

pub fn execute(
    ctx: &Context,
    item: String,
    rating: Rating,
    elapsed_days: Option<f64>,
    seed: Option<u64>,
) -> Result<()> {
    let mut ws = Workspace::open(ctx)?;
    let id = ws.resolve_item(&item)?;
    let mut rng = make_rng(seed);

    ws.snapshot.progress.begin_session(ws.now.date_naive());
    let outcome = ws.snapshot.memory.record_review(
        &id,
        rating,
        &ws.scheduler,
        ws.now,
        elapsed_days,
        &mut rng,
    );
    ws.snapshot.progress.record(&outcome);
    ws.save()?;

    let state = &outcome.current;
    println!(
        "{}: {} -> next review in {} day(s) ({})",
        ws.label(&id),
        rating,
        state.interval(),
        format_date(state.next_review())
    );
    println!(
        "  difficulty {:.2}, stability {:.2}, retrievability {:.3}, {}",
        state.difficulty(),
        state.stability(),
        state.retrievability(),
        state.memory_strength()
    );
    if outcome.became_mastered() {
        println!("  Mastered!");
    }

    Ok(())
}
