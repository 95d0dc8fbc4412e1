//! The `lexirep study` command.
//!
//! Cards are read from the assembled deck one at a time. Each input line is a
//! rating (`1`-`4` or its name), an empty line to reveal the answer, or `q`
//! to stop. State is saved after every rating so an interrupted session
//! loses nothing.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use lexirep_core::deck::{assemble_deck, CardKind};
use lexirep_core::Rating;

use super::{make_rng, Context, Workspace};

pub fn execute(ctx: &Context, seed: Option<u64>) -> Result<()> {
    let mut ws = Workspace::open(ctx)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut ws, &mut stdin.lock(), &mut stdout.lock(), seed)
}

fn run_session(
    ws: &mut Workspace,
    input: &mut impl BufRead,
    out: &mut impl Write,
    seed: Option<u64>,
) -> Result<()> {
    let mut rng = make_rng(seed);
    let deck = assemble_deck(
        &ws.words.item_ids(),
        &ws.snapshot.memory,
        &ws.scheduler,
        &ws.config.session,
        ws.now,
        &mut rng,
    );

    if deck.is_empty() {
        writeln!(out, "Nothing to study right now.")?;
        return Ok(());
    }

    writeln!(
        out,
        "Session: {} card(s), {} review, {} new",
        deck.len(),
        deck.review_count(),
        deck.new_count()
    )?;
    ws.snapshot.progress.begin_session(ws.now.date_naive());

    let mut tally = [0usize; 4];
    let mut mastered = 0;

    'cards: for (i, card) in deck.iter().enumerate() {
        let word = ws.words.get(&card.item).cloned();
        let kind = match card.kind {
            CardKind::New => "new",
            CardKind::Review => "review",
        };
        match &word {
            Some(w) if !w.pronunciation.is_empty() => writeln!(
                out,
                "\n[{}/{}] {} {} ({kind})",
                i + 1,
                deck.len(),
                w.word,
                w.pronunciation
            )?,
            _ => writeln!(
                out,
                "\n[{}/{}] {} ({kind})",
                i + 1,
                deck.len(),
                ws.label(&card.item)
            )?,
        }

        let rating = loop {
            write!(out, "rate 1-4 (again/hard/good/easy), enter to flip, q to quit: ")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break 'cards;
            }
            match line.trim() {
                "q" | "quit" => break 'cards,
                "" => {
                    if let Some(w) = &word {
                        writeln!(out, "  {}", w.meaning)?;
                        if !w.example.is_empty() {
                            writeln!(out, "  {}", w.example)?;
                        }
                        if !w.translation.is_empty() {
                            writeln!(out, "  {}", w.translation)?;
                        }
                    }
                }
                answer => match answer.parse::<Rating>() {
                    Ok(rating) => break rating,
                    Err(e) => writeln!(out, "  {e}")?,
                },
            }
        };

        let outcome = ws.snapshot.memory.record_review(
            &card.item,
            rating,
            &ws.scheduler,
            ws.now,
            None,
            &mut rng,
        );
        ws.snapshot.progress.record(&outcome);
        ws.save()?;

        tally[rating.value() as usize - 1] += 1;
        if outcome.became_mastered() {
            mastered += 1;
        }
        writeln!(
            out,
            "  next review in {} day(s)",
            outcome.current.interval()
        )?;
    }

    let reviewed: usize = tally.iter().sum();
    writeln!(
        out,
        "\nSession complete: {reviewed} reviewed (again {}, hard {}, good {}, easy {})",
        tally[0], tally[1], tally[2], tally[3]
    )?;
    if mastered > 0 {
        writeln!(out, "Newly mastered: {mastered}")?;
    }
    writeln!(
        out,
        "Streak: {} day(s), reviewed today: {}",
        ws.snapshot.progress.streak, ws.snapshot.progress.today_count
    )?;

    Ok(())
}
