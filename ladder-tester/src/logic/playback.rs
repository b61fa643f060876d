use anyhow::{Context, Result};
use colored::Colorize;
use ladder_game::driver::{Clock, PlayOutcome, play};
use ladder_game::{LadderSession, Round, RoundEvent, StepKind};
use std::cell::RefCell;
use std::io::Write;

use super::seeds::SeedInfo;

/// Render one event as a single log line.
#[must_use]
pub fn describe_event(round: &Round, event: &RoundEvent) -> String {
    let name = |p: usize| {
        round
            .participants()
            .get(p)
            .map_or_else(|| format!("#{p}"), |x| format!("{} {}", x.glyph, x.name))
    };
    let at = event.at().as_millis();
    match *event {
        RoundEvent::Started { participant, .. } => {
            format!("{at:>6}ms  {} starts down column {participant}", name(participant))
        }
        RoundEvent::Stepped {
            participant,
            point,
            kind: StepKind::Horizontal,
            ..
        } => format!(
            "{at:>6}ms  {} crosses to column {} on row {}",
            name(participant),
            point.col,
            point.row
        ),
        RoundEvent::Stepped {
            participant, point, ..
        } => format!("{at:>6}ms  {} reaches row {}", name(participant), point.row),
        RoundEvent::Arrived {
            participant,
            outcome,
            ..
        } => {
            let text = round
                .outcomes()
                .get(outcome)
                .map_or("?", |o| o.text.as_str());
            format!("{at:>6}ms  {} lands on \"{text}\"", name(participant))
        }
        RoundEvent::Celebration { .. } => format!("{at:>6}ms  🎉 everyone has arrived"),
    }
}

/// Play a seeded round in real time, writing each event as it fires.
///
/// # Errors
///
/// Returns an error when the round cannot be built or the output fails.
pub async fn play_round<W: Write>(
    session: &mut LadderSession,
    seed: &SeedInfo,
    speed: f64,
    verbose: bool,
    out: &mut W,
) -> Result<()> {
    session.back_to_setup();
    let round = session
        .start_seeded(seed.seed)
        .context("cannot start playback round")?
        .clone();
    writeln!(
        out,
        "{} {} ({} rungs)",
        "▶ Playing".bright_green().bold(),
        seed.display_code(),
        round.layout().len()
    )?;

    let cell = RefCell::new(round);
    cell.borrow_mut().run_all(std::time::Duration::ZERO);
    let clock = Clock::with_speed(speed);
    let mut write_error = None;
    let outcome = play(&cell, &clock, |event| {
        if !verbose && matches!(event, RoundEvent::Stepped { .. }) {
            return;
        }
        let line = describe_event(&cell.borrow(), event);
        if let Err(err) = writeln!(out, "{line}")
            && write_error.is_none()
        {
            write_error = Some(err);
        }
    })
    .await;
    if let Some(err) = write_error {
        return Err(err.into());
    }

    let round = cell.into_inner();
    writeln!(out)?;
    for result in round.results() {
        let outcome_text = result.outcome.map_or_else(|| "-".to_string(), |o| o.text);
        writeln!(
            out,
            "  {} {:<16} → {}",
            result.participant.glyph,
            result.participant.name,
            outcome_text.bold()
        )?;
    }
    if outcome == PlayOutcome::Abandoned {
        writeln!(out, "{}", "round was reset before it finished".yellow())?;
    }
    if let Some(active) = session.round_mut() {
        *active = round;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladder_game::{LadderConfig, Layout, Roster, Rung, TimingConfig};
    use std::time::Duration;

    #[test]
    fn describes_crossings_and_arrivals() {
        let layout = Layout::from_rungs(2, 12, [Rung::new(5, 0)]).unwrap();
        let round = Round::new(&Roster::default(), layout, TimingConfig::default()).unwrap();
        let crossing = RoundEvent::Stepped {
            participant: 0,
            index: 6,
            point: ladder_game::Point::new(1, 5),
            kind: StepKind::Horizontal,
            at: Duration::from_millis(1_300),
        };
        assert!(describe_event(&round, &crossing).contains("crosses to column 1 on row 5"));
        let arrival = RoundEvent::Arrived {
            participant: 1,
            outcome: 0,
            at: Duration::from_millis(3_200),
        };
        assert!(describe_event(&round, &arrival).contains("Friend 2 lands on \"Snack time\""));
    }

    #[test]
    fn playback_runs_to_completion() {
        let mut session = LadderSession::new(Roster::default(), LadderConfig::default_config());
        let mut out = Vec::new();
        tokio_test::block_on(play_round(
            &mut session,
            &SeedInfo::from_numeric(9),
            100.0,
            false,
            &mut out,
        ))
        .unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("everyone has arrived"));
        assert!(session.round().is_some_and(Round::is_complete));
    }
}
