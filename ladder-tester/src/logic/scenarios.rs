use anyhow::{Result, bail, ensure};
use ladder_game::constants::ROW_COUNT;
use ladder_game::{
    IgnoreReason, ReplySource, Round, RoundEvent, SuggestionKind, TriggerOutcome,
    suggestions_or_fallback,
};
use std::time::Duration;

use super::round_tester::{RoundPlan, RoundSummary};

/// A named logic scenario: a plan plus the checks run against every seed.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub plan: RoundPlan,
}

impl TestScenario {
    #[must_use]
    pub const fn new(key: &'static str, name: &'static str, plan: RoundPlan) -> Self {
        Self { key, name, plan }
    }
}

pub fn all_scenarios(players: usize) -> Vec<TestScenario> {
    vec![
        TestScenario::new(
            "smoke",
            "Smoke Test",
            RoundPlan::new(players).with_expectation(smoke_expectation),
        ),
        TestScenario::new(
            "layout-invariants",
            "Rung Layout Invariants",
            RoundPlan::new(players).with_expectation(layout_expectation),
        ),
        TestScenario::new(
            "path-determinism",
            "Deterministic Path Resolution",
            RoundPlan::new(players).with_expectation(determinism_expectation),
        ),
        TestScenario::new(
            "path-continuity",
            "Path Continuity and Endpoints",
            RoundPlan::new(players).with_expectation(continuity_expectation),
        ),
        TestScenario::new(
            "replay-after-reset",
            "Reset and Replay Idempotence",
            RoundPlan::new(players).with_expectation(replay_expectation),
        ),
        TestScenario::new(
            "stagger-order",
            "Run-All Stagger and Celebration Timing",
            RoundPlan::new(players).with_expectation(stagger_expectation),
        ),
        TestScenario::new(
            "double-trigger",
            "Re-entrant Trigger Guard",
            RoundPlan::new(players)
                .with_script(double_trigger_script)
                .with_expectation(double_trigger_expectation),
        ),
        TestScenario::new(
            "suggestion-fallback",
            "Suggestion Failure Fallback",
            RoundPlan::new(players).with_expectation(suggestion_fallback_expectation),
        ),
    ]
}

pub fn get_scenario(key: &str, players: usize) -> Option<TestScenario> {
    let key = key.to_lowercase();
    all_scenarios(players)
        .into_iter()
        .find(|scenario| scenario.key == key)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    all_scenarios(2)
        .into_iter()
        .map(|scenario| (scenario.key, scenario.name))
        .collect()
}

fn smoke_expectation(summary: &RoundSummary) -> Result<()> {
    ensure!(
        summary.arrivals().len() == summary.players,
        "expected {} arrivals, saw {}",
        summary.players,
        summary.arrivals().len()
    );
    ensure!(summary.celebrated, "celebration never fired");
    ensure!(
        summary.mapping.iter().all(Option::is_some),
        "mapping incomplete: {:?}",
        summary.mapping
    );
    Ok(())
}

fn layout_expectation(summary: &RoundSummary) -> Result<()> {
    let layout = &summary.layout;
    let rows = summary.config.layout.rows;
    for rung in layout.rungs() {
        ensure!(
            rung.row >= 1 && rung.row <= rows.saturating_sub(2),
            "rung {rung:?} on an edge row"
        );
        ensure!(
            rung.to_col() < layout.columns(),
            "rung {rung:?} leaves the board"
        );
    }
    for pair in layout.rungs().windows(2) {
        if pair[0].row == pair[1].row && pair[1].from_col <= pair[0].from_col + 1 {
            bail!("rungs {:?} and {:?} touch", pair[0], pair[1]);
        }
    }
    Ok(())
}

fn determinism_expectation(summary: &RoundSummary) -> Result<()> {
    ensure!(
        summary.layout.fingerprint() == summary.replay_fingerprint,
        "seed {} produced two different layouts",
        summary.seed
    );
    for (col, path) in summary.paths.iter().enumerate() {
        let again = ladder_game::resolve(col, &summary.layout)?;
        ensure!(&again == path, "column {col} resolved differently");
    }
    Ok(())
}

fn continuity_expectation(summary: &RoundSummary) -> Result<()> {
    let rows = summary.config.layout.rows;
    for (col, path) in summary.paths.iter().enumerate() {
        for pair in path.points().windows(2) {
            let step = pair[0].col.abs_diff(pair[1].col) + usize::from(pair[0].row.abs_diff(pair[1].row));
            ensure!(step == 1, "column {col}: jump {:?} -> {:?}", pair[0], pair[1]);
        }
        let first = path.points().first().copied();
        let last = path.points().last().copied();
        ensure!(
            first.is_some_and(|p| p.col == col && p.row == 0),
            "column {col} does not start at the top"
        );
        ensure!(
            last.is_some_and(|p| p.col == path.final_col() && p.row == rows.saturating_add(1)),
            "column {col} does not settle below row {rows}"
        );
    }
    if rows == ROW_COUNT {
        ensure!(
            summary.paths.iter().all(|p| p.len() >= usize::from(ROW_COUNT) + 2),
            "default board paths are too short"
        );
    }
    Ok(())
}

fn replay_expectation(summary: &RoundSummary) -> Result<()> {
    ensure!(
        summary.mapping == summary.replay_mapping,
        "replay mapping {:?} differs from {:?}",
        summary.replay_mapping,
        summary.mapping
    );
    Ok(())
}

fn stagger_expectation(summary: &RoundSummary) -> Result<()> {
    let stagger = summary.config.timing.stagger();
    let starts = summary.starts();
    for (i, (participant, at)) in starts.iter().enumerate() {
        ensure!(*participant == i, "start order {starts:?}");
        let expected = stagger * u32::try_from(i)?;
        ensure!(*at == expected, "participant {i} started at {at:?}, expected {expected:?}");
    }
    let Some(last_arrival) = summary.arrivals().iter().map(|(_, at)| *at).max() else {
        bail!("nobody arrived");
    };
    let celebrations: Vec<Duration> = summary
        .events
        .iter()
        .filter_map(|event| match *event {
            RoundEvent::Celebration { at } => Some(at),
            _ => None,
        })
        .collect();
    ensure!(
        celebrations == vec![last_arrival + summary.config.timing.celebration()],
        "celebration at {celebrations:?}, last arrival at {last_arrival:?}"
    );
    Ok(())
}

fn double_trigger_script(round: &mut Round) -> Vec<TriggerOutcome> {
    vec![
        round.trigger(0, Duration::ZERO),
        round.trigger(0, Duration::from_millis(50)),
        round.run_all(Duration::from_millis(60)),
    ]
}

fn double_trigger_expectation(summary: &RoundSummary) -> Result<()> {
    ensure!(
        summary.triggers
            == [
                TriggerOutcome::Started,
                TriggerOutcome::Ignored {
                    reason: IgnoreReason::AlreadyMoving
                },
                TriggerOutcome::Ignored {
                    reason: IgnoreReason::RoundInProgress
                },
            ],
        "unexpected trigger outcomes {:?}",
        summary.triggers
    );
    let arrivals = summary.arrivals();
    ensure!(
        arrivals.len() == 1 && arrivals[0].0 == 0,
        "expected a single arrival for participant 0, saw {arrivals:?}"
    );
    ensure!(!summary.celebrated, "celebration fired with participants idle");
    Ok(())
}

fn suggestion_fallback_expectation(summary: &RoundSummary) -> Result<()> {
    let offline = ReplySource::new(|_, _| Err::<String, _>("service unavailable"));
    for kind in [SuggestionKind::Nicknames, SuggestionKind::Missions] {
        let picks = suggestions_or_fallback(&offline, kind, summary.players);
        ensure!(
            picks.len() == summary.players,
            "{} fallback returned {} entries",
            kind.label(),
            picks.len()
        );
        ensure!(
            picks.iter().all(|p| p == kind.fallback()),
            "{} fallback returned {picks:?}",
            kind.label()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::round_tester::RoundTester;
    use ladder_game::LadderConfig;

    #[test]
    fn every_scenario_passes_on_sample_seeds() {
        let tester = RoundTester::new(LadderConfig::default_config(), false);
        for players in [2, 3, 8] {
            for scenario in all_scenarios(players) {
                for seed in [1, 42, 1337] {
                    let summary = tester.run_plan(&scenario.plan, seed).unwrap();
                    for expectation in &scenario.plan.expectations {
                        expectation
                            .check(&summary)
                            .unwrap_or_else(|e| panic!("{} seed {seed}: {e:#}", scenario.key));
                    }
                }
            }
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(get_scenario("SMOKE", 2).is_some());
        assert!(get_scenario("unknown", 2).is_none());
        assert_eq!(list_scenarios().len(), 8);
    }
}
