use anyhow::{Context, Result, ensure};
use colored::Colorize;
use ladder_game::{
    LadderConfig, Layout, Path, Roster, Round, RoundEvent, RoundSnapshot, TriggerOutcome,
    encode_code,
};
use std::sync::Arc;
use std::time::Duration;

/// Drives a freshly seeded round and returns the trigger outcomes it produced.
pub type RoundScript = fn(&mut Round) -> Vec<TriggerOutcome>;

#[derive(Debug, Clone)]
pub struct RoundPlan {
    pub players: usize,
    pub script: RoundScript,
    pub expectations: Vec<RoundExpectation>,
}

impl RoundPlan {
    #[must_use]
    pub fn new(players: usize) -> Self {
        Self {
            players,
            script: run_all_script,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_script(mut self, script: RoundScript) -> Self {
        self.script = script;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<RoundExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

pub fn run_all_script(round: &mut Round) -> Vec<TriggerOutcome> {
    vec![round.run_all(Duration::ZERO)]
}

/// Assertion hook run after a round completes.
type RoundExpectationFn = Arc<dyn Fn(&RoundSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct RoundExpectation(RoundExpectationFn);

impl std::fmt::Debug for RoundExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundExpectation").finish()
    }
}

impl RoundExpectation {
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&RoundSummary) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the hook against a summary.
    ///
    /// # Errors
    ///
    /// Whatever the hook reports.
    pub fn check(&self, summary: &RoundSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for RoundExpectation
where
    F: Fn(&RoundSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

/// Everything observed while running one seeded round.
#[derive(Debug, Clone)]
pub struct RoundSummary {
    pub seed: u64,
    pub code: Option<String>,
    pub players: usize,
    pub config: LadderConfig,
    pub layout: Layout,
    pub paths: Vec<Path>,
    pub triggers: Vec<TriggerOutcome>,
    pub events: Vec<RoundEvent>,
    pub mapping: Vec<Option<usize>>,
    pub celebrated: bool,
    /// Mapping after a reset and a second "run all" over the same rungs.
    pub replay_mapping: Vec<Option<usize>>,
    /// Fingerprint of a layout regenerated from the same seed.
    pub replay_fingerprint: u64,
    pub snapshot: RoundSnapshot,
}

impl RoundSummary {
    #[must_use]
    pub fn arrivals(&self) -> Vec<(usize, Duration)> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                RoundEvent::Arrived { participant, at, .. } => Some((participant, at)),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn starts(&self) -> Vec<(usize, Duration)> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                RoundEvent::Started { participant, at } => Some((participant, at)),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct RoundTester {
    config: LadderConfig,
    verbose: bool,
}

impl RoundTester {
    #[must_use]
    pub const fn new(config: LadderConfig, verbose: bool) -> Self {
        Self { config, verbose }
    }

    #[must_use]
    pub const fn config(&self) -> &LadderConfig {
        &self.config
    }

    /// Build the seeded round for `plan`, run its script to completion and
    /// replay it once after a reset.
    ///
    /// # Errors
    ///
    /// Returns an error when the plan's roster or the config cannot form a round.
    pub fn run_plan(&self, plan: &RoundPlan, seed: u64) -> Result<RoundSummary> {
        let roster = roster_for(plan.players)?;
        let mut round = Round::seeded(&roster, &self.config, seed)
            .with_context(|| format!("cannot build a {}-player round", plan.players))?;
        let paths = (0..round.len())
            .map(|p| round.path_for(p))
            .collect::<Result<Vec<_>, _>>()?;

        let triggers = (plan.script)(&mut round);
        let events = round.run_until_idle(Duration::ZERO);
        let mapping = round.mapping().to_vec();
        let celebrated = round.has_celebrated();
        let snapshot = round.snapshot();

        round.reset();
        round.run_all(Duration::ZERO);
        round.run_until_idle(Duration::ZERO);
        let replay_mapping = round.mapping().to_vec();
        let replay_fingerprint =
            Layout::generate_seeded(plan.players, &self.config.layout, seed)?.fingerprint();

        if self.verbose {
            println!(
                "    {} seed {} ({}) rungs:{} events:{}",
                "↳".dimmed(),
                seed,
                encode_code(seed).as_deref().unwrap_or("no code"),
                round.layout().len(),
                events.len()
            );
        }

        Ok(RoundSummary {
            seed,
            code: encode_code(seed),
            players: plan.players,
            config: self.config.clone(),
            layout: round.layout().clone(),
            paths,
            triggers,
            events,
            mapping,
            celebrated,
            replay_mapping,
            replay_fingerprint,
            snapshot,
        })
    }
}

/// The setup-screen roster grown to `players` entries.
///
/// # Errors
///
/// Returns an error when `players` is outside the supported range.
pub fn roster_for(players: usize) -> Result<Roster> {
    let mut roster = Roster::default();
    while roster.len() < players {
        ensure!(roster.add_participant(), "at most 8 players are supported (got {players})");
    }
    ensure!(roster.len() == players, "at least 2 players are required (got {players})");
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_for_respects_bounds() {
        assert_eq!(roster_for(5).unwrap().len(), 5);
        assert!(roster_for(1).is_err());
        assert!(roster_for(9).is_err());
    }

    #[test]
    fn run_plan_collects_round_and_replay() {
        let tester = RoundTester::new(LadderConfig::default_config(), false);
        let summary = tester.run_plan(&RoundPlan::new(4), 1337).unwrap();
        assert_eq!(summary.players, 4);
        assert_eq!(summary.paths.len(), 4);
        assert_eq!(summary.arrivals().len(), 4);
        assert_eq!(summary.starts().len(), 4);
        assert!(summary.celebrated);
        assert_eq!(summary.mapping, summary.replay_mapping);
        assert_eq!(summary.layout.fingerprint(), summary.replay_fingerprint);
        assert_eq!(summary.snapshot.fingerprint, summary.replay_fingerprint);
    }

    #[test]
    fn expectations_see_summary() {
        let tester = RoundTester::new(LadderConfig::default_config(), false);
        let plan = RoundPlan::new(2).with_expectation(|summary: &RoundSummary| {
            ensure!(summary.mapping.iter().all(Option::is_some), "unresolved mapping");
            Ok(())
        });
        let summary = tester.run_plan(&plan, 7).unwrap();
        assert!(plan.expectations.iter().all(|e| e.check(&summary).is_ok()));
    }
}
