//! Round aggregate: per-participant traversal state, outcome mapping and the
//! celebration flag.
//!
//! All mutation of round state happens here. Schedulers live in an arena
//! indexed by participant and are dropped wholesale on [`Round::reset`], which
//! also bumps the round epoch so an external driver can tell its work is stale.
//!
//! Time is a [`Duration`] measured from any origin the driver chooses; the
//! round never reads a clock itself.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

use crate::config::{LadderConfig, TimingConfig};
use crate::coords::{Position, point_position};
use crate::error::LadderError;
use crate::layout::{Layout, Rung};
use crate::path::{Path, Point, StepKind, resolve};
use crate::roster::{Outcome, Participant, Roster};
use crate::traversal::{Step, Traversal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalState {
    Idle,
    Moving,
    Arrived,
}

/// Why a trigger was ignored. Ignoring is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    AlreadyMoving,
    AlreadyArrived,
    /// "Run all" only applies to a completely fresh round.
    RoundInProgress,
    UnknownParticipant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TriggerOutcome {
    Started,
    /// "Run all" accepted; `count` participants will start in stagger order.
    Scheduled { count: usize },
    Ignored { reason: IgnoreReason },
}

impl TriggerOutcome {
    #[must_use]
    pub const fn is_ignored(self) -> bool {
        matches!(self, Self::Ignored { .. })
    }
}

/// Notifications emitted by [`Round::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RoundEvent {
    Started {
        participant: usize,
        at: Duration,
    },
    Stepped {
        participant: usize,
        index: usize,
        point: Point,
        kind: StepKind,
        at: Duration,
    },
    Arrived {
        participant: usize,
        outcome: usize,
        at: Duration,
    },
    Celebration {
        at: Duration,
    },
}

impl RoundEvent {
    #[must_use]
    pub const fn at(&self) -> Duration {
        match *self {
            Self::Started { at, .. }
            | Self::Stepped { at, .. }
            | Self::Arrived { at, .. }
            | Self::Celebration { at } => at,
        }
    }
}

/// One row of the celebration panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub participant: Participant,
    pub outcome: Option<Outcome>,
}

/// Serializable view of a round for reports and debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub epoch: u64,
    pub columns: usize,
    pub rows: u16,
    pub fingerprint: u64,
    pub rungs: Vec<Rung>,
    pub states: Vec<TraversalState>,
    pub mapping: Vec<Option<usize>>,
    pub celebrating: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingStart {
    at: Duration,
    participant: usize,
}

/// Earliest due continuation, ranked so equal deadlines resolve the same way
/// on every run: traversal steps, then queued starts, then celebration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Due {
    Traversal { at: Duration, participant: usize },
    Start { at: Duration },
    Celebration { at: Duration },
}

impl Due {
    const fn at(self) -> Duration {
        match self {
            Self::Traversal { at, .. } | Self::Start { at } | Self::Celebration { at } => at,
        }
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Traversal { .. } => 0,
            Self::Start { .. } => 1,
            Self::Celebration { .. } => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Round {
    participants: Vec<Participant>,
    outcomes: Vec<Outcome>,
    layout: Layout,
    timing: TimingConfig,
    states: Vec<TraversalState>,
    traversals: Vec<Option<Traversal>>,
    mapping: Vec<Option<usize>>,
    pending_starts: VecDeque<PendingStart>,
    celebrate_at: Option<Duration>,
    celebrating: bool,
    celebration_dismissed: bool,
    epoch: u64,
    outbox: Vec<RoundEvent>,
}

impl Round {
    /// Enter a round over an existing layout.
    ///
    /// # Errors
    ///
    /// Returns `LadderError` when the roster is invalid or the layout width
    /// differs from the participant count.
    pub fn new(roster: &Roster, layout: Layout, timing: TimingConfig) -> Result<Self, LadderError> {
        roster.validate()?;
        let count = roster.len();
        if layout.columns() != count {
            return Err(LadderError::LayoutMismatch {
                columns: layout.columns(),
                participants: count,
            });
        }
        log::info!(
            "round started: {count} participants, {} rungs over {} rows",
            layout.len(),
            layout.rows()
        );
        Ok(Self {
            participants: roster.participants().to_vec(),
            outcomes: roster.outcomes().to_vec(),
            layout,
            timing,
            states: vec![TraversalState::Idle; count],
            traversals: vec![None; count],
            mapping: vec![None; count],
            pending_starts: VecDeque::new(),
            celebrate_at: None,
            celebrating: false,
            celebration_dismissed: false,
            epoch: 0,
            outbox: Vec::new(),
        })
    }

    /// Generate a fresh layout from `rng` and enter the round.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn generate<R: Rng + ?Sized>(
        roster: &Roster,
        config: &LadderConfig,
        rng: &mut R,
    ) -> Result<Self, LadderError> {
        let layout = Layout::generate(roster.len(), &config.layout, rng)?;
        Self::new(roster, layout, config.timing.clone())
    }

    /// Enter a round whose layout is fully determined by `seed`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn seeded(roster: &Roster, config: &LadderConfig, seed: u64) -> Result<Self, LadderError> {
        let layout = Layout::generate_seeded(roster.len(), &config.layout, seed)?;
        Self::new(roster, layout, config.timing.clone())
    }

    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub const fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Incremented by every [`Self::reset`].
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn state(&self, participant: usize) -> Option<TraversalState> {
        self.states.get(participant).copied()
    }

    #[must_use]
    pub fn states(&self) -> &[TraversalState] {
        &self.states
    }

    #[must_use]
    pub fn mapping(&self) -> &[Option<usize>] {
        &self.mapping
    }

    #[must_use]
    pub fn arrived_count(&self) -> usize {
        self.states
            .iter()
            .filter(|s| **s == TraversalState::Arrived)
            .count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.arrived_count() == self.len()
    }

    /// Whether the celebration panel is showing.
    #[must_use]
    pub const fn is_celebrating(&self) -> bool {
        self.celebrating && !self.celebration_dismissed
    }

    /// True once the celebration has fired, even if it was dismissed.
    #[must_use]
    pub const fn has_celebrated(&self) -> bool {
        self.celebrating
    }

    /// Start one participant's descent now.
    pub fn trigger(&mut self, participant: usize, now: Duration) -> TriggerOutcome {
        match self.states.get(participant) {
            None => TriggerOutcome::Ignored {
                reason: IgnoreReason::UnknownParticipant,
            },
            Some(TraversalState::Moving) => TriggerOutcome::Ignored {
                reason: IgnoreReason::AlreadyMoving,
            },
            Some(TraversalState::Arrived) => TriggerOutcome::Ignored {
                reason: IgnoreReason::AlreadyArrived,
            },
            Some(TraversalState::Idle) => {
                self.begin(participant, now);
                TriggerOutcome::Started
            }
        }
    }

    /// Start every participant in column order, `stagger` apart. The first
    /// one starts at `now`.
    pub fn run_all(&mut self, now: Duration) -> TriggerOutcome {
        let fresh = self.states.iter().all(|s| *s == TraversalState::Idle)
            && self.pending_starts.is_empty();
        if !fresh {
            log::debug!("run all ignored: round already in progress");
            return TriggerOutcome::Ignored {
                reason: IgnoreReason::RoundInProgress,
            };
        }
        let stagger = self.timing.stagger();
        let mut at = now;
        for participant in 1..self.len() {
            at += stagger;
            self.pending_starts.push_back(PendingStart { at, participant });
        }
        log::debug!(
            "run all: {} participants, {}ms stagger",
            self.len(),
            stagger.as_millis()
        );
        self.begin(0, now);
        TriggerOutcome::Scheduled { count: self.len() }
    }

    /// Fire every continuation due at or before `now`, in chronological
    /// order, and return the notifications produced since the last call.
    pub fn tick(&mut self, now: Duration) -> Vec<RoundEvent> {
        while let Some(due) = self.earliest_due().filter(|d| d.at() <= now) {
            self.fire(due);
        }
        std::mem::take(&mut self.outbox)
    }

    /// When the next continuation is due, if any remains.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.earliest_due().map(Due::at)
    }

    /// Drive the round with a virtual clock until nothing is left to fire.
    pub fn run_until_idle(&mut self, now: Duration) -> Vec<RoundEvent> {
        let mut events = self.tick(now);
        while let Some(deadline) = self.next_deadline() {
            events.extend(self.tick(deadline.max(now)));
        }
        events
    }

    /// Clear traversal state, mapping, celebration and pending starts. The
    /// participants, outcomes and rungs are kept, so re-running reproduces
    /// the same mapping.
    pub fn reset(&mut self) {
        self.states.fill(TraversalState::Idle);
        self.traversals.iter_mut().for_each(|t| *t = None);
        self.mapping.fill(None);
        self.pending_starts.clear();
        self.celebrate_at = None;
        self.celebrating = false;
        self.celebration_dismissed = false;
        self.outbox.clear();
        self.epoch += 1;
        log::info!("round reset (epoch {})", self.epoch);
    }

    pub fn dismiss_celebration(&mut self) {
        self.celebration_dismissed = true;
    }

    /// Resolve the path for a participant's starting column.
    ///
    /// # Errors
    ///
    /// Returns `LadderError::ColumnOutOfRange` for an unknown participant.
    pub fn path_for(&self, participant: usize) -> Result<Path, LadderError> {
        resolve(participant, &self.layout)
    }

    /// Points consumed so far; empty while idle.
    #[must_use]
    pub fn visited(&self, participant: usize) -> &[Point] {
        self.traversal(participant)
            .map(Traversal::visited)
            .unwrap_or_default()
    }

    /// Current normalized position; idle participants wait at the top of
    /// their column.
    #[must_use]
    pub fn position(&self, participant: usize) -> Option<Position> {
        if participant >= self.len() {
            return None;
        }
        let point = self
            .traversal(participant)
            .and_then(Traversal::current_point)
            .unwrap_or(Point::new(participant, 0));
        Some(point_position(
            point,
            self.layout.columns(),
            self.layout.rows(),
        ))
    }

    /// Whether the participant is about to cross a rung.
    #[must_use]
    pub fn is_turning(&self, participant: usize) -> bool {
        self.traversal(participant)
            .is_some_and(Traversal::is_turning)
    }

    #[must_use]
    pub fn outcome_for(&self, participant: usize) -> Option<&Outcome> {
        let col = self.mapping.get(participant).copied().flatten()?;
        self.outcomes.get(col)
    }

    /// First participant that landed on outcome `outcome`.
    #[must_use]
    pub fn winner_for(&self, outcome: usize) -> Option<&Participant> {
        let participant = self.mapping.iter().position(|m| *m == Some(outcome))?;
        self.participants.get(participant)
    }

    #[must_use]
    pub fn results(&self) -> Vec<RoundResult> {
        self.participants
            .iter()
            .enumerate()
            .map(|(i, participant)| RoundResult {
                participant: participant.clone(),
                outcome: self.outcome_for(i).cloned(),
            })
            .collect()
    }

    #[must_use]
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            epoch: self.epoch,
            columns: self.layout.columns(),
            rows: self.layout.rows(),
            fingerprint: self.layout.fingerprint(),
            rungs: self.layout.rungs().to_vec(),
            states: self.states.clone(),
            mapping: self.mapping.clone(),
            celebrating: self.is_celebrating(),
        }
    }

    fn traversal(&self, participant: usize) -> Option<&Traversal> {
        self.traversals.get(participant).and_then(Option::as_ref)
    }

    fn begin(&mut self, participant: usize, at: Duration) {
        let path = match resolve(participant, &self.layout) {
            Ok(path) => path,
            Err(err) => {
                log::warn!("cannot start participant {participant}: {err}");
                return;
            }
        };
        log::debug!(
            "participant {participant} starts at {}ms ({} points)",
            at.as_millis(),
            path.len()
        );
        self.traversals[participant] = Some(Traversal::start(participant, path, at, &self.timing));
        self.states[participant] = TraversalState::Moving;
        self.outbox.push(RoundEvent::Started { participant, at });
    }

    fn earliest_due(&self) -> Option<Due> {
        let traversals = self.traversals.iter().flatten().filter_map(|t| {
            t.next_deadline().map(|at| Due::Traversal {
                at,
                participant: t.participant(),
            })
        });
        let start = self.pending_starts.front().map(|s| Due::Start { at: s.at });
        let celebration = self.celebrate_at.map(|at| Due::Celebration { at });
        traversals
            .chain(start)
            .chain(celebration)
            .min_by_key(|due| (due.at(), due.rank(), *due))
    }

    fn fire(&mut self, due: Due) {
        match due {
            Due::Traversal { participant, .. } => self.advance_traversal(participant),
            Due::Start { .. } => {
                if let Some(start) = self.pending_starts.pop_front()
                    && self.states[start.participant] == TraversalState::Idle
                {
                    self.begin(start.participant, start.at);
                }
            }
            Due::Celebration { at } => {
                self.celebrate_at = None;
                self.celebrating = true;
                log::info!("all {} participants arrived; celebrating", self.len());
                self.outbox.push(RoundEvent::Celebration { at });
            }
        }
    }

    fn advance_traversal(&mut self, participant: usize) {
        let Some(step) = self.traversals[participant]
            .as_mut()
            .and_then(Traversal::advance)
        else {
            return;
        };
        match step {
            Step::Advanced {
                index,
                point,
                kind,
                at,
            } => self.outbox.push(RoundEvent::Stepped {
                participant,
                index,
                point,
                kind,
                at,
            }),
            Step::Arrived { final_col, at } => {
                self.states[participant] = TraversalState::Arrived;
                self.mapping[participant] = Some(final_col);
                log::debug!("participant {participant} arrived at column {final_col}");
                self.outbox.push(RoundEvent::Arrived {
                    participant,
                    outcome: final_col,
                    at,
                });
                if self.is_complete() {
                    self.celebrate_at = Some(at + self.timing.celebration());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn pair_round(rungs: &[Rung]) -> Round {
        let layout = Layout::from_rungs(2, 12, rungs.iter().copied()).unwrap();
        Round::new(&Roster::default(), layout, TimingConfig::default()).unwrap()
    }

    fn roster_of(count: usize) -> Roster {
        let mut roster = Roster::default();
        while roster.len() < count {
            roster.add_participant();
        }
        roster
    }

    #[test]
    fn rejects_layout_of_wrong_width() {
        let layout = Layout::empty(3, 12).unwrap();
        let err = Round::new(&Roster::default(), layout, TimingConfig::default()).unwrap_err();
        assert_eq!(
            err,
            LadderError::LayoutMismatch {
                columns: 3,
                participants: 2
            }
        );
    }

    #[test]
    fn empty_layout_maps_identity() {
        let mut round = pair_round(&[]);
        assert_eq!(round.run_all(ms(0)), TriggerOutcome::Scheduled { count: 2 });
        round.run_until_idle(ms(0));
        assert_eq!(round.mapping(), &[Some(0), Some(1)]);
        assert_eq!(round.outcome_for(0).unwrap().text, "Snack time");
    }

    #[test]
    fn single_rung_swaps_pair() {
        let mut round = pair_round(&[Rung::new(5, 0)]);
        round.run_all(ms(0));
        round.run_until_idle(ms(0));
        assert_eq!(round.mapping(), &[Some(1), Some(0)]);
        assert_eq!(round.winner_for(0).unwrap().name, "Friend 2");
        assert_eq!(round.winner_for(1).unwrap().name, "Friend 1");
    }

    #[test]
    fn double_trigger_is_ignored() {
        let mut round = pair_round(&[]);
        assert_eq!(round.trigger(0, ms(0)), TriggerOutcome::Started);
        assert_eq!(
            round.trigger(0, ms(50)),
            TriggerOutcome::Ignored {
                reason: IgnoreReason::AlreadyMoving
            }
        );
        let events = round.run_until_idle(ms(50));
        let arrivals = events
            .iter()
            .filter(|e| matches!(e, RoundEvent::Arrived { .. }))
            .count();
        assert_eq!(arrivals, 1);
        assert_eq!(
            round.trigger(0, ms(10_000)),
            TriggerOutcome::Ignored {
                reason: IgnoreReason::AlreadyArrived
            }
        );
        assert_eq!(
            round.trigger(9, ms(10_000)),
            TriggerOutcome::Ignored {
                reason: IgnoreReason::UnknownParticipant
            }
        );
    }

    #[test]
    fn run_all_only_on_fresh_round() {
        let mut round = pair_round(&[]);
        round.trigger(1, ms(0));
        assert!(round.run_all(ms(10)).is_ignored());

        let mut round = pair_round(&[]);
        round.run_all(ms(0));
        round.tick(ms(0));
        assert!(round.run_all(ms(100)).is_ignored());
    }

    #[test]
    fn staggered_start_skips_hand_started_participant() {
        let mut round = pair_round(&[]);
        round.run_all(ms(0));
        assert_eq!(round.trigger(1, ms(100)), TriggerOutcome::Started);
        let events = round.run_until_idle(ms(100));
        let starts: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                RoundEvent::Started { participant, .. } => Some(*participant),
                _ => None,
            })
            .collect();
        assert_eq!(starts, vec![0, 1]);
    }

    #[test]
    fn celebration_waits_for_last_arrival() {
        let mut round = Round::seeded(&roster_of(3), &LadderConfig::default_config(), 42).unwrap();
        round.run_all(ms(0));
        let events = round.run_until_idle(ms(0));

        let starts: Vec<(usize, Duration)> = events
            .iter()
            .filter_map(|e| match *e {
                RoundEvent::Started { participant, at } => Some((participant, at)),
                _ => None,
            })
            .collect();
        assert_eq!(starts, vec![(0, ms(0)), (1, ms(400)), (2, ms(800))]);

        let arrivals: Vec<Duration> = events
            .iter()
            .filter_map(|e| match *e {
                RoundEvent::Arrived { at, .. } => Some(at),
                _ => None,
            })
            .collect();
        assert_eq!(arrivals.len(), 3);
        let last_arrival = arrivals.iter().copied().max().unwrap();

        let celebration = events.iter().position(|e| matches!(e, RoundEvent::Celebration { .. }));
        assert_eq!(celebration, Some(events.len() - 1));
        assert_eq!(events.last().unwrap().at(), last_arrival + ms(800));
        assert!(round.is_celebrating());
        round.dismiss_celebration();
        assert!(!round.is_celebrating());
        assert!(round.has_celebrated());
    }

    #[test]
    fn celebration_not_visible_before_delay() {
        let mut round = pair_round(&[]);
        round.run_all(ms(0));
        let events = round.tick(ms(60_000));
        let last_arrival = events
            .iter()
            .rev()
            .find(|e| matches!(e, RoundEvent::Arrived { .. }))
            .map(RoundEvent::at)
            .unwrap();
        // Ticking well past the arrival also fires the celebration in the same call.
        assert!(round.is_celebrating());

        let mut round = pair_round(&[]);
        round.run_all(ms(0));
        round.tick(last_arrival);
        assert!(round.is_complete());
        assert!(!round.is_celebrating());
        assert_eq!(round.next_deadline(), Some(last_arrival + ms(800)));
        round.tick(last_arrival + ms(799));
        assert!(!round.is_celebrating());
        round.tick(last_arrival + ms(800));
        assert!(round.is_celebrating());
    }

    #[test]
    fn reset_drops_in_flight_work() {
        let mut round = pair_round(&[Rung::new(5, 0)]);
        round.run_all(ms(0));
        round.tick(ms(1_000));
        assert!(!round.visited(0).is_empty());
        round.reset();
        assert_eq!(round.epoch(), 1);
        assert_eq!(round.next_deadline(), None);
        assert!(round.tick(ms(60_000)).is_empty());
        assert!(round.visited(0).is_empty());
        assert_eq!(round.mapping(), &[None, None]);
        assert_eq!(round.states(), &[TraversalState::Idle; 2]);
    }

    #[test]
    fn reset_then_rerun_reproduces_mapping() {
        let mut round = Round::seeded(&roster_of(6), &LadderConfig::default_config(), 7).unwrap();
        round.run_all(ms(0));
        round.run_until_idle(ms(0));
        let first = round.mapping().to_vec();
        let fingerprint = round.layout().fingerprint();
        round.reset();
        round.run_all(ms(5_000));
        round.run_until_idle(ms(5_000));
        assert_eq!(round.mapping(), first.as_slice());
        assert_eq!(round.layout().fingerprint(), fingerprint);
    }

    #[test]
    fn positions_track_traversal() {
        let mut round = pair_round(&[Rung::new(5, 0)]);
        let idle = round.position(1).unwrap();
        assert!((idle.x - 0.75).abs() < 1e-9);
        assert!(idle.y.abs() < 1e-9);
        assert_eq!(round.position(5), None);

        round.trigger(0, ms(0));
        round.tick(ms(1_000));
        assert!(round.is_turning(0));
        assert!(!round.is_turning(1));
        assert_eq!(round.visited(0).last(), Some(&Point::new(0, 5)));
        let moving = round.position(0).unwrap();
        assert!((moving.y - 5.0 / 13.0).abs() < 1e-9);
        assert!((moving.x - 0.25).abs() < 1e-9);
    }

    #[test]
    fn results_and_snapshot() {
        let mut round = pair_round(&[Rung::new(5, 0)]);
        round.trigger(0, ms(0));
        round.run_until_idle(ms(0));
        let results = round.results();
        assert_eq!(results[0].outcome.as_ref().unwrap().text, "Sing a song");
        assert_eq!(results[1].outcome, None);

        let snapshot = round.snapshot();
        assert_eq!(snapshot.states, vec![TraversalState::Arrived, TraversalState::Idle]);
        assert_eq!(snapshot.rungs, vec![Rung::new(5, 0)]);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"arrived\""));
    }
}
