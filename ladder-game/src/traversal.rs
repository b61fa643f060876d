//! Per-participant traversal scheduler.
//!
//! A [`Traversal`] is an explicit state object `{path, index, next_deadline}`
//! that an external clock advances. It never owns a timer: the caller asks
//! for [`Traversal::next_deadline`] and calls [`Traversal::advance`] once that
//! time has been reached. Dropping the object abandons the animation with no
//! further effect.
//!
//! Timing per continuation:
//!
//! | current index          | wait before next transition |
//! |------------------------|-----------------------------|
//! | before a vertical step | `vertical_step`             |
//! | before a rung crossing | `horizontal_step`           |
//! | on the settle point    | `settle`, then arrival      |
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::TimingConfig;
use crate::path::{Path, Point, StepKind};

/// Lifecycle of a single traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalPhase {
    /// Walking the path; more index steps remain.
    Moving,
    /// On the settle point, waiting to commit arrival.
    Settling,
    /// Arrival has been reported.
    Done,
}

/// A transition produced by [`Traversal::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    Advanced {
        index: usize,
        point: Point,
        kind: StepKind,
        at: Duration,
    },
    Arrived {
        final_col: usize,
        at: Duration,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StepDelays {
    vertical: Duration,
    horizontal: Duration,
    settle: Duration,
}

impl From<&TimingConfig> for StepDelays {
    fn from(timing: &TimingConfig) -> Self {
        Self {
            vertical: timing.vertical_step(),
            horizontal: timing.horizontal_step(),
            settle: timing.settle(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal {
    participant: usize,
    path: Path,
    index: usize,
    started_at: Duration,
    next_deadline: Duration,
    phase: TraversalPhase,
    delays: StepDelays,
}

impl Traversal {
    /// Begin walking `path` at time `now`; index 0 counts as already visited.
    #[must_use]
    pub fn start(participant: usize, path: Path, now: Duration, timing: &TimingConfig) -> Self {
        let mut traversal = Self {
            participant,
            path,
            index: 0,
            started_at: now,
            next_deadline: now,
            phase: TraversalPhase::Moving,
            delays: StepDelays::from(timing),
        };
        traversal.schedule_from(now);
        traversal
    }

    #[must_use]
    pub const fn participant(&self) -> usize {
        self.participant
    }

    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn phase(&self) -> TraversalPhase {
        self.phase
    }

    #[must_use]
    pub const fn started_at(&self) -> Duration {
        self.started_at
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self.phase, TraversalPhase::Done)
    }

    /// When the pending continuation is due; `None` once arrival has fired.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Duration> {
        match self.phase {
            TraversalPhase::Done => None,
            TraversalPhase::Moving | TraversalPhase::Settling => Some(self.next_deadline),
        }
    }

    #[must_use]
    pub fn current_point(&self) -> Option<Point> {
        self.path.get(self.index)
    }

    /// Points consumed so far, including the current one.
    #[must_use]
    pub fn visited(&self) -> &[Point] {
        let end = (self.index + 1).min(self.path.len());
        &self.path.points()[..end]
    }

    /// Whether the upcoming step crosses a rung.
    #[must_use]
    pub fn is_turning(&self) -> bool {
        self.phase == TraversalPhase::Moving
            && self.path.step_kind(self.index) == Some(StepKind::Horizontal)
    }

    /// Fire the pending continuation.
    ///
    /// The transition is stamped with its own deadline rather than the
    /// caller's clock, so a late tick never stretches the following steps.
    pub fn advance(&mut self) -> Option<Step> {
        let at = self.next_deadline;
        match self.phase {
            TraversalPhase::Done => None,
            TraversalPhase::Settling => {
                self.phase = TraversalPhase::Done;
                Some(Step::Arrived {
                    final_col: self.path.final_col(),
                    at,
                })
            }
            TraversalPhase::Moving => {
                let kind = self.path.step_kind(self.index)?;
                self.index += 1;
                let point = self.path.get(self.index)?;
                self.schedule_from(at);
                Some(Step::Advanced {
                    index: self.index,
                    point,
                    kind,
                    at,
                })
            }
        }
    }

    /// Fire every continuation due at or before `now`.
    pub fn advance_until(&mut self, now: Duration) -> Vec<Step> {
        let mut steps = Vec::new();
        while self.next_deadline().is_some_and(|deadline| deadline <= now) {
            match self.advance() {
                Some(step) => steps.push(step),
                None => break,
            }
        }
        steps
    }

    fn schedule_from(&mut self, at: Duration) {
        let delay = match self.path.step_kind(self.index) {
            Some(StepKind::Horizontal) => self.delays.horizontal,
            Some(StepKind::Vertical) => self.delays.vertical,
            None => {
                self.phase = TraversalPhase::Settling;
                self.delays.settle
            }
        };
        self.next_deadline = at + delay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Layout, Rung};
    use crate::path::resolve;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn single_rung_path() -> Path {
        let layout = Layout::from_rungs(2, 12, [Rung::new(5, 0)]).unwrap();
        resolve(0, &layout).unwrap()
    }

    #[test]
    fn first_deadline_depends_on_first_step() {
        let traversal = Traversal::start(0, single_rung_path(), ms(1_000), &TimingConfig::default());
        assert_eq!(traversal.next_deadline(), Some(ms(1_200)));
        assert_eq!(traversal.visited().len(), 1);
        assert!(!traversal.is_turning());
    }

    #[test]
    fn horizontal_steps_wait_longer() {
        let mut traversal = Traversal::start(0, single_rung_path(), ms(0), &TimingConfig::default());
        // Five vertical steps reach (0,5), where the jog begins.
        let steps = traversal.advance_until(ms(1_000));
        assert_eq!(steps.len(), 5);
        assert_eq!(traversal.current_point(), Some(Point::new(0, 5)));
        assert!(traversal.is_turning());
        assert_eq!(traversal.next_deadline(), Some(ms(1_300)));

        let jog = traversal.advance().unwrap();
        assert_eq!(
            jog,
            Step::Advanced {
                index: 6,
                point: Point::new(1, 5),
                kind: StepKind::Horizontal,
                at: ms(1_300),
            }
        );
        assert_eq!(traversal.next_deadline(), Some(ms(1_500)));
    }

    #[test]
    fn total_duration_and_single_arrival() {
        let path = single_rung_path();
        let len = path.len();
        let mut traversal = Traversal::start(3, path, ms(0), &TimingConfig::default());
        let steps = traversal.advance_until(ms(60_000));
        // 13 vertical steps, 1 jog, then the settle delay.
        let expected_arrival = ms(13 * 200 + 300 + 300);
        assert_eq!(steps.len(), len);
        assert_eq!(
            steps.last(),
            Some(&Step::Arrived {
                final_col: 1,
                at: expected_arrival
            })
        );
        assert!(traversal.is_done());
        assert_eq!(traversal.next_deadline(), None);
        assert_eq!(traversal.advance(), None);
        assert_eq!(traversal.visited().len(), len);
    }

    #[test]
    fn arrival_waits_for_settle() {
        let layout = Layout::empty(2, 12).unwrap();
        let path = resolve(0, &layout).unwrap();
        let mut traversal = Traversal::start(0, path, ms(0), &TimingConfig::default());
        let last_step_at = ms(13 * 200);
        let steps = traversal.advance_until(last_step_at);
        assert_eq!(steps.len(), 13);
        assert_eq!(traversal.phase(), TraversalPhase::Settling);
        assert!(traversal.advance_until(last_step_at + ms(299)).is_empty());
        let arrival = traversal.advance_until(last_step_at + ms(300));
        assert!(matches!(arrival.as_slice(), [Step::Arrived { final_col: 0, .. }]));
    }
}
