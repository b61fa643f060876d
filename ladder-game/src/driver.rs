//! Real-time driver built on tokio timers.
//!
//! The driver owns no round state. It sleeps until the round's next deadline,
//! ticks, forwards the events and repeats. A reset bumps the round epoch,
//! which the driver notices on wake-up and stops without ticking again.
use std::cell::RefCell;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

use crate::round::{Round, RoundEvent};

/// Maps tokio time onto round time, optionally sped up.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
    speed: f64,
}

impl Clock {
    #[must_use]
    pub fn start() -> Self {
        Self::with_speed(1.0)
    }

    /// A clock running `speed` times faster than wall time. Non-positive or
    /// non-finite speeds fall back to real time.
    #[must_use]
    pub fn with_speed(speed: f64) -> Self {
        let speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            1.0
        };
        Self {
            origin: Instant::now(),
            speed,
        }
    }

    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Current round time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.origin.elapsed().mul_f64(self.speed)
    }

    fn instant_for(&self, at: Duration) -> Instant {
        self.origin + at.div_f64(self.speed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Nothing left to fire.
    Idle,
    /// The round was reset while playing.
    Abandoned,
}

/// Drive `round` until it goes idle or is reset.
///
/// Start participants before calling: a round with nothing scheduled returns
/// [`PlayOutcome::Idle`] at once. The round is only borrowed between awaits,
/// so another task on the same thread may reset it; the driver stops on its
/// next wake-up. Work scheduled by other tasks mid-play is only picked up at
/// that wake-up, so it may fire late.
pub async fn play<F>(round: &RefCell<Round>, clock: &Clock, mut on_event: F) -> PlayOutcome
where
    F: FnMut(&RoundEvent),
{
    let epoch = round.borrow().epoch();
    let mut woke_for = Duration::ZERO;
    loop {
        let (events, next) = {
            let mut round = round.borrow_mut();
            if round.epoch() != epoch {
                log::debug!("driver stopping: round epoch moved past {epoch}");
                return PlayOutcome::Abandoned;
            }
            // Float scaling may land just short of the deadline we slept for.
            let events = round.tick(clock.now().max(woke_for));
            (events, round.next_deadline())
        };
        for event in &events {
            on_event(event);
        }
        let Some(deadline) = next else {
            return PlayOutcome::Idle;
        };
        sleep_until(clock.instant_for(deadline)).await;
        woke_for = deadline;
    }
}
