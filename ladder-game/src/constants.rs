//! Centralized tuning constants for the ladder game.
//!
//! These values define the board geometry and animation pacing. Keeping them
//! together ensures that gameplay can only be adjusted via code changes
//! reviewed in version control; runtime overrides go through
//! [`crate::config::LadderConfig`], which defaults to these values.

// Board geometry -----------------------------------------------------------
/// Number of internal rows on the ladder (`R`).
pub const ROW_COUNT: u16 = 12;
/// Smallest board the config layer accepts; rows `0` and `R-1` never carry rungs.
pub const MIN_ROW_COUNT: u16 = 3;
/// Largest board accepted; keeps `R + 1` and the settle row well inside `u16`.
pub const MAX_ROW_COUNT: u16 = 64;
/// Probability that a rung is placed at an eligible (row, column-pair) slot.
pub const RUNG_PROBABILITY: f64 = 0.4;

// Roster bounds ------------------------------------------------------------
pub const MIN_PARTICIPANTS: usize = 2;
pub const MAX_PARTICIPANTS: usize = 8;

// Animation pacing (milliseconds) ------------------------------------------
pub const VERTICAL_STEP_MS: u64 = 200;
pub const HORIZONTAL_STEP_MS: u64 = 300;
pub const SETTLE_MS: u64 = 300;
pub const STAGGER_MS: u64 = 400;
pub const CELEBRATION_MS: u64 = 800;

// RNG stream domains -------------------------------------------------------
pub(crate) const LAYOUT_STREAM: &[u8] = b"ladder.layout";
pub(crate) const SUGGEST_STREAM: &[u8] = b"ladder.suggest";
