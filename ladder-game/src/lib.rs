//! Ladder Game Engine
//!
//! Platform-agnostic core logic for the ladder game: N participants, N
//! outcomes and a randomized ladder of rungs between them. This crate builds
//! the rung layout, traces each participant's path, schedules the step-by-step
//! descent against an external clock and keeps the round state. Rendering and
//! timers belong to the caller; the optional `async` feature adds a tokio
//! driver in [`driver`].

pub mod code;
pub mod config;
pub mod constants;
pub mod coords;
#[cfg(feature = "async")]
pub mod driver;
pub mod error;
pub mod layout;
pub mod numbers;
pub mod path;
pub mod rng;
pub mod roster;
pub mod round;
pub mod session;
pub mod suggest;
pub mod traversal;

// Re-export commonly used types
pub use code::{code_from_entropy, decode_code, encode_code, parse_seed};
pub use config::{ConfigError, LadderConfig, LayoutConfig, TimingConfig};
pub use coords::{Position, col_to_x, point_position, row_to_y, rung_segment};
pub use error::LadderError;
pub use layout::{Layout, Rung};
pub use path::{Path, Point, StepKind, resolve, resolve_all};
pub use roster::{Outcome, Participant, Roster};
pub use round::{
    IgnoreReason, Round, RoundEvent, RoundResult, RoundSnapshot, TraversalState, TriggerOutcome,
};
pub use session::LadderSession;
pub use suggest::{
    CatalogSource, ReplySource, SuggestionError, SuggestionKind, SuggestionSource, parse_reply,
    suggestions_or_fallback,
};
pub use traversal::{Step, Traversal, TraversalPhase};
