pub mod playback;
pub mod reports;
pub mod round_tester;
pub mod scenarios;
pub mod seeds;
pub mod suggestions;
pub mod tester;

pub use playback::play_round;
pub use round_tester::{RoundTester, roster_for};
pub use scenarios::{get_scenario, list_scenarios};
pub use seeds::{SeedInfo, resolve_seed_inputs};
pub use suggestions::randomize_roster;
pub use tester::*;
