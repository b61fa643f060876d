//! Setup-to-round lifecycle.
//!
//! A [`LadderSession`] owns the roster being edited on the setup screen and,
//! once started, the active [`Round`]. Leaving the round drops its rung set.
use rand::Rng;

use crate::config::LadderConfig;
use crate::error::LadderError;
use crate::round::Round;
use crate::roster::Roster;
use crate::suggest::{SuggestionKind, SuggestionSource, suggestions_or_fallback};

/// Setup screen plus the optional active round.
///
/// While a round is active the roster is frozen; [`LadderSession::back_to_setup`]
/// discards the round with its rung set and unlocks editing again.
#[derive(Debug, Clone)]
pub struct LadderSession {
    roster: Roster,
    config: LadderConfig,
    round: Option<Round>,
}

impl Default for LadderSession {
    fn default() -> Self {
        Self::new(Roster::default(), LadderConfig::default_config())
    }
}

impl LadderSession {
    #[must_use]
    pub const fn new(roster: Roster, config: LadderConfig) -> Self {
        Self {
            roster,
            config,
            round: None,
        }
    }

    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Editable roster; `None` while a round is in play.
    pub const fn roster_mut(&mut self) -> Option<&mut Roster> {
        if self.round.is_some() {
            None
        } else {
            Some(&mut self.roster)
        }
    }

    #[must_use]
    pub const fn config(&self) -> &LadderConfig {
        &self.config
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.round.is_some()
    }

    /// Generate a layout from `rng` and enter a new round, replacing any
    /// current one.
    ///
    /// # Errors
    ///
    /// Returns `LadderError` when the roster is invalid.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&mut Round, LadderError> {
        let round = Round::generate(&self.roster, &self.config, rng)?;
        Ok(self.round.insert(round))
    }

    /// Enter a round whose layout replays for the same seed.
    ///
    /// # Errors
    ///
    /// Returns `LadderError` when the roster is invalid.
    pub fn start_seeded(&mut self, seed: u64) -> Result<&mut Round, LadderError> {
        let round = Round::seeded(&self.roster, &self.config, seed)?;
        Ok(self.round.insert(round))
    }

    #[must_use]
    pub const fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub const fn round_mut(&mut self) -> Option<&mut Round> {
        self.round.as_mut()
    }

    /// Leave the round. Its rung set and all traversal state are dropped.
    pub fn back_to_setup(&mut self) {
        if self.round.take().is_some() {
            log::info!("round discarded; back to setup");
        }
    }

    /// Replace participant names with suggestions. Ignored during a round.
    pub fn randomize_names<S: SuggestionSource + ?Sized>(&mut self, source: &S) -> bool {
        self.apply_suggestions(source, SuggestionKind::Nicknames)
    }

    /// Replace outcome texts with suggestions. Ignored during a round.
    pub fn randomize_outcomes<S: SuggestionSource + ?Sized>(&mut self, source: &S) -> bool {
        self.apply_suggestions(source, SuggestionKind::Missions)
    }

    fn apply_suggestions<S: SuggestionSource + ?Sized>(
        &mut self,
        source: &S,
        kind: SuggestionKind,
    ) -> bool {
        let count = self.roster.len();
        let Some(roster) = self.roster_mut() else {
            return false;
        };
        let picks = suggestions_or_fallback(source, kind, count);
        match kind {
            SuggestionKind::Nicknames => roster.apply_names(&picks),
            SuggestionKind::Missions => roster.apply_outcome_texts(&picks),
        }
        true
    }
}
