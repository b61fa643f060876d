//! Participants, outcomes and the setup-time roster that pairs them.
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_PARTICIPANTS, MIN_PARTICIPANTS};
use crate::error::LadderError;

/// Glyph cycle handed out to participants in join order.
pub const GLYPHS: [&str; 10] = ["🐶", "🐱", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🦁", "🐯"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub glyph: String,
}

impl Participant {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, glyph: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            glyph: glyph.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub id: String,
    pub text: String,
}

impl Outcome {
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Ordered participants and outcomes being edited before a round starts.
///
/// Participant `i` starts in column `i`; outcome `i` waits under column `i`.
/// Add and remove keep both lists the same length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    participants: Vec<Participant>,
    outcomes: Vec<Outcome>,
    next_id: u64,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            participants: vec![
                Participant::new("1", "Friend 1", GLYPHS[0]),
                Participant::new("2", "Friend 2", GLYPHS[1]),
            ],
            outcomes: vec![
                Outcome::new("1", "Snack time"),
                Outcome::new("2", "Sing a song"),
            ],
            next_id: 3,
        }
    }
}

impl Roster {
    /// Build a roster from explicit lists.
    ///
    /// # Errors
    ///
    /// Returns `LadderError` when the participant count is outside
    /// `[2, 8]` or the lists differ in length.
    pub fn from_parts(
        participants: Vec<Participant>,
        outcomes: Vec<Outcome>,
    ) -> Result<Self, LadderError> {
        let roster = Self {
            next_id: u64::try_from(participants.len()).unwrap_or(u64::MAX).saturating_add(1),
            participants,
            outcomes,
        };
        roster.validate()?;
        Ok(roster)
    }

    /// Convenience constructor from display strings; ids and glyphs are assigned in order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_parts`].
    pub fn from_names<N, T>(names: &[N], outcomes: &[T]) -> Result<Self, LadderError>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let participants = names
            .iter()
            .enumerate()
            .map(|(i, name)| Participant::new((i + 1).to_string(), name.as_ref(), glyph_for(i)))
            .collect();
        let outcomes = outcomes
            .iter()
            .enumerate()
            .map(|(i, text)| Outcome::new((i + 1).to_string(), text.as_ref()))
            .collect();
        Self::from_parts(participants, outcomes)
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
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Check the bounds a round relies on.
    ///
    /// # Errors
    ///
    /// Returns `LadderError::ParticipantCount` or `LadderError::LengthMismatch`.
    pub fn validate(&self) -> Result<(), LadderError> {
        let count = self.participants.len();
        if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&count) {
            return Err(LadderError::ParticipantCount {
                count,
                min: MIN_PARTICIPANTS,
                max: MAX_PARTICIPANTS,
            });
        }
        if self.outcomes.len() != count {
            return Err(LadderError::LengthMismatch {
                participants: count,
                outcomes: self.outcomes.len(),
            });
        }
        Ok(())
    }

    /// Append a participant and a paired outcome. Returns `false` at capacity.
    pub fn add_participant(&mut self) -> bool {
        if self.participants.len() >= MAX_PARTICIPANTS {
            return false;
        }
        let id = self.next_id.to_string();
        self.next_id += 1;
        let seat = self.participants.len();
        self.participants.push(Participant::new(
            id.clone(),
            format!("Friend {}", seat + 1),
            glyph_for(seat),
        ));
        let mission = self.outcomes.len() + 1;
        self.outcomes
            .push(Outcome::new(id, format!("Mission {mission}")));
        true
    }

    /// Drop the last participant and the last outcome. Returns `false` at the minimum.
    pub fn remove_participant(&mut self) -> bool {
        if self.participants.len() <= MIN_PARTICIPANTS {
            return false;
        }
        self.participants.pop();
        self.outcomes.pop();
        true
    }

    pub fn rename_participant(&mut self, id: &str, name: impl Into<String>) -> bool {
        match self.participants.iter_mut().find(|p| p.id == id) {
            Some(participant) => {
                participant.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn set_outcome_text(&mut self, id: &str, text: impl Into<String>) -> bool {
        match self.outcomes.iter_mut().find(|o| o.id == id) {
            Some(outcome) => {
                outcome.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Replace names by position; participants past the end of `names` keep theirs.
    pub fn apply_names<S: AsRef<str>>(&mut self, names: &[S]) {
        for (participant, name) in self.participants.iter_mut().zip(names) {
            participant.name = name.as_ref().to_string();
        }
    }

    /// Replace outcome texts by position; outcomes past the end keep theirs.
    pub fn apply_outcome_texts<S: AsRef<str>>(&mut self, texts: &[S]) {
        for (outcome, text) in self.outcomes.iter_mut().zip(texts) {
            outcome.text = text.as_ref().to_string();
        }
    }
}

fn glyph_for(seat: usize) -> &'static str {
    GLYPHS[seat % GLYPHS.len()]
}
