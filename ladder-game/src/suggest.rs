//! Name and mission suggestions.
//!
//! Suggestion sources are external collaborators that may fail. The rest of
//! the crate only ever sees [`suggestions_or_fallback`], which always yields
//! exactly the requested number of strings.
use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::convert::Infallible;
use thiserror::Error;

use crate::rng::suggestion_rng;

pub const NICKNAMES: [&str; 12] = [
    "Giggle Bunny",
    "Dancing Teddy",
    "Rainbow Candy",
    "Brave Squirrel",
    "Cloud Kitty",
    "Twinkle Star",
    "Sweet Strawberry",
    "Singing Bluebird",
    "Fluffy Cloud",
    "Bold Lion",
    "Tiny Hamster",
    "Mystic Unicorn",
];

pub const MISSIONS: [&str; 12] = [
    "Write your name with your hips",
    "Make a cute face",
    "Compliment your neighbor",
    "Five elephant spins",
    "Sing a line of a favorite song",
    "Three bunny hops",
    "Blow a heart",
    "Wink three times",
    "Do an animal sound",
    "Strike a proud pose",
    "High-five the friend in front",
    "Make a funny face",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Nicknames,
    Missions,
}

impl SuggestionKind {
    /// String substituted for every slot when a source fails.
    #[must_use]
    pub const fn fallback(self) -> &'static str {
        match self {
            Self::Nicknames => "Cutie friend",
            Self::Missions => "Dance happily! 💃",
        }
    }

    #[must_use]
    pub const fn catalog(self) -> &'static [&'static str] {
        match self {
            Self::Nicknames => &NICKNAMES,
            Self::Missions => &MISSIONS,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nicknames => "nicknames",
            Self::Missions => "missions",
        }
    }
}

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("suggestion reply is not a JSON list of strings: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("suggestion source unavailable: {0}")]
    Unavailable(String),
}

/// Anything that can propose short display strings.
pub trait SuggestionSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Propose up to `count` strings of the given kind.
    ///
    /// # Errors
    ///
    /// Implementation specific; callers go through [`suggestions_or_fallback`].
    fn suggest(&self, kind: SuggestionKind, count: usize) -> Result<Vec<String>, Self::Error>;
}

/// Ask `source` for `count` strings, absorbing every failure.
///
/// A failed call yields `count` copies of the kind's fallback. A short reply
/// is padded with the fallback and a long one truncated.
pub fn suggestions_or_fallback<S>(source: &S, kind: SuggestionKind, count: usize) -> Vec<String>
where
    S: SuggestionSource + ?Sized,
{
    match source.suggest(kind, count) {
        Ok(mut list) => {
            if list.len() < count {
                log::debug!(
                    "padding {} {} suggestions with fallback",
                    count - list.len(),
                    kind.label()
                );
            }
            list.truncate(count);
            list.resize(count, kind.fallback().to_string());
            list
        }
        Err(err) => {
            log::warn!("{} suggestions failed, using fallback: {err}", kind.label());
            vec![kind.fallback().to_string(); count]
        }
    }
}

/// Parse a generator reply: a JSON array of strings. Blank text and `null`
/// both mean "no suggestions".
///
/// # Errors
///
/// Returns `SuggestionError::Malformed` when the text is not such a list.
pub fn parse_reply(text: &str) -> Result<Vec<String>, SuggestionError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parsed: Option<Vec<String>> = serde_json::from_str(text)?;
    Ok(parsed.unwrap_or_default())
}

/// Random picks from the built-in catalogs.
#[derive(Debug)]
pub struct CatalogSource<R> {
    rng: RefCell<R>,
}

impl<R: Rng> CatalogSource<R> {
    pub const fn new(rng: R) -> Self {
        Self {
            rng: RefCell::new(rng),
        }
    }
}

impl CatalogSource<ChaCha20Rng> {
    /// Catalog picks that replay for the same seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(suggestion_rng(seed))
    }
}

impl<R: Rng> SuggestionSource for CatalogSource<R> {
    type Error = Infallible;

    /// Distinct entries in random order; fewer than `count` when the catalog runs out.
    fn suggest(&self, kind: SuggestionKind, count: usize) -> Result<Vec<String>, Self::Error> {
        let mut rng = self.rng.borrow_mut();
        Ok(kind
            .catalog()
            .choose_multiple(&mut *rng, count)
            .map(|entry| (*entry).to_string())
            .collect())
    }
}

/// Adapter over a transport that returns raw generator text.
///
/// The transport's own protocol stays its concern; this type only parses
/// the reply.
pub struct ReplySource<F> {
    transport: F,
}

impl<F, E> ReplySource<F>
where
    F: Fn(SuggestionKind, usize) -> Result<String, E>,
    E: std::fmt::Display,
{
    pub const fn new(transport: F) -> Self {
        Self { transport }
    }
}

impl<F, E> SuggestionSource for ReplySource<F>
where
    F: Fn(SuggestionKind, usize) -> Result<String, E>,
    E: std::fmt::Display,
{
    type Error = SuggestionError;

    fn suggest(&self, kind: SuggestionKind, count: usize) -> Result<Vec<String>, Self::Error> {
        let text =
            (self.transport)(kind, count).map_err(|e| SuggestionError::Unavailable(e.to_string()))?;
        parse_reply(&text)
    }
}
