use ladder_game::{CatalogSource, LadderSession, ReplySource, SuggestionKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplyFileError {
    #[error("no reply file for {kind}")]
    Missing { kind: &'static str },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Canned generator replies stored next to each other as
/// `<dir>/nicknames.json` and `<dir>/missions.json`.
#[derive(Debug, Clone)]
pub struct ReplyDir {
    root: PathBuf,
}

impl ReplyDir {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn reply_path(&self, kind: SuggestionKind) -> PathBuf {
        self.root.join(format!("{}.json", kind.label()))
    }

    /// Raw reply text for `kind`.
    ///
    /// # Errors
    ///
    /// Returns `ReplyFileError` when the reply file is absent or unreadable.
    pub fn read(&self, kind: SuggestionKind) -> Result<String, ReplyFileError> {
        let path = self.reply_path(kind);
        if !path.exists() {
            return Err(ReplyFileError::Missing { kind: kind.label() });
        }
        std::fs::read_to_string(&path).map_err(|source| ReplyFileError::Read { path, source })
    }
}

/// Fill the session's names and missions from canned replies when a
/// directory is given, or from the built-in catalogs seeded by `seed`.
pub fn randomize_roster(session: &mut LadderSession, replies: Option<&Path>, seed: u64) {
    if let Some(dir) = replies {
        let dir = ReplyDir::new(dir);
        let source = ReplySource::new(|kind, _count| dir.read(kind));
        session.randomize_names(&source);
        session.randomize_outcomes(&source);
    } else {
        let source = CatalogSource::seeded(seed);
        session.randomize_names(&source);
        session.randomize_outcomes(&source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladder_game::Roster;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "ladder-replies-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn canned_replies_fill_roster() {
        let dir = temp_dir("ok");
        std::fs::write(dir.join("nicknames.json"), r#"["Ada", "Grace", "Linus"]"#).unwrap();
        let mut session = LadderSession::default();
        randomize_roster(&mut session, Some(&dir), 1);

        let names: Vec<&str> = session
            .roster()
            .participants()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
        // missions.json is absent, so every outcome falls back.
        assert!(
            session
                .roster()
                .outcomes()
                .iter()
                .all(|o| o.text == SuggestionKind::Missions.fallback())
        );
    }

    #[test]
    fn catalog_used_without_reply_dir() {
        let mut session = LadderSession::default();
        randomize_roster(&mut session, None, 3);
        assert_ne!(session.roster(), &Roster::default());
    }

    #[test]
    fn missing_reply_is_reported() {
        let dir = ReplyDir::new(temp_dir("missing"));
        assert!(matches!(
            dir.read(SuggestionKind::Nicknames),
            Err(ReplyFileError::Missing { kind: "nicknames" })
        ));
    }
}
