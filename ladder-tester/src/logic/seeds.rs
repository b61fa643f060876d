use anyhow::{Context, Result, bail};
use ladder_game::code::{CODE_COUNT, WORD_LIST};
use ladder_game::{decode_code, encode_code};
use std::collections::HashSet;

/// Seed metadata used for logic runs and playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, code: None }
    }

    #[must_use]
    pub const fn from_code(seed: u64, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
        }
    }

    /// The code the user typed, the seed's own code, or the bare seed when
    /// it has no code.
    #[must_use]
    pub fn display_code(&self) -> String {
        self.code
            .clone()
            .or_else(|| encode_code(self.seed))
            .unwrap_or_else(|| self.seed.to_string())
    }
}

/// Resolve CLI seed arguments into canonical seed metadata.
///
/// Supports literal integers, round codes, and the keyword `all`, which
/// expands to every addressable round code.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();
    let mut request_all = false;

    for token in tokens {
        if token.is_empty() {
            continue;
        }
        if token.eq_ignore_ascii_case("all") {
            request_all = true;
            continue;
        }
        if token.parse::<i64>().is_ok_and(i64::is_negative) {
            bail!("Negative seeds are not supported: {token}");
        }
        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }
        if let Some(seed) = decode_code(token) {
            pending.push(SeedInfo::from_code(seed, token.trim().to_uppercase()));
            continue;
        }
        bail!("Unrecognized seed token: {token}");
    }

    if request_all {
        pending.extend(generate_all_code_seeds()?);
    }

    let mut seen = HashSet::new();
    let mut deduped: Vec<SeedInfo> = Vec::new();
    for info in pending {
        if seen.insert(info.seed) {
            deduped.push(info);
        } else if info.code.is_some()
            && let Some(existing) = deduped.iter_mut().find(|e| e.seed == info.seed && e.code.is_none())
        {
            *existing = info;
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(1337));
    }
    Ok(deduped)
}

fn generate_all_code_seeds() -> Result<Vec<SeedInfo>> {
    let mut seeds = Vec::with_capacity(CODE_COUNT);
    for word in WORD_LIST {
        for suffix in 0..100 {
            let code = format!("LD-{word}{suffix:02}");
            let seed = decode_code(&code).with_context(|| format!("failed to parse round code: {code}"))?;
            seeds.push(SeedInfo::from_code(seed, code));
        }
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_numeric_and_codes() {
        let raw = vec!["42".to_string(), "7".to_string(), "ld-rung42".to_string()];
        let seeds = resolve_seed_inputs(&raw).unwrap();
        assert!(seeds.iter().any(|s| s.seed == 42 && s.code.is_none()));
        assert!(seeds.iter().any(|s| s.seed == 7 && s.code.is_none()));
        assert!(seeds.iter().any(|s| s.code.as_deref() == Some("LD-RUNG42")));
    }

    #[test]
    fn rejects_negative_seeds() {
        let err = resolve_seed_inputs(&["-5".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Negative"));
        assert!(resolve_seed_inputs(&["42".to_string(), "-1".to_string()]).is_err());
    }

    #[test]
    fn display_code_never_names_another_seed() {
        assert_eq!(SeedInfo::from_numeric(1337).display_code(), "1337");
        let seed = decode_code("LD-RUNG02").unwrap();
        assert_eq!(SeedInfo::from_numeric(seed).display_code(), "LD-RUNG02");
    }

    #[test]
    fn rejects_garbage_and_defaults_when_empty() {
        assert!(resolve_seed_inputs(&["LD-NOPE".to_string()]).is_err());
        let seeds = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(1337)]);
    }

    #[test]
    fn codes_replace_duplicate_numeric_seeds() {
        let seed = decode_code("LD-MAPLE07").unwrap();
        let raw = vec![seed.to_string(), "LD-MAPLE07".to_string()];
        let seeds = resolve_seed_inputs(&raw).unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].display_code(), "LD-MAPLE07");
    }

    #[test]
    fn expands_all_codes() {
        let seeds = resolve_seed_inputs(&["all".to_string()]).unwrap();
        assert_eq!(seeds.len(), CODE_COUNT);
        assert!(seeds.iter().all(|s| s.code.is_some()));
    }
}
