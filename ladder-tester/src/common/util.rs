use std::path::Path;

use anyhow::{Context, Result};
use ladder_game::LadderConfig;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Load a round config from a JSON file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<LadderConfig> {
    let Some(path) = path else {
        return Ok(LadderConfig::default_config());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    LadderConfig::from_json(&raw).with_context(|| format!("invalid config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn load_config_defaults_without_path() {
        let cfg = load_config(None).unwrap();
        assert_eq!(cfg, LadderConfig::default_config());
    }

    #[test]
    fn load_config_reads_overrides() {
        let path = std::env::temp_dir().join(format!(
            "ladder-config-{}.json",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        std::fs::write(&path, r#"{"timing": {"stagger_ms": 100}}"#).unwrap();
        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.timing.stagger_ms, 100);
        assert_eq!(cfg.timing.vertical_step_ms, 200);

        std::fs::write(&path, r#"{"layout": {"rows": 1}}"#).unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
