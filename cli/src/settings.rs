use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use blockbreaker_core::MatchConfig;

/// Loads match settings from a TOML file. Missing keys keep their defaults.
pub(crate) fn load(path: Option<&Path>) -> Result<MatchConfig> {
    let Some(path) = path else {
        return Ok(MatchConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read config file {}", path.display()))?;
    let config = parse(&text).with_context(|| format!("Invalid config file {}", path.display()))?;
    log::debug!("Loaded {:?} from {}", config, path.display());
    Ok(config)
}

fn parse(text: &str) -> Result<MatchConfig> {
    let config: MatchConfig = toml::from_str(text)?;
    Ok(config.clamped())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockbreaker_core::OutcomePolicy;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = parse(
            r#"
            turns = 10
            board_size = [6, 5]
            outcome_policy = "ByScore"

            [scoring]
            base_value = 50
            exponent = 1.5
            "#,
        )
        .unwrap();

        assert_eq!(config.turns, 10);
        assert_eq!(config.board_size, (6, 5));
        assert_eq!(config.outcome_policy, OutcomePolicy::ByScore);
        assert_eq!(config.scoring.base_value, 50);
        assert_eq!(config.pacing_delay_ms, MatchConfig::DEFAULT.pacing_delay_ms);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = parse("block_types = 99\nturns = 0").unwrap();

        assert_eq!(config.block_types, blockbreaker_core::MAX_BLOCK_TYPES);
        assert_eq!(config.turns, 1);
    }

    #[test]
    fn no_file_means_defaults() {
        assert_eq!(load(None).unwrap(), MatchConfig::default());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse("turns = \"many\"").is_err());
    }
}
