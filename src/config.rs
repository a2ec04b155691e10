//! Process configuration from the environment plus an optional awards file.
//!
//! Everything is validated up front; a process with a bad configuration
//! never reaches the fold loop.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::adapters::EmulationSettings;
use crate::errors::ConfigurationError;
use crate::model::{AwardsSettings, ContestInfo, PenaltyRoundingMode};
use crate::scoreboard::validate_awards;

#[derive(Debug, Clone)]
pub struct Config {
    pub emulation: EmulationSettings,
    /// Overrides the awards settings of incoming contest info when set.
    pub awards: Option<AwardsSettings>,
    /// Overrides the penalty rounding mode of incoming contest info.
    pub penalty_rounding_mode: Option<PenaltyRoundingMode>,
    /// Feeds of earlier contest days, oldest first.
    pub previous_day_feeds: Vec<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let speed = match std::env::var("EMULATION_SPEED") {
            Ok(raw) => raw.parse::<f64>()?,
            Err(_) => 1.0,
        };
        let start_time = match std::env::var("EMULATION_START_TIME") {
            Ok(raw) => raw.parse::<DateTime<Utc>>()?,
            Err(_) => Utc::now(),
        };
        let mut emulation = EmulationSettings::new(speed, start_time);
        emulation.use_random_in_progress = std::env::var("EMULATION_RANDOM_IN_PROGRESS")
            .map(|raw| raw == "1" || raw.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        emulation.rng_seed = match std::env::var("EMULATION_RNG_SEED") {
            Ok(raw) => Some(raw.parse::<u64>()?),
            Err(_) => None,
        };
        emulation.validate()?;

        let awards = match std::env::var("AWARDS_FILE") {
            Ok(path) => Some(load_awards(Path::new(&path))?),
            Err(_) => None,
        };
        let penalty_rounding_mode = match std::env::var("PENALTY_ROUNDING_MODE") {
            Ok(raw) => Some(parse_penalty_rounding_mode(&raw)?),
            Err(_) => None,
        };
        let previous_day_feeds = std::env::var("PREVIOUS_DAY_FEEDS")
            .map(|raw| raw.split(':').map(PathBuf::from).collect())
            .unwrap_or_default();

        Ok(Self {
            emulation,
            awards,
            penalty_rounding_mode,
            previous_day_feeds,
        })
    }
}

/// Load and validate an awards definition file (JSON `AwardsSettings`).
pub fn load_awards(path: &Path) -> Result<AwardsSettings, ConfigurationError> {
    let unreadable = |source: anyhow::Error| ConfigurationError::UnreadableAwards {
        path: path.display().to_string(),
        source,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| unreadable(e.into()))?;
    let settings: AwardsSettings =
        serde_json::from_str(&raw).map_err(|e| unreadable(e.into()))?;
    validate_awards(&settings)?;
    Ok(settings)
}

pub fn parse_penalty_rounding_mode(raw: &str) -> anyhow::Result<PenaltyRoundingMode> {
    // The wire spelling is the serde one (snake_case).
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| anyhow::anyhow!("unknown penalty rounding mode {raw:?}"))
}

/// Sanity checks on incoming contest configuration that the model types
/// cannot express.
pub fn validate_contest(info: &ContestInfo) -> Result<(), ConfigurationError> {
    if let Some(freeze) = info.freeze_time {
        if freeze > info.contest_length {
            return Err(ConfigurationError::FreezeAfterEnd {
                freeze_ms: freeze.as_millis() as u64,
                length_ms: info.contest_length.as_millis() as u64,
            });
        }
    }
    validate_awards(&info.awards)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MedalSettings, MedalTiebreakMode, ProblemInfo, TeamInfo};
    use crate::test_support::contest_info;
    use std::time::Duration;

    #[test]
    fn test_awards_file_round_trip_and_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("awards.json");
        let settings = AwardsSettings {
            champion_title: Some("World Champion".to_string()),
            medals: vec![MedalSettings {
                id: "gold".to_string(),
                citation: "Gold Medal".to_string(),
                count: 4,
                min_score: None,
                tiebreak_mode: MedalTiebreakMode::All,
            }],
            ..Default::default()
        };
        std::fs::write(&path, serde_json::to_string(&settings).unwrap()).unwrap();
        let loaded = load_awards(&path).unwrap();
        assert_eq!(loaded, settings);

        std::fs::write(&path, "{").unwrap();
        assert!(matches!(
            load_awards(&path),
            Err(ConfigurationError::UnreadableAwards { .. })
        ));
    }

    #[test]
    fn test_penalty_mode_parsing() {
        assert_eq!(
            parse_penalty_rounding_mode("sum_in_seconds").unwrap(),
            PenaltyRoundingMode::SumInSeconds
        );
        assert!(parse_penalty_rounding_mode("whatever").is_err());
    }

    #[test]
    fn test_freeze_beyond_length_is_rejected() {
        let mut info = contest_info(
            vec![ProblemInfo::new("A", "A", 0)],
            vec![TeamInfo::new("t1", "one")],
        );
        info.freeze_time = Some(info.contest_length + Duration::from_secs(1));
        assert!(matches!(
            validate_contest(&info),
            Err(ConfigurationError::FreezeAfterEnd { .. })
        ));
        info.freeze_time = Some(info.contest_length);
        assert!(validate_contest(&info).is_ok());
    }
}
