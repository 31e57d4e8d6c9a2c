//! Game configuration.
//!
//! Every field has a default, so a JSON overlay only needs to name what it
//! changes: `{"starting_lives": 5, "hard": {"timer_seconds": 15}}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::ConfigError;
use crate::question::Kind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == s.trim())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Classic,
    Timed,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Classic => "classic",
            Mode::Timed => "timed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "classic" => Some(Mode::Classic),
            "timed" => Some(Mode::Timed),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed reward per correctly solved question. Match pays per pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTable {
    pub match_pair: u32,
    pub sentence: u32,
    pub truth_table: u32,
    pub fault: u32,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            match_pair: 15,
            sentence: 25,
            truth_table: 40,
            fault: 30,
        }
    }
}

impl RewardTable {
    /// Reward for one solved question of `kind` with `units` pairs (only
    /// meaningful for match).
    pub fn reward(&self, kind: Kind, units: u32) -> u32 {
        match kind {
            Kind::Match => self.match_pair.saturating_mul(units),
            Kind::Sentence => self.sentence,
            Kind::TruthTable => self.truth_table,
            Kind::Fault => self.fault,
        }
    }
}

/// How many questions of each kind a run asks for before padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindMix {
    pub matching: usize,
    pub sentence: usize,
    pub truth_table: usize,
    pub fault: usize,
}

impl Default for KindMix {
    fn default() -> Self {
        Self {
            matching: 1,
            sentence: 2,
            truth_table: 1,
            fault: 1,
        }
    }
}

impl KindMix {
    pub fn quota(&self, kind: Kind) -> usize {
        match kind {
            Kind::Match => self.matching,
            Kind::Sentence => self.sentence,
            Kind::TruthTable => self.truth_table,
            Kind::Fault => self.fault,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    pub question_count: usize,
    pub timer_seconds: u32,
    pub mix: KindMix,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self::easy()
    }
}

impl TierConfig {
    pub fn easy() -> Self {
        Self {
            question_count: 5,
            timer_seconds: 30,
            mix: KindMix::default(),
        }
    }

    pub fn medium() -> Self {
        Self {
            question_count: 7,
            timer_seconds: 25,
            mix: KindMix {
                matching: 2,
                sentence: 2,
                truth_table: 2,
                fault: 1,
            },
        }
    }

    pub fn hard() -> Self {
        Self {
            question_count: 9,
            timer_seconds: 20,
            mix: KindMix {
                matching: 2,
                sentence: 3,
                truth_table: 2,
                fault: 2,
            },
        }
    }
}

/// Storage keys used by the browser shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub leaderboard: String,
    pub player_name: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            leaderboard: "logic-runner.leaderboard".to_string(),
            player_name: "logic-runner.player".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_lives: u32,
    pub rewards: RewardTable,
    pub easy: TierConfig,
    pub medium: TierConfig,
    pub hard: TierConfig,
    /// Pause between a resolved question and the next one.
    pub advance_delay_ms: u32,
    pub leaderboard_capacity: usize,
    pub storage: StorageKeys,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            rewards: RewardTable::default(),
            easy: TierConfig::easy(),
            medium: TierConfig::medium(),
            hard: TierConfig::hard(),
            advance_delay_ms: 650,
            leaderboard_capacity: 20,
            storage: StorageKeys::default(),
        }
    }
}

impl GameConfig {
    /// Parse a JSON overlay on top of the defaults and validate it.
    ///
    /// The overlay is merged key by key, so a partial tier keeps that
    /// tier's own defaults rather than the easy ones.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let overlay: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(GameConfig::default())?;
        merge_json(&mut merged, overlay);
        let cfg: GameConfig = serde_json::from_value(merged)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn tier(&self, difficulty: Difficulty) -> &TierConfig {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_lives == 0 {
            return Err(ConfigError::InvalidValue {
                field: "starting_lives",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.leaderboard_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "leaderboard_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        for d in Difficulty::ALL {
            let tier = self.tier(d);
            if tier.question_count == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "question_count",
                    reason: format!("{d} tier asks for zero questions"),
                });
            }
            if tier.timer_seconds == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "timer_seconds",
                    reason: format!("{d} tier has a zero-second timer"),
                });
            }
        }
        Ok(())
    }
}

fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn overlay_keeps_unnamed_defaults() {
        let cfg = GameConfig::from_json(r#"{"starting_lives": 5, "hard": {"timer_seconds": 15}}"#)
            .unwrap();
        assert_eq!(cfg.starting_lives, 5);
        assert_eq!(cfg.hard.timer_seconds, 15);
        assert_eq!(cfg.hard.question_count, 9);
        assert_eq!(cfg.hard.mix, TierConfig::hard().mix);
        assert_eq!(cfg.medium, TierConfig::medium());
        assert_eq!(cfg.rewards, RewardTable::default());
        assert_eq!(cfg.leaderboard_capacity, 20);
    }

    #[test]
    fn partial_mix_overlay_keeps_tier_mix() {
        let cfg = GameConfig::from_json(r#"{"medium": {"mix": {"fault": 3}}}"#).unwrap();
        assert_eq!(cfg.medium.mix.fault, 3);
        assert_eq!(cfg.medium.mix.matching, 2);
        assert_eq!(cfg.medium.question_count, 7);
    }

    #[test]
    fn non_object_overlay_is_a_parse_error() {
        assert!(matches!(GameConfig::from_json("[1, 2]"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn zero_lives_rejected() {
        let err = GameConfig::from_json(r#"{"starting_lives": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "starting_lives", .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(GameConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn match_reward_scales_with_pairs() {
        let r = RewardTable::default();
        assert_eq!(r.reward(Kind::Match, 3), 45);
        assert_eq!(r.reward(Kind::Fault, 3), 30);
    }

    #[test]
    fn huge_match_reward_saturates() {
        let r = RewardTable {
            match_pair: 2_000_000_000,
            ..RewardTable::default()
        };
        assert_eq!(r.reward(Kind::Match, 3), u32::MAX);
    }

    #[test]
    fn difficulty_and_mode_parse() {
        assert_eq!(Difficulty::parse("medium"), Some(Difficulty::Medium));
        assert_eq!(Mode::parse("timed"), Some(Mode::Timed));
        assert_eq!(Mode::parse("blitz"), None);
    }
}
