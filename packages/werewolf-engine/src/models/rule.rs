use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::game::GamePhase;

/// How the seer's action on night zero is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstDaySeerRule {
    /// 初日占いあり（自由選択）
    #[default]
    FreeSelect,
    /// 初日ランダム白: the engine pre-selects a non-werewolf target.
    RandomWhite,
    /// 初日占いなし
    None,
}

impl FirstDaySeerRule {
    pub fn as_str(self) -> &'static str {
        match self {
            FirstDaySeerRule::FreeSelect => "free_select",
            FirstDaySeerRule::RandomWhite => "random_white",
            FirstDaySeerRule::None => "none",
        }
    }
}

impl fmt::Display for FirstDaySeerRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown first-day seer rule: {0}")]
pub struct ParseFirstDaySeerRuleError(pub String);

impl FromStr for FirstDaySeerRule {
    type Err = ParseFirstDaySeerRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free_select" => Ok(FirstDaySeerRule::FreeSelect),
            "random_white" => Ok(FirstDaySeerRule::RandomWhite),
            "none" => Ok(FirstDaySeerRule::None),
            _ => Err(ParseFirstDaySeerRuleError(s.to_string())),
        }
    }
}

/// Match configuration, fixed before the game starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    /// 昼の議論時間（秒）
    pub day_seconds: u64,
    /// 夜の行動時間（秒）
    pub night_seconds: u64,
    pub first_day_seer: FirstDaySeerRule,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            day_seconds: 180,
            night_seconds: 90,
            first_day_seer: FirstDaySeerRule::FreeSelect,
        }
    }
}

impl GameRules {
    /// Time budget for `phase` in seconds. Voting shares the day budget.
    pub fn phase_seconds(&self, phase: GamePhase) -> u64 {
        match phase {
            GamePhase::Setup | GamePhase::Day | GamePhase::Voting => self.day_seconds,
            GamePhase::NightSeer
            | GamePhase::NightMedium
            | GamePhase::NightKnight
            | GamePhase::NightWerewolf => self.night_seconds,
            GamePhase::Finished => 0,
        }
    }
}
