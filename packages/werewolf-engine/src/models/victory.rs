use serde::{Deserialize, Serialize};

use super::role::Team;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryState {
    Ongoing,
    VillagerWin, // 村人陣営の勝利
    WerewolfWin, // 人狼陣営の勝利
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VictoryResult {
    pub state: VictoryState,
    pub winner: Option<Team>,
    pub reason: String,
}

impl VictoryResult {
    /// Result carried by a game that has not been evaluated yet.
    pub fn not_evaluated() -> Self {
        Self::ongoing("game not evaluated yet.")
    }

    fn ongoing(reason: &str) -> Self {
        Self {
            state: VictoryState::Ongoing,
            winner: None,
            reason: reason.to_string(),
        }
    }

    pub fn is_decided(&self) -> bool {
        self.state != VictoryState::Ongoing
    }
}

/// Victory rules, independent of any game instance.
pub struct VictoryJudge;

impl VictoryJudge {
    /// `alive_werewolves` counts actual werewolves only; madmen belong in
    /// `alive_non_werewolves`.
    pub fn evaluate(alive_werewolves: usize, alive_non_werewolves: usize) -> VictoryResult {
        if alive_werewolves == 0 {
            return VictoryResult {
                state: VictoryState::VillagerWin,
                winner: Some(Team::Villager),
                reason: "all werewolves eliminated.".to_string(),
            };
        }

        if alive_werewolves >= alive_non_werewolves {
            return VictoryResult {
                state: VictoryState::WerewolfWin,
                winner: Some(Team::Werewolf),
                reason: "werewolves reached parity or majority.".to_string(),
            };
        }

        VictoryResult::ongoing("the game continues.")
    }
}
