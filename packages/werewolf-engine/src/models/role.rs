use serde::{Deserialize, Serialize};
use std::fmt;

use super::game::GamePhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Villager, // 村人陣営
    Werewolf, // 人狼陣営
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Citizen,  // 市民
    Werewolf, // 人狼
    Madman,   // 狂人
    Seer,     // 占い師
    Knight,   // 騎士
    Medium,   // 霊媒師
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Citizen,
        Role::Werewolf,
        Role::Madman,
        Role::Seer,
        Role::Knight,
        Role::Medium,
    ];

    /// The side this role wins with. The madman sides with the werewolves.
    pub fn team(self) -> Team {
        match self {
            Role::Werewolf | Role::Madman => Team::Werewolf,
            Role::Citizen | Role::Seer | Role::Knight | Role::Medium => Team::Villager,
        }
    }

    /// Whether investigations and the victory head-count treat this role as a
    /// werewolf. Only [`Role::Werewolf`] does; a madman reads as human.
    pub fn is_actual_werewolf(self) -> bool {
        matches!(self, Role::Werewolf)
    }

    /// The night sub-phase in which this role acts, if it has a night action.
    pub fn night_phase(self) -> Option<GamePhase> {
        match self {
            Role::Seer => Some(GamePhase::NightSeer),
            Role::Medium => Some(GamePhase::NightMedium),
            Role::Knight => Some(GamePhase::NightKnight),
            Role::Werewolf => Some(GamePhase::NightWerewolf),
            Role::Citizen | Role::Madman => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Citizen => write!(f, "市民"),
            Role::Werewolf => write!(f, "人狼"),
            Role::Madman => write!(f, "狂人"),
            Role::Seer => write!(f, "占い師"),
            Role::Knight => write!(f, "騎士"),
            Role::Medium => write!(f, "霊媒師"),
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Villager => write!(f, "村人陣営"),
            Team::Werewolf => write!(f, "人狼陣営"),
        }
    }
}
