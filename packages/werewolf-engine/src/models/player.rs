use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::role::{Role, Team};

/// Stable identifier of a player for the lifetime of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PlayerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathReason {
    Executed, // 処刑
    Attacked, // 襲撃
    Other,    // その他（突然死など）
}

impl fmt::Display for DeathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeathReason::Executed => write!(f, "処刑"),
            DeathReason::Attacked => write!(f, "襲撃"),
            DeathReason::Other => write!(f, "その他"),
        }
    }
}

/// One participant. Records are owned by [`crate::Game`] and only change
/// through its operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub is_alive: bool,
    pub death_reason: Option<DeathReason>,
    pub death_day: Option<u32>,
}

impl Player {
    pub(crate) fn new(name: String, role: Role) -> Self {
        Self {
            id: PlayerId::new(),
            name,
            role,
            is_alive: true,
            death_reason: None,
            death_day: None,
        }
    }

    pub fn team(&self) -> Team {
        self.role.team()
    }

    pub fn is_werewolf(&self) -> bool {
        self.role.is_actual_werewolf()
    }

    /// Marks the player dead. The owning game stamps `death_day` and guards
    /// against killing twice.
    pub(crate) fn kill(&mut self, reason: DeathReason) {
        self.is_alive = false;
        self.death_reason = Some(reason);
    }
}
