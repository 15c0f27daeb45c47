pub mod game;
pub mod player;
pub mod role;
pub mod rule;
pub mod victory;

pub use game::{Game, GamePhase};
pub use player::{DeathReason, Player, PlayerId};
pub use role::{Role, Team};
pub use rule::{FirstDaySeerRule, GameRules, ParseFirstDaySeerRuleError};
pub use victory::{VictoryJudge, VictoryResult, VictoryState};
