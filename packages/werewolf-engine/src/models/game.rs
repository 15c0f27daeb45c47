use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use super::{
    player::{DeathReason, Player, PlayerId},
    role::Role,
    rule::{FirstDaySeerRule, GameRules},
    victory::{VictoryJudge, VictoryResult},
};
use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Setup,         // ゲーム開始前
    Day,           // 昼（議論）
    Voting,        // 投票
    NightSeer,     // 夜：占い師
    NightMedium,   // 夜：霊媒師
    NightKnight,   // 夜：騎士
    NightWerewolf, // 夜：人狼
    Finished,      // ゲーム終了
}

impl GamePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Setup => "setup",
            GamePhase::Day => "day",
            GamePhase::Voting => "voting",
            GamePhase::NightSeer => "night_seer",
            GamePhase::NightMedium => "night_medium",
            GamePhase::NightKnight => "night_knight",
            GamePhase::NightWerewolf => "night_werewolf",
            GamePhase::Finished => "finished",
        }
    }

    pub fn is_night(self) -> bool {
        self.acting_role().is_some()
    }

    /// The role whose action is collected during this phase.
    pub fn acting_role(self) -> Option<Role> {
        match self {
            GamePhase::NightSeer => Some(Role::Seer),
            GamePhase::NightMedium => Some(Role::Medium),
            GamePhase::NightKnight => Some(Role::Knight),
            GamePhase::NightWerewolf => Some(Role::Werewolf),
            _ => None,
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Setup => write!(f, "準備"),
            GamePhase::Day => write!(f, "昼"),
            GamePhase::Voting => write!(f, "投票"),
            GamePhase::NightSeer => write!(f, "夜（占い師）"),
            GamePhase::NightMedium => write!(f, "夜（霊媒師）"),
            GamePhase::NightKnight => write!(f, "夜（騎士）"),
            GamePhase::NightWerewolf => write!(f, "夜（人狼）"),
            GamePhase::Finished => write!(f, "終了"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NightSlot {
    Seer,
    Medium,
    Guard,
    Attack,
}

/// Targets recorded during the current night, at most one per acting role.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NightActions {
    pub seer_target: Option<PlayerId>,   // 占い対象
    pub medium_target: Option<PlayerId>, // 霊媒対象
    pub guard_target: Option<PlayerId>,  // 護衛対象
    pub attack_target: Option<PlayerId>, // 襲撃対象
}

impl NightActions {
    fn slot_mut(&mut self, slot: NightSlot) -> &mut Option<PlayerId> {
        match slot {
            NightSlot::Seer => &mut self.seer_target,
            NightSlot::Medium => &mut self.medium_target,
            NightSlot::Guard => &mut self.guard_target,
            NightSlot::Attack => &mut self.attack_target,
        }
    }

    fn forget(&mut self, id: PlayerId) {
        for slot in [
            &mut self.seer_target,
            &mut self.medium_target,
            &mut self.guard_target,
            &mut self.attack_target,
        ] {
            if *slot == Some(id) {
                *slot = None;
            }
        }
    }
}

/// Outcomes kept for one cycle so the moderator can report them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LastResolved {
    pub executed_player: Option<PlayerId>,
    pub night_victim: Option<PlayerId>,
    pub guard_target: Option<PlayerId>,
    pub attack_target: Option<PlayerId>,
    pub first_day_white_target: Option<PlayerId>,
}

impl LastResolved {
    fn forget(&mut self, id: PlayerId) {
        for slot in [
            &mut self.executed_player,
            &mut self.night_victim,
            &mut self.guard_target,
            &mut self.attack_target,
            &mut self.first_day_white_target,
        ] {
            if *slot == Some(id) {
                *slot = None;
            }
        }
    }
}

/// Step taken by `proceed_to_next_phase`, before any side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advance {
    Stay,
    To(GamePhase),
    OpenDay,
    OpenNight,
    FirstMorning,
    ResolveNight,
}

fn advance_step(phase: GamePhase, night_zero: bool) -> Advance {
    match (phase, night_zero) {
        (GamePhase::Finished, _) => Advance::Stay,
        (GamePhase::Setup, _) => Advance::OpenDay,
        (GamePhase::Day, _) => Advance::To(GamePhase::Voting),
        (GamePhase::Voting, _) => Advance::OpenNight,
        // 0日目の夜は霊媒師・騎士のフェーズがない
        (GamePhase::NightSeer, true) => Advance::To(GamePhase::NightWerewolf),
        (GamePhase::NightSeer, false) => Advance::To(GamePhase::NightMedium),
        (GamePhase::NightMedium, _) => Advance::To(GamePhase::NightKnight),
        (GamePhase::NightKnight, _) => Advance::To(GamePhase::NightWerewolf),
        (GamePhase::NightWerewolf, true) => Advance::FirstMorning,
        (GamePhase::NightWerewolf, false) => Advance::ResolveNight,
    }
}

const DROP_SEER: &[NightSlot] = &[NightSlot::Seer];
const DROP_MEDIUM: &[NightSlot] = &[NightSlot::Medium];
const DROP_ATTACK_AND_SEER: &[NightSlot] = &[NightSlot::Attack, NightSlot::Seer];
const DROP_ATTACK_AND_GUARD: &[NightSlot] = &[NightSlot::Attack, NightSlot::Guard];

/// Previous night sub-phase and the targets to discard when stepping back.
fn revert_step(phase: GamePhase, night_zero: bool) -> Option<(GamePhase, &'static [NightSlot])> {
    match (phase, night_zero) {
        (GamePhase::NightMedium, _) => Some((GamePhase::NightSeer, DROP_SEER)),
        (GamePhase::NightKnight, _) => Some((GamePhase::NightMedium, DROP_MEDIUM)),
        (GamePhase::NightWerewolf, true) => Some((GamePhase::NightSeer, DROP_ATTACK_AND_SEER)),
        (GamePhase::NightWerewolf, false) => Some((GamePhase::NightKnight, DROP_ATTACK_AND_GUARD)),
        _ => None,
    }
}

/// Aggregate root of a match. Owns every [`Player`] and all phase state.
#[derive(Serialize, Debug, Clone)]
pub struct Game {
    players: Vec<Player>,
    phase: GamePhase,
    day: u32,
    rules: GameRules,
    victory: VictoryResult,
    night_actions: NightActions,
    last: LastResolved,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::with_rules(GameRules::default())
    }

    pub fn with_rules(rules: GameRules) -> Self {
        Game {
            players: Vec::new(),
            phase: GamePhase::Setup,
            day: 0,
            rules,
            victory: VictoryResult::not_evaluated(),
            night_actions: NightActions::default(),
            last: LastResolved::default(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn is_night_zero(&self) -> bool {
        self.day == 0
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn victory(&self) -> &VictoryResult {
        &self.victory
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn seer_target_id(&self) -> Option<PlayerId> {
        self.night_actions.seer_target
    }

    pub fn medium_target_id(&self) -> Option<PlayerId> {
        self.night_actions.medium_target
    }

    pub fn guard_target_id(&self) -> Option<PlayerId> {
        self.night_actions.guard_target
    }

    pub fn attack_target_id(&self) -> Option<PlayerId> {
        self.night_actions.attack_target
    }

    pub fn last_executed_player_id(&self) -> Option<PlayerId> {
        self.last.executed_player
    }

    pub fn last_night_victim_id(&self) -> Option<PlayerId> {
        self.last.night_victim
    }

    pub fn last_guard_target_id(&self) -> Option<PlayerId> {
        self.last.guard_target
    }

    pub fn last_attack_target_id(&self) -> Option<PlayerId> {
        self.last.attack_target
    }

    pub fn first_day_white_target_id(&self) -> Option<PlayerId> {
        self.last.first_day_white_target
    }

    /// Replaces the rules. Only allowed before the match starts.
    pub fn update_rules(&mut self, rules: GameRules) -> Result<(), GameError> {
        if self.phase != GamePhase::Setup {
            return Err(GameError::InvalidPhase { actual: self.phase });
        }
        self.rules = rules;
        Ok(())
    }

    // ---- roster ----

    pub fn add_player(&mut self, name: &str, role: Role) -> Result<&Player, GameError> {
        if self.players.iter().any(|p| p.name == name) {
            return Err(GameError::DuplicateName(name.to_string()));
        }

        let player = Player::new(name.to_string(), role);
        info!("Player added: {} ({}) as {:?}", player.name, player.id, role);
        self.players.push(player);
        Ok(&self.players[self.players.len() - 1])
    }

    /// Deletes the player and every target or snapshot that refers to them.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, GameError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(GameError::PlayerNotFound(id))?;

        let removed = self.players.remove(index);
        self.night_actions.forget(id);
        self.last.forget(id);
        info!("Player removed: {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    pub fn get_player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(GameError::PlayerNotFound(id))
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GameError::PlayerNotFound(id))
    }

    pub fn alive_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_alive).collect()
    }

    pub fn alive_players_by_role(&self, role: Role) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.is_alive && p.role == role)
            .collect()
    }

    pub fn has_alive_role(&self, role: Role) -> bool {
        self.players.iter().any(|p| p.is_alive && p.role == role)
    }

    /// The player executed on `day`, if the vote that day ended in an execution.
    pub fn get_executed_player_on_day(&self, day: u32) -> Option<&Player> {
        self.players.iter().find(|p| {
            p.death_reason == Some(DeathReason::Executed) && p.death_day == Some(day)
        })
    }

    /// Seer/medium reading: whether the player is an actual werewolf.
    pub fn investigate(&self, id: PlayerId) -> Result<bool, GameError> {
        Ok(self.get_player(id)?.is_werewolf())
    }

    pub fn kill_player(&mut self, id: PlayerId, reason: DeathReason) -> Result<(), GameError> {
        let day = self.day;
        let player = self.player_mut(id)?;
        if !player.is_alive {
            return Err(GameError::AlreadyDead(id));
        }

        player.kill(reason);
        player.death_day = Some(day);
        info!("Player died on day {}: {} ({:?})", day, player.name, reason);

        if reason == DeathReason::Executed {
            self.last.executed_player = Some(id);
        }

        self.refresh_victory();
        Ok(())
    }

    // ---- victory ----

    /// Re-evaluates victory from the current roster. A decided result ends
    /// the game regardless of the phase in progress.
    pub fn refresh_victory(&mut self) -> &VictoryResult {
        let (alive_werewolves, alive_non_werewolves) = self
            .players
            .iter()
            .filter(|p| p.is_alive)
            .fold((0, 0), |(wolves, others), p| {
                if p.is_werewolf() {
                    (wolves + 1, others)
                } else {
                    (wolves, others + 1)
                }
            });

        self.victory = VictoryJudge::evaluate(alive_werewolves, alive_non_werewolves);

        if self.victory.is_decided() && self.phase != GamePhase::Finished {
            info!(
                "Game finished on day {}: {:?} ({})",
                self.day, self.victory.state, self.victory.reason
            );
            self.phase = GamePhase::Finished;
        }

        &self.victory
    }

    // ---- phase machine ----

    /// Starts the match at night zero. Under [`FirstDaySeerRule::RandomWhite`]
    /// a living player who is neither werewolf nor seer is drawn from `rng`
    /// as the seer's first-night result.
    pub fn start_game<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GamePhase, GameError> {
        if self.phase != GamePhase::Setup {
            return Err(GameError::InvalidPhase { actual: self.phase });
        }

        self.day = 0;
        self.phase = GamePhase::NightSeer;
        self.last = LastResolved::default();

        if self.rules.first_day_seer == FirstDaySeerRule::RandomWhite {
            let candidates: Vec<PlayerId> = self
                .players
                .iter()
                .filter(|p| p.is_alive && !matches!(p.role, Role::Werewolf | Role::Seer))
                .map(|p| p.id)
                .collect();
            self.last.first_day_white_target = candidates.choose(rng).copied();
            debug!(
                "First-day white target: {:?} (from {} candidates)",
                self.last.first_day_white_target,
                candidates.len()
            );
        }

        self.night_actions = NightActions::default();
        info!("Game started with {} players", self.players.len());
        self.refresh_victory();
        Ok(self.phase)
    }

    /// Moves one step forward and returns the phase reached.
    pub fn proceed_to_next_phase(&mut self) -> GamePhase {
        let from = self.phase;

        match advance_step(self.phase, self.is_night_zero()) {
            Advance::Stay => return self.phase,
            Advance::To(next) => self.phase = next,
            Advance::OpenDay => {
                self.day = self.day.max(1);
                self.phase = GamePhase::Day;
            }
            Advance::OpenNight => {
                self.night_actions = NightActions::default();
                self.phase = GamePhase::NightSeer;
            }
            Advance::FirstMorning => {
                self.night_actions = NightActions::default();
                self.day = 1;
                self.phase = GamePhase::Day;
            }
            Advance::ResolveNight => {
                self.resolve_night_actions();
                if self.phase == GamePhase::Finished {
                    return self.phase;
                }
                self.day += 1;
                self.phase = GamePhase::Day;
            }
        }

        debug!("Phase {} -> {} (day {})", from.as_str(), self.phase.as_str(), self.day);
        self.phase
    }

    /// Moderator correction: step back one night sub-phase, discarding the
    /// target recorded there. Returns `false` when there is nothing to revert.
    pub fn revert_to_previous_night_phase(&mut self) -> bool {
        let Some((previous, cleared)) = revert_step(self.phase, self.is_night_zero()) else {
            return false;
        };

        for slot in cleared {
            *self.night_actions.slot_mut(*slot) = None;
        }
        debug!("Phase {} reverted to {}", self.phase.as_str(), previous.as_str());
        self.phase = previous;
        true
    }

    // ---- night actions ----

    pub fn set_seer_target(&mut self, id: PlayerId) -> Result<(), GameError> {
        self.record_living_target(NightSlot::Seer, id)
    }

    /// Accepts dead players: the medium reads the executed. Checking that the
    /// target was executed today is left to the caller.
    pub fn set_medium_target(&mut self, id: PlayerId) -> Result<(), GameError> {
        self.get_player(id)?;
        *self.night_actions.slot_mut(NightSlot::Medium) = Some(id);
        Ok(())
    }

    pub fn set_guard_target(&mut self, id: PlayerId) -> Result<(), GameError> {
        self.record_living_target(NightSlot::Guard, id)
    }

    pub fn set_attack_target(&mut self, id: PlayerId) -> Result<(), GameError> {
        self.record_living_target(NightSlot::Attack, id)
    }

    fn record_living_target(&mut self, slot: NightSlot, id: PlayerId) -> Result<(), GameError> {
        if !self.get_player(id)?.is_alive {
            return Err(GameError::TargetNotAlive(id));
        }
        *self.night_actions.slot_mut(slot) = Some(id);
        Ok(())
    }

    fn resolve_night_actions(&mut self) {
        let guard = self.night_actions.guard_target;
        let attack = self.night_actions.attack_target;
        self.last.guard_target = guard;
        self.last.attack_target = attack;
        self.last.night_victim = None;

        // 護衛先と襲撃先が一致した場合は護衛成功
        if let Some(target) = attack.filter(|&target| Some(target) != guard) {
            match self.kill_player(target, DeathReason::Attacked) {
                Ok(()) => self.last.night_victim = Some(target),
                Err(err) => debug!("Attack on {} had no effect: {}", target, err),
            }
        } else if attack.is_some() {
            info!("Attack on day {} was blocked by the guard", self.day);
        }

        self.night_actions = NightActions::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Team, VictoryState};
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn id_of(game: &Game, name: &str) -> PlayerId {
        game.players()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.id)
            .unwrap()
    }

    fn build_sample_game() -> Game {
        let mut game = Game::new();
        game.add_player("Wolf", Role::Werewolf).unwrap();
        game.add_player("Seer", Role::Seer).unwrap();
        game.add_player("Knight", Role::Knight).unwrap();
        game.add_player("Citizen", Role::Citizen).unwrap();
        game
    }

    fn build_larger_game() -> Game {
        let mut game = build_sample_game();
        game.add_player("Medium", Role::Medium).unwrap();
        game.add_player("Madman", Role::Madman).unwrap();
        game.add_player("Citizen2", Role::Citizen).unwrap();
        game
    }

    #[test]
    fn start_game_initializes_zero_night() {
        let mut game = build_sample_game();
        let phase = game.start_game(&mut rng()).unwrap();

        assert_eq!(phase, GamePhase::NightSeer);
        assert_eq!(game.day(), 0);
        assert_eq!(game.first_day_white_target_id(), None);
        assert_eq!(game.victory().state, VictoryState::Ongoing);
    }

    #[test]
    fn start_game_is_rejected_after_the_match_began() {
        let mut game = build_sample_game();
        game.start_game(&mut rng()).unwrap();
        game.proceed_to_next_phase();

        let err = game.start_game(&mut rng()).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidPhase {
                actual: GamePhase::NightWerewolf
            }
        );
        assert_eq!(game.phase(), GamePhase::NightWerewolf);
    }

    #[test]
    fn start_game_sets_random_white_target() {
        for seed in 0..20 {
            let mut game = build_sample_game();
            game.rules.first_day_seer = FirstDaySeerRule::RandomWhite;
            game.start_game(&mut StdRng::seed_from_u64(seed)).unwrap();

            let target_id = game.first_day_white_target_id().expect("target selected");
            let target = game.get_player(target_id).unwrap();
            assert_ne!(target.role, Role::Werewolf);
            assert_ne!(target.role, Role::Seer);
        }
    }

    #[test]
    fn start_game_random_white_target_can_be_none_when_no_candidate() {
        let mut game = Game::new();
        game.add_player("Wolf", Role::Werewolf).unwrap();
        game.add_player("Seer", Role::Seer).unwrap();
        game.rules.first_day_seer = FirstDaySeerRule::RandomWhite;

        game.start_game(&mut rng()).unwrap();

        assert_eq!(game.first_day_white_target_id(), None);
    }

    #[test]
    fn start_game_skips_random_white_under_other_rules() {
        let mut game = build_sample_game();
        game.rules.first_day_seer = FirstDaySeerRule::None;
        game.start_game(&mut rng()).unwrap();
        assert_eq!(game.first_day_white_target_id(), None);
    }

    #[test]
    fn phase_flow_skips_medium_and_knight_on_day_zero_night() {
        let mut game = build_sample_game();
        game.start_game(&mut rng()).unwrap();

        assert_eq!(game.proceed_to_next_phase(), GamePhase::NightWerewolf);
        assert_eq!(game.proceed_to_next_phase(), GamePhase::Day);
        assert_eq!(game.day(), 1);
    }

    #[test]
    fn phase_flow_cycles_day_voting_night_subphases_day() {
        let mut game = build_sample_game();
        game.start_game(&mut rng()).unwrap();
        game.proceed_to_next_phase();
        game.proceed_to_next_phase();

        assert_eq!(game.proceed_to_next_phase(), GamePhase::Voting);
        assert_eq!(game.proceed_to_next_phase(), GamePhase::NightSeer);
        assert_eq!(game.proceed_to_next_phase(), GamePhase::NightMedium);
        assert_eq!(game.proceed_to_next_phase(), GamePhase::NightKnight);
        assert_eq!(game.proceed_to_next_phase(), GamePhase::NightWerewolf);
        assert_eq!(game.proceed_to_next_phase(), GamePhase::Day);
        assert_eq!(game.day(), 2);
    }

    #[test]
    fn setup_advances_to_day_one() {
        let mut game = build_sample_game();
        assert_eq!(game.proceed_to_next_phase(), GamePhase::Day);
        assert_eq!(game.day(), 1);
    }

    #[test]
    fn finished_phase_does_not_advance() {
        let mut game = build_sample_game();
        game.phase = GamePhase::Finished;
        game.day = 3;

        assert_eq!(game.proceed_to_next_phase(), GamePhase::Finished);
        assert_eq!(game.day(), 3);
    }

    #[test]
    fn entering_a_new_night_clears_stale_targets() {
        let mut game = build_sample_game();
        let citizen = id_of(&game, "Citizen");
        game.phase = GamePhase::Voting;
        game.day = 1;
        game.night_actions.attack_target = Some(citizen);

        assert_eq!(game.proceed_to_next_phase(), GamePhase::NightSeer);
        assert_eq!(game.attack_target_id(), None);
    }

    #[test]
    fn night_zero_never_resolves_an_attack() {
        let mut game = build_sample_game();
        let citizen = id_of(&game, "Citizen");
        game.start_game(&mut rng()).unwrap();
        game.proceed_to_next_phase();
        game.set_attack_target(citizen).unwrap();

        assert_eq!(game.proceed_to_next_phase(), GamePhase::Day);
        assert!(game.get_player(citizen).unwrap().is_alive);
        assert_eq!(game.attack_target_id(), None);
        assert_eq!(game.last_night_victim_id(), None);
    }

    #[test]
    fn night_resolution_kills_attacked_player_when_not_guarded() {
        let mut game = build_larger_game();
        let citizen = id_of(&game, "Citizen");
        let knight = id_of(&game, "Knight");
        game.day = 1;

        game.phase = GamePhase::NightKnight;
        game.set_guard_target(knight).unwrap();
        game.proceed_to_next_phase();
        assert_eq!(game.phase(), GamePhase::NightWerewolf);

        game.set_attack_target(citizen).unwrap();
        game.proceed_to_next_phase();

        let victim = game.get_player(citizen).unwrap();
        assert!(!victim.is_alive);
        assert_eq!(victim.death_reason, Some(DeathReason::Attacked));
        assert_eq!(victim.death_day, Some(1));
        assert_eq!(game.last_night_victim_id(), Some(citizen));
        assert_eq!(game.last_guard_target_id(), Some(knight));
        assert_eq!(game.last_attack_target_id(), Some(citizen));
        assert_eq!(game.guard_target_id(), None);
        assert_eq!(game.attack_target_id(), None);
        assert_eq!(game.phase(), GamePhase::Day);
        assert_eq!(game.day(), 2);
    }

    #[test]
    fn night_resolution_blocks_attack_when_guarded() {
        let mut game = build_sample_game();
        let citizen = id_of(&game, "Citizen");
        game.day = 1;

        game.phase = GamePhase::NightKnight;
        game.set_guard_target(citizen).unwrap();
        game.proceed_to_next_phase();

        game.set_attack_target(citizen).unwrap();
        game.proceed_to_next_phase();

        assert!(game.get_player(citizen).unwrap().is_alive);
        assert_eq!(game.last_night_victim_id(), None);
        assert_eq!(game.last_guard_target_id(), Some(citizen));
        assert_eq!(game.last_attack_target_id(), Some(citizen));
        assert_eq!(game.phase(), GamePhase::Day);
        assert_eq!(game.day(), 2);
    }

    #[test]
    fn night_without_attack_has_no_victim() {
        let mut game = build_sample_game();
        game.day = 2;
        game.phase = GamePhase::NightWerewolf;

        assert_eq!(game.proceed_to_next_phase(), GamePhase::Day);
        assert_eq!(game.day(), 3);
        assert_eq!(game.last_night_victim_id(), None);
        assert!(game.players().iter().all(|p| p.is_alive));
    }

    #[test]
    fn night_resolution_clears_every_pending_target() {
        let mut game = build_larger_game();
        let medium = id_of(&game, "Medium");
        let seer = id_of(&game, "Seer");
        game.day = 1;
        game.phase = GamePhase::NightWerewolf;
        game.set_seer_target(medium).unwrap();
        game.set_medium_target(seer).unwrap();

        game.proceed_to_next_phase();

        assert_eq!(game.seer_target_id(), None);
        assert_eq!(game.medium_target_id(), None);
    }

    #[test]
    fn attack_that_wins_the_game_finishes_without_a_new_day() {
        let mut game = Game::new();
        game.add_player("Wolf", Role::Werewolf).unwrap();
        game.add_player("A", Role::Citizen).unwrap();
        game.add_player("B", Role::Citizen).unwrap();
        let a = id_of(&game, "A");
        game.day = 2;
        game.phase = GamePhase::NightWerewolf;
        game.set_attack_target(a).unwrap();

        assert_eq!(game.proceed_to_next_phase(), GamePhase::Finished);
        assert_eq!(game.day(), 2);
        assert_eq!(game.victory().state, VictoryState::WerewolfWin);
        assert_eq!(game.last_night_victim_id(), Some(a));
        assert_eq!(game.attack_target_id(), None);
    }

    #[test]
    fn get_executed_player_on_day_returns_player() {
        let mut game = build_sample_game();
        let citizen = id_of(&game, "Citizen");
        game.day = 1;

        game.kill_player(citizen, DeathReason::Executed).unwrap();
        let executed = game.get_executed_player_on_day(game.day()).unwrap();

        assert_eq!(executed.id, citizen);
        assert_eq!(game.last_executed_player_id(), Some(citizen));
        assert!(game.get_executed_player_on_day(2).is_none());
    }

    #[test]
    fn attacked_players_are_not_reported_as_executed() {
        let mut game = build_larger_game();
        let citizen = id_of(&game, "Citizen");
        game.kill_player(citizen, DeathReason::Attacked).unwrap();
        assert!(game.get_executed_player_on_day(0).is_none());
        assert_eq!(game.last_executed_player_id(), None);
    }

    #[test]
    fn medium_target_accepts_executed_player() {
        let mut game = build_larger_game();
        let citizen = id_of(&game, "Citizen");

        game.kill_player(citizen, DeathReason::Executed).unwrap();
        game.set_medium_target(citizen).unwrap();

        assert_eq!(game.medium_target_id(), Some(citizen));
        assert_eq!(
            game.set_guard_target(citizen),
            Err(GameError::TargetNotAlive(citizen))
        );
        assert_eq!(
            game.set_seer_target(citizen),
            Err(GameError::TargetNotAlive(citizen))
        );
        assert_eq!(
            game.set_attack_target(citizen),
            Err(GameError::TargetNotAlive(citizen))
        );
    }

    #[test]
    fn setters_reject_unknown_players() {
        let mut game = build_sample_game();
        let ghost = PlayerId::new();
        assert_eq!(game.set_seer_target(ghost), Err(GameError::PlayerNotFound(ghost)));
        assert_eq!(game.set_medium_target(ghost), Err(GameError::PlayerNotFound(ghost)));
        assert_eq!(game.set_guard_target(ghost), Err(GameError::PlayerNotFound(ghost)));
        assert_eq!(game.set_attack_target(ghost), Err(GameError::PlayerNotFound(ghost)));
    }

    #[test]
    fn add_player_rejects_duplicate_names_case_sensitively() {
        let mut game = build_sample_game();
        assert_eq!(
            game.add_player("Wolf", Role::Citizen).unwrap_err(),
            GameError::DuplicateName("Wolf".to_string())
        );
        assert!(game.add_player("wolf", Role::Citizen).is_ok());
        assert_eq!(game.players().len(), 5);
    }

    #[test]
    fn remove_player_deletes_from_list() {
        let mut game = build_sample_game();
        let seer = id_of(&game, "Seer");

        let removed = game.remove_player(seer).unwrap();

        assert_eq!(removed.name, "Seer");
        assert!(game.players().iter().all(|p| p.id != seer));
        assert_eq!(game.remove_player(seer), Err(GameError::PlayerNotFound(seer)));
    }

    #[test]
    fn remove_player_clears_dangling_references() {
        let mut game = build_larger_game();
        let citizen = id_of(&game, "Citizen");
        game.night_actions = NightActions {
            seer_target: Some(citizen),
            medium_target: Some(citizen),
            guard_target: Some(citizen),
            attack_target: Some(citizen),
        };
        game.last = LastResolved {
            executed_player: Some(citizen),
            night_victim: Some(citizen),
            guard_target: Some(citizen),
            attack_target: Some(citizen),
            first_day_white_target: Some(citizen),
        };

        game.remove_player(citizen).unwrap();

        assert_eq!(game.night_actions, NightActions::default());
        assert_eq!(game.last, LastResolved::default());
    }

    #[test]
    fn remove_player_keeps_references_to_others() {
        let mut game = build_sample_game();
        let citizen = id_of(&game, "Citizen");
        let knight = id_of(&game, "Knight");
        game.set_guard_target(knight).unwrap();

        game.remove_player(citizen).unwrap();

        assert_eq!(game.guard_target_id(), Some(knight));
    }

    #[test]
    fn kill_player_rejects_dead_and_unknown_players() {
        let mut game = build_larger_game();
        let citizen = id_of(&game, "Citizen");
        game.day = 2;
        game.kill_player(citizen, DeathReason::Other).unwrap();

        assert_eq!(
            game.kill_player(citizen, DeathReason::Executed),
            Err(GameError::AlreadyDead(citizen))
        );
        let player = game.get_player(citizen).unwrap();
        assert_eq!(player.death_reason, Some(DeathReason::Other));
        assert_eq!(player.death_day, Some(2));

        let ghost = PlayerId::new();
        assert_eq!(
            game.kill_player(ghost, DeathReason::Other),
            Err(GameError::PlayerNotFound(ghost))
        );
    }

    #[test]
    fn alive_queries_follow_roster_order() {
        let mut game = build_larger_game();
        let citizen = id_of(&game, "Citizen");
        game.kill_player(citizen, DeathReason::Attacked).unwrap();

        let names: Vec<&str> = game.alive_players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Wolf", "Seer", "Knight", "Medium", "Madman", "Citizen2"]);

        let citizens: Vec<&str> = game
            .alive_players_by_role(Role::Citizen)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(citizens, vec!["Citizen2"]);
        assert!(game.has_alive_role(Role::Medium));
        game.kill_player(id_of(&game, "Medium"), DeathReason::Attacked).unwrap();
        assert!(!game.has_alive_role(Role::Medium));
    }

    #[test]
    fn investigate_reads_madman_as_human() {
        let game = build_larger_game();
        assert!(game.investigate(id_of(&game, "Wolf")).unwrap());
        assert!(!game.investigate(id_of(&game, "Madman")).unwrap());
    }

    #[test]
    fn villager_win_when_all_werewolves_eliminated() {
        let mut game = Game::new();
        game.add_player("Alice", Role::Werewolf).unwrap();
        game.add_player("Bob", Role::Madman).unwrap();
        game.add_player("Carol", Role::Citizen).unwrap();
        game.add_player("Dave", Role::Citizen).unwrap();
        game.start_game(&mut rng()).unwrap();

        game.kill_player(id_of(&game, "Alice"), DeathReason::Executed)
            .unwrap();

        assert_eq!(game.victory().state, VictoryState::VillagerWin);
        assert_eq!(game.victory().winner, Some(Team::Villager));
        assert_eq!(game.phase(), GamePhase::Finished);
    }

    #[test]
    fn werewolf_win_on_parity_or_majority() {
        let mut game = Game::new();
        game.add_player("Wolf", Role::Werewolf).unwrap();
        for name in ["A", "B", "C"] {
            game.add_player(name, Role::Citizen).unwrap();
        }

        game.kill_player(id_of(&game, "A"), DeathReason::Executed).unwrap();
        assert_eq!(game.victory().state, VictoryState::Ongoing);
        game.kill_player(id_of(&game, "B"), DeathReason::Attacked).unwrap();

        assert_eq!(game.victory().state, VictoryState::WerewolfWin);
        assert_eq!(game.victory().winner, Some(Team::Werewolf));
        assert_eq!(game.phase(), GamePhase::Finished);
    }

    #[test]
    fn madman_counts_as_non_werewolf_for_parity() {
        let mut game = Game::new();
        game.add_player("Wolf", Role::Werewolf).unwrap();
        game.add_player("Madman", Role::Madman).unwrap();
        game.add_player("Citizen", Role::Citizen).unwrap();

        game.refresh_victory();

        assert_eq!(game.victory().state, VictoryState::Ongoing);
        assert_eq!(game.phase(), GamePhase::Setup);
    }

    #[test]
    fn revert_to_previous_night_phase_from_night_medium() {
        let mut game = build_sample_game();
        game.day = 1;
        game.phase = GamePhase::NightMedium;
        game.night_actions.seer_target = Some(id_of(&game, "Knight"));

        assert!(game.revert_to_previous_night_phase());
        assert_eq!(game.phase(), GamePhase::NightSeer);
        assert_eq!(game.seer_target_id(), None);
    }

    #[test]
    fn revert_to_previous_night_phase_from_night_knight() {
        let mut game = build_sample_game();
        game.day = 1;
        game.phase = GamePhase::NightKnight;
        game.night_actions.medium_target = Some(id_of(&game, "Citizen"));

        assert!(game.revert_to_previous_night_phase());
        assert_eq!(game.phase(), GamePhase::NightMedium);
        assert_eq!(game.medium_target_id(), None);
    }

    #[test]
    fn revert_to_previous_night_phase_from_night_werewolf_day_zero() {
        let mut game = build_sample_game();
        game.day = 0;
        game.phase = GamePhase::NightWerewolf;
        game.night_actions.seer_target = Some(id_of(&game, "Knight"));
        game.night_actions.attack_target = Some(id_of(&game, "Citizen"));

        assert!(game.revert_to_previous_night_phase());
        assert_eq!(game.phase(), GamePhase::NightSeer);
        assert_eq!(game.seer_target_id(), None);
        assert_eq!(game.attack_target_id(), None);
    }

    #[test]
    fn revert_to_previous_night_phase_from_night_werewolf_day_one() {
        let mut game = build_sample_game();
        let knight = id_of(&game, "Knight");
        game.day = 1;
        game.phase = GamePhase::NightWerewolf;
        game.night_actions.seer_target = Some(knight);
        game.night_actions.guard_target = Some(id_of(&game, "Seer"));
        game.night_actions.attack_target = Some(id_of(&game, "Citizen"));

        assert!(game.revert_to_previous_night_phase());
        assert_eq!(game.phase(), GamePhase::NightKnight);
        assert_eq!(game.guard_target_id(), None);
        assert_eq!(game.attack_target_id(), None);
        assert_eq!(game.seer_target_id(), Some(knight));
    }

    #[test]
    fn revert_to_previous_night_phase_returns_false_on_other_phase() {
        let mut game = build_sample_game();
        for phase in [
            GamePhase::Setup,
            GamePhase::Day,
            GamePhase::Voting,
            GamePhase::NightSeer,
            GamePhase::Finished,
        ] {
            game.phase = phase;
            assert!(!game.revert_to_previous_night_phase());
            assert_eq!(game.phase(), phase);
        }
    }

    #[test]
    fn update_rules_only_during_setup() {
        let mut game = build_sample_game();
        let rules = GameRules {
            day_seconds: 300,
            night_seconds: 120,
            first_day_seer: FirstDaySeerRule::None,
        };
        game.update_rules(rules.clone()).unwrap();
        assert_eq!(game.rules(), &rules);

        game.start_game(&mut rng()).unwrap();
        assert!(matches!(
            game.update_rules(GameRules::default()),
            Err(GameError::InvalidPhase { .. })
        ));
        assert_eq!(game.rules(), &rules);
    }

    #[test]
    fn game_serializes_to_snake_case_json() {
        let game = build_sample_game();
        let json = serde_json::to_value(&game).unwrap();
        assert_eq!(json["phase"], "setup");
        assert_eq!(json["players"][0]["role"], "werewolf");
        assert_eq!(json["victory"]["state"], "ongoing");
    }
}
