use rand::{rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use werewolf_engine::{
    DeathReason, FirstDaySeerRule, Game, GameError, GamePhase, GameRules, Player, PlayerId, Role,
    VictoryResult,
};

use super::log::{LogKind, SessionLog};
use crate::error::SessionError;

#[derive(Debug, Serialize, Deserialize)]
pub struct AddPlayerRequest {
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TargetRequest {
    pub target_id: PlayerId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RandomExecutionRequest {
    pub candidate_ids: Vec<PlayerId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevertResponse {
    pub reverted: bool,
    pub phase: GamePhase,
}

/// What the moderator needs to render after a phase-changing call.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseResponse {
    pub phase: GamePhase,
    pub day: u32,
    pub victory: VictoryResult,
}

impl PhaseResponse {
    fn of(game: &Game) -> Self {
        PhaseResponse {
            phase: game.phase(),
            day: game.day(),
            victory: game.victory().clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResponse {
    pub executed_id: PlayerId,
    pub executed_name: String,
    #[serde(flatten)]
    pub state: PhaseResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct NightActionOutcome {
    pub role: Role,
    pub target_id: PlayerId,
    pub target_name: String,
    // 占い・霊媒の結果（それ以外の役職は None）
    pub is_werewolf: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub game: Game,
    pub can_start_game: bool,
    pub phase_seconds: u64,
    pub morning_result: Option<String>,
}

/// One moderated match: the engine plus everything the moderator keeps
/// around it (random source, log, morning report).
pub struct Session {
    session_id: String,
    game: Game,
    log: SessionLog,
    morning_result: Option<String>,
    rng: StdRng,
}

impl Session {
    pub fn new(session_id: String, rules: GameRules, rng: StdRng) -> Self {
        Session {
            log: SessionLog::new(session_id.clone()),
            session_id,
            game: Game::with_rules(rules),
            morning_result: None,
            rng,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn snapshot(&self, min_players: usize) -> SessionSnapshot {
        let phase = self.game.phase();
        SessionSnapshot {
            session_id: self.session_id.clone(),
            game: self.game.clone(),
            can_start_game: phase == GamePhase::Setup && self.game.players().len() >= min_players,
            phase_seconds: self.game.rules().phase_seconds(phase),
            morning_result: self
                .morning_result
                .clone()
                .filter(|_| phase == GamePhase::Day),
        }
    }

    fn record(&mut self, kind: LogKind, content: String) {
        let (day, phase) = (self.game.day(), self.game.phase());
        self.log.record(kind, day, phase, content);
    }

    fn record_victory_if_finished(&mut self) {
        if self.game.phase() != GamePhase::Finished {
            return;
        }
        let victory = self.game.victory();
        let content = match victory.winner {
            Some(team) => format!("{}の勝利（{}）", team, victory.reason),
            None => format!("ゲーム終了（{}）", victory.reason),
        };
        self.record(LogKind::Victory, content);
    }

    fn require_phase(&self, expected: GamePhase, action: &'static str) -> Result<(), SessionError> {
        let phase = self.game.phase();
        if phase != expected {
            return Err(SessionError::WrongPhase { action, phase });
        }
        Ok(())
    }

    fn player_name(&self, id: PlayerId) -> String {
        self.game
            .get_player(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|_| id.to_string())
    }

    // ---- setup ----

    pub fn update_rules(&mut self, rules: GameRules) -> Result<(), SessionError> {
        self.game.update_rules(rules.clone())?;
        self.record(
            LogKind::Setup,
            format!(
                "ルールを変更しました（昼{}秒 / 夜{}秒 / 初日占い: {}）",
                rules.day_seconds, rules.night_seconds, rules.first_day_seer
            ),
        );
        Ok(())
    }

    pub fn add_player(&mut self, name: &str, role: Role) -> Result<Player, SessionError> {
        self.require_phase(GamePhase::Setup, "adding players")?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }

        let player = self.game.add_player(name, role)?.clone();
        self.record(
            LogKind::Setup,
            format!("{}（{}）が参加しました", player.name, player.role),
        );
        Ok(player)
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, SessionError> {
        self.require_phase(GamePhase::Setup, "removing players")?;
        let removed = self.game.remove_player(id)?;
        self.record(LogKind::Setup, format!("{}を削除しました", removed.name));
        Ok(removed)
    }

    pub fn start(&mut self, min_players: usize) -> Result<PhaseResponse, SessionError> {
        let actual = self.game.players().len();
        if actual < min_players {
            return Err(SessionError::NotEnoughPlayers {
                required: min_players,
                actual,
            });
        }

        self.game.start_game(&mut self.rng)?;
        self.morning_result = None;
        self.record(LogKind::Phase, format!("ゲームを開始しました（{}人）", actual));

        if let Some(white) = self.game.first_day_white_target_id() {
            let name = self.player_name(white);
            self.record(LogKind::NightAction, format!("初日ランダム白: {}", name));
        }
        self.record_victory_if_finished();
        Ok(PhaseResponse::of(&self.game))
    }

    // ---- phase progression ----

    /// Leaving SETUP goes through [`Session::start`] only.
    pub fn advance(&mut self) -> Result<PhaseResponse, SessionError> {
        let from = self.game.phase();
        if from == GamePhase::Setup {
            return Err(SessionError::WrongPhase {
                action: "phase advance",
                phase: from,
            });
        }
        let resolves_night = from == GamePhase::NightWerewolf && !self.game.is_night_zero();
        let phase = self.game.proceed_to_next_phase();
        if phase == from {
            return Ok(PhaseResponse::of(&self.game));
        }

        if resolves_night {
            let report = match self.game.last_night_victim_id() {
                Some(victim) => format!("昨晩の犠牲者は{}さんです", self.player_name(victim)),
                None => "昨晩は犠牲者がいませんでした".to_string(),
            };
            self.record(LogKind::Morning, report.clone());
            self.morning_result = Some(report);
        } else if phase == GamePhase::Day {
            self.morning_result = None;
        }

        self.record(
            LogKind::Phase,
            format!("{}日目 {} に移行しました", self.game.day(), phase),
        );
        self.record_victory_if_finished();
        Ok(PhaseResponse::of(&self.game))
    }

    pub fn revert(&mut self) -> RevertResponse {
        let reverted = self.game.revert_to_previous_night_phase();
        if reverted {
            let phase = self.game.phase();
            self.record(LogKind::Phase, format!("{} に戻りました", phase));
        }
        RevertResponse {
            reverted,
            phase: self.game.phase(),
        }
    }

    // ---- voting ----

    fn ensure_no_execution_today(&self) -> Result<(), SessionError> {
        let day = self.game.day();
        match self.game.get_executed_player_on_day(day) {
            Some(_) => Err(SessionError::AlreadyExecutedToday(day)),
            None => Ok(()),
        }
    }

    pub fn vote(&mut self, target_id: PlayerId) -> Result<ExecutionResponse, SessionError> {
        self.require_phase(GamePhase::Voting, "execution")?;
        self.ensure_no_execution_today()?;
        self.execute(target_id)
    }

    /// RPP: executes one of `candidate_ids`, drawn uniformly.
    pub fn random_execute(
        &mut self,
        candidate_ids: &[PlayerId],
    ) -> Result<ExecutionResponse, SessionError> {
        self.require_phase(GamePhase::Voting, "random execution")?;
        self.ensure_no_execution_today()?;

        let mut candidates: Vec<PlayerId> = Vec::with_capacity(candidate_ids.len());
        for &id in candidate_ids {
            if !self.game.get_player(id)?.is_alive {
                return Err(GameError::TargetNotAlive(id).into());
            }
            if !candidates.contains(&id) {
                candidates.push(id);
            }
        }

        let chosen = *candidates
            .choose(&mut self.rng)
            .ok_or(SessionError::NoCandidates)?;
        self.record(
            LogKind::Execution,
            format!("RPP: {}人の候補から抽選しました", candidates.len()),
        );
        self.execute(chosen)
    }

    fn execute(&mut self, target_id: PlayerId) -> Result<ExecutionResponse, SessionError> {
        self.game.kill_player(target_id, DeathReason::Executed)?;
        let executed_name = self.player_name(target_id);
        self.record(
            LogKind::Execution,
            format!("{}さんが処刑されました", executed_name),
        );
        self.record_victory_if_finished();

        Ok(ExecutionResponse {
            executed_id: target_id,
            executed_name,
            state: PhaseResponse::of(&self.game),
        })
    }

    // ---- night actions ----

    fn acting_role(&self) -> Result<Role, SessionError> {
        let phase = self.game.phase();
        let role = phase.acting_role().ok_or(SessionError::WrongPhase {
            action: "night action",
            phase,
        })?;
        if !self.game.has_alive_role(role) {
            return Err(SessionError::RoleNotAlive(role));
        }
        Ok(role)
    }

    /// Players the acting role may pick in the current night sub-phase.
    pub fn night_action_candidates(&self) -> Result<Vec<&Player>, SessionError> {
        let role = self.acting_role()?;
        let night_zero = self.game.is_night_zero();

        let game = &self.game;
        let alive_others = || {
            game.alive_players()
                .into_iter()
                .filter(|p| p.role != role)
                .collect::<Vec<_>>()
        };

        match role {
            Role::Seer if night_zero => match self.game.rules().first_day_seer {
                FirstDaySeerRule::FreeSelect => Ok(alive_others()),
                FirstDaySeerRule::RandomWhite => Ok(self
                    .game
                    .first_day_white_target_id()
                    .and_then(|id| self.game.get_player(id).ok())
                    .filter(|p| p.is_alive)
                    .into_iter()
                    .collect()),
                FirstDaySeerRule::None => Err(SessionError::NoNightAction),
            },
            // 0日目は人狼の顔合わせのみ
            Role::Werewolf if night_zero => Err(SessionError::NoNightAction),
            Role::Medium => Ok(self
                .game
                .get_executed_player_on_day(self.game.day())
                .into_iter()
                .collect()),
            _ => Ok(alive_others()),
        }
    }

    pub fn night_action(&mut self, target_id: PlayerId) -> Result<NightActionOutcome, SessionError> {
        let role = self.acting_role()?;
        let eligible = self
            .night_action_candidates()?
            .iter()
            .any(|p| p.id == target_id);

        if !eligible {
            let target = self.game.get_player(target_id)?;
            return Err(match role {
                Role::Medium => SessionError::MediumTargetMismatch(target_id),
                _ if !target.is_alive => GameError::TargetNotAlive(target_id).into(),
                _ => SessionError::TargetNotEligible(target_id),
            });
        }

        match role {
            Role::Seer => self.game.set_seer_target(target_id)?,
            Role::Medium => self.game.set_medium_target(target_id)?,
            Role::Knight => self.game.set_guard_target(target_id)?,
            Role::Werewolf => self.game.set_attack_target(target_id)?,
            Role::Citizen | Role::Madman => return Err(SessionError::NoNightAction),
        }

        let is_werewolf = match role {
            Role::Seer | Role::Medium => Some(self.game.investigate(target_id)?),
            _ => None,
        };
        let target_name = self.player_name(target_id);
        let content = match (role, is_werewolf) {
            (Role::Seer, Some(wolf)) => format!("占い: {}は{}", target_name, reading(wolf)),
            (Role::Medium, Some(wolf)) => format!("霊媒: {}は{}", target_name, reading(wolf)),
            (Role::Knight, _) => format!("護衛: {}", target_name),
            _ => format!("襲撃: {}", target_name),
        };
        self.record(LogKind::NightAction, content);

        Ok(NightActionOutcome {
            role,
            target_id,
            target_name,
            is_werewolf,
        })
    }
}

fn reading(is_werewolf: bool) -> &'static str {
    if is_werewolf {
        "人狼である"
    } else {
        "人狼ではない"
    }
}
