use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use werewolf_engine::GamePhase;

/// Moderator-facing record of what happened in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionLog {
    pub session_id: String,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub entry_id: String,
    pub day: u32,
    pub phase: GamePhase,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub kind: LogKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Setup,       // 参加者・ルールの変更
    Phase,       // フェーズ移行
    Execution,   // 処刑
    NightAction, // 夜の行動
    Morning,     // 朝の結果発表
    Victory,     // 勝敗決定
}

impl SessionLog {
    pub fn new(session_id: String) -> Self {
        SessionLog {
            session_id,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, kind: LogKind, day: u32, phase: GamePhase, content: String) {
        tracing::debug!("[{}] {:?}: {}", self.session_id, kind, content);
        self.entries.push(LogEntry::new(kind, day, phase, content));
    }

    pub fn get_entries_by_kind(&self, kind: LogKind) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }
}

impl LogEntry {
    pub fn new(kind: LogKind, day: u32, phase: GamePhase, content: String) -> Self {
        LogEntry {
            entry_id: uuid::Uuid::new_v4().to_string(),
            day,
            phase,
            content,
            timestamp: Utc::now(),
            kind,
        }
    }
}
