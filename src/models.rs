// src/models.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field length caps shared by every manager.
pub const MAX_NAME_LEN: usize = 64;
pub const MAX_DESCRIPTION_LEN: usize = 128;
/// Display names accept 64 characters at creation but 128 on update.
pub const MAX_DISPLAY_NAME_UPDATE_LEN: usize = 128;
/// A team never holds more than this many members.
pub const MAX_TEAM_USERS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    pub creation_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub creation_time: DateTime<Utc>,
    pub admin: u64,
    pub users: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub team_id: u64,
    /// Caller-supplied, unlike the server-assigned user/team timestamps.
    pub creation_time: DateTime<Utc>,
    pub status: BoardStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardStatus {
    Open,
    Closed,
}

impl fmt::Display for BoardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardStatus::Open => f.write_str("OPEN"),
            BoardStatus::Closed => f.write_str("CLOSED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub user_id: u64,
    pub board_id: u64,
    pub creation_time: DateTime<Utc>,
    /// Free-form; only the literal "COMPLETE" is meaningful to board closure.
    pub status: String,
}
