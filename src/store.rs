// src/store.rs

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::models::{Board, Task, Team, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization: {0}")]
    Json(#[from] serde_json::Error),
}

/// The single owned repository for all four collections.
///
/// Every collection lives in memory and is rewritten to its flat file in
/// full after each mutation. A storage key that has never been written
/// loads as an empty collection.
pub struct Store {
    data_dir: PathBuf,
    pub users: Vec<User>,
    pub teams: Vec<Team>,
    pub boards: Vec<Board>,
    pub tasks: Vec<Task>,
}

impl Store {
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            users: load_collection(&data_dir.join("users.json"))?,
            teams: load_collection(&data_dir.join("teams.json"))?,
            boards: load_collection(&data_dir.join("boards.json"))?,
            tasks: load_collection(&data_dir.join("tasks.json"))?,
            data_dir,
        })
    }

    pub fn save_users(&self) -> Result<(), StoreError> {
        save_collection(&self.data_dir.join("users.json"), &self.users)
    }

    pub fn save_teams(&self) -> Result<(), StoreError> {
        save_collection(&self.data_dir.join("teams.json"), &self.teams)
    }

    pub fn save_boards(&self) -> Result<(), StoreError> {
        save_collection(&self.data_dir.join("boards.json"), &self.boards)
    }

    pub fn save_tasks(&self) -> Result<(), StoreError> {
        save_collection(&self.data_dir.join("tasks.json"), &self.tasks)
    }
}

fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn save_collection<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    fs::write(path, serde_json::to_string(records)?)?;
    Ok(())
}
