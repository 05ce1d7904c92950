// src/board.rs

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::export::TextExporter;
use crate::models::{Board, BoardStatus, Task, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
use crate::store::Store;

// ─── REQUEST PAYLOADS ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub name: String,
    pub description: Option<String>,
    /// Trusted as given; boards are not validated against the team collection.
    pub team_id: u64,
    pub creation_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    /// The assignee, trusted as given.
    pub user_id: u64,
    pub board_id: u64,
    pub creation_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BoardSummary {
    pub id: u64,
    pub name: String,
}

// ─── CORE OPERATIONS ──────────────────────────────────────────────────────────

pub fn create(store: &mut Store, req: &CreateBoardRequest) -> Result<u64, ApiError> {
    if store
        .boards
        .iter()
        .any(|b| b.team_id == req.team_id && b.name == req.name)
    {
        return Err(ApiError::DuplicateName(
            "Board name must be unique for a team",
        ));
    }
    if req.name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::FieldTooLong("Board name", MAX_NAME_LEN));
    }
    if let Some(description) = &req.description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ApiError::FieldTooLong("Description", MAX_DESCRIPTION_LEN));
        }
    }

    let id = store.boards.len() as u64 + 1;
    store.boards.push(Board {
        id,
        name: req.name.clone(),
        description: req.description.clone().unwrap_or_default(),
        team_id: req.team_id,
        creation_time: req.creation_time,
        status: BoardStatus::Open,
        end_time: None,
    });
    store.save_boards()?;
    Ok(id)
}

/// One-way OPEN → CLOSED transition, gated on every task of the board
/// carrying the literal status "COMPLETE" (vacuously true without tasks).
pub fn close(store: &mut Store, id: u64) -> Result<(), ApiError> {
    let position = store
        .boards
        .iter()
        .position(|b| b.id == id)
        .ok_or(ApiError::NotFound("Board"))?;
    if store
        .tasks
        .iter()
        .any(|t| t.board_id == id && t.status != "COMPLETE")
    {
        return Err(ApiError::IncompleteTasks);
    }

    let board = &mut store.boards[position];
    board.status = BoardStatus::Closed;
    board.end_time = Some(Utc::now());
    store.save_boards()?;
    Ok(())
}

pub fn add_task(store: &mut Store, req: &CreateTaskRequest) -> Result<u64, ApiError> {
    if store
        .tasks
        .iter()
        .any(|t| t.board_id == req.board_id && t.title == req.title)
    {
        return Err(ApiError::DuplicateName(
            "Task title must be unique for a board",
        ));
    }
    if req.title.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::FieldTooLong("Task title", MAX_NAME_LEN));
    }
    if let Some(description) = &req.description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ApiError::FieldTooLong("Description", MAX_DESCRIPTION_LEN));
        }
    }
    let board = store
        .boards
        .iter()
        .find(|b| b.id == req.board_id)
        .ok_or(ApiError::NotFound("Board"))?;
    if board.status != BoardStatus::Open {
        return Err(ApiError::BoardClosed);
    }

    let id = store.tasks.len() as u64 + 1;
    store.tasks.push(Task {
        id,
        title: req.title.clone(),
        description: req.description.clone().unwrap_or_default(),
        user_id: req.user_id,
        board_id: req.board_id,
        creation_time: req.creation_time,
        status: "OPEN".to_string(),
    });
    store.save_tasks()?;
    Ok(id)
}

/// Stores the given status verbatim; the lifecycle is advisory and no
/// closed set is enforced.
pub fn set_task_status(store: &mut Store, id: u64, status: &str) -> Result<(), ApiError> {
    let task = store
        .tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(ApiError::NotFound("Task"))?;
    task.status = status.to_string();
    store.save_tasks()?;
    Ok(())
}

pub fn open_boards(store: &Store, team_id: u64) -> Vec<BoardSummary> {
    store
        .boards
        .iter()
        .filter(|b| b.team_id == team_id && b.status == BoardStatus::Open)
        .map(|b| BoardSummary {
            id: b.id,
            name: b.name.clone(),
        })
        .collect()
}

pub fn export(store: &Store, exporter: &TextExporter, id: u64) -> Result<String, ApiError> {
    let board = store
        .boards
        .iter()
        .find(|b| b.id == id)
        .ok_or(ApiError::NotFound("Board"))?;

    let mut report = format!(
        "Board: {}\nDescription: {}\nStatus: {}\nTasks:\n",
        board.name, board.description, board.status
    );
    for task in store.tasks.iter().filter(|t| t.board_id == id) {
        report.push_str(&format!(
            "  - {} ({}): {}\n",
            task.title, task.status, task.description
        ));
    }

    let location = exporter.write(&board.id.to_string(), &report)?;
    Ok(location)
}

// ─── HANDLERS ─────────────────────────────────────────────────────────────────

/// POST /boards
pub async fn create_board(
    data: web::Data<AppState>,
    payload: web::Json<CreateBoardRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut store = data.store();
    let id = create(&mut store, &payload)?;
    info!("board {} ({}) created for team {}", id, payload.name, payload.team_id);
    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

/// POST /boards/{board_id}/close
pub async fn close_board(
    data: web::Data<AppState>,
    board_id: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let mut store = data.store();
    close(&mut store, *board_id)?;
    info!("board {} closed", board_id);
    Ok(HttpResponse::Ok().json(json!({})))
}

/// POST /tasks
pub async fn create_task(
    data: web::Data<AppState>,
    payload: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut store = data.store();
    let id = add_task(&mut store, &payload)?;
    info!("task {} ({}) added to board {}", id, payload.title, payload.board_id);
    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

/// PUT /tasks/{task_id}/status
pub async fn update_task_status(
    data: web::Data<AppState>,
    task_id: web::Path<u64>,
    payload: web::Json<UpdateTaskStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut store = data.store();
    set_task_status(&mut store, *task_id, &payload.status)?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// GET /teams/{team_id}/boards
pub async fn list_boards(
    data: web::Data<AppState>,
    team_id: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let store = data.store();
    Ok(HttpResponse::Ok().json(open_boards(&store, *team_id)))
}

/// GET /boards/{board_id}/export
pub async fn export_board(
    data: web::Data<AppState>,
    board_id: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let store = data.store();
    let out_file = export(&store, &data.exporter, *board_id)?;
    info!("board {} exported to {}", board_id, out_file);
    Ok(HttpResponse::Ok().json(json!({ "out_file": out_file })))
}
