// src/team_management.rs

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::{Team, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_TEAM_USERS};
use crate::store::Store;

// ─── REQUEST PAYLOADS ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub description: Option<String>,
    pub admin: u64,
}

/// Partial update for a team. Only `name` and `description` are mutable;
/// `id`, `admin` and `users` are modelled so their presence fails with
/// `ImmutableField` rather than silently overwriting the record, and
/// anything else is rejected at deserialisation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamPatch {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub admin: Option<u64>,
    pub users: Option<Vec<u64>>,
}

#[derive(Debug, Deserialize)]
pub struct MembershipRequest {
    pub users: Vec<u64>,
}

/// Listing/describe projection: membership stays internal.
#[derive(Debug, Serialize, PartialEq)]
pub struct TeamSummary {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub creation_time: DateTime<Utc>,
    pub admin: u64,
}

/// A membership entry as reported by `list_members`. The manager does not
/// cross-reference the user collection, so all three fields carry the raw
/// member id.
#[derive(Debug, Serialize, PartialEq)]
pub struct TeamMemberRef {
    pub id: u64,
    pub name: u64,
    pub display_name: u64,
}

fn summarize(team: &Team) -> TeamSummary {
    TeamSummary {
        id: team.id,
        name: team.name.clone(),
        description: team.description.clone(),
        creation_time: team.creation_time,
        admin: team.admin,
    }
}

// ─── CORE OPERATIONS ──────────────────────────────────────────────────────────

pub fn create(store: &mut Store, req: &CreateTeamRequest) -> Result<u64, ApiError> {
    if store.teams.iter().any(|t| t.name == req.name) {
        return Err(ApiError::DuplicateName("Team name must be unique"));
    }
    if req.name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::FieldTooLong("Team name", MAX_NAME_LEN));
    }
    if let Some(description) = &req.description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ApiError::FieldTooLong("Description", MAX_DESCRIPTION_LEN));
        }
    }

    let id = store.teams.len() as u64 + 1;
    store.teams.push(Team {
        id,
        name: req.name.clone(),
        description: req.description.clone().unwrap_or_default(),
        creation_time: Utc::now(),
        admin: req.admin,
        users: vec![req.admin],
    });
    store.save_teams()?;
    Ok(id)
}

pub fn list(store: &Store) -> Vec<TeamSummary> {
    store.teams.iter().map(summarize).collect()
}

pub fn describe(store: &Store, id: u64) -> Result<TeamSummary, ApiError> {
    store
        .teams
        .iter()
        .find(|t| t.id == id)
        .map(summarize)
        .ok_or(ApiError::NotFound("Team"))
}

pub fn update(store: &mut Store, id: u64, patch: &TeamPatch) -> Result<(), ApiError> {
    if !store.teams.iter().any(|t| t.id == id) {
        return Err(ApiError::NotFound("Team"));
    }
    if patch.id.is_some() {
        return Err(ApiError::ImmutableField("Team id"));
    }
    if patch.admin.is_some() {
        return Err(ApiError::ImmutableField("Team admin"));
    }
    if patch.users.is_some() {
        return Err(ApiError::ImmutableField("Team membership"));
    }
    if let Some(name) = &patch.name {
        if store.teams.iter().any(|t| t.id != id && t.name == *name) {
            return Err(ApiError::DuplicateName("Team name must be unique"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ApiError::FieldTooLong("Team name", MAX_NAME_LEN));
        }
    }
    if let Some(description) = &patch.description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ApiError::FieldTooLong("Description", MAX_DESCRIPTION_LEN));
        }
    }

    let team = store
        .teams
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(ApiError::NotFound("Team"))?;
    if let Some(name) = &patch.name {
        team.name = name.clone();
    }
    if let Some(description) = &patch.description {
        team.description = description.clone();
    }
    store.save_teams()?;
    Ok(())
}

/// Appends the given ids verbatim: no de-duplication and no existence
/// check against the user collection.
pub fn add_users(store: &mut Store, id: u64, users: &[u64]) -> Result<(), ApiError> {
    let team = store
        .teams
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(ApiError::NotFound("Team"))?;
    if team.users.len() + users.len() > MAX_TEAM_USERS {
        return Err(ApiError::CapacityExceeded(MAX_TEAM_USERS));
    }
    team.users.extend_from_slice(users);
    store.save_teams()?;
    Ok(())
}

/// Removes every occurrence of each given id; ids not present are a no-op.
pub fn remove_users(store: &mut Store, id: u64, users: &[u64]) -> Result<(), ApiError> {
    let team = store
        .teams
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(ApiError::NotFound("Team"))?;
    team.users.retain(|member| !users.contains(member));
    store.save_teams()?;
    Ok(())
}

pub fn members(store: &Store, id: u64) -> Result<Vec<TeamMemberRef>, ApiError> {
    let team = store
        .teams
        .iter()
        .find(|t| t.id == id)
        .ok_or(ApiError::NotFound("Team"))?;
    Ok(team
        .users
        .iter()
        .map(|&member| TeamMemberRef {
            id: member,
            name: member,
            display_name: member,
        })
        .collect())
}

// ─── HANDLERS ─────────────────────────────────────────────────────────────────

/// POST /teams
pub async fn create_team(
    data: web::Data<AppState>,
    payload: web::Json<CreateTeamRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut store = data.store();
    let id = create(&mut store, &payload)?;
    info!("team {} ({}) created", id, payload.name);
    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

/// GET /teams
pub async fn list_teams(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = data.store();
    Ok(HttpResponse::Ok().json(list(&store)))
}

/// GET /teams/{team_id}
pub async fn get_team(
    data: web::Data<AppState>,
    team_id: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let store = data.store();
    Ok(HttpResponse::Ok().json(describe(&store, *team_id)?))
}

/// PUT /teams/{team_id}
pub async fn update_team(
    data: web::Data<AppState>,
    team_id: web::Path<u64>,
    patch: web::Json<TeamPatch>,
) -> Result<HttpResponse, ApiError> {
    let mut store = data.store();
    update(&mut store, *team_id, &patch)?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// POST /teams/{team_id}/users
pub async fn add_team_users(
    data: web::Data<AppState>,
    team_id: web::Path<u64>,
    payload: web::Json<MembershipRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut store = data.store();
    add_users(&mut store, *team_id, &payload.users)?;
    info!("{} users added to team {}", payload.users.len(), team_id);
    Ok(HttpResponse::Ok().json(json!({})))
}

/// DELETE /teams/{team_id}/users
pub async fn remove_team_users(
    data: web::Data<AppState>,
    team_id: web::Path<u64>,
    payload: web::Json<MembershipRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut store = data.store();
    remove_users(&mut store, *team_id, &payload.users)?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// GET /teams/{team_id}/users
pub async fn get_team_members(
    data: web::Data<AppState>,
    team_id: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let store = data.store();
    Ok(HttpResponse::Ok().json(members(&store, *team_id)?))
}
