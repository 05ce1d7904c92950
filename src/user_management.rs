// src/user_management.rs

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::{User, MAX_DISPLAY_NAME_UPDATE_LEN, MAX_NAME_LEN};
use crate::store::Store;

// ─── REQUEST PAYLOADS ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub display_name: Option<String>,
}

/// Partial update for a user. The accepted field set is closed: unknown
/// keys are rejected at deserialisation, and `id`/`name` are modelled only
/// so their presence can fail with `ImmutableField` instead of being
/// merged blindly.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub display_name: Option<String>,
}

/// Projection of a team as seen from a user's membership list. Unlike the
/// team listing it carries no admin field.
#[derive(Debug, Serialize, PartialEq)]
pub struct UserTeamSummary {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub creation_time: DateTime<Utc>,
}

// ─── CORE OPERATIONS ──────────────────────────────────────────────────────────

pub fn create(store: &mut Store, req: &CreateUserRequest) -> Result<u64, ApiError> {
    if store.users.iter().any(|u| u.name == req.name) {
        return Err(ApiError::DuplicateName("User name must be unique"));
    }
    if req.name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::FieldTooLong("User name", MAX_NAME_LEN));
    }
    if let Some(display_name) = &req.display_name {
        if display_name.chars().count() > MAX_NAME_LEN {
            return Err(ApiError::FieldTooLong("Display name", MAX_NAME_LEN));
        }
    }

    let id = store.users.len() as u64 + 1;
    store.users.push(User {
        id,
        name: req.name.clone(),
        display_name: req.display_name.clone().unwrap_or_default(),
        creation_time: Utc::now(),
    });
    store.save_users()?;
    Ok(id)
}

pub fn describe(store: &Store, id: u64) -> Result<User, ApiError> {
    store
        .users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .ok_or(ApiError::NotFound("User"))
}

pub fn update(store: &mut Store, id: u64, patch: &UserPatch) -> Result<(), ApiError> {
    let user = store
        .users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or(ApiError::NotFound("User"))?;

    if patch.name.is_some() {
        return Err(ApiError::ImmutableField("User name"));
    }
    if patch.id.is_some() {
        return Err(ApiError::ImmutableField("User id"));
    }
    if let Some(display_name) = &patch.display_name {
        if display_name.chars().count() > MAX_DISPLAY_NAME_UPDATE_LEN {
            return Err(ApiError::FieldTooLong(
                "Display name",
                MAX_DISPLAY_NAME_UPDATE_LEN,
            ));
        }
        user.display_name = display_name.clone();
    }
    store.save_users()?;
    Ok(())
}

/// Every team whose membership list carries the given id. The user id
/// itself is not checked for existence; no memberships means an empty list.
pub fn teams_for(store: &Store, user_id: u64) -> Vec<UserTeamSummary> {
    store
        .teams
        .iter()
        .filter(|t| t.users.contains(&user_id))
        .map(|t| UserTeamSummary {
            id: t.id,
            name: t.name.clone(),
            description: t.description.clone(),
            creation_time: t.creation_time,
        })
        .collect()
}

// ─── HANDLERS ─────────────────────────────────────────────────────────────────

/// POST /users
pub async fn create_user(
    data: web::Data<AppState>,
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut store = data.store();
    let id = create(&mut store, &payload)?;
    info!("user {} ({}) created", id, payload.name);
    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

/// GET /users
pub async fn list_users(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = data.store();
    Ok(HttpResponse::Ok().json(&store.users))
}

/// GET /users/{user_id}
pub async fn get_user(
    data: web::Data<AppState>,
    user_id: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let store = data.store();
    let user = describe(&store, *user_id)?;
    Ok(HttpResponse::Ok().json(user))
}

/// PUT /users/{user_id}
pub async fn update_user(
    data: web::Data<AppState>,
    user_id: web::Path<u64>,
    patch: web::Json<UserPatch>,
) -> Result<HttpResponse, ApiError> {
    let mut store = data.store();
    update(&mut store, *user_id, &patch)?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// GET /users/{user_id}/teams
pub async fn get_user_teams(
    data: web::Data<AppState>,
    user_id: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let store = data.store();
    Ok(HttpResponse::Ok().json(teams_for(&store, *user_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team_management;
    use tempfile::tempdir;

    fn fixture() -> (tempfile::TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store)
    }

    fn new_user(name: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            display_name: None,
        }
    }

    #[test]
    fn ids_are_assigned_sequentially_in_creation_order() {
        let (_dir, mut store) = fixture();
        for (i, name) in ["alice", "bob", "carol"].iter().enumerate() {
            let id = create(&mut store, &new_user(name)).unwrap();
            assert_eq!(id, i as u64 + 1);
        }
    }

    #[test]
    fn duplicate_user_name_is_rejected() {
        let (_dir, mut store) = fixture();
        create(&mut store, &new_user("alice")).unwrap();
        let err = create(&mut store, &new_user("alice")).unwrap_err();
        assert!(matches!(err, ApiError::DuplicateName(_)));
        assert_eq!(store.users.len(), 1);
    }

    #[test]
    fn overlong_fields_are_rejected_at_creation() {
        let (_dir, mut store) = fixture();
        let err = create(&mut store, &new_user(&"x".repeat(65))).unwrap_err();
        assert!(matches!(err, ApiError::FieldTooLong("User name", 64)));

        let err = create(
            &mut store,
            &CreateUserRequest {
                name: "alice".to_string(),
                display_name: Some("x".repeat(65)),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::FieldTooLong("Display name", 64)));
        assert!(store.users.is_empty());
    }

    #[test]
    fn describe_unknown_user_is_not_found() {
        let (_dir, store) = fixture();
        assert!(matches!(
            describe(&store, 1).unwrap_err(),
            ApiError::NotFound("User")
        ));
    }

    #[test]
    fn patch_with_name_always_fails_as_immutable() {
        let (_dir, mut store) = fixture();
        create(&mut store, &new_user("alice")).unwrap();
        let err = update(
            &mut store,
            1,
            &UserPatch {
                id: None,
                name: Some("mallory".to_string()),
                display_name: Some("Mallory".to_string()),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::ImmutableField("User name")));
        assert_eq!(store.users[0].name, "alice");
        assert_eq!(store.users[0].display_name, "");
    }

    #[test]
    fn update_merges_display_name_and_allows_the_wider_cap() {
        let (_dir, mut store) = fixture();
        create(&mut store, &new_user("alice")).unwrap();

        // 100 chars is over the creation cap but under the update cap.
        let long = "d".repeat(100);
        update(
            &mut store,
            1,
            &UserPatch {
                id: None,
                name: None,
                display_name: Some(long.clone()),
            },
        )
        .unwrap();
        assert_eq!(store.users[0].display_name, long);

        let err = update(
            &mut store,
            1,
            &UserPatch {
                id: None,
                name: None,
                display_name: Some("d".repeat(129)),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::FieldTooLong("Display name", 128)));
    }

    #[test]
    fn teams_for_returns_memberships_and_is_silent_for_unknown_users() {
        let (_dir, mut store) = fixture();
        let team_id = team_management::create(
            &mut store,
            &team_management::CreateTeamRequest {
                name: "platform".to_string(),
                description: Some("infra".to_string()),
                admin: 7,
            },
        )
        .unwrap();

        let teams = teams_for(&store, 7);
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].id, team_id);
        assert_eq!(teams[0].name, "platform");

        assert!(teams_for(&store, 99).is_empty());
    }
}
