// src/error.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Every caller-visible failure the managers can raise. Validation runs
/// before any mutation, so a returned error leaves both the in-memory
/// collections and the backing files untouched.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    DuplicateName(&'static str),
    #[error("{0} can be max {1} characters")]
    FieldTooLong(&'static str, usize),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0} cannot be updated")]
    ImmutableField(&'static str),
    #[error("Cannot add more than {0} users to a team")]
    CapacityExceeded(usize),
    #[error("You can only close boards with all tasks marked as COMPLETE")]
    IncompleteTasks,
    #[error("Can only add task to an OPEN board")]
    BoardClosed,
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Storage(StoreError::Io(err))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Storage(err) = self {
            error!("storage failure: {}", err);
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_and_the_rest_of_the_taxonomy_to_400() {
        assert_eq!(
            ApiError::NotFound("Board").status_code(),
            StatusCode::NOT_FOUND
        );
        for err in [
            ApiError::DuplicateName("User name must be unique"),
            ApiError::FieldTooLong("User name", 64),
            ApiError::ImmutableField("User name"),
            ApiError::CapacityExceeded(50),
            ApiError::IncompleteTasks,
            ApiError::BoardClosed,
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn messages_follow_the_documented_phrasing() {
        assert_eq!(
            ApiError::FieldTooLong("Team name", 64).to_string(),
            "Team name can be max 64 characters"
        );
        assert_eq!(ApiError::NotFound("Task").to_string(), "Task not found");
        assert_eq!(
            ApiError::ImmutableField("User name").to_string(),
            "User name cannot be updated"
        );
        assert_eq!(
            ApiError::CapacityExceeded(50).to_string(),
            "Cannot add more than 50 users to a team"
        );
    }
}
