use log::error;
use rocket::http::Status;
use rocket::response::{self, status, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde::Serialize;
use thiserror::Error;

use std::sync::PoisonError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid date format. Use YYYY-MM-DD")]
    InvalidDateFormat,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(what: impl Into<String>) -> ApiError {
        ApiError::Validation(what.into())
    }

    pub fn status(&self) -> Status {
        match self {
            ApiError::InvalidDateFormat | ApiError::Validation(_) => Status::BadRequest,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Internal(_) => Status::InternalServerError,
        }
    }
}

impl<T> From<PoisonError<T>> for ApiError {
    fn from(e: PoisonError<T>) -> ApiError {
        ApiError::Internal(e.to_string())
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(e: rusqlite::Error) -> ApiError {
        ApiError::Internal(e.to_string())
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Json<ErrorBody> {
        Json(ErrorBody {
            error: error.into(),
        })
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let message = match &self {
            ApiError::Internal(what) => {
                error!("{} {} failed: {}", request.method(), request.uri(), what);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        status::Custom(self.status(), ErrorBody::new(message)).respond_to(request)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
