use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::api::data::ResultMessage;
use crate::db::DbError;

/// Request-boundary error taxonomy. Every failure a handler can produce is
/// resolved here into a status code and a machine-readable JSON body, nothing
/// propagates past the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    NotFound(String),
    Conflict(String),
    BadRequest(String),
    ServerError(String),
}

impl ApiError {
    pub fn to_response(&self) -> rouille::Response {
        let (status_code, message) = match *self {
            ApiError::NotFound(ref v) => (404, v),
            ApiError::Conflict(ref v) => (409, v),
            ApiError::BadRequest(ref v) => (400, v),
            ApiError::ServerError(ref v) => (500, v),
        };
        let body = serde_json::to_string(&ResultMessage::new(false, message.clone()))
            .unwrap_or_else(|_| String::from("{\"ok\":false,\"message\":\"encoding error\"}"));
        rouille::Response::text(body)
            .with_status_code(status_code)
            .with_no_cache()
            .with_unique_header("Content-Type", "application/json")
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match *self {
            ApiError::NotFound(ref v) => write!(f, "NotFound '{}'", v),
            ApiError::Conflict(ref v) => write!(f, "Conflict '{}'", v),
            ApiError::BadRequest(ref v) => write!(f, "BadRequest '{}'", v),
            ApiError::ServerError(ref v) => write!(f, "ServerError '{}'", v),
        }
    }
}

impl Error for ApiError {}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::CountryNotFoundError => {
                ApiError::NotFound(String::from("country not found"))
            }
            DbError::DuplicateCountryError(id) => {
                ApiError::Conflict(format!("country with id {} already exists", id))
            }
            DbError::ValidationError(msg) => ApiError::BadRequest(msg),
            DbError::ConnectionError(msg) => ApiError::ServerError(msg),
        }
    }
}
