use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::Display;
use serde::Serialize;

#[derive(Debug, Display)]
pub enum ApiError {
    #[display("{}", _0)]
    NotFound(&'static str),
    #[display("{}", _0)]
    Unauthorized(&'static str),
    #[display("{}", _0)]
    Forbidden(&'static str),
    #[display("bad request: {}", _0)]
    BadRequest(String),
    #[display("internal")]
    Internal,
}

#[derive(Serialize)]
struct ErrBody {
    message: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrBody {
            message: self.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepoErr {
    #[error("not found")]
    NotFound,
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    #[error("backend: {0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for RepoErr {
    fn from(e: mongodb::error::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

impl RepoErr {
    /// Maps a store failure onto the response for a route whose missing
    /// resource is reported as `not_found`.
    pub fn into_api(self, not_found: &'static str) -> ApiError {
        match self {
            Self::NotFound => ApiError::NotFound(not_found),
            Self::InvalidReference(e) => ApiError::BadRequest(e),
            Self::Backend(e) => {
                tracing::error!(err = %e, "store call failed");
                ApiError::Internal
            }
        }
    }
}

impl From<RepoErr> for ApiError {
    fn from(e: RepoErr) -> Self {
        e.into_api("not found")
    }
}
