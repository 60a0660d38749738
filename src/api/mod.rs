//! REST API module.
//!
//! Contains all API routes and handlers. Every data handler obtains the
//! repository through the lazily connected [`crate::db::Database`].

mod answers;
mod github_repos;
mod knowledge;
mod questions;
mod reviews;
mod tech_notes;
mod tech_stack;

pub use answers::*;
pub use github_repos::*;
pub use knowledge::*;
pub use questions::*;
pub use reviews::*;
pub use tech_notes::*;
pub use tech_stack::*;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::AppError;

/// JSON body extractor that reports rejections as [`AppError`] JSON bodies.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::JsonDataError(e)) => Err(AppError::Validation(e.body_text())),
            Err(JsonRejection::JsonSyntaxError(e)) => Err(AppError::Validation(e.body_text())),
            Err(e) => Err(AppError::BadRequest(e.body_text())),
        }
    }
}

/// Body for successful deletes.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub ok: bool,
}

impl Deleted {
    pub fn response() -> Json<Self> {
        Json(Self { ok: true })
    }
}

/// 201 response carrying the created entity.
pub fn created<T: Serialize>(entity: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(entity))
}

/// Parse an optional enumerated query parameter; blank means absent.
pub(crate) fn parse_param<T>(
    name: &str,
    raw: Option<&str>,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, AppError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => parse(value)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Invalid {}: {}", name, value))),
    }
}

/// Treat a blank text query parameter as absent.
pub(crate) fn text_param(raw: Option<String>) -> Option<String> {
    raw.filter(|v| !v.trim().is_empty())
}
