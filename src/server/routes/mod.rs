mod categories;
mod questions;
mod quizzes;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use axum::Json;
use serde::Serialize;

use super::error::ApiError;

/// Success envelope: `{"success": true, ...body}`.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

pub type ApiResponse<T> = Result<Json<Success<T>>, ApiError>;

pub fn success<T: Serialize>(body: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        body,
    })
}
