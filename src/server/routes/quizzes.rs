use axum::{extract::State, routing::post, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::Question;
use crate::server::app::AppState;
use crate::server::extract::ApiJson;
use crate::telemetry::Metrics;
use crate::trivia::quiz::{self, QuizRequest, SharedRng};

use super::{success, ApiResponse};

#[derive(Serialize)]
struct NextQuestion {
    /// `None` once every question of the category was served.
    question: Option<Question>,
}

async fn next_question(
    State(pool): State<SqlitePool>,
    State(rng): State<SharedRng>,
    State(metrics): State<Metrics>,
    ApiJson(request): ApiJson<QuizRequest>,
) -> ApiResponse<NextQuestion> {
    let category = request.category();
    let candidates =
        quiz::quiz_candidates(&pool, category, &request.previous_questions).await?;
    let question = {
        let mut rng = rng.lock().await;
        quiz::pick(candidates, &mut *rng)
    };

    match &question {
        Some(q) => {
            metrics
                .quiz_questions_served
                .with_label_values(&[category.label().as_str()])
                .inc();
            tracing::debug!(id = q.id, category = %category.label(), "Quiz question drawn");
        }
        None => tracing::debug!(category = %category.label(), "Quiz exhausted"),
    }
    Ok(success(NextQuestion { question }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
