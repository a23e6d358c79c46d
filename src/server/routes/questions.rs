use axum::{
    extract::State,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::server::app::AppState;
use crate::server::extract::{ApiJson, ApiPath, ApiQuery, PageQuery};
use crate::telemetry::Metrics;
use crate::trivia::format::{QuestionsPage, SearchResults};
use crate::trivia::questions::{self, QuestionDraft};

use super::{success, ApiResponse};

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm", alias = "search_term")]
    search_term: String,
}

#[derive(Serialize)]
struct Created {
    created: i64,
}

#[derive(Serialize)]
struct Deleted {
    deleted: i64,
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    Ok(success(questions::list_questions(&pool, page).await?))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    State(metrics): State<Metrics>,
    ApiJson(draft): ApiJson<QuestionDraft>,
) -> ApiResponse<Created> {
    let id = questions::create_question(&pool, &draft).await?;
    metrics
        .question_mutations
        .with_label_values(&["created"])
        .inc();
    tracing::info!(id, category = draft.category, "Question created");
    Ok(success(Created { created: id }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    State(metrics): State<Metrics>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<Deleted> {
    let deleted = questions::delete_question(&pool, id).await?;
    metrics
        .question_mutations
        .with_label_values(&["deleted"])
        .inc();
    tracing::info!(id, "Question deleted");
    Ok(success(Deleted { deleted }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    ApiJson(body): ApiJson<SearchBody>,
) -> ApiResponse<SearchResults> {
    Ok(success(
        questions::search_questions(&pool, &body.search_term).await?,
    ))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
