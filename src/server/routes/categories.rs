use axum::{extract::State, routing::get, Router};
use sqlx::SqlitePool;

use crate::server::app::AppState;
use crate::server::extract::{ApiPath, ApiQuery, PageQuery};
use crate::trivia::{self, format::CategoriesListing, format::QuestionsPage};

use super::{success, ApiResponse};

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesListing> {
    Ok(success(trivia::list_categories(&pool).await?))
}

async fn get_category_questions(
    State(pool): State<SqlitePool>,
    ApiPath(category_id): ApiPath<i64>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let page =
        trivia::questions::list_questions_for_category(&pool, category_id, page).await?;
    Ok(success(page))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(get_category_questions))
        .with_state(state)
}
