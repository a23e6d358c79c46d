use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use super::error::{TriviaError, TriviaResult};
use super::format::{category_map, QuestionsPage, SearchResults};
use super::pagination::page_window;
use super::search::matching_questions;
use crate::db::queries::{categories, questions};

pub const DIFFICULTY_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// Fields of a question before the store assigns it an id.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDraft {
    pub question: String,
    pub answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub category: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub difficulty: i64,
}

impl QuestionDraft {
    pub fn validate(&self) -> TriviaResult<()> {
        if self.question.trim().is_empty() {
            return Err(TriviaError::Unprocessable("question is blank".to_owned()));
        }
        if self.answer.trim().is_empty() {
            return Err(TriviaError::Unprocessable("answer is blank".to_owned()));
        }
        if !DIFFICULTY_RANGE.contains(&self.difficulty) {
            return Err(TriviaError::Unprocessable(format!(
                "difficulty {} is outside {DIFFICULTY_RANGE:?}",
                self.difficulty
            )));
        }
        Ok(())
    }
}

pub async fn list_questions(pool: &SqlitePool, page: u64) -> TriviaResult<QuestionsPage> {
    let all = questions::get_all_questions(pool).await?;
    let window = page_window(&all, page)?.to_vec();
    Ok(QuestionsPage {
        questions: window,
        total_questions: all.len(),
        categories: category_map(categories::get_all_categories(pool).await?),
        current_category: None,
    })
}

pub async fn list_questions_for_category(
    pool: &SqlitePool,
    category: i64,
    page: u64,
) -> TriviaResult<QuestionsPage> {
    let matching = questions::get_questions_for_category(pool, category).await?;
    if matching.is_empty() {
        return Err(TriviaError::NotFound(format!(
            "no questions in category {category}"
        )));
    }
    let window = page_window(&matching, page)?.to_vec();
    Ok(QuestionsPage {
        questions: window,
        total_questions: matching.len(),
        categories: category_map(categories::get_all_categories(pool).await?),
        current_category: Some(category),
    })
}

pub async fn search_questions(pool: &SqlitePool, term: &str) -> TriviaResult<SearchResults> {
    let found = matching_questions(questions::get_all_questions(pool).await?, term);
    Ok(SearchResults {
        total_questions: found.len(),
        questions: found,
        current_category: None,
    })
}

pub async fn create_question(pool: &SqlitePool, draft: &QuestionDraft) -> TriviaResult<i64> {
    draft.validate()?;
    questions::create_question(
        pool,
        draft.question.trim(),
        draft.answer.trim(),
        draft.category,
        draft.difficulty,
    )
    .await
    .map_err(|e| TriviaError::Unprocessable(format!("question was not stored: {e}")))
}

pub async fn delete_question(pool: &SqlitePool, id: i64) -> TriviaResult<i64> {
    if questions::delete_question(pool, id).await? {
        Ok(id)
    } else {
        Err(TriviaError::NotFound(format!("question {id} does not exist")))
    }
}
