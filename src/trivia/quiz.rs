use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use super::error::{TriviaError, TriviaResult};
use crate::db::queries::questions::{get_all_questions, get_questions_for_category};
use crate::db::Question;

/// Randomness for quiz draws, shared by all requests.
pub type SharedRng = Arc<Mutex<StdRng>>;

pub fn entropy_rng() -> SharedRng {
    Arc::new(Mutex::new(StdRng::from_entropy()))
}

pub fn seeded_rng(seed: u64) -> SharedRng {
    Arc::new(Mutex::new(StdRng::seed_from_u64(seed)))
}

/// Category id the client sends for "All".
pub const ALL_CATEGORIES_ID: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCategory {
    All,
    Category(i64),
}

impl QuizCategory {
    pub fn from_id(id: i64) -> Self {
        if id == ALL_CATEGORIES_ID {
            Self::All
        } else {
            Self::Category(id)
        }
    }

    /// Label for metrics.
    pub fn label(&self) -> String {
        match self {
            Self::All => "all".to_owned(),
            Self::Category(id) => id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizCategoryRef {
    /// Category ids leave as JSON object keys, so clients may echo them back as strings.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub id: i64,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Vec<i64>,
    #[serde(default)]
    pub quiz_category: Option<QuizCategoryRef>,
}

impl QuizRequest {
    pub fn category(&self) -> QuizCategory {
        self.quiz_category
            .as_ref()
            .map_or(QuizCategory::All, |c| QuizCategory::from_id(c.id))
    }
}

/// Questions of `category` not yet served.
///
/// `NotFound` when the category holds no questions at all; an empty result
/// means the quiz is over.
pub async fn quiz_candidates(
    pool: &SqlitePool,
    category: QuizCategory,
    previous: &[i64],
) -> TriviaResult<Vec<Question>> {
    let questions = match category {
        QuizCategory::All => get_all_questions(pool).await?,
        QuizCategory::Category(id) => get_questions_for_category(pool, id).await?,
    };
    if questions.is_empty() {
        return Err(TriviaError::NotFound(format!(
            "no questions in category {}",
            category.label()
        )));
    }
    Ok(exclude_served(questions, previous))
}

pub fn exclude_served(questions: Vec<Question>, previous: &[i64]) -> Vec<Question> {
    let served: HashSet<i64> = previous.iter().copied().collect();
    questions
        .into_iter()
        .filter(|q| !served.contains(&q.id))
        .collect()
}

/// Uniform draw over `candidates`; `None` once they are exhausted.
pub fn pick<R: Rng + ?Sized>(candidates: Vec<Question>, rng: &mut R) -> Option<Question> {
    candidates.choose(rng).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::questions::create_question;
    use crate::db::{establish_in_memory_connection, run_migrations};

    fn question(id: i64) -> Question {
        Question {
            id,
            question: format!("question {id}"),
            answer: format!("answer {id}"),
            category: 2,
            difficulty: 1,
        }
    }

    #[test]
    fn last_unserved_question_is_always_picked() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let candidates = exclude_served(vec![question(1), question(2), question(3)], &[1, 2]);
            assert_eq!(pick(candidates, &mut rng).map(|q| q.id), Some(3));
        }
    }

    #[test]
    fn exhausted_candidates_yield_none() {
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = exclude_served(vec![question(1), question(2), question(3)], &[1, 2, 3]);
        assert!(pick(candidates, &mut rng).is_none());
    }

    #[test]
    fn every_candidate_can_be_drawn() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut drawn = HashSet::new();
        for _ in 0..200 {
            let candidates = vec![question(1), question(2), question(3), question(4)];
            drawn.insert(pick(candidates, &mut rng).unwrap().id);
        }
        assert_eq!(drawn, HashSet::from([1, 2, 3, 4]));
    }

    #[test]
    fn missing_or_zero_category_means_all() {
        let request: QuizRequest = serde_json::from_str(r#"{"previous_questions": [1]}"#).unwrap();
        assert_eq!(request.category(), QuizCategory::All);

        let request: QuizRequest =
            serde_json::from_str(r#"{"quiz_category": {"type": "click", "id": 0}}"#).unwrap();
        assert_eq!(request.category(), QuizCategory::All);
        assert!(request.previous_questions.is_empty());

        let request: QuizRequest =
            serde_json::from_str(r#"{"quiz_category": {"type": "Art", "id": 2}}"#).unwrap();
        assert_eq!(request.category(), QuizCategory::Category(2));
    }

    #[test]
    fn category_id_may_arrive_as_a_string() {
        let request: QuizRequest =
            serde_json::from_str(r#"{"quiz_category": {"type": "Art", "id": "2"}}"#).unwrap();
        assert_eq!(request.category(), QuizCategory::Category(2));

        let request: QuizRequest =
            serde_json::from_str(r#"{"quiz_category": {"id": "0"}}"#).unwrap();
        assert_eq!(request.category(), QuizCategory::All);

        assert!(serde_json::from_str::<QuizRequest>(r#"{"quiz_category": {"id": "Art"}}"#).is_err());
    }

    #[tokio::test]
    async fn empty_category_is_not_found() {
        let pool = establish_in_memory_connection().await.unwrap();
        run_migrations(&pool).await.unwrap();
        create_question(&pool, "q", "a", 1, 1).await.unwrap();

        let result = quiz_candidates(&pool, QuizCategory::Category(25), &[]).await;
        assert!(matches!(result, Err(TriviaError::NotFound(_))));
    }

    #[tokio::test]
    async fn served_questions_are_excluded_from_candidates() {
        let pool = establish_in_memory_connection().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let first = create_question(&pool, "q1", "a", 3, 1).await.unwrap();
        let second = create_question(&pool, "q2", "a", 3, 1).await.unwrap();
        create_question(&pool, "elsewhere", "a", 4, 1).await.unwrap();

        let candidates = quiz_candidates(&pool, QuizCategory::Category(3), &[first])
            .await
            .unwrap();
        assert_eq!(
            candidates.iter().map(|q| q.id).collect::<Vec<_>>(),
            vec![second]
        );

        let all = quiz_candidates(&pool, QuizCategory::All, &[]).await.unwrap();
        assert_eq!(all.len(), 3);
    }
}
