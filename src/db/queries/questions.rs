use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.category = ?1
ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

pub async fn create_question(
    pool: &SqlitePool,
    question: &str,
    answer: &str,
    category: i64,
    difficulty: i64,
) -> sqlx::Result<i64> {
    let mut tx = pool.begin().await?;

    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question)
    .bind(answer)
    .bind(category)
    .bind(difficulty)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    tx.commit().await?;
    Ok(id)
}

/// Returns `false` when no question had that id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let deleted = sqlx::query(
        r#"
DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(deleted > 0)
}

/// Replaces the question table with `questions`, keeping their ids.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let existing_ids: HashSet<i64> = get_all_questions(pool)
        .await?
        .iter()
        .map(|q| q.id)
        .collect();
    let new_ids: HashSet<i64> = questions.iter().map(|q| q.id).collect();

    let mut tx = pool.begin().await?;
    for id in existing_ids.difference(&new_ids) {
        sqlx::query(r#"DELETE FROM questions WHERE questions.id = ?1"#)
            .bind(*id)
            .execute(&mut *tx)
            .await?;
    }
    for question in questions {
        let statement = if existing_ids.contains(&question.id) {
            r#"
UPDATE questions SET question = ?2, answer = ?3, category = ?4, difficulty = ?5
WHERE questions.id = ?1
            "#
        } else {
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
            "#
        };
        sqlx::query(statement)
            .bind(question.id)
            .bind(&question.question)
            .bind(&question.answer)
            .bind(question.category)
            .bind(question.difficulty)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await
}
