use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, "type"
FROM categories
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Replaces the category table with `categories`, keeping their ids.
///
/// Runs in one transaction: on error nothing is changed.
pub async fn import_categories(pool: &SqlitePool, categories: Vec<Category>) -> sqlx::Result<()> {
    let existing_ids: HashSet<i64> = get_all_categories(pool)
        .await?
        .iter()
        .map(|c| c.id)
        .collect();
    let new_ids: HashSet<i64> = categories.iter().map(|c| c.id).collect();

    let mut tx = pool.begin().await?;
    for id in existing_ids.difference(&new_ids) {
        sqlx::query(r#"DELETE FROM categories WHERE categories.id = ?1"#)
            .bind(*id)
            .execute(&mut *tx)
            .await?;
    }
    for category in categories {
        if existing_ids.contains(&category.id) {
            sqlx::query(r#"UPDATE categories SET "type" = ?1 WHERE categories.id = ?2"#)
                .bind(&category.kind)
                .bind(category.id)
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query(r#"INSERT INTO categories (id, "type") VALUES (?1, ?2)"#)
                .bind(category.id)
                .bind(&category.kind)
                .execute(&mut *tx)
                .await?;
        }
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_in_memory_connection, run_migrations};

    fn category(id: i64, kind: &str) -> Category {
        Category {
            id,
            kind: kind.to_owned(),
        }
    }

    async fn pool() -> SqlitePool {
        let pool = establish_in_memory_connection().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn import_inserts_updates_and_removes() {
        let pool = pool().await;
        import_categories(&pool, vec![category(1, "Science"), category(2, "Art")])
            .await
            .unwrap();

        import_categories(&pool, vec![category(2, "Fine Art"), category(6, "Sports")])
            .await
            .unwrap();

        assert_eq!(
            get_all_categories(&pool).await.unwrap(),
            vec![category(2, "Fine Art"), category(6, "Sports")]
        );
    }

    #[tokio::test]
    async fn failed_import_leaves_table_untouched() {
        let pool = pool().await;
        import_categories(&pool, vec![category(1, "Science")])
            .await
            .unwrap();

        // the duplicate id violates the primary key halfway through
        let result =
            import_categories(&pool, vec![category(3, "History"), category(3, "Again")]).await;

        assert!(result.is_err());
        assert_eq!(
            get_all_categories(&pool).await.unwrap(),
            vec![category(1, "Science")]
        );
    }
}
