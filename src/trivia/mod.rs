//! Query layer: page windows, search, category filters and quiz draws over
//! the question store.

pub mod error;
pub mod format;
pub mod pagination;
pub mod questions;
pub mod quiz;
pub mod search;

use sqlx::SqlitePool;

pub use error::{TriviaError, TriviaResult};

use crate::db::queries::categories::get_all_categories;
use format::{category_map, CategoriesListing};

pub async fn list_categories(pool: &SqlitePool) -> TriviaResult<CategoriesListing> {
    Ok(CategoriesListing {
        categories: category_map(get_all_categories(pool).await?),
    })
}
