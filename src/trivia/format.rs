use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::{Category, Question};

/// Category id to its label. Serializes as a JSON object keyed by the id.
pub type CategoryMap = BTreeMap<i64, String>;

pub fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

#[derive(Debug, Serialize)]
pub struct CategoriesListing {
    pub categories: CategoryMap,
}

/// One page of questions, with the unpaginated total of the set it came from.
#[derive(Debug, Serialize)]
pub struct QuestionsPage {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub categories: CategoryMap,
    pub current_category: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_map_serializes_with_string_keys() {
        let map = category_map(vec![
            Category {
                id: 2,
                kind: "Art".to_owned(),
            },
            Category {
                id: 1,
                kind: "Science".to_owned(),
            },
        ]);

        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            json!({"1": "Science", "2": "Art"})
        );
    }

    #[test]
    fn questions_serialize_flat() {
        let page = QuestionsPage {
            questions: vec![Question {
                id: 13,
                question: "What is the largest lake in Africa?".to_owned(),
                answer: "Lake Victoria".to_owned(),
                category: 99,
                difficulty: 2,
            }],
            total_questions: 1,
            categories: CategoryMap::new(),
            current_category: None,
        };

        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({
                "questions": [{
                    "id": 13,
                    "question": "What is the largest lake in Africa?",
                    "answer": "Lake Victoria",
                    "category": 99,
                    "difficulty": 2
                }],
                "total_questions": 1,
                "categories": {},
                "current_category": null
            })
        );
    }
}
