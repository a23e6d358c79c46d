use crate::db::Question;

/// Questions whose text contains `term`, ignoring case. Order is preserved.
pub fn matching_questions(questions: Vec<Question>, term: &str) -> Vec<Question> {
    let needle = term.to_lowercase();
    questions
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&needle))
        .collect()
}
