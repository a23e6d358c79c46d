use super::error::{TriviaError, TriviaResult};

pub const QUESTIONS_PER_PAGE: usize = 10;

pub const fn first_page() -> u64 {
    1
}

/// The 1-based `page` of `items`, [`QUESTIONS_PER_PAGE`] records at a time.
///
/// An empty window is `NotFound`, so an empty collection has no page 1.
pub fn page_window<T>(items: &[T], page: u64) -> TriviaResult<&[T]> {
    if page == 0 {
        return Err(TriviaError::BadRequest("pages start at 1".to_owned()));
    }
    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|index| index.checked_mul(QUESTIONS_PER_PAGE))
        .unwrap_or(usize::MAX);
    if start >= items.len() {
        return Err(TriviaError::NotFound(format!(
            "page {page} is past the last of {} records",
            items.len()
        )));
    }
    let end = start.saturating_add(QUESTIONS_PER_PAGE).min(items.len());
    Ok(&items[start..end])
}
