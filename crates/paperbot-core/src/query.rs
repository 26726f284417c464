use crate::{domain::TimeWindow, window::arxiv_timestamp};

/// A category + submission-range search, sorted by submission date ascending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    pub category: String,
    pub window: TimeWindow,
}

impl SearchQuery {
    pub fn new(category: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            category: category.into(),
            window,
        }
    }

    /// The `search_query` string, e.g.
    /// `cat:math.AG AND submittedDate:[20240305180000 TO 20240307093000]`.
    pub fn render(&self) -> String {
        format!(
            "cat:{} AND submittedDate:[{} TO {}]",
            self.category,
            arxiv_timestamp(self.window.start),
            arxiv_timestamp(self.window.end)
        )
    }
}
