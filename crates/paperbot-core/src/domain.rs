use chrono::{DateTime, Utc};

/// One paper as returned by the search API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaperRecord {
    /// Canonical entry URL, e.g. `http://arxiv.org/abs/2403.01234v1`.
    pub entry_id: String,
    pub title: String,
    pub abstract_text: String,
    pub published: DateTime<Utc>,
}

/// Model output for one paper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryResult {
    pub original_title: String,
    pub translated_title: String,
    /// Bullet lines joined with `\n`. Empty when the model returned only a title.
    pub body: String,
}

/// Submission window `[start, end)` for one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Acknowledgement returned by a destination after a successful post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryReceipt {
    /// Webhook accepted the message (204, no body).
    Accepted,
    /// Channel API returned the posted message timestamp.
    MessageTs(String),
}
