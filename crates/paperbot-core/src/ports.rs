use async_trait::async_trait;

use crate::{domain::PaperRecord, query::SearchQuery, Result};

/// Hexagonal port for the paper-search backend (arXiv today).
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// All papers matching `query`, oldest submission first.
    ///
    /// Any transport or parse failure is an `Error::Fetch`; there is no
    /// partial result.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<PaperRecord>>;
}
