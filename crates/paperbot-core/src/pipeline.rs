//! One run: window → fetch → (summarize → post) per paper.
//!
//! Window and fetch failures abort the run before anything is posted. Past
//! that point every paper sits behind its own failure boundary: an error is
//! logged with the paper's position, recorded in the report, and the loop
//! moves on.

use chrono::{DateTime, Utc};

use crate::{
    config::Config,
    domain::{DeliveryReceipt, PaperRecord, TimeWindow},
    formatting::{format_message, truncate_chars},
    messaging::port::Notifier,
    ports::PaperSource,
    query::SearchQuery,
    summarize::Summarizer,
    Error, Result,
};

/// Step of the per-paper loop that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Summarize,
    Deliver,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemOutcome {
    Posted(DeliveryReceipt),
    Failed { stage: Stage, error: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemReport {
    /// 1-based position in fetch order.
    pub index: usize,
    pub entry_id: String,
    pub outcome: ItemOutcome,
}

/// What a completed run did. Produced whether zero, some or all papers made it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub window: TimeWindow,
    pub items: Vec<ItemReport>,
}

impl RunReport {
    pub fn posted(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, ItemOutcome::Posted(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.posted()
    }
}

/// Run the whole pipeline once for `now`.
///
/// Returns `Err` only for fatal (pre-loop) failures.
pub async fn run(
    cfg: &Config,
    now: DateTime<Utc>,
    source: &dyn PaperSource,
    summarizer: &Summarizer,
    notifier: &dyn Notifier,
) -> Result<RunReport> {
    let window = cfg.window_policy.window(now);
    tracing::info!("{} to {}", window.start, window.end);

    let query = SearchQuery::new(cfg.category.clone(), window);
    let papers = source.search(&query).await?;
    tracing::info!(count = papers.len(), query = %query.render(), "papers fetched");
    for paper in &papers {
        tracing::debug!(entry_id = %paper.entry_id, title = %paper.title, "fetched");
    }

    let mut items = Vec::with_capacity(papers.len());
    for (i, paper) in papers.iter().enumerate() {
        let index = i + 1;
        let outcome = match process_paper(index, paper, summarizer, notifier).await {
            Ok(receipt) => {
                tracing::info!(index, receipt = ?receipt, "posted");
                ItemOutcome::Posted(receipt)
            }
            Err((stage, e)) => {
                tracing::warn!(index, stage = ?stage, "error on {index}-th paper: {e}");
                ItemOutcome::Failed {
                    stage,
                    error: e.to_string(),
                }
            }
        };
        items.push(ItemReport {
            index,
            entry_id: paper.entry_id.clone(),
            outcome,
        });
    }

    let report = RunReport { window, items };
    tracing::info!(
        posted = report.posted(),
        failed = report.failed(),
        "Done!"
    );
    Ok(report)
}

async fn process_paper(
    index: usize,
    paper: &PaperRecord,
    summarizer: &Summarizer,
    notifier: &dyn Notifier,
) -> std::result::Result<DeliveryReceipt, (Stage, Error)> {
    let summary = summarizer
        .summarize(paper)
        .await
        .map_err(|e| (Stage::Summarize, e))?;

    let caps = notifier.capabilities();
    let message = format_message(index, paper, &summary, caps.style);
    let message = truncate_chars(&message, caps.max_message_len);

    notifier
        .post(&message)
        .await
        .map_err(|e| (Stage::Deliver, e))
}
