//! Chat message layout for one summarized paper.

use crate::{
    domain::{PaperRecord, SummaryResult},
    messaging::types::MessageStyle,
};

/// Format of the publish date line.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Build the message for the `index`-th (1-based) paper of the run.
///
/// Layout, one item per line: running-count header, publish date, entry URL,
/// original title, translated title, bullet body, then the trailing separator.
pub fn format_message(
    index: usize,
    paper: &PaperRecord,
    summary: &SummaryResult,
    style: MessageStyle,
) -> String {
    let (date_label, tail) = match style {
        MessageStyle::Webhook => ("投稿日時", "\n\n"),
        MessageStyle::Channel => ("発行日", "\n"),
    };
    format!(
        "今日の論文です！ {index}本目\n{date_label}: {date}\n{url}\n{title_en}\n{title}\n{body}{tail}",
        date = paper.published.format(DATE_FORMAT),
        url = paper.entry_id,
        title_en = summary.original_title,
        title = summary.translated_title,
        body = summary.body,
    )
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `…`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}
