//! Paper summarization via a chat-completion model.

use std::sync::Arc;

use crate::{
    config::Config,
    domain::{PaperRecord, SummaryResult},
    errors::Error,
    model::{
        client::CompletionClient,
        types::{ChatMessage, CompletionRequest},
    },
    Result,
};

/// Instruction given to the model for every paper.
///
/// Output contract: first line is the Japanese title, followed by exactly
/// three `・` bullet points.
pub const SYSTEM_PROMPT: &str = "あなたはプロの数学者です。\
与えられた数学論文の要点を3点のみでまとめ、以下のフォーマットで日本語で出力してください。```
タイトルの日本語訳
・要点1
・要点2
・要点3
```";

pub struct Summarizer {
    client: Arc<dyn CompletionClient>,
    model: String,
    temperature: f32,
}

impl Summarizer {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
        }
    }

    pub fn from_config(cfg: &Config, client: Arc<dyn CompletionClient>) -> Self {
        Self::new(client, cfg.openai_model.clone(), cfg.temperature)
    }

    /// The request sent for `paper`: fixed system prompt plus one user message.
    pub fn request_for(&self, paper: &PaperRecord) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(format!(
                    "title: {}\nbody: {}",
                    paper.title, paper.abstract_text
                )),
            ],
            temperature: self.temperature,
        }
    }

    pub async fn summarize(&self, paper: &PaperRecord) -> Result<SummaryResult> {
        let completion = self.client.complete(&self.request_for(paper)).await?;
        let text = completion.first().ok_or_else(|| {
            Error::Summarization(format!("no choices returned for {}", paper.entry_id))
        })?;
        parse_summary(&paper.title, text)
    }
}

/// Split model output into the translated title (first line) and the body
/// (every remaining line, newline-joined).
///
/// A single-line response is valid and yields an empty body; a blank response
/// is not.
pub fn parse_summary(original_title: &str, text: &str) -> Result<SummaryResult> {
    if text.trim().is_empty() {
        return Err(Error::Summarization(
            "model returned an empty response".to_string(),
        ));
    }

    let (title, body) = text.split_once('\n').unwrap_or((text, ""));

    Ok(SummaryResult {
        original_title: original_title.to_string(),
        translated_title: title.trim_end_matches('\r').to_string(),
        body: body.to_string(),
    })
}
