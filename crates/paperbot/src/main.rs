use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use paperbot_arxiv::ArxivClient;
use paperbot_chat::notifier_for;
use paperbot_core::{config::Config, pipeline, summarize::Summarizer};
use paperbot_openai::OpenAiClient;

/// One scheduled run: fetch today's papers, summarize, post, exit.
///
/// Per-paper failures are logged and skipped; only configuration and fetch
/// failures make the process exit non-zero.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    paperbot_core::logging::init("paperbot")?;

    if let Err(e) = run().await {
        tracing::error!(error = %format!("{e:#}"), "run aborted");
        return Err(e);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let cfg = Config::load().context("load configuration")?;
    tracing::info!(
        category = %cfg.category,
        destination = cfg.destination.kind(),
        model = %cfg.openai_model,
        "starting run"
    );

    let source = ArxivClient::from_config(&cfg)?;
    let model = Arc::new(
        OpenAiClient::new(cfg.openai_api_key.clone(), cfg.http_timeout)?
            .with_base_url(cfg.openai_base_url.clone()),
    );
    let summarizer = Summarizer::from_config(&cfg, model);
    let notifier = notifier_for(&cfg.destination, cfg.http_timeout)?;

    pipeline::run(&cfg, Utc::now(), &source, &summarizer, notifier.as_ref())
        .await
        .context("paperbot run failed")?;

    Ok(())
}
