//! arXiv adapter.
//!
//! Implements the `paperbot-core` PaperSource port over the arXiv query API
//! (`/api/query`, Atom 1.0 responses).

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use feed_rs::model::Entry;

use paperbot_core::{
    config::{Config, DEFAULT_ARXIV_BASE_URL},
    domain::PaperRecord,
    errors::Error,
    ports::PaperSource,
    query::SearchQuery,
    Result,
};

/// arXiv asks clients to wait this long between consecutive API calls.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(3);

#[derive(Clone, Debug)]
pub struct ArxivClient {
    base_url: String,
    page_size: usize,
    max_results: usize,
    page_delay: Duration,
    http: reqwest::Client,
}

impl ArxivClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("paperbot/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("arxiv http client: {e}")))?;
        Ok(Self {
            base_url: DEFAULT_ARXIV_BASE_URL.to_string(),
            page_size: 100,
            max_results: 1000,
            page_delay: DEFAULT_PAGE_DELAY,
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self::new(cfg.http_timeout)?
            .with_base_url(cfg.arxiv_base_url.clone())
            .with_paging(cfg.arxiv_page_size, cfg.arxiv_max_results))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_paging(mut self, page_size: usize, max_results: usize) -> Self {
        self.page_size = page_size.max(1);
        self.max_results = max_results.max(1);
        self
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    async fn fetch_page(&self, query: &str, start: usize, count: usize) -> Result<Vec<PaperRecord>> {
        let resp = self
            .http
            .get(format!("{}/api/query", self.base_url))
            .query(&[
                ("search_query", query.to_string()),
                ("start", start.to_string()),
                ("max_results", count.to_string()),
                ("sortBy", "submittedDate".to_string()),
                ("sortOrder", "ascending".to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("arxiv request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Fetch(format!(
                "arxiv query failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::Fetch(format!("arxiv body error: {e}")))?;
        parse_feed(&bytes)
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<PaperRecord>> {
        let rendered = query.render();
        let mut papers: Vec<PaperRecord> = Vec::new();

        loop {
            let count = self.page_size.min(self.max_results - papers.len());
            if !papers.is_empty() && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
            let page = self.fetch_page(&rendered, papers.len(), count).await?;
            let got = page.len();
            tracing::debug!(start = papers.len(), got, "arxiv page");
            papers.extend(page);

            if got < count || papers.len() >= self.max_results {
                break;
            }
        }

        papers.truncate(self.max_results);
        Ok(papers)
    }
}

/// Parse an arXiv Atom response into papers, keeping feed order.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<PaperRecord>> {
    let feed = feed_rs::parser::parse(bytes)
        .map_err(|e| Error::Fetch(format!("arxiv feed parse error: {e}")))?;

    feed.entries.into_iter().map(to_record).collect()
}

fn to_record(entry: Entry) -> Result<PaperRecord> {
    let summary = entry
        .summary
        .as_ref()
        .map(|t| normalize_whitespace(&t.content))
        .unwrap_or_default();

    // Malformed queries come back as a single entry under /api/errors.
    if entry.id.contains("/api/errors") {
        return Err(Error::Fetch(format!("arxiv rejected the query: {summary}")));
    }

    let title = entry
        .title
        .as_ref()
        .map(|t| normalize_whitespace(&t.content))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::Fetch(format!("arxiv entry {} has no title", entry.id)))?;

    let published = entry
        .published
        .or(entry.updated)
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::Fetch(format!("arxiv entry {} has no published date", entry.id)))?;

    Ok(PaperRecord {
        entry_id: entry.id,
        title,
        abstract_text: summary,
        published,
    })
}

fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::{Matcher, Server};

    const TWO_ENTRIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <link href="http://arxiv.org/api/query" rel="self" type="application/atom+xml"/>
  <title type="html">ArXiv Query: search_query=cat:math.AG</title>
  <id>http://arxiv.org/api/abc</id>
  <updated>2024-03-07T00:00:00-05:00</updated>
  <opensearch:totalResults>2</opensearch:totalResults>
  <opensearch:startIndex>0</opensearch:startIndex>
  <opensearch:itemsPerPage>100</opensearch:itemsPerPage>
  <entry>
    <id>http://arxiv.org/abs/2403.00001v1</id>
    <updated>2024-03-05T18:30:00Z</updated>
    <published>2024-03-05T18:30:00Z</published>
    <title>Moduli of stable
  curves</title>
    <summary>  We study the moduli space
of stable curves.
</summary>
    <author><name>A. Author</name></author>
    <link href="http://arxiv.org/abs/2403.00001v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2403.00001v1" rel="related" type="application/pdf"/>
    <arxiv:primary_category term="math.AG" scheme="http://arxiv.org/schemas/atom"/>
    <category term="math.AG" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2403.00002v1</id>
    <updated>2024-03-06T09:00:00Z</updated>
    <published>2024-03-06T09:00:00Z</published>
    <title>Hodge loci</title>
    <summary>Abstract two.</summary>
    <author><name>B. Author</name></author>
    <link href="http://arxiv.org/abs/2403.00002v1" rel="alternate" type="text/html"/>
    <category term="math.AG" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
</feed>
"#;

    const EMPTY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=cat:math.AG</title>
  <id>http://arxiv.org/api/empty</id>
  <updated>2024-03-07T00:00:00-05:00</updated>
</feed>
"#;

    const API_ERROR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=cat:</title>
  <id>http://arxiv.org/api/err</id>
  <updated>2024-03-07T00:00:00-05:00</updated>
  <entry>
    <id>http://arxiv.org/api/errors#incorrect_id_format_for_1234</id>
    <title>Error</title>
    <summary>incorrect id format for 1234</summary>
    <updated>2024-03-07T00:00:00-05:00</updated>
    <link href="http://arxiv.org/api/errors#incorrect_id_format_for_1234" rel="alternate" type="text/html"/>
    <author><name>arXiv api core</name></author>
  </entry>
</feed>
"#;

    fn query() -> SearchQuery {
        SearchQuery::new(
            "math.AG",
            paperbot_core::domain::TimeWindow {
                start: Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2024, 3, 7, 9, 0, 0).unwrap(),
            },
        )
    }

    fn client(server: &Server) -> ArxivClient {
        ArxivClient::new(Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.url())
            .with_page_delay(Duration::ZERO)
    }

    #[test]
    fn parses_entries_in_feed_order() {
        let papers = parse_feed(TWO_ENTRIES.as_bytes()).unwrap();
        assert_eq!(papers.len(), 2);

        assert_eq!(papers[0].entry_id, "http://arxiv.org/abs/2403.00001v1");
        assert_eq!(papers[0].title, "Moduli of stable curves");
        assert_eq!(papers[0].abstract_text, "We study the moduli space of stable curves.");
        assert_eq!(
            papers[0].published,
            Utc.with_ymd_and_hms(2024, 3, 5, 18, 30, 0).unwrap()
        );
        assert_eq!(papers[1].title, "Hodge loci");
        assert!(papers[0].published < papers[1].published);
    }

    #[test]
    fn empty_feed_is_no_papers() {
        assert!(parse_feed(EMPTY.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn api_error_entry_is_a_fetch_error() {
        let err = parse_feed(API_ERROR.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Fetch(ref m) if m.contains("incorrect id format")));
    }

    #[test]
    fn garbage_is_a_fetch_error() {
        assert!(matches!(
            parse_feed(b"<html>not a feed"),
            Err(Error::Fetch(_))
        ));
    }

    #[tokio::test]
    async fn sends_sorted_submitted_date_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded(
                    "search_query".into(),
                    "cat:math.AG AND submittedDate:[20240305180000 TO 20240307090000]".into(),
                ),
                Matcher::UrlEncoded("start".into(), "0".into()),
                Matcher::UrlEncoded("max_results".into(), "100".into()),
                Matcher::UrlEncoded("sortBy".into(), "submittedDate".into()),
                Matcher::UrlEncoded("sortOrder".into(), "ascending".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/atom+xml")
            .with_body(TWO_ENTRIES)
            .create_async()
            .await;

        let papers = client(&server).search(&query()).await.unwrap();
        assert_eq!(papers.len(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn follows_pages_until_a_short_one() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("GET", "/api/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start".into(), "0".into()),
                Matcher::UrlEncoded("max_results".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(TWO_ENTRIES)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/api/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start".into(), "2".into()),
                Matcher::UrlEncoded("max_results".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(EMPTY)
            .create_async()
            .await;

        let papers = client(&server)
            .with_paging(2, 10)
            .search(&query())
            .await
            .unwrap();
        assert_eq!(papers.len(), 2);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn stops_at_max_results() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/query")
            .match_query(Matcher::UrlEncoded("max_results".into(), "2".into()))
            .with_status(200)
            .with_body(TWO_ENTRIES)
            .expect(1)
            .create_async()
            .await;

        let papers = client(&server)
            .with_paging(100, 2)
            .search(&query())
            .await
            .unwrap();
        assert_eq!(papers.len(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_is_a_fetch_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/query")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("Service Unavailable")
            .create_async()
            .await;

        let err = client(&server).search(&query()).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(ref m) if m.contains("503")));
    }
}
