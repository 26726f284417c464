use std::{env, fs, io, path::Path, time::Duration};

use crate::{errors::Error, window::WindowPolicy, Result};

pub const DEFAULT_CATEGORY: &str = "math.AG";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.25;
pub const DEFAULT_SLACK_CHANNEL: &str = "#arxiv-ag";
pub const DEFAULT_ARXIV_BASE_URL: &str = "https://export.arxiv.org";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_SLACK_API_BASE_URL: &str = "https://slack.com/api";

/// Where formatted summaries are posted.
#[derive(Clone, Debug, PartialEq)]
pub enum Destination {
    DiscordWebhook {
        url: String,
    },
    Slack {
        token: String,
        channel: String,
        api_base_url: String,
    },
}

impl Destination {
    pub fn kind(&self) -> &'static str {
        match self {
            Destination::DiscordWebhook { .. } => "discord",
            Destination::Slack { .. } => "slack",
        }
    }
}

/// Typed, read-only configuration for one run.
///
/// Built once at process start and handed to each component.
#[derive(Clone, Debug)]
pub struct Config {
    // Search
    pub category: String,
    pub window_policy: WindowPolicy,
    pub arxiv_base_url: String,
    pub arxiv_page_size: usize,
    pub arxiv_max_results: usize,

    // Completion
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub temperature: f32,

    // Destination
    pub destination: Destination,

    // Runtime
    pub http_timeout: Duration,
}

impl Config {
    /// Load from the process environment, after applying `.env` if present.
    pub fn load() -> Result<Self> {
        match apply_dotenv(Path::new(".env")) {
            Ok(applied) => tracing::debug!(applied, "checked .env"),
            Err(e) => tracing::warn!(error = %e, "could not read .env, using process environment"),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let openai_api_key = get("OPENAI_API_KEY").ok_or_else(|| {
            Error::Config("OPENAI_API_KEY environment variable is required".to_string())
        })?;
        let openai_model = get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
        let openai_base_url = trim_slash(
            get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
        );

        let destination = parse_destination(&get)?;

        let category = get("PAPERBOT_CATEGORY").unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        let window_policy = match get("PAPERBOT_WINDOW") {
            Some(raw) => raw.parse::<WindowPolicy>()?,
            None => WindowPolicy::Weekday,
        };

        let arxiv_base_url = trim_slash(
            get("ARXIV_API_BASE_URL").unwrap_or_else(|| DEFAULT_ARXIV_BASE_URL.to_string()),
        );
        let arxiv_page_size = parse_num(&get, "ARXIV_PAGE_SIZE")?.unwrap_or(100);
        let arxiv_max_results = parse_num(&get, "ARXIV_MAX_RESULTS")?.unwrap_or(1000);
        if arxiv_page_size == 0 || arxiv_max_results == 0 {
            return Err(Error::Config(
                "ARXIV_PAGE_SIZE and ARXIV_MAX_RESULTS must be >= 1".to_string(),
            ));
        }

        let http_timeout = Duration::from_secs(
            parse_num::<u64>(&get, "PAPERBOT_HTTP_TIMEOUT_SECS")?.unwrap_or(60),
        );

        Ok(Self {
            category,
            window_policy,
            arxiv_base_url,
            arxiv_page_size,
            arxiv_max_results,
            openai_api_key,
            openai_model,
            openai_base_url,
            temperature: DEFAULT_TEMPERATURE,
            destination,
            http_timeout,
        })
    }
}

fn parse_destination(get: &impl Fn(&str) -> Option<String>) -> Result<Destination> {
    let webhook = get("DISCORD_WEBHOOK_URL");
    let slack_token = get("SLACK_API_TOKEN");

    let kind = match get("PAPERBOT_DESTINATION") {
        Some(k) => k.trim().to_lowercase(),
        None if webhook.is_some() => "discord".to_string(),
        None if slack_token.is_some() => "slack".to_string(),
        None => {
            return Err(Error::Config(
                "either DISCORD_WEBHOOK_URL or SLACK_API_TOKEN must be set".to_string(),
            ))
        }
    };

    match kind.as_str() {
        "discord" => {
            let url = webhook.ok_or_else(|| {
                Error::Config("DISCORD_WEBHOOK_URL is required for discord".to_string())
            })?;
            Ok(Destination::DiscordWebhook { url })
        }
        "slack" => {
            let token = slack_token.ok_or_else(|| {
                Error::Config("SLACK_API_TOKEN is required for slack".to_string())
            })?;
            let channel = get("SLACK_CHANNEL").unwrap_or_else(|| DEFAULT_SLACK_CHANNEL.to_string());
            let api_base_url = trim_slash(
                get("SLACK_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_SLACK_API_BASE_URL.to_string()),
            );
            Ok(Destination::Slack {
                token,
                channel,
                api_base_url,
            })
        }
        other => Err(Error::Config(format!(
            "unknown PAPERBOT_DESTINATION: {other} (expected discord or slack)"
        ))),
    }
}

fn parse_num<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    let Some(raw) = get(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| Error::Config(format!("{key} must be a non-negative integer, got {raw:?}")))
}

/// Copy `KEY=value` lines from `path` into the process environment.
///
/// Variables that are already set win over the file. Returns whether the
/// file existed.
fn apply_dotenv(path: &Path) -> io::Result<bool> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    for (key, value) in contents.lines().filter_map(dotenv_pair) {
        if env::var_os(key).is_none() {
            env::set_var(key, value);
        }
    }
    Ok(true)
}

fn dotenv_pair(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, unquote(value.trim())))
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(value)
}

fn trim_slash(s: String) -> String {
    s.trim_end_matches('/').to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
