/// Core error type for paperbot.
///
/// Adapter crates map their transport errors into this type. The variants
/// double as the failure taxonomy of a run: `Config` and `Fetch` are fatal,
/// `Summarization` and `Delivery` only ever cost a single paper.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("summarization error: {0}")]
    Summarization(String),

    #[error("delivery error: {0}")]
    Delivery(String),
}

impl Error {
    /// Whether this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Fetch(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
