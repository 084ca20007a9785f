use thiserror::Error;

/// Fatal at startup; the process exits before any event is consumed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid OWNER_ID {0:?}: expected a numeric Telegram user id")]
    InvalidOwnerId(String),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("telegram request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("telegram api error: {0}")]
    Api(String),
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("could not resolve download location for {file_id}: {reason}")]
    Unresolved { file_id: String, reason: String },

    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("object store write failed for {key}: {reason}")]
    Store { key: String, reason: String },
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error(transparent)]
    Telegram(#[from] TelegramError),
}
