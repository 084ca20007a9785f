use crate::channels::telegram::TelegramClient;
use crate::error::RetrievalError;
use crate::types::RetrievedFile;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};

#[async_trait]
pub trait FileRetriever: Send + Sync {
    /// Fetches the whole file into memory.
    async fn retrieve(&self, file_id: &str) -> Result<RetrievedFile, RetrievalError>;
}

pub fn content_type_of(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl FileRetriever for TelegramClient {
    async fn retrieve(&self, file_id: &str) -> Result<RetrievedFile, RetrievalError> {
        let url = match self.resolve_file_url(file_id).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                return Err(RetrievalError::Unresolved {
                    file_id: file_id.to_string(),
                    reason: "no file_path in getFile result".to_string(),
                })
            }
            Err(err) => {
                return Err(RetrievalError::Unresolved {
                    file_id: file_id.to_string(),
                    reason: err.to_string(),
                })
            }
        };

        // The URL embeds the bot token, so it is stripped from every error.
        let resp = self
            .http()
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.without_url())?;
        let content_type = content_type_of(resp.headers());
        let bytes = resp.bytes().await.map_err(|e| e.without_url())?;

        Ok(RetrievedFile {
            bytes,
            content_type,
        })
    }
}
