use crate::error::TelegramError;
use crate::types::{Document, InboundEvent, Payload, PhotoSize};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Bot API handle. Constructed once at startup and shared by reference.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    token: String,
    api_base: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    pub fn new(http: Client, token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    pub fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_base, self.token, file_path)
    }

    async fn call(&self, method: &str, payload: &Value) -> Result<Value, TelegramError> {
        let resp = self
            .http
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await
            .map_err(|e| e.without_url())?;
        let value: Value = resp.json().await.map_err(|e| e.without_url())?;
        if value.get("ok").and_then(|v| v.as_bool()) != Some(true) {
            let description = value
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error");
            return Err(TelegramError::Api(format!("{}: {}", method, description)));
        }
        Ok(value.get("result").cloned().unwrap_or(Value::Null))
    }

    /// Verifies the token and returns the bot's username.
    pub async fn get_me(&self) -> Result<String, TelegramError> {
        let result = self.call("getMe", &serde_json::json!({})).await?;
        Ok(result
            .get("username")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string())
    }

    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_seconds: u64,
    ) -> Result<Vec<Value>, TelegramError> {
        let payload = serde_json::json!({
            "offset": offset,
            "timeout": timeout_seconds,
            "allowed_updates": ["message"],
        });
        let result = self.call("getUpdates", &payload).await?;
        match result {
            Value::Array(updates) => Ok(updates),
            other => Err(TelegramError::Api(format!(
                "getUpdates: unexpected result {}",
                other
            ))),
        }
    }

    /// Long-polls forever, forwarding parsed events in arrival order. Returns
    /// once the receiving side has been dropped.
    pub async fn poll_updates(
        &self,
        tx: mpsc::Sender<InboundEvent>,
        timeout_seconds: u64,
        retry_delay: Duration,
    ) {
        let mut offset: i64 = 0;
        loop {
            let updates = match self.get_updates(offset, timeout_seconds).await {
                Ok(updates) => updates,
                Err(err) => {
                    warn!(error = %err, "telegram getUpdates failed");
                    sleep(retry_delay).await;
                    continue;
                }
            };

            for update in &updates {
                if let Some(update_id) = update.get("update_id").and_then(|v| v.as_i64()) {
                    offset = offset.max(update_id + 1);
                }
                let Some(event) = parse_update(update) else {
                    debug!("skipping update without message");
                    continue;
                };
                if tx.send(event).await.is_err() {
                    debug!("event receiver closed, stopping telegram poller");
                    return;
                }
            }
        }
    }

    /// Exchanges a file id for a time-limited download URL.
    pub async fn resolve_file_url(&self, file_id: &str) -> Result<Option<String>, TelegramError> {
        let result = self
            .call("getFile", &serde_json::json!({ "file_id": file_id }))
            .await?;
        let file_path = result.get("file_path").and_then(|v| v.as_str());
        Ok(file_path.map(|p| self.file_url(p)))
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });
        self.call("sendMessage", &payload).await?;
        Ok(())
    }
}

pub fn parse_update(update: &Value) -> Option<InboundEvent> {
    let update_id = update.get("update_id")?.as_i64()?;
    let msg = update.get("message")?;
    let chat_id = msg.get("chat")?.get("id")?.as_i64()?;

    Some(InboundEvent {
        update_id,
        message_id: msg.get("message_id").and_then(|v| v.as_i64()),
        sender_id: msg
            .get("from")
            .and_then(|v| v.get("id"))
            .and_then(|v| v.as_i64()),
        chat_id,
        date: msg.get("date").and_then(|v| v.as_i64()),
        payload: parse_payload(msg),
    })
}

fn parse_payload(msg: &Value) -> Payload {
    if let Some(sizes) = msg.get("photo").and_then(|v| v.as_array()) {
        // A variant without a file_id rejects the whole set.
        let photos = sizes
            .iter()
            .map(|size| {
                Some(PhotoSize {
                    file_id: size.get("file_id")?.as_str()?.to_string(),
                    width: size.get("width").and_then(|v| v.as_i64()),
                    height: size.get("height").and_then(|v| v.as_i64()),
                    file_size: size.get("file_size").and_then(|v| v.as_i64()),
                })
            })
            .collect::<Option<Vec<_>>>();
        return match photos {
            Some(photos) => Payload::Photo(photos),
            None => Payload::Unsupported,
        };
    }

    if let Some(doc) = msg.get("document") {
        if let Some(file_id) = doc.get("file_id").and_then(|v| v.as_str()) {
            return Payload::Document(Document {
                file_id: file_id.to_string(),
                file_name: doc
                    .get("file_name")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
                mime_type: doc
                    .get("mime_type")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
                file_size: doc.get("file_size").and_then(|v| v.as_i64()),
            });
        }
    }

    match msg.get("text").and_then(|v| v.as_str()) {
        Some(text) => Payload::Text(text.to_string()),
        None => Payload::Unsupported,
    }
}
