use crate::channels::telegram::TelegramClient;
use crate::error::NotifyError;
use async_trait::async_trait;

#[async_trait]
pub trait ResultNotifier: Send + Sync {
    async fn notify(&self, chat_id: i64, public_url: &str) -> Result<(), NotifyError>;
}

#[async_trait]
impl ResultNotifier for TelegramClient {
    async fn notify(&self, chat_id: i64, public_url: &str) -> Result<(), NotifyError> {
        self.send_message(chat_id, public_url).await?;
        Ok(())
    }
}
