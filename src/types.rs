use bytes::Bytes;

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub file_size: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub file_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
}

/// What a message carries. Photo variants are ordered smallest to largest,
/// as Telegram reports them.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Photo(Vec<PhotoSize>),
    Document(Document),
    Text(String),
    Unsupported,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub update_id: i64,
    pub message_id: Option<i64>,
    pub sender_id: Option<i64>,
    pub chat_id: i64,
    pub date: Option<i64>,
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    pub source_file_id: String,
    pub proposed_name: String,
}

#[derive(Debug, Clone)]
pub struct RetrievedFile {
    pub bytes: Bytes,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub public_url: String,
}
