use crate::types::{FileReference, InboundEvent, Payload};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Turns a file-bearing event into a source id and a destination key.
///
/// Photos are named `<unix seconds>.jpg` at extraction time and always use the
/// largest reported variant. Documents keep the sender's filename untouched.
#[derive(Clone)]
pub struct FileReferenceExtractor {
    clock: Arc<dyn Clock>,
}

impl Default for FileReferenceExtractor {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl FileReferenceExtractor {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn extract(&self, event: &InboundEvent) -> Option<FileReference> {
        match &event.payload {
            Payload::Photo(sizes) => {
                let largest = sizes.last()?;
                Some(FileReference {
                    source_file_id: largest.file_id.clone(),
                    proposed_name: format!("{}.jpg", self.clock.now().timestamp()),
                })
            }
            Payload::Document(doc) => {
                let proposed_name = match doc.file_name.as_deref() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => self.clock.now().timestamp().to_string(),
                };
                Some(FileReference {
                    source_file_id: doc.file_id.clone(),
                    proposed_name,
                })
            }
            Payload::Text(_) | Payload::Unsupported => None,
        }
    }
}
