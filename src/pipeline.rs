use crate::extract::FileReferenceExtractor;
use crate::gate::AccessGate;
use crate::notify::ResultNotifier;
use crate::retrieve::FileRetriever;
use crate::storage::ObjectPublisher;
use crate::types::{InboundEvent, StoredObject};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// How handling of a single event ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Unauthorized,
    NotApplicable,
    RetrievalFailed,
    PublishFailed,
    Delivered(StoredObject),
}

/// Runs each event through gate, extractor, retriever, publisher and notifier,
/// one event at a time.
#[derive(Clone)]
pub struct Relay {
    gate: AccessGate,
    extractor: FileReferenceExtractor,
    retriever: Arc<dyn FileRetriever>,
    publisher: Arc<dyn ObjectPublisher>,
    notifier: Arc<dyn ResultNotifier>,
}

impl Relay {
    pub fn new(
        gate: AccessGate,
        extractor: FileReferenceExtractor,
        retriever: Arc<dyn FileRetriever>,
        publisher: Arc<dyn ObjectPublisher>,
        notifier: Arc<dyn ResultNotifier>,
    ) -> Self {
        Self {
            gate,
            extractor,
            retriever,
            publisher,
            notifier,
        }
    }

    /// Consumes events until the sender side closes. A failed event never
    /// stops the loop.
    pub async fn run(&self, mut events: mpsc::Receiver<InboundEvent>) {
        info!(owner_id = self.gate.owner_id(), "relay started");
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        info!("event stream closed, relay stopping");
    }

    pub async fn handle_event(&self, event: InboundEvent) -> Outcome {
        let update_id = event.update_id;

        if !self.gate.authorize(&event) {
            debug!(update_id, "ignoring event from unauthorized sender");
            return Outcome::Unauthorized;
        }

        let Some(reference) = self.extractor.extract(&event) else {
            debug!(update_id, "event carries no file");
            return Outcome::NotApplicable;
        };

        let file = match self.retriever.retrieve(&reference.source_file_id).await {
            Ok(file) => file,
            Err(err) => {
                warn!(update_id, error = %err, "error retrieving file");
                return Outcome::RetrievalFailed;
            }
        };

        let stored = match self
            .publisher
            .publish(&reference.proposed_name, file.bytes, &file.content_type)
            .await
        {
            Ok(stored) => stored,
            Err(err) => {
                warn!(update_id, key = %reference.proposed_name, error = %err, "error publishing file");
                return Outcome::PublishFailed;
            }
        };

        if let Err(err) = self.notifier.notify(event.chat_id, &stored.public_url).await {
            warn!(update_id, key = %stored.key, error = %err, "error sending reply");
        } else {
            info!(update_id, key = %stored.key, "file relayed");
        }

        Outcome::Delivered(stored)
    }
}
