use crate::types::InboundEvent;

/// Admits only events sent by the configured owner.
#[derive(Debug, Clone, Copy)]
pub struct AccessGate {
    owner_id: i64,
}

impl AccessGate {
    pub fn new(owner_id: i64) -> Self {
        Self { owner_id }
    }

    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    /// Events with no resolvable sender are never authorized.
    pub fn authorize(&self, event: &InboundEvent) -> bool {
        event.sender_id == Some(self.owner_id)
    }
}
