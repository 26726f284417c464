use async_trait::async_trait;

use crate::{domain::DeliveryReceipt, messaging::types::MessagingCapabilities, Result};

/// Cross-destination port.
///
/// One implementation per chat platform; the pipeline only ever talks to this
/// trait, so webhook and channel-API delivery share every other stage.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    /// Post one already-formatted message. Anything but the platform's success
    /// acknowledgement is an `Error::Delivery`.
    async fn post(&self, text: &str) -> Result<DeliveryReceipt>;
}
