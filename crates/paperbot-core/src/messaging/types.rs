/// Labels that differ between the two message layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageStyle {
    /// `投稿日時:` label, blank line after the body.
    Webhook,
    /// `発行日:` label, single newline after the body.
    Channel,
}

/// Capabilities / limits of a destination implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessagingCapabilities {
    pub style: MessageStyle,
    pub max_message_len: usize,
}
