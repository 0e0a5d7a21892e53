use crate::domain::event::WithdrawalCompleted;
use crate::domain::ports::NotificationSink;
use crate::error::{AtmError, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Hands completion events to a downstream consumer over an unbounded
/// channel.
///
/// Publishing happens strictly after the balance debit commits, so the
/// receiver observes completions in settlement order.
#[derive(Clone)]
pub struct ChannelNotificationSink {
    sender: mpsc::UnboundedSender<WithdrawalCompleted>,
}

impl ChannelNotificationSink {
    /// Creates the sink together with the receiving half for the consumer.
    pub fn unbounded() -> (Self, mpsc::UnboundedReceiver<WithdrawalCompleted>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl NotificationSink for ChannelNotificationSink {
    async fn publish(&self, event: WithdrawalCompleted) -> Result<()> {
        self.sender
            .send(event)
            .map_err(|_| AtmError::NotificationUnavailable)
    }
}
