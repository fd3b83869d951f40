use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::ports::AlertPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAlert;

impl AlertPort for StderrAlert {
    fn alert(&self, message: &str) {
        eprintln!("alert: {message}");
    }
}

/// Queues alerts for a UI that shows them as a modal.
#[derive(Debug, Clone)]
pub struct ChannelAlert {
    tx: UnboundedSender<String>,
}

impl ChannelAlert {
    pub fn new() -> (Self, UnboundedReceiver<String>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AlertPort for ChannelAlert {
    fn alert(&self, message: &str) {
        if self.tx.send(message.to_string()).is_err() {
            tracing::warn!(message, "alert dropped; no receiver");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChannelAlert;
    use crate::ports::AlertPort;

    #[test]
    fn channel_alert_delivers_messages_in_order() {
        let (alert, mut rx) = ChannelAlert::new();
        alert.alert("first");
        alert.alert("second");

        assert_eq!(rx.try_recv().unwrap(), "first");
        assert_eq!(rx.try_recv().unwrap(), "second");
        assert!(rx.try_recv().is_err());
    }
}
