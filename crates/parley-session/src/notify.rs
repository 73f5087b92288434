//! The user-visible notification channel.
//!
//! Operations never print or pop anything themselves. They push
//! [`Notification`]s into an unbounded channel, and whatever UI owns the
//! receiving end decides how to show them (toast, status bar, stderr).

use tokio::sync::mpsc;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

/// Receiving end of the notification channel.
pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

/// Sending end of the notification channel.
///
/// Cheap to clone. Sending never blocks and never fails from the
/// caller's point of view: if the UI dropped its receiver, the
/// notification is discarded with a debug log.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Creates a notifier and the receiver the UI should drain.
    pub fn channel() -> (Self, NotificationReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emits a success notification.
    pub fn success(&self, message: impl Into<String>) {
        self.emit(Level::Success, message.into());
    }

    /// Emits an error notification.
    pub fn error(&self, message: impl Into<String>) {
        self.emit(Level::Error, message.into());
    }

    fn emit(&self, level: Level, message: String) {
        if self.tx.send(Notification { level, message }).is_err() {
            tracing::debug!(?level, "notification receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_delivers_in_order() {
        let (notifier, mut rx) = Notifier::channel();

        notifier.success("saved");
        notifier.error("boom");

        assert_eq!(
            rx.try_recv().unwrap(),
            Notification {
                level: Level::Success,
                message: "saved".into()
            }
        );
        assert_eq!(rx.try_recv().unwrap().level, Level::Error);
        assert!(rx.try_recv().is_err(), "nothing else was sent");
    }

    #[test]
    fn test_emit_after_receiver_dropped_does_not_panic() {
        let (notifier, rx) = Notifier::channel();
        drop(rx);

        notifier.error("nobody is listening");
    }

    #[test]
    fn test_clones_share_one_channel() {
        let (notifier, mut rx) = Notifier::channel();
        let other = notifier.clone();

        other.success("from clone");

        assert_eq!(rx.try_recv().unwrap().message, "from clone");
    }
}
