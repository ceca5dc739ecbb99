//! Client-side consumer for redirect messages
//!
//! Runs after every navigation: if the current URL carries a message it is
//! shown once and the URL is rewritten in place without the message
//! parameters. The presence check makes repeated runs on the same URL a
//! no-op.

use super::{read_message, strip_message, FlashMessage};

/// Displays a message to the user (toast, banner). Fire and forget.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn show(&self, message: &FlashMessage);
}

/// Access to the browser location.
#[cfg_attr(test, mockall::automock)]
pub trait History {
    /// Current path, query and fragment
    fn current(&self) -> String;
    /// Replace the current entry without pushing a new one or reloading
    fn replace(&mut self, url: &str);
}

pub struct MessageSurface<N, H> {
    notifier: N,
    history: H,
}

impl<N: Notifier, H: History> MessageSurface<N, H> {
    pub fn new(notifier: N, history: H) -> Self {
        Self { notifier, history }
    }

    /// Handle one navigation. Returns the message that was shown, if any.
    pub fn on_navigate(&mut self) -> Option<FlashMessage> {
        let url = self.history.current();
        let message = read_message(&url)?;

        self.notifier.show(&message);

        let cleaned = strip_message(&url);
        if cleaned != url {
            self.history.replace(&cleaned);
        }
        Some(message)
    }

    pub fn history(&self) -> &H {
        &self.history
    }
}

/// In-memory [`History`] for hosts without a browser location (server
/// renders, tests).
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    url: String,
    replacements: usize,
}

impl MemoryHistory {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            replacements: 0,
        }
    }

    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl History for MemoryHistory {
    fn current(&self) -> String {
        self.url.clone()
    }

    fn replace(&mut self, url: &str) {
        self.url = url.to_string();
        self.replacements += 1;
    }
}

/// [`Notifier`] that writes messages to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, message: &FlashMessage) {
        tracing::info!(severity = %message.severity, "{}", message.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::Severity;
    use mockall::predicate::*;

    #[test]
    fn test_shows_message_and_strips_params() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_show()
            .with(eq(FlashMessage::new("Access denied", Severity::Error)))
            .times(1)
            .return_const(());

        let mut history = MockHistory::new();
        history
            .expect_current()
            .times(1)
            .return_const("/booking?message=Access%20denied&type=error".to_string());
        history
            .expect_replace()
            .withf(|url| url == "/booking")
            .times(1)
            .return_const(());

        let mut surface = MessageSurface::new(notifier, history);
        let shown = surface.on_navigate();

        assert_eq!(shown.map(|m| m.severity), Some(Severity::Error));
    }

    #[test]
    fn test_no_message_means_no_toast_and_no_rewrite() {
        let mut notifier = MockNotifier::new();
        notifier.expect_show().never();

        let mut history = MockHistory::new();
        history
            .expect_current()
            .return_const("/booking?step=2".to_string());
        history.expect_replace().never();

        let mut surface = MessageSurface::new(notifier, history);
        assert!(surface.on_navigate().is_none());
    }

    #[test]
    fn test_second_run_on_cleaned_url_is_noop() {
        let mut notifier = MockNotifier::new();
        notifier.expect_show().times(1).return_const(());

        let history = MemoryHistory::new("/login?redirect=%2Fadmin&message=X&type=error");
        let mut surface = MessageSurface::new(notifier, history);

        assert!(surface.on_navigate().is_some());
        assert_eq!(surface.history().current(), "/login?redirect=%2Fadmin");
        assert_eq!(surface.history().replacements(), 1);

        assert!(surface.on_navigate().is_none());
        assert_eq!(surface.history().replacements(), 1);
    }

    #[test]
    fn test_missing_type_defaults_to_info() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_show()
            .withf(|m| m.severity == Severity::Info && m.text == "Hello")
            .times(1)
            .return_const(());

        let mut surface = MessageSurface::new(notifier, MemoryHistory::new("/galeri?message=Hello"));
        surface.on_navigate();
        assert_eq!(surface.history().current(), "/galeri");
    }

    #[test]
    fn test_log_notifier_does_not_panic() {
        LogNotifier.show(&FlashMessage::login_required());
    }
}
