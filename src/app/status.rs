use std::time::{Duration, Instant};

/// A transient status message with an optional deadline.
///
/// Showing a new message replaces both text and deadline, so an older
/// deadline can never clear a newer message.
#[derive(Debug, Default)]
pub struct StatusLine {
    message: Option<String>,
    expires_at: Option<Instant>,
}

impl StatusLine {
    /// Show `message` until `now + ttl`.
    pub fn show(&mut self, message: impl Into<String>, ttl: Duration, now: Instant) {
        self.message = Some(message.into());
        self.expires_at = Some(now + ttl);
    }

    /// Show `message` until replaced or cleared.
    pub fn show_sticky(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.expires_at = None;
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.expires_at = None;
    }

    /// Drop the message if its deadline has passed. Returns true when it did.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) if now >= deadline => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
