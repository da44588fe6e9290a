use std::time::Duration;

use crate::config::{ConnectionTarget, ConsumerSettings};
use crate::error::ClientError;
use crate::outcome::PollOutcome;

// ═══════════════════════════════════════════════════════════════
//  Client traits — boundary to the messaging library
// ═══════════════════════════════════════════════════════════════

/// Builds consumer handles. The only place that sees client configuration.
pub trait ConsumerConnector {
    type Handle: ConsumerHandle;

    fn connect(
        &self,
        target: &ConnectionTarget,
        settings: &ConsumerSettings,
    ) -> Result<Self::Handle, ClientError>;
}

/// An active consumer. Owned by exactly one [`Subscription`].
pub trait ConsumerHandle {
    fn subscribe(&mut self, topic: &str) -> Result<(), ClientError>;

    /// Wait at most `timeout` for the next message and classify the result.
    fn poll(&mut self, timeout: Duration) -> PollOutcome;

    /// Release client resources.
    fn close(&mut self);
}

// ═══════════════════════════════════════════════════════════════
//  Subscription — scoped ownership of the handle
// ═══════════════════════════════════════════════════════════════

/// Owns a [`ConsumerHandle`] and closes it exactly once: on
/// [`Subscription::release`] or on drop, whichever comes first.
pub struct Subscription<H: ConsumerHandle> {
    handle: H,
    released: bool,
}

impl<H: ConsumerHandle> Subscription<H> {
    pub fn new(handle: H) -> Self {
        Self { handle, released: false }
    }

    pub fn subscribe(&mut self, topic: &str) -> Result<(), ClientError> {
        self.handle.subscribe(topic)
    }

    pub fn poll(&mut self, timeout: Duration) -> PollOutcome {
        self.handle.poll(timeout)
    }

    pub fn release(mut self) {
        self.close_once();
    }

    fn close_once(&mut self) {
        if !self.released {
            self.released = true;
            self.handle.close();
            tracing::debug!("consumer closed");
        }
    }
}

impl<H: ConsumerHandle> Drop for Subscription<H> {
    fn drop(&mut self) {
        self.close_once();
    }
}
