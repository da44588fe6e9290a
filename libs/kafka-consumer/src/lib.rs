//! `rdkafka` adapter for the probe client traits.
//!
//! Everything library-specific stops here: the probe only ever sees
//! [`PollOutcome`] and [`ClientError`].

use std::time::Duration;

use rdkafka::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::message::{BorrowedMessage, Message};

use probe::{
    ClientError, ConnectionTarget, ConsumerConnector, ConsumerHandle, ConsumerSettings,
    PollOutcome, ReceivedMessage, TopicPartition,
};

// ═══════════════════════════════════════════════════════════════
//  Connector
// ═══════════════════════════════════════════════════════════════

/// Builds `BaseConsumer`s from the probe settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct KafkaConnector;

impl ConsumerConnector for KafkaConnector {
    type Handle = KafkaHandle;

    fn connect(
        &self,
        target: &ConnectionTarget,
        settings: &ConsumerSettings,
    ) -> Result<KafkaHandle, ClientError> {
        let consumer: BaseConsumer = client_config(target, settings)
            .create()
            .map_err(client_error)?;
        Ok(KafkaHandle { consumer: Some(consumer) })
    }
}

/// Client configuration: pass-through properties, then the recognized
/// options (`bootstrap.servers`, `group.id`, `auto.offset.reset`).
pub fn client_config(target: &ConnectionTarget, settings: &ConsumerSettings) -> ClientConfig {
    let mut config = ClientConfig::new();
    for (key, value) in settings.client_properties(target) {
        config.set(key, value);
    }
    config
}

// ═══════════════════════════════════════════════════════════════
//  Handle
// ═══════════════════════════════════════════════════════════════

pub struct KafkaHandle {
    /// `None` after close.
    consumer: Option<BaseConsumer>,
}

impl ConsumerHandle for KafkaHandle {
    fn subscribe(&mut self, topic: &str) -> Result<(), ClientError> {
        let consumer = self
            .consumer
            .as_ref()
            .ok_or_else(|| ClientError::new("consumer is closed"))?;
        consumer.subscribe(&[topic]).map_err(client_error)
    }

    fn poll(&mut self, timeout: Duration) -> PollOutcome {
        let Some(consumer) = self.consumer.as_ref() else {
            return PollOutcome::Fatal("consumer is closed".into());
        };
        match consumer.poll(timeout) {
            None => PollOutcome::Timeout,
            Some(Ok(msg)) => PollOutcome::Message(received(&msg)),
            Some(Err(e)) => classify(&e),
        }
    }

    fn close(&mut self) {
        if let Some(consumer) = self.consumer.take() {
            consumer.unsubscribe();
            tracing::debug!("kafka consumer unsubscribed");
        }
    }
}

fn received(msg: &BorrowedMessage<'_>) -> ReceivedMessage {
    ReceivedMessage::new(
        TopicPartition::new(msg.topic(), msg.partition()),
        msg.payload().unwrap_or_default(),
    )
    .with_offset(msg.offset())
}

// ═══════════════════════════════════════════════════════════════
//  Error classification
// ═══════════════════════════════════════════════════════════════

/// Map a poll error onto the probe taxonomy.
///
/// `_TIMED_OUT` is the idle case. Fatal consumption errors and codes that
/// cannot clear without operator action (auth, config) are `Fatal`.
/// Everything else, including shapes not known here, is `Recoverable`.
pub fn classify(error: &KafkaError) -> PollOutcome {
    match error {
        KafkaError::MessageConsumptionFatal(_) => PollOutcome::Fatal(error.to_string()),
        KafkaError::ClientConfig(..) | KafkaError::ClientCreation(_) => {
            PollOutcome::Fatal(error.to_string())
        }
        _ => match error.rdkafka_error_code() {
            Some(RDKafkaErrorCode::OperationTimedOut) => PollOutcome::Timeout,
            Some(code) if is_fatal_code(code) => PollOutcome::Fatal(error.to_string()),
            _ => PollOutcome::Recoverable(error.to_string()),
        },
    }
}

fn is_fatal_code(code: RDKafkaErrorCode) -> bool {
    matches!(
        code,
        RDKafkaErrorCode::Fatal
            | RDKafkaErrorCode::Authentication
            | RDKafkaErrorCode::SaslAuthenticationFailed
            | RDKafkaErrorCode::TopicAuthorizationFailed
            | RDKafkaErrorCode::GroupAuthorizationFailed
            | RDKafkaErrorCode::ClusterAuthorizationFailed
            | RDKafkaErrorCode::InvalidConfig
    )
}

fn client_error(e: KafkaError) -> ClientError {
    ClientError::new(e.to_string())
}
