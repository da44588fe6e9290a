use std::fmt;

/// `topic[partition]` — source of a received message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicPartition {
    pub topic: String,
    pub partition: i32,
}

impl TopicPartition {
    pub fn new(topic: impl Into<String>, partition: i32) -> Self {
        Self { topic: topic.into(), partition }
    }
}

impl fmt::Display for TopicPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.topic, self.partition)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub source: TopicPartition,
    /// Offset within the partition, if the client reports one.
    pub offset: Option<i64>,
    pub payload: Vec<u8>,
}

impl ReceivedMessage {
    pub fn new(source: TopicPartition, payload: impl Into<Vec<u8>>) -> Self {
        Self { source, offset: None, payload: payload.into() }
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Payload decoded as text. Valid UTF-8 comes back verbatim, invalid
    /// sequences are replaced with U+FFFD.
    pub fn payload_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

/// Result of one poll. Closed taxonomy: the loop never sees the client
/// library's own error shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Message(ReceivedMessage),
    /// Nothing arrived within the poll window. Expected idle state.
    Timeout,
    /// Non-fatal client error (transport hiccup, partition EOF, ...).
    Recoverable(String),
    /// The client cannot continue.
    Fatal(String),
}
