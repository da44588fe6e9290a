//! Liveness probe for a single Kafka topic.
//!
//! The crate knows nothing about a concrete Kafka client: the broker side is
//! reached through [`ConsumerConnector`] / [`ConsumerHandle`], output goes to a
//! [`StatusSink`], time comes from a [`Clock`].

pub mod client;
pub mod config;
pub mod error;
pub mod liveness;
pub mod outcome;
pub mod probe;
pub mod sink;

pub use client::{ConsumerConnector, ConsumerHandle, Subscription};
pub use config::{ConnectionTarget, ConsumerSettings, LoopSettings};
pub use error::{ClientError, ProbeError};
pub use liveness::{Clock, LivenessTimer, SystemClock};
pub use outcome::{PollOutcome, ReceivedMessage, TopicPartition};
pub use probe::{LoopExit, LoopReport, Probe};
pub use sink::{StatusSink, StdioSink};
