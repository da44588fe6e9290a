use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::{ConsumerConnector, ConsumerHandle, Subscription};
use crate::config::{ConnectionTarget, ConsumerSettings, LoopSettings};
use crate::error::ProbeError;
use crate::liveness::{Clock, LivenessTimer, SystemClock};
use crate::outcome::{PollOutcome, ReceivedMessage};
use crate::sink::StatusSink;

pub const ALIVE_LINE: &str = "Connection to Kafka is alive.";
pub const EXIT_LINE: &str = "Exiting kafkastatus.";

/// Why the loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopExit {
    /// Cancellation requested from outside (Ctrl+C).
    Cancelled,
    /// A non-timeout poll error; carries its description.
    ReadError(String),
}

/// Summary of one probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopReport {
    pub exit: LoopExit,
    pub messages: u64,
    pub liveness_checks: u64,
}

impl LoopReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.exit, LoopExit::ReadError(_))
    }
}

// ═══════════════════════════════════════════════════════════════
//  Probe — subscription lifecycle + poll-and-classify loop
// ═══════════════════════════════════════════════════════════════

/// Подписанный consumer, готовый к циклу опроса.
///
/// Создаётся через [`Probe::start`], потребляется [`Probe::run`].
/// Handle закрывается ровно один раз на любом пути выхода.
pub struct Probe<H: ConsumerHandle, S: StatusSink, C: Clock = SystemClock> {
    subscription: Subscription<H>,
    sink: S,
    timer: LivenessTimer<C>,
    poll_timeout: Duration,
}

impl<H: ConsumerHandle, S: StatusSink> Probe<H, S, SystemClock> {
    /// Banner → connect → subscribe, on the wall clock.
    pub fn start<K>(
        connector: &K,
        target: &ConnectionTarget,
        consumer: &ConsumerSettings,
        settings: LoopSettings,
        sink: S,
    ) -> Result<Self, ProbeError>
    where
        K: ConsumerConnector<Handle = H>,
    {
        Self::start_with_clock(connector, target, consumer, settings, sink, SystemClock)
    }
}

impl<H: ConsumerHandle, S: StatusSink, C: Clock> Probe<H, S, C> {
    pub fn start_with_clock<K>(
        connector: &K,
        target: &ConnectionTarget,
        consumer: &ConsumerSettings,
        settings: LoopSettings,
        mut sink: S,
        clock: C,
    ) -> Result<Self, ProbeError>
    where
        K: ConsumerConnector<Handle = H>,
    {
        sink.info(&format!("Connecting to brokers: {}", target.brokers));
        sink.info(&format!("Subscribed to topic: {}", target.topic));

        let handle = connector
            .connect(target, consumer)
            .map_err(ProbeError::ConnectionSetup)?;
        tracing::info!(brokers = %target.brokers, group_id = %consumer.group_id, "consumer created");

        // On subscribe failure the guard drops here and closes the handle.
        let mut subscription = Subscription::new(handle);
        subscription
            .subscribe(&target.topic)
            .map_err(ProbeError::Subscription)?;
        tracing::info!(topic = %target.topic, "subscribed");

        Ok(Self {
            subscription,
            sink,
            timer: LivenessTimer::new(settings.liveness_interval, clock),
            poll_timeout: settings.poll_timeout,
        })
    }

    /// Run until a poll error or cancellation, then release the consumer
    /// and print the exit line.
    pub fn run(self, cancel: &CancellationToken) -> LoopReport {
        let Self { mut subscription, mut sink, mut timer, poll_timeout } = self;
        let mut messages = 0u64;
        let mut liveness_checks = 0u64;

        let exit = loop {
            if cancel.is_cancelled() {
                tracing::info!("cancellation requested");
                break LoopExit::Cancelled;
            }

            if timer.poll_due() {
                liveness_checks += 1;
                sink.info(ALIVE_LINE);
                continue;
            }

            match subscription.poll(poll_timeout) {
                PollOutcome::Message(msg) => {
                    messages += 1;
                    report_message(&mut sink, &msg);
                }
                PollOutcome::Timeout => continue,
                PollOutcome::Recoverable(e) => {
                    sink.error(&format!("Error while reading message: {e}"));
                    tracing::debug!(error = %e, "read error, stopping");
                    break LoopExit::ReadError(e);
                }
                PollOutcome::Fatal(e) => {
                    sink.error(&format!("Fatal error while reading message: {e}"));
                    tracing::debug!(error = %e, "fatal read error, stopping");
                    break LoopExit::ReadError(e);
                }
            }
        };

        subscription.release();
        sink.info(EXIT_LINE);
        tracing::info!(messages, liveness_checks, "probe finished");

        LoopReport { exit, messages, liveness_checks }
    }
}

fn report_message(sink: &mut impl StatusSink, msg: &ReceivedMessage) {
    tracing::debug!(
        source = %msg.source,
        offset = ?msg.offset,
        bytes = msg.payload.len(),
        "message received"
    );
    sink.info(&format!("Received message on {}: {}", msg.source, msg.payload_text()));
}
