use kafka_consumer::KafkaConnector;
use probe::{LoopReport, Probe, ProbeError, StdioSink};
use tokio_util::sync::CancellationToken;

use super::config::Effective;
use super::error::KafkastatusError;

/// Start the probe and drive it until it stops or Ctrl+C arrives.
///
/// `BaseConsumer::poll` blocks, so the whole probe lives on a blocking
/// thread; Ctrl+C only flips the token and waits for the loop to notice.
pub async fn run(eff: Effective) -> Result<LoopReport, KafkastatusError> {
    let token = CancellationToken::new();
    let loop_token = token.clone();

    let mut task = tokio::task::spawn_blocking(move || {
        let probe = Probe::start(
            &KafkaConnector,
            &eff.target,
            &eff.consumer,
            eff.loop_settings,
            StdioSink,
        )?;
        Ok::<_, ProbeError>(probe.run(&loop_token))
    });

    let joined = tokio::select! {
        res = &mut task => res,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, stopping probe");
            token.cancel();
            task.await
        }
    };

    Ok(joined??)
}
