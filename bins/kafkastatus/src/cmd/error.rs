#[derive(Debug, thiserror::Error)]
pub enum KafkastatusError {
    #[error("config: {0}")]
    Config(String),

    #[error(transparent)]
    Probe(#[from] probe::ProbeError),

    #[error("probe task: {0}")]
    Join(#[from] tokio::task::JoinError),
}
