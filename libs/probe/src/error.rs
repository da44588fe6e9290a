/// Failure reported by the messaging client behind [`crate::ConsumerConnector`]
/// or [`crate::ConsumerHandle`].
///
/// Carries only a human-readable description: the library-specific error
/// shape stays inside the adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    message: String,
}

impl ClientError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { message: msg.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ClientError {
    fn from(s: String) -> Self { Self { message: s } }
}

impl From<&str> for ClientError {
    fn from(s: &str) -> Self { Self { message: s.to_string() } }
}

/// Startup failure of the probe. Both variants are permanent: no retry.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Failed to create consumer: {0}")]
    ConnectionSetup(ClientError),

    #[error("Failed to subscribe to topic: {0}")]
    Subscription(ClientError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_errors_render_as_single_line() {
        let e = ProbeError::ConnectionSetup(ClientError::new("bad broker list"));
        assert_eq!(e.to_string(), "Failed to create consumer: bad broker list");

        let e = ProbeError::Subscription("broker unreachable".into());
        assert_eq!(e.to_string(), "Failed to subscribe to topic: broker unreachable");
        assert!(!e.to_string().contains('\n'));
    }
}
