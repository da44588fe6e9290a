use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_BROKERS: &str = "localhost:9092";
pub const DEFAULT_TOPIC: &str = "test";
pub const DEFAULT_GROUP_ID: &str = "kafkastatus_group";
pub const DEFAULT_AUTO_OFFSET_RESET: &str = "earliest";
pub const DEFAULT_LIVENESS_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

// ═══════════════════════════════════════════════════════════════
//  ConnectionTarget
// ═══════════════════════════════════════════════════════════════

/// Where to connect and what to read. Immutable after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    /// Comma-separated `host:port` list.
    pub brokers: String,
    pub topic: String,
}

impl ConnectionTarget {
    /// Apply built-in defaults to absent (or empty) values.
    pub fn resolve(brokers: Option<String>, topic: Option<String>) -> Self {
        Self {
            brokers: non_empty(brokers).unwrap_or_else(|| DEFAULT_BROKERS.to_string()),
            topic: non_empty(topic).unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
        }
    }
}

impl Default for ConnectionTarget {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ═══════════════════════════════════════════════════════════════
//  ConsumerSettings
// ═══════════════════════════════════════════════════════════════

/// Options handed to the client when the consumer is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerSettings {
    pub group_id: String,
    pub auto_offset_reset: String,
    /// Extra client properties passed through verbatim (security, debug, ...).
    pub properties: BTreeMap<String, String>,
}

impl Default for ConsumerSettings {
    fn default() -> Self {
        Self {
            group_id: DEFAULT_GROUP_ID.to_string(),
            auto_offset_reset: DEFAULT_AUTO_OFFSET_RESET.to_string(),
            properties: BTreeMap::new(),
        }
    }
}

impl ConsumerSettings {
    /// Flat property list for the client.
    ///
    /// Pass-through properties come first; `bootstrap.servers`, `group.id`
    /// and `auto.offset.reset` always follow and override them.
    pub fn client_properties(&self, target: &ConnectionTarget) -> Vec<(String, String)> {
        let recognized = [
            ("bootstrap.servers", target.brokers.as_str()),
            ("group.id", self.group_id.as_str()),
            ("auto.offset.reset", self.auto_offset_reset.as_str()),
        ];

        let mut props: Vec<(String, String)> = self
            .properties
            .iter()
            .filter(|(k, _)| !recognized.iter().any(|(name, _)| *name == k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        props.extend(recognized.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        props
    }
}

// ═══════════════════════════════════════════════════════════════
//  LoopSettings
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    /// Period of the "Connection to Kafka is alive." line.
    pub liveness_interval: Duration,
    /// Bounded wait of a single poll.
    pub poll_timeout: Duration,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            liveness_interval: DEFAULT_LIVENESS_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}
