use std::collections::BTreeMap;
use std::time::Duration;

use clap::Args;
use serde::Deserialize;

use probe::{ConnectionTarget, ConsumerSettings, LoopSettings};

use super::error::KafkastatusError;

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub brokers: Option<String>,
    pub topic: Option<String>,
    pub group_id: Option<String>,
    pub auto_offset_reset: Option<String>,
    pub liveness_interval_secs: Option<u64>,
    pub poll_timeout_ms: Option<u64>,
    /// Дополнительные свойства клиента (security.protocol, sasl.*, debug ...).
    #[serde(default)]
    pub properties: BTreeMap<String, toml::Value>,
}

pub fn load_config(path: &str) -> Result<Config, KafkastatusError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| KafkastatusError::Config(format!("cannot read config {path}: {e}")))?;
    parse_config(&content).map_err(|e| KafkastatusError::Config(format!("bad config {path}: {e}")))
}

fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug)]
pub struct ProbeArgs {
    /// Брокеры, host:port через запятую (по умолчанию localhost:9092)
    #[arg(env = "KAFKASTATUS_BROKERS", allow_hyphen_values = true)]
    pub brokers: Option<String>,

    /// Topic для подписки (по умолчанию test)
    #[arg(env = "KAFKASTATUS_TOPIC", allow_hyphen_values = true)]
    pub topic: Option<String>,

    /// Путь к kafkastatus.toml
    #[arg(long, default_value = "kafkastatus.toml", env = "KAFKASTATUS_CONFIG")]
    pub config: String,

    // Всё после topic игнорируется.
    #[arg(hide = true, num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub _rest: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Итоговая конфигурация после мержа: defaults < config file < env/CLI
#[derive(Debug)]
pub struct Effective {
    pub target: ConnectionTarget,
    pub consumer: ConsumerSettings,
    pub loop_settings: LoopSettings,
}

impl Effective {
    pub fn new(args: &ProbeArgs) -> Result<Self, KafkastatusError> {
        let cfg = match load_config(&args.config) {
            Ok(c) => c,
            Err(e) => {
                if std::path::Path::new(&args.config).exists() {
                    return Err(e);
                }
                tracing::debug!(config = %args.config, "no config file, using defaults");
                Config::default()
            }
        };
        Self::merge(args, cfg)
    }

    fn merge(args: &ProbeArgs, cfg: Config) -> Result<Self, KafkastatusError> {
        let defaults = LoopSettings::default();
        let liveness_interval = cfg
            .liveness_interval_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.liveness_interval);
        let poll_timeout = cfg
            .poll_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_timeout);

        if liveness_interval.is_zero() {
            return Err(KafkastatusError::Config("liveness_interval_secs must be > 0".into()));
        }
        if poll_timeout.is_zero() {
            return Err(KafkastatusError::Config("poll_timeout_ms must be > 0".into()));
        }

        let mut consumer = ConsumerSettings::default();
        if let Some(group_id) = cfg.group_id {
            consumer.group_id = group_id;
        }
        if let Some(reset) = cfg.auto_offset_reset {
            consumer.auto_offset_reset = reset;
        }
        consumer.properties = cfg
            .properties
            .into_iter()
            .map(|(k, v)| (k, property_value(v)))
            .collect();

        let target = ConnectionTarget::resolve(
            args.brokers.clone().or(cfg.brokers),
            args.topic.clone().or(cfg.topic),
        );

        Ok(Self {
            target,
            consumer,
            loop_settings: LoopSettings { liveness_interval, poll_timeout },
        })
    }
}

/// Client properties are strings; TOML numbers/bools are written unquoted.
fn property_value(value: toml::Value) -> String {
    match value {
        toml::Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(brokers: Option<&str>, topic: Option<&str>, config: &str) -> ProbeArgs {
        ProbeArgs {
            brokers: brokers.map(str::to_string),
            topic: topic.map(str::to_string),
            config: config.to_string(),
            _rest: Vec::new(),
        }
    }

    fn merged(a: &ProbeArgs, toml_str: &str) -> Result<Effective, KafkastatusError> {
        let cfg = parse_config(toml_str).map_err(|e| KafkastatusError::Config(e.to_string()))?;
        Effective::merge(a, cfg)
    }

    #[test]
    fn missing_default_config_uses_builtin_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kafkastatus.toml");

        let eff = Effective::new(&args(None, None, path.to_str().unwrap())).unwrap();

        assert_eq!(eff.target.brokers, "localhost:9092");
        assert_eq!(eff.target.topic, "test");
        assert_eq!(eff.consumer.group_id, "kafkastatus_group");
        assert_eq!(eff.consumer.auto_offset_reset, "earliest");
        assert_eq!(eff.loop_settings, LoopSettings::default());
    }

    #[test]
    fn cli_wins_over_config_file() {
        let toml_str = r#"
            brokers = "file-broker:9092"
            topic = "file-topic"
        "#;

        let eff = merged(&args(Some("cli-broker:9092"), None, "unused"), toml_str).unwrap();

        assert_eq!(eff.target.brokers, "cli-broker:9092");
        assert_eq!(eff.target.topic, "file-topic");
    }

    #[test]
    fn config_file_overrides_consumer_and_loop_settings() {
        let toml_str = r#"
            group_id = "ops_probe"
            auto_offset_reset = "latest"
            liveness_interval_secs = 30
            poll_timeout_ms = 250

            [properties]
            "security.protocol" = "SASL_SSL"
            "session.timeout.ms" = 45000
            "enable.auto.commit" = false
        "#;

        let eff = merged(&args(None, None, "unused"), toml_str).unwrap();

        assert_eq!(eff.consumer.group_id, "ops_probe");
        assert_eq!(eff.consumer.auto_offset_reset, "latest");
        assert_eq!(eff.loop_settings.liveness_interval, Duration::from_secs(30));
        assert_eq!(eff.loop_settings.poll_timeout, Duration::from_millis(250));
        assert_eq!(eff.consumer.properties["security.protocol"], "SASL_SSL");
        assert_eq!(eff.consumer.properties["session.timeout.ms"], "45000");
        assert_eq!(eff.consumer.properties["enable.auto.commit"], "false");
    }

    #[test]
    fn zero_intervals_rejected() {
        let err = merged(&args(None, None, "unused"), "liveness_interval_secs = 0").unwrap_err();
        assert!(err.to_string().contains("liveness_interval_secs"));

        let err = merged(&args(None, None, "unused"), "poll_timeout_ms = 0").unwrap_err();
        assert!(err.to_string().contains("poll_timeout_ms"));
    }

    #[test]
    fn present_but_invalid_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "brokers = [not valid").unwrap();

        let err = Effective::new(&args(None, None, file.path().to_str().unwrap())).unwrap_err();

        assert!(matches!(err, KafkastatusError::Config(_)));
        assert!(err.to_string().starts_with("config: bad config"));
    }
}
