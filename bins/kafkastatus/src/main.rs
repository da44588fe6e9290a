mod cmd;

use clap::Parser;
use cmd::config::{Effective, ProbeArgs};
use cmd::error::KafkastatusError;
use probe::LoopReport;

#[derive(Parser)]
#[command(name = "kafkastatus", version, about = "Проверка связи с Kafka: подписка на topic и вывод сообщений")]
struct Cli {
    #[command(flatten)]
    args: ProbeArgs,
}

#[tokio::main]
async fn main() {
    // stdout занят статусными строками, логи — в stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print().ok();
            std::process::exit(usage_exit_code(&e));
        }
    };

    let eff = match Effective::new(&cli.args) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let result = cmd::run::run(eff).await;
    match &result {
        Ok(report) if report.is_failure() => {
            tracing::info!(exit = ?report.exit, messages = report.messages, "probe stopped on read error");
        }
        Ok(report) => {
            tracing::info!(messages = report.messages, "probe stopped");
        }
        Err(e) => eprintln!("{e}"),
    }
    std::process::exit(exit_status(&result));
}

/// `--help` / `--version` — 0, всё остальное — ошибка запуска.
fn usage_exit_code(e: &clap::Error) -> i32 {
    if e.use_stderr() { 1 } else { 0 }
}

/// Read errors end the loop but keep exit status 0; only startup fails with 1.
fn exit_status(result: &Result<LoopReport, KafkastatusError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe::{ClientError, LoopExit, ProbeError};

    #[test]
    fn positional_brokers_and_topic() {
        let cli = Cli::try_parse_from(["kafkastatus", "k1:9092,k2:9092", "orders"]);
        let args = cli.map(|c| c.args).ok();
        assert_eq!(args.as_ref().and_then(|a| a.brokers.as_deref()), Some("k1:9092,k2:9092"));
        assert_eq!(args.as_ref().and_then(|a| a.topic.as_deref()), Some("orders"));
    }

    fn parsed(argv: &[&str]) -> Option<ProbeArgs> {
        Cli::try_parse_from(argv.iter().copied()).map(|c| c.args).ok()
    }

    #[test]
    fn arguments_after_topic_are_ignored() {
        let args = parsed(&["kafkastatus", "b:9092", "t", "extra", "--whatever"]);
        assert_eq!(args.as_ref().and_then(|a| a.brokers.as_deref()), Some("b:9092"));
        assert_eq!(args.as_ref().and_then(|a| a.topic.as_deref()), Some("t"));
    }

    #[test]
    fn topic_may_start_with_hyphen() {
        let args = parsed(&["kafkastatus", "b:9092", "-events"]);
        assert_eq!(args.as_ref().and_then(|a| a.topic.as_deref()), Some("-events"));
    }

    #[test]
    fn config_flag_still_recognized() {
        let args = parsed(&["kafkastatus", "--config", "probe.toml", "b:9092"]);
        assert_eq!(args.as_ref().map(|a| a.config.as_str()), Some("probe.toml"));
        assert_eq!(args.as_ref().and_then(|a| a.brokers.as_deref()), Some("b:9092"));
    }

    #[test]
    fn help_exits_zero_usage_error_exits_one() {
        let help = Cli::try_parse_from(["kafkastatus", "--help"]).err();
        assert_eq!(help.as_ref().map(usage_exit_code), Some(0));

        let missing_value = Cli::try_parse_from(["kafkastatus", "--config"]).err();
        assert_eq!(missing_value.as_ref().map(usage_exit_code), Some(1));
    }

    fn report(exit: LoopExit) -> Result<LoopReport, KafkastatusError> {
        Ok(LoopReport { exit, messages: 0, liveness_checks: 0 })
    }

    #[test]
    fn read_error_exits_zero() {
        assert_eq!(exit_status(&report(LoopExit::ReadError("Broker: transport failure".into()))), 0);
    }

    #[test]
    fn cancelled_exits_zero() {
        assert_eq!(exit_status(&report(LoopExit::Cancelled)), 0);
    }

    #[test]
    fn startup_failure_exits_one() {
        let err = ProbeError::ConnectionSetup(ClientError::new("invalid bootstrap.servers"));
        assert_eq!(exit_status(&Err(KafkastatusError::Probe(err))), 1);
        assert_eq!(exit_status(&Err(KafkastatusError::Config("bad config".into()))), 1);
    }
}
