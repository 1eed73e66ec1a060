use std::fmt;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use smsbridge_core::config::{self, Config, GatewayConfig, TelegramConfig, parse_duration};
use smsbridge_core::{BridgeBuilder, PollPolicy, ShutdownHandle, StopReason};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

/// Forward new SMS from sms-gammu-gateway to a Telegram chat.
#[derive(Debug, Parser)]
#[command(name = "smsbridge", version)]
struct Args {
    /// sms-gammu-gateway base URL
    #[arg(long, env = "ENDPOINT", default_value = config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// sms-gammu-gateway username
    #[arg(long, env = "USERNAME", default_value = config::DEFAULT_USERNAME)]
    username: String,

    /// sms-gammu-gateway password
    #[arg(long, env = "PASSWORD", default_value = config::DEFAULT_PASSWORD, hide_env_values = true)]
    password: String,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_TOKEN", default_value = "", hide_env_values = true)]
    telegram_token: String,

    /// Telegram chat ID
    #[arg(long, env = "TELEGRAM_CHAT_ID", default_value = "")]
    telegram_chat_id: String,

    /// Telegram Bot API base URL
    #[arg(long, env = "TELEGRAM_API_URL", default_value = config::DEFAULT_TELEGRAM_API_URL)]
    telegram_api_url: String,

    /// Polling interval (e.g. 500ms, 5s, 1m)
    #[arg(long, env = "INTERVAL", default_value = "5s", value_parser = parse_duration)]
    interval: Duration,

    /// Consecutive fetch failures tolerated before polling stops
    #[arg(long, env = "MAX_FAILURES", default_value_t = PollPolicy::DEFAULT_MAX_CONSECUTIVE_FAILURES)]
    max_failures: u32,

    /// Per-request HTTP timeout
    #[arg(long, env = "HTTP_TIMEOUT", default_value = "10s", value_parser = parse_duration)]
    http_timeout: Duration,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            gateway: GatewayConfig {
                endpoint: args.endpoint,
                username: args.username,
                password: args.password,
                timeout: args.http_timeout,
            },
            telegram: TelegramConfig {
                token: args.telegram_token,
                chat_id: args.telegram_chat_id,
                api_url: args.telegram_api_url,
                timeout: args.http_timeout,
            },
            poll: PollPolicy::new(args.interval).with_max_consecutive_failures(args.max_failures),
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("smsbridge=info,smsbridge_core=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Resolve when `signal` fires. A listener that fails to install never
/// resolves, so it cannot be mistaken for a shutdown request.
async fn signal_or_pending<E: fmt::Display>(signal: impl Future<Output = Result<(), E>>) {
    if let Err(e) = signal.await {
        error!(error = %e, "listening for Ctrl-C failed");
        std::future::pending::<()>().await;
    }
}

async fn ctrl_c() {
    signal_or_pending(tokio::signal::ctrl_c()).await;
}

/// Flip the shutdown flag on Ctrl-C or SIGTERM.
async fn watch_signals(handle: ShutdownHandle) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                error!(error = %e, "installing SIGTERM handler failed, only Ctrl-C will stop polling");
                ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c().await;
    }

    info!("shutdown requested");
    handle.shutdown();
}

/// `0` after a requested shutdown, `1` when polling gave up.
fn exit_code(reason: &StopReason) -> ExitCode {
    match reason {
        StopReason::Cancelled => ExitCode::SUCCESS,
        StopReason::TooManyFailures { .. } => ExitCode::FAILURE,
    }
}

async fn run(config: Config) -> Result<ExitCode> {
    let bridge = BridgeBuilder::from_config(&config)
        .context("configuring bridge")?
        .build()?;

    let (handle, shutdown) = ShutdownHandle::channel();
    tokio::spawn(watch_signals(handle));

    let report = bridge.run(shutdown).await?;
    info!(
        iterations = report.stats.iterations,
        relayed = report.stats.relayed,
        delivery_failures = report.stats.delivery_failures,
        fetch_failures = report.stats.fetch_failures,
        "bridge stopped"
    );

    Ok(exit_code(&report.reason))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_format);

    match run(args.into()).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
