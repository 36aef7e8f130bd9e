//! Server initialization and startup logic for TriggerGate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use triggergate_api::{AppState, GatewayServer, GatewaySettings};
use triggergate_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};
use triggergate_queue::{BuildQueue, QueueConfig};

use crate::jobs::{build_registry, build_runner};

/// Base directory for TriggerGate data (`~/.local/share/triggergate` on Linux).
pub(crate) fn triggergate_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("triggergate")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(ConfigLoader::load(path)?);
    }
    match ConfigLoader::default_path().filter(|p| p.exists()) {
        Some(path) => Ok(ConfigLoader::load(&path)?),
        None => Ok(Config::default()),
    }
}

/// Initialize tracing with console and file output.
///
/// Log files rotate daily under `[logging] dir`, or `<data dir>/logs`.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = match logging.dir {
        Some(ref dir) => PathBuf::from(ConfigLoader::expand_path(&dir.to_string_lossy())),
        None => triggergate_dir().join("logs"),
    };
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("triggergate")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The writer stops flushing once the guard drops.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let default_level = logging.level.as_deref().unwrap_or("info");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Run the server in foreground.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting TriggerGate v{}", env!("CARGO_PKG_VERSION"));

    let validation = ConfigValidator::validate(&config)?;
    for warning in &validation.warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        for err in &validation.errors {
            error!("{}: {}", err.path, err.message);
        }
        return Err(format!("{} configuration error(s)", validation.errors.len()).into());
    }

    let registry = Arc::new(build_registry(&config.jobs)?);
    info!("Registered {} jobs", registry.len());

    let queue_config = QueueConfig {
        max_pending: config.queue.max_pending,
        max_executors: config.queue.max_executors,
        retained_builds: config.queue.retained_builds,
        ..Default::default()
    };
    let queue = BuildQueue::new(queue_config, Arc::new(build_runner(&config.jobs)));
    let dispatcher = queue.start();

    let settings = GatewaySettings {
        prefix: config.gateway.prefix.clone(),
        root_url: config.server.root_url(),
        max_body_bytes: config.gateway.max_body_bytes,
        admin_token: config.server.admin_token.clone(),
        crumb_secret: config.server.crumb_secret.clone(),
    };
    if settings.crumb_secret.is_none() {
        info!("No crumb_secret configured, crumbs reset on restart");
    }
    let state = Arc::new(AppState::new(settings, registry, queue.clone(), queue.clone())?);

    let server = GatewayServer::new(config.server.host.clone(), config.server.port, state);
    server.run(shutdown_signal()).await?;

    let pending = queue.pending_len();
    if pending > 0 {
        warn!("Dropping {} pending queue items", pending);
    }
    dispatcher.abort();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_explicit_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 9123").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9123);
    }

    #[test]
    fn test_load_missing_explicit_config_fails() {
        assert!(load_config(Some(Path::new("/nonexistent/triggergate.toml"))).is_err());
    }

    #[test]
    fn test_triggergate_dir() {
        assert!(triggergate_dir().ends_with("triggergate"));
    }
}
