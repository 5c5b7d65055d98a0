use tracing_subscriber::EnvFilter;
use waitcast::config::LoggingConfig;

pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{level},waitcast={level}", level = config.level))
    });

    // File logging is opt-in via WAITCAST_LOG_DIR.
    //
    // `tracing_appender::rolling::daily` panics (and in our release build, aborts) if it
    // can't create the initial log file, so preflight writability first.
    let log_dir = std::env::var("WAITCAST_LOG_DIR").ok();
    let file_layer = log_dir.as_deref().and_then(|log_dir| {
        if std::fs::create_dir_all(log_dir).is_err() {
            eprintln!(
                "Warning: Could not create log directory {}, file logging disabled",
                log_dir
            );
            return None;
        }
        let test_path = std::path::Path::new(log_dir).join(".waitcast_write_test");
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&test_path)
        {
            Ok(_) => {
                let _ = std::fs::remove_file(&test_path);

                // Daily rotating file appender
                let file_appender = tracing_appender::rolling::daily(log_dir, "waitcast.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

                // Keep the guard alive by leaking it (acceptable for long-running process)
                Box::leak(Box::new(guard));

                Some(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false) // No color codes in file
                        .with_target(true),
                )
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not write to log directory {} ({}), file logging disabled",
                    log_dir, e
                );
                None
            }
        }
    });

    // Console layer: plain or JSON
    let (plain_layer, json_layer) = if config.json {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(false),
            ),
        )
    } else {
        (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            ),
            None,
        )
    };

    let file_logging_enabled = file_layer.is_some();
    tracing_subscriber::registry()
        .with(filter)
        .with(plain_layer)
        .with(json_layer)
        .with(file_layer)
        .init();

    if let (true, Some(dir)) = (file_logging_enabled, log_dir) {
        eprintln!("Logging to: {}/waitcast.log", dir);
    }
}

pub fn init_logging_simple() {
    // Minimal logging for one-shot CLI commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}
