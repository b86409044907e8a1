use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use std::env;
use std::fs;
use std::io;

const LOG_FILE: &str = "diagram3d.log";
const DEFAULT_FILTER: &str = "info,diagram3d=debug";

/// Initialize console + file logging and install a panic hook that reports through tracing.
///
/// `RUST_LOG` overrides the default filter. The log file is recreated each session; when it
/// cannot be created, logging continues on the console only.
pub fn init_logging() {
    let enable_backtrace = env::var("RUST_BACKTRACE").map(|v| v == "1").unwrap_or(false);

    if let Err(e) = fs::remove_file(LOG_FILE) {
        if e.kind() != io::ErrorKind::NotFound {
            eprintln!("Warning: Failed to remove existing {}: {}", LOG_FILE, e);
        }
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = match fs::File::create(LOG_FILE) {
        Ok(log_file) => Some(
            fmt::layer()
                .with_writer(std::sync::Mutex::new(log_file))
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false),
        ),
        Err(e) => {
            eprintln!("Warning: Failed to create {}: {}", LOG_FILE, e);
            None
        }
    };
    let file_enabled = file_layer.is_some();

    let init_result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true)
                .with_thread_names(true)
                .with_ansi(true),
        )
        .with(file_layer)
        .try_init();

    if let Err(e) = init_result {
        eprintln!("Warning: tracing subscriber already set: {}", e);
        return;
    }

    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!("Panic occurred: {}", panic_info);

        if let Some(location) = panic_info.location() {
            tracing::error!(
                "Panic location: {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            );
        }

        if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            tracing::error!("Panic payload: {}", s);
        }

        if enable_backtrace {
            tracing::error!("Backtrace:\n{:?}", std::backtrace::Backtrace::capture());
        }
    }));

    tracing::info!("Logging initialized");
    tracing::info!("File logging enabled: {}", file_enabled);
    tracing::info!("Backtrace enabled: {}", enable_backtrace);
}

/// Log system information for debugging
pub fn log_system_info() {
    tracing::info!("=== System Information ===");
    tracing::info!("OS: {}", std::env::consts::OS);
    tracing::info!("Architecture: {}", std::env::consts::ARCH);
    tracing::info!("{} version: {}", crate::APP_NAME, crate::VERSION);
    tracing::info!("========================");
}
