use cfg_if::cfg_if;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};
use tracing_subscriber::util::SubscriberInitExt;

// wgpu is chatty at info; keep it to warnings unless RUST_LOG says otherwise
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        pub fn init() {
            // Log to browser console via tracing-wasm
            let wasm_layer = tracing_wasm::WASMLayer::new(tracing_wasm::WASMLayerConfig::default());

            // A second init (e.g. the page re-running start) is harmless
            let _ = tracing_subscriber::registry()
                .with(env_filter())
                .with(wasm_layer)
                .try_init();

            #[cfg(feature = "console_error_panic_hook")]
            console_error_panic_hook::set_once();
        }
    } else {
        use tracing_appender::non_blocking::WorkerGuard;
        use tracing_subscriber::fmt;
        use std::env;
        use std::io;
        use std::ffi::OsStr;
        use std::path::{Path, PathBuf};
        use once_cell::sync::OnceCell;

        const DEFAULT_LOG_DIR: &str = "logs";
        const DEFAULT_LOG_FILE: &str = "mockup.log";

        fn log_file_path(requested: Option<String>) -> PathBuf {
            match requested {
                Some(path) if !path.trim().is_empty() => PathBuf::from(path),
                _ => Path::new(DEFAULT_LOG_DIR).join(DEFAULT_LOG_FILE),
            }
        }

        static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

        pub fn init() {
            let console_layer = fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .compact();

            // Daily rolling file, RUST_LOG_FILE overrides the location
            let log_path = log_file_path(env::var("RUST_LOG_FILE").ok());
            let (nb_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(
                log_path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new(".")),
                log_path.file_name().unwrap_or(OsStr::new(DEFAULT_LOG_FILE)),
            ));
            let _ = FILE_GUARD.set(guard);

            let file_layer = fmt::layer()
                .with_writer(nb_writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .compact();

            if tracing_subscriber::registry()
                .with(env_filter())
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .is_err()
            {
                return;
            }

            // Route panics through tracing so they land in the log file too
            std::panic::set_hook(Box::new(|info| {
                let location = info
                    .location()
                    .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
                    .unwrap_or_else(|| "<unknown>".to_string());
                let payload = info
                    .payload()
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| info.payload().downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "<non-string panic>".to_string());
                let bt = std::backtrace::Backtrace::force_capture();
                tracing::error!(%location, "panic: {}\nBacktrace:\n{:?}", payload, bt);
            }));
        }
    }
}
