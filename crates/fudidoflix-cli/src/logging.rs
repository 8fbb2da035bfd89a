use anyhow::Result;
use std::io;
use std::io::IsTerminal;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter for the `-v` count. `RUST_LOG` wins unless `--quiet` is set.
fn filter_for(verbose_level: u8, quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }
    // Commands print their own results, so the default only lets warnings through
    let default = match verbose_level {
        0 => "warn",
        1 => "info,hyper=warn,reqwest=warn",
        2 => "debug,hyper::proto::h1=warn,hyper::client::pool=warn",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn wants_json() -> bool {
    std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or_else(|_| !io::stderr().is_terminal())
}

pub fn init_logging(verbose_level: u8, quiet: bool) -> Result<()> {
    let registry = Registry::default().with(filter_for(verbose_level, quiet));

    if wants_json() {
        let json_layer = fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);
        registry.with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);
        registry.with(fmt_layer).init();
    }

    Ok(())
}

/// Long-running inbox watcher: logs go to a daily-rotated file in
/// `log_dir` (`fudidoflix.log`, `fudidoflix.log.2026-10-19`, ...).
pub fn init_file_logging(verbose_level: u8, quiet: bool, log_dir: &Path, file_name: &str) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    // Keep at least info in the file, the watcher is otherwise silent
    let filter = if verbose_level == 0 && !quiet && std::env::var("RUST_LOG").is_err() {
        EnvFilter::new("info,hyper=warn,reqwest=warn")
    } else {
        filter_for(verbose_level, quiet)
    };
    let registry = Registry::default().with(filter);
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, file_name);

    if std::env::var("RUST_LOG_JSON").map(|v| v == "true").unwrap_or(false) {
        let json_layer = fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(file_appender);
        registry.with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false)
            .with_writer(file_appender);
        registry.with(fmt_layer).init();
    }

    Ok(())
}
