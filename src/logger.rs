use std::io::Write;
use std::time::Instant;

use log::{Level, Log, Metadata, Record};
use parking_lot::Mutex;

/// Level used when `RUST_LOG` is unset or invalid. Kept quiet so the aliased
/// program's own output is all the user sees.
pub const DEFAULT_LEVEL: log::LevelFilter = log::LevelFilter::Warn;

struct FakerLogger {
    file: Option<Mutex<std::fs::File>>,
    filter: log::LevelFilter,
    start: Instant,
}

fn format_record(record: &Record) -> String {
    match record.level() {
        Level::Error | Level::Warn => {
            format!("{}: {}", record.level().as_str().to_lowercase(), record.args())
        }
        _ => format!("[{}] {} - {}", record.level(), record.target(), record.args()),
    }
}

impl Log for FakerLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!("{}", format_record(record));

        if let Some(ref file) = self.file {
            let elapsed = self.start.elapsed().as_secs_f64();
            let _ = writeln!(
                file.lock(),
                "[{elapsed:.3}s] [{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Some(ref file) = self.file {
            let _ = file.lock().flush();
        }
    }
}

fn parse_filter(value: Option<&str>) -> log::LevelFilter {
    value
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_LEVEL)
}

/// Initialize the global logger. Level comes from `RUST_LOG`.
///
/// # Panics
///
/// Panics if called more than once.
pub fn init(log_file: Option<std::fs::File>) {
    let filter = parse_filter(std::env::var("RUST_LOG").ok().as_deref());

    let logger = FakerLogger {
        file: log_file.map(Mutex::new),
        filter,
        start: Instant::now(),
    };

    log::set_boxed_logger(Box::new(logger)).expect("logger already initialized");
    log::set_max_level(filter);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter(Some("debug")), log::LevelFilter::Debug);
        assert_eq!(parse_filter(Some("nonsense")), DEFAULT_LEVEL);
        assert_eq!(parse_filter(None), DEFAULT_LEVEL);
    }

    #[test]
    fn test_warnings_read_like_cli_messages() {
        let line = format_record(
            &Record::builder()
                .level(Level::Warn)
                .target("faker")
                .args(format_args!("alias `x` has no program"))
                .build(),
        );
        assert_eq!(line, "warn: alias `x` has no program");
    }
}
