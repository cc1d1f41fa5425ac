use log::{self, Level, LevelFilter, Log, Metadata, Record};

use crate::console::{set_console, Console};

struct SimpleLogger;

static LOGGER: SimpleLogger = SimpleLogger;

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let color = match record.level() {
            Level::Error => 31, // 红色
            Level::Warn => 93,  // 黄色
            Level::Info => 34,  // 蓝色
            Level::Debug => 32, // 绿色
            Level::Trace => 36, // 青色
        };

        println!(
            "\u{1B}[{}m[{:>5}] {}:{} {}\u{1B}[0m",
            color,
            record.level(),
            record.file().unwrap_or("?"),
            record.line().unwrap_or(0),
            record.args(),
        );
    }

    fn flush(&self) {}
}

fn level_from_env() -> LevelFilter {
    match option_env!("RUST_LOG") {
        Some(log_level) => match log_level {
            "ERROR" | "error" => LevelFilter::Error,
            "WARN" | "warn" => LevelFilter::Warn,
            "INFO" | "info" => LevelFilter::Info,
            "DEBUG" | "debug" => LevelFilter::Debug,
            "TRACE" | "trace" => LevelFilter::Trace,
            _ => LevelFilter::Off,
        },
        None => LevelFilter::Info,
    }
}

/// 注册输出端并安装日志器, 日志等级在编译期由 `RUST_LOG` 决定
///
/// 日志器只能安装一次, 之后的调用只更换输出端.
pub fn init(console: &'static dyn Console) {
    set_console(console);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level_from_env());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spin::Mutex;
    use std::string::String;

    struct Capture(Mutex<String>);

    impl Console for Capture {
        fn write_str(&self, s: &str) {
            self.0.lock().push_str(s);
        }
    }

    static CAPTURE: Capture = Capture(Mutex::new(String::new()));

    #[test]
    fn records_are_colored_and_tagged() {
        init(&CAPTURE);
        init(&CAPTURE);
        log::warn!("fault at {:#x}", 0x2000);
        let out = CAPTURE.0.lock().clone();
        assert!(out.contains("\u{1B}[93m[ WARN]"));
        assert!(out.contains("fault at 0x2000"));
    }
}
