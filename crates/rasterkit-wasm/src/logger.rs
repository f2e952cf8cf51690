//! Browser console logger.
//!
//! Routes `log` records from rasterkit-core to `console.debug`, `console.info`,
//! `console.warn` and `console.error`.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use web_sys::console;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format_record(
            record.level(),
            record.target(),
            &record.args().to_string(),
        ));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Later calls only change the level.
pub(crate) fn install(level: LevelFilter) {
    // set_logger fails if a logger is already installed, which is fine
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Change how much the pipeline logs: "off", "error", "warn", "info",
/// "debug" or "trace".
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let level = parse_level(level).map_err(|e| JsValue::from_str(&e))?;
    install(level);
    Ok(())
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(level.trim()).map_err(|_| format!("Unknown log level '{}'", level))
}

fn format_record(level: Level, target: &str, message: &str) -> String {
    format!("[{}] {}: {}", level, target, message)
}
