//! # Logger
//! src/logger.rs
//!
//! Inicializa el backend de `log`: stderr por defecto, o un archivo en modo
//! append si se pasó `--log-file`.

use crate::config::Config;
use crate::error::ConfigError;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::fs::OpenOptions;
use std::path::Path;

pub fn init_logger(cfg: &Config) -> Result<(), ConfigError> {
    match &cfg.log_file {
        Some(path) => init_file_logger(cfg.log_level, path),
        None => init_term_logger(cfg.log_level),
    }
}

fn prepare_logger_config() -> simplelog::Config {
    let mut builder = simplelog::ConfigBuilder::new();
    builder
        .set_time_format_custom(simplelog::format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        ))
        .set_thread_level(LevelFilter::Debug)
        .set_target_level(LevelFilter::Off);

    // Sin offset local conocido se queda en UTC
    match builder.set_time_offset_to_local() {
        Ok(builder) | Err(builder) => builder.build(),
    }
}

fn init_term_logger(level: LevelFilter) -> Result<(), ConfigError> {
    TermLogger::init(
        level,
        prepare_logger_config(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .map_err(|e| ConfigError::Logger(e.to_string()))
}

fn init_file_logger(level: LevelFilter, filename: &Path) -> Result<(), ConfigError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(filename)
        .map_err(|e| ConfigError::Logger(format!("{:?}: {}", filename, e)))?;

    WriteLogger::init(level, prepare_logger_config(), file)
        .map_err(|e| ConfigError::Logger(e.to_string()))
}
