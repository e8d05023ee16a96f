//! # Errores del Servidor
//! src/error.rs
//!
//! Errores tipados de cada capa. Ninguno cruza el límite de una conexión:
//! las fallas de transporte se registran y la conexión se cierra.

use std::path::PathBuf;
use thiserror::Error;

/// Errores de configuración (fatales al arrancar)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} port must range from 1 to 65535")]
    InvalidPort { name: &'static str },

    #[error("HTTP and HTTPS binding ports cannot be the same ({0})")]
    PortCollision(u16),

    #[error("worker pool size must be >= 1")]
    NoWorkers,

    #[error("storage root {0:?} is not a directory")]
    InvalidRoot(PathBuf),

    #[error("config {path:?} cannot be read: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config {path:?} is invalid: {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot initialise logger: {0}")]
    Logger(String),
}

/// Errores de un listener (fatales solo para ese listener)
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errores del proveedor de archivos
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("resource not found")]
    NotFound,

    #[error("path escapes the storage root")]
    OutsideRoot,

    #[error("not a regular file")]
    NotAFile,

    #[error("resource already exists")]
    AlreadyExists,

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}
