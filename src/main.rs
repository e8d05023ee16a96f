//! # Teapot - Entry Point
//! src/main.rs
//!
//! Resuelve la configuración, inicializa el logger y arranca los listeners
//! HTTP y HTTPS. El proceso termina cuando ambos listeners terminaron.

use log::{error, info};
use std::process;
use std::sync::Arc;
use teapot::config::Config;
use teapot::dispatcher::Dispatcher;
use teapot::logger::init_logger;
use teapot::server::{self, PlainTransport, TlsTransport};
use teapot::storage::FsStorage;

fn main() {
    let config = Config::new();

    if let Err(e) = init_logger(&config) {
        eprintln!("{}", e);
        process::exit(1);
    }

    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    info!("Starting teapot {}", env!("CARGO_PKG_VERSION"));
    settings.log_summary();

    let dispatcher = Dispatcher::new(
        Arc::new(settings.redirects.clone()),
        Arc::new(FsStorage::new(settings.root.clone())),
    );

    let workers = settings.workers;

    let http = {
        let binding = settings.http.clone();
        let dispatcher = dispatcher.clone();
        server::spawn_listener::<PlainTransport, _>("http-listener", move || {
            server::http_listener(&binding, dispatcher, workers)
        })
    };

    let https = {
        let binding = settings.https.clone();
        server::spawn_listener::<TlsTransport, _>("https-listener", move || {
            server::https_listener(&binding, dispatcher, workers)
        })
    };

    let mut handles = Vec::new();
    for (name, spawned) in [("HTTP", http), ("HTTPS", https)] {
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(e) => error!("{} listener thread could not be spawned: {}", name, e),
        }
    }

    for handle in handles {
        if handle.join().is_err() {
            error!("Listener thread panicked");
        }
    }

    info!("All listeners stopped");
}
