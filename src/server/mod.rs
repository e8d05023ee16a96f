//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Dos listeners independientes, uno HTTP y otro HTTPS:
//! 1. Ligan su dirección (un fallo solo afecta a ese listener)
//! 2. Aceptan conexiones en su propio thread
//! 3. Encolan cada conexión en su pool de workers
//! 4. El worker lee, despacha, escribe y cierra

pub mod connection;
pub mod tcp;
pub mod tls;

use crate::config::{HttpBinding, HttpsBinding};
use crate::dispatcher::Dispatcher;
use crate::error::ServerError;
use log::error;
use std::io;
use std::thread::{self, JoinHandle};

// Re-exportar para facilitar el uso
pub use connection::{handle_connection, MAX_REQUEST_SIZE};
pub use tcp::{Listener, PlainTransport, Transport};
pub use tls::TlsTransport;

/// Liga el listener HTTP
pub fn http_listener(
    binding: &HttpBinding,
    dispatcher: Dispatcher,
    workers: usize,
) -> Result<Listener<PlainTransport>, ServerError> {
    Listener::bind(&binding.address, binding.port, PlainTransport, dispatcher, workers)
}

/// Carga el material TLS y liga el listener HTTPS
pub fn https_listener(
    binding: &HttpsBinding,
    dispatcher: Dispatcher,
    workers: usize,
) -> Result<Listener<TlsTransport>, ServerError> {
    let transport = TlsTransport::from_files(&binding.cert_path, &binding.key_path)?;
    Listener::bind(&binding.address, binding.port, transport, dispatcher, workers)
}

/// Arranca un listener en un thread con nombre.
///
/// `start` corre dentro del thread; si falla, el error se registra y el
/// thread termina sin tocar al otro listener.
pub fn spawn_listener<T, F>(thread_name: &str, start: F) -> io::Result<JoinHandle<()>>
where
    T: Transport,
    F: FnOnce() -> Result<Listener<T>, ServerError> + Send + 'static,
{
    let label = thread_name.to_string();

    thread::Builder::new().name(thread_name.to_string()).spawn(move || match start() {
        Ok(listener) => listener.run(),
        Err(e) => error!("{} failed to start: {}", label, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::RedirectTable;
    use crate::storage::tests::temp_root;
    use crate::storage::FsStorage;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            Arc::new(RedirectTable::new()),
            Arc::new(FsStorage::new(temp_root("server-mod"))),
        )
    }

    #[test]
    fn test_https_listener_missing_material() {
        let binding = HttpsBinding {
            address: "127.0.0.1".to_string(),
            port: 0,
            cert_path: PathBuf::from("/nope/cert.pem"),
            key_path: PathBuf::from("/nope/key.pem"),
        };

        let result = https_listener(&binding, dispatcher(), 1);
        assert!(matches!(result, Err(ServerError::Tls(_))));
    }

    #[test]
    fn test_failed_start_only_ends_its_thread() {
        let handle = spawn_listener::<PlainTransport, _>("http-listener", || {
            Err(ServerError::Tls("boom".to_string()))
        })
        .unwrap();

        assert!(handle.join().is_ok());
    }

    #[test]
    fn test_http_listener_binds_ephemeral() {
        let binding = HttpBinding { address: "127.0.0.1".to_string(), port: 0 };
        let listener = http_listener(&binding, dispatcher(), 2).unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }
}
