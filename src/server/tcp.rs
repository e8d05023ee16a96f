//! # Listener TCP con Pool de Workers
//! src/server/tcp.rs
//!
//! Cada listener acepta conexiones en un loop y las encola en su propio
//! `ThreadPool`. La cola no tiene límite: si todos los workers están
//! ocupados la conexión espera, nunca se descarta. Un error en `accept`
//! se registra y el loop continúa.

use super::connection::handle_connection;
use crate::dispatcher::Dispatcher;
use crate::error::ServerError;
use log::{debug, info, warn};
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use threadpool::ThreadPool;

/// Cómo se convierte un socket aceptado en un stream de bytes
pub trait Transport: Send + Sync + 'static {
    type Stream: Read + Write;

    /// Prefijo de los logs ("HTTP" / "HTTPS")
    fn name(&self) -> &'static str;

    /// Prepara el stream (en TLS: completa el handshake)
    fn wrap(&self, sock: TcpStream) -> Result<Self::Stream, ServerError>;

    /// Cierra el stream; se llama en todos los caminos tras un `wrap` exitoso
    fn close(&self, stream: Self::Stream);
}

/// TCP sin cifrar
pub struct PlainTransport;

impl Transport for PlainTransport {
    type Stream = TcpStream;

    fn name(&self) -> &'static str {
        "HTTP"
    }

    fn wrap(&self, sock: TcpStream) -> Result<Self::Stream, ServerError> {
        Ok(sock)
    }

    fn close(&self, stream: Self::Stream) {
        let _ = stream.shutdown(Shutdown::Both);
    }
}

/// Listener ligado a una dirección, con su pool de workers
pub struct Listener<T: Transport> {
    listener: TcpListener,
    transport: Arc<T>,
    dispatcher: Dispatcher,
    pool: ThreadPool,
}

impl<T: Transport> Listener<T> {
    /// Liga `address:port`. Falla solo este listener si el bind no se puede hacer.
    pub fn bind(
        address: &str,
        port: u16,
        transport: T,
        dispatcher: Dispatcher,
        workers: usize,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind((address, port)).map_err(|source| ServerError::Bind {
            address: format!("{}:{}", address, port),
            source,
        })?;

        let name = transport.name();
        let pool = ThreadPool::with_name(format!("{}-worker", name.to_lowercase()), workers.max(1));

        info!("{} listening on {}", name, listener.local_addr()?);

        Ok(Self {
            listener,
            transport: Arc::new(transport),
            dispatcher,
            pool,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop de accept; no retorna
    pub fn run(self) {
        let name = self.transport.name();

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let peer = stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());

                    info!("{} accepted connection from {}", name, peer);

                    let transport = Arc::clone(&self.transport);
                    let dispatcher = self.dispatcher.clone();

                    self.pool.execute(move || serve(&*transport, &dispatcher, stream, &peer));

                    debug!(
                        "{} pool: {} active, {} queued",
                        name,
                        self.pool.active_count(),
                        self.pool.queued_count()
                    );
                }
                Err(e) => {
                    warn!("{} accept failed: {}", name, e);
                }
            }
        }
    }
}

/// Trabajo de un worker: envolver, atender, cerrar
fn serve<T: Transport>(transport: &T, dispatcher: &Dispatcher, sock: TcpStream, peer: &str) {
    let name = transport.name();

    // Un handshake fallido se trata como un read fallido: sin respuesta
    let mut stream = match transport.wrap(sock) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("{} handshake with {} failed: {}", name, peer, e);
            return;
        }
    };

    if let Err(e) = handle_connection(&mut stream, dispatcher, name) {
        warn!("{} connection with {} failed: {}", name, peer, e);
    }

    transport.close(stream);
    debug!("{} connection with {} closed", name, peer);
}
