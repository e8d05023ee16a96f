//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Una conexión, un intercambio: una lectura, parseo, dispatch, escritura.
//! El handler no sabe si el stream es TCP plano o una sesión TLS; cerrar el
//! socket le toca al transporte, en todos los caminos.

use crate::dispatcher::Dispatcher;
use crate::http::Request;
use log::{debug, info, warn};
use std::io::{self, Read, Write};

/// Capacidad del buffer de lectura. Un request más grande se trunca.
pub const MAX_REQUEST_SIZE: usize = 16384;

/// Atiende un request sobre `stream` y retorna los bytes escritos.
///
/// Si el peer cierra sin enviar nada se retorna `Ok(0)` sin responder. Los
/// errores de lectura o escritura se propagan sin producir más salida.
pub fn handle_connection<S: Read + Write>(
    stream: &mut S,
    dispatcher: &Dispatcher,
    label: &str,
) -> io::Result<usize> {
    let mut buffer = vec![0u8; MAX_REQUEST_SIZE];
    let bytes_read = stream.read(&mut buffer)?;

    if bytes_read == 0 {
        debug!("{} peer closed before sending a request", label);
        return Ok(0);
    }

    debug!("{} read {} bytes", label, bytes_read);

    let request = Request::parse(&buffer[..bytes_read]);
    let response = dispatcher.dispatch(&request);

    let status = response.status();
    let path = request.path().unwrap_or("-");
    if status.is_server_error() {
        warn!("{} {} {} -> {}", label, request.method(), path, status);
    } else {
        info!("{} {} {} -> {}", label, request.method(), path, status);
    }

    let bytes = response.to_bytes();
    stream.write_all(&bytes)?;
    stream.flush()?;

    debug!("{} wrote {} bytes", label, bytes.len());

    Ok(bytes.len())
}
