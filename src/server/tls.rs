//! # Transporte TLS
//! src/server/tls.rs
//!
//! Carga el certificado y la llave una sola vez por listener y envuelve cada
//! socket aceptado en una sesión rustls. El handshake se completa en el
//! worker antes de que el handler lea, así que el codec nunca ve TLS.

use super::tcp::Transport;
use crate::error::ServerError;
use log::debug;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{ServerConfig, ServerConnection, StreamOwned};
use std::fs::File;
use std::io::BufReader;
use std::net::{Shutdown, TcpStream};
use std::path::Path;
use std::sync::Arc;

/// Protocolo anunciado por ALPN
pub const ALPN_HTTP11: &[u8] = b"http/1.1";

/// Construye la configuración de servidor (TLS 1.2 y 1.3, proveedor ring)
pub fn build_server_config(cert_path: &Path, key_path: &Path) -> Result<Arc<ServerConfig>, ServerError> {
    let certs = load_certs(cert_path)?;
    let key = load_private_key(key_path)?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let mut config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| ServerError::Tls(e.to_string()))?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| ServerError::Tls(e.to_string()))?;

    config.alpn_protocols = vec![ALPN_HTTP11.to_vec()];

    Ok(Arc::new(config))
}

/// Lee todos los certificados de un archivo PEM
pub fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, ServerError> {
    let file = File::open(path)
        .map_err(|e| ServerError::Tls(format!("failed to open cert file {:?}: {}", path, e)))?;
    let mut reader = BufReader::new(file);

    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::Tls(format!("failed to parse certs in {:?}: {}", path, e)))?;

    if certs.is_empty() {
        return Err(ServerError::Tls(format!("no certificates found in {:?}", path)));
    }

    Ok(certs)
}

/// Lee la primera llave privada (PKCS#1, PKCS#8 o SEC1) de un archivo PEM
pub fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, ServerError> {
    let file = File::open(path)
        .map_err(|e| ServerError::Tls(format!("failed to open key file {:?}: {}", path, e)))?;
    let mut reader = BufReader::new(file);

    loop {
        match rustls_pemfile::read_one(&mut reader)
            .map_err(|e| ServerError::Tls(format!("failed to parse key in {:?}: {}", path, e)))?
        {
            Some(rustls_pemfile::Item::Pkcs1Key(key)) => return Ok(PrivateKeyDer::Pkcs1(key)),
            Some(rustls_pemfile::Item::Pkcs8Key(key)) => return Ok(PrivateKeyDer::Pkcs8(key)),
            Some(rustls_pemfile::Item::Sec1Key(key)) => return Ok(PrivateKeyDer::Sec1(key)),
            None => break,
            _ => continue,
        }
    }

    Err(ServerError::Tls(format!("no private key found in {:?}", path)))
}

/// Sesiones TLS sobre TCP
pub struct TlsTransport {
    config: Arc<ServerConfig>,
}

impl TlsTransport {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self { config }
    }

    /// Carga el material TLS; cualquier falla es fatal para este listener
    pub fn from_files(cert_path: &Path, key_path: &Path) -> Result<Self, ServerError> {
        Ok(Self::new(build_server_config(cert_path, key_path)?))
    }
}

impl Transport for TlsTransport {
    type Stream = StreamOwned<ServerConnection, TcpStream>;

    fn name(&self) -> &'static str {
        "HTTPS"
    }

    fn wrap(&self, mut sock: TcpStream) -> Result<Self::Stream, ServerError> {
        let mut conn = ServerConnection::new(Arc::clone(&self.config))
            .map_err(|e| ServerError::Tls(e.to_string()))?;

        while conn.is_handshaking() {
            conn.complete_io(&mut sock)?;
        }

        if let Some(protocol) = conn.alpn_protocol() {
            debug!("HTTPS negotiated ALPN {}", String::from_utf8_lossy(protocol));
        }

        Ok(StreamOwned::new(conn, sock))
    }

    fn close(&self, mut stream: Self::Stream) {
        stream.conn.send_close_notify();
        // El peer puede haberse ido ya
        let _ = stream.conn.complete_io(&mut stream.sock);
        let _ = stream.sock.shutdown(Shutdown::Both);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
    }

    #[test]
    fn test_load_fixture_material() {
        let certs = load_certs(&fixture("server.pem")).unwrap();
        assert_eq!(certs.len(), 1);

        let key = load_private_key(&fixture("server.key")).unwrap();
        assert!(matches!(key, PrivateKeyDer::Pkcs8(_)));
    }

    #[test]
    fn test_build_server_config_sets_alpn() {
        let config = build_server_config(&fixture("server.pem"), &fixture("server.key")).unwrap();
        assert_eq!(config.alpn_protocols, vec![b"http/1.1".to_vec()]);
    }

    #[test]
    fn test_missing_cert_is_tls_error() {
        let result = TlsTransport::from_files(Path::new("/nope/cert.pem"), &fixture("server.key"));
        assert!(matches!(result, Err(ServerError::Tls(_))));
    }

    #[test]
    fn test_key_file_without_key() {
        // Un PEM con solo certificados no trae llave
        let result = load_private_key(&fixture("ca.pem"));
        assert!(matches!(result, Err(ServerError::Tls(msg)) if msg.contains("no private key")));
    }

    #[test]
    fn test_cert_file_without_certs() {
        let result = load_certs(&fixture("server.key"));
        assert!(matches!(result, Err(ServerError::Tls(msg)) if msg.contains("no certificates")));
    }
}
