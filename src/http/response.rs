//! # Construcción de Respuestas
//! src/http/response.rs
//!
//! Este módulo proporciona una API para construir respuestas de forma
//! programática y serializarlas a bytes para enviar al cliente.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 12\r\n
//! Connection: close\r\n
//! \r\n
//! Hello world!
//! ```
//!
//! Los headers salen siempre en el mismo orden: `Content-Type`,
//! `Content-Length`, `Connection`, `Location`, `Allow`. El body se copia
//! tal cual (puede contener bytes nulos).
//!
//! ## Ejemplo de uso
//!
//! ```
//! use teapot::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_content_type("text/plain")
//!     .with_body(b"Hello world!".to_vec());
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

use super::StatusCode;

/// Único valor del header `Connection`: nunca mantenemos la conexión viva
pub const CONNECTION_CLOSE: &str = "close";

/// Representa una respuesta completa
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Código de estado (200, 404, 418, etc.)
    status: StatusCode,

    /// Header `Content-Type`
    content_type: Option<String>,

    /// Header `Location` (solo 3xx)
    location: Option<String>,

    /// Header `Allow` (solo 405)
    allow: Option<String>,

    /// Cuerpo de la respuesta; `Content-Length` se deriva de aquí
    body: Option<Vec<u8>>,
}

impl Response {
    /// Crea una nueva respuesta con el código de estado especificado
    ///
    /// Por defecto, la respuesta no tiene headers opcionales ni body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            location: None,
            allow: None,
            body: None,
        }
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn with_allow(mut self, allow: &str) -> Self {
        self.allow = Some(allow.to_string());
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes
    ///
    /// Útil para respuestas binarias (imágenes, archivos, etc.)
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Redirección con `Location` y sin body
    ///
    /// ```
    /// use teapot::http::{Response, StatusCode};
    ///
    /// let response = Response::redirect(StatusCode::Found, "/new");
    /// assert_eq!(response.location(), Some("/new"));
    /// ```
    pub fn redirect(status: StatusCode, location: &str) -> Self {
        Self::new(status).with_location(location)
    }

    /// Serializa la respuesta a bytes listos para enviar por el socket
    ///
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers en orden fijo: `Header-Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body: contenido binario
    ///
    /// La longitud del resultado es `Vec::len()`; nunca se busca un
    /// terminador nulo.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = String::with_capacity(128);

        // 1. Status line
        head.push_str(&self.status.status_line());
        head.push_str("\r\n");

        // 2. Headers
        if let Some(content_type) = &self.content_type {
            push_header(&mut head, "Content-Type", content_type);
        }
        let content_length = self.content_length();
        if content_length > 0 {
            push_header(&mut head, "Content-Length", &content_length.to_string());
        }
        push_header(&mut head, "Connection", CONNECTION_CLOSE);
        if let Some(location) = &self.location {
            push_header(&mut head, "Location", location);
        }
        if let Some(allow) = &self.allow {
            push_header(&mut head, "Allow", allow);
        }

        // 3. Línea vacía que separa headers del body
        head.push_str("\r\n");

        let mut result = Vec::with_capacity(head.len() + content_length);
        result.extend_from_slice(head.as_bytes());

        // 4. Body (si existe)
        if let Some(body) = &self.body {
            result.extend_from_slice(body);
        }

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Longitud del body; 0 si no hay body
    pub fn content_length(&self) -> usize {
        self.body.as_ref().map_or(0, Vec::len)
    }

    /// Siempre "close"
    pub fn connection(&self) -> &'static str {
        CONNECTION_CLOSE
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn allow(&self) -> Option<&str> {
        self.allow.as_deref()
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

fn push_header(head: &mut String, name: &str, value: &str) {
    head.push_str(name);
    head.push_str(": ");
    head.push_str(value);
    head.push_str("\r\n");
}
