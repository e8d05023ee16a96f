//! # Módulo HTTP
//!
//! Codec del protocolo, implementado desde cero:
//!
//! - Parsing tolerante de requests (nunca falla)
//! - Serialización de responses con headers en orden fijo
//! - Códigos de estado, incluyendo `418 I'm a teapot` de HTCPCP
//!
//! Este módulo no conoce la semántica de los verbos: eso vive en
//! `dispatcher`.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! Host: localhost\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 302 Found\r\n
//! Connection: close\r\n
//! Location: /elsewhere\r\n
//! \r\n
//! ```

pub mod request;   // Parsing de requests
pub mod response;  // Serialización de responses
pub mod status;    // Códigos de estado

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Method, Request};
pub use response::Response;
pub use status::StatusCode;
