//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Este módulo define los códigos de estado que puede emitir el servidor.
//! Son los de HTTP/1.1 que usamos más la extensión HTCPCP (RFC 2324):
//!
//! - **2xx**: Éxito (200, 204)
//! - **3xx**: Redirección (301, 302)
//! - **4xx**: Error del cliente (400, 403, 404, 405, 418)
//! - **5xx**: Error del servidor (500)
//!
//! Cada código tiene exactamente una status line fija.

/// Versión de protocolo que anunciamos en todas las respuestas
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 204 No Content - Petición exitosa sin contenido en el body (HEAD)
    NoContent = 204,

    /// 301 Moved Permanently - Redirección permanente
    MovedPermanently = 301,

    /// 302 Found - Redirección temporal
    Found = 302,

    /// 400 Bad Request - Request line malformada o body incompleto
    BadRequest = 400,

    /// 403 Forbidden - El path sale del root o el recurso ya existe
    Forbidden = 403,

    /// 404 Not Found - Recurso no encontrado
    NotFound = 404,

    /// 405 Method Not Allowed - Verbo desconocido o no implementado
    MethodNotAllowed = 405,

    /// 418 I'm a teapot - Respuesta fija al verbo BREW (HTCPCP)
    ImATeapot = 418,

    /// 500 Internal Server Error - Falla de I/O en el storage
    InternalServerError = 500,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use teapot::http::StatusCode;
    /// assert_eq!(StatusCode::ImATeapot.as_u16(), 418);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use teapot::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::ImATeapot.reason_phrase(), "I'm a teapot");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NoContent => "No Content",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::Found => "Found",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::ImATeapot => "I'm a teapot",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    /// Status line completa, sin el `\r\n` final
    ///
    /// ```
    /// use teapot::http::StatusCode;
    /// assert_eq!(StatusCode::NotFound.status_line(), "HTTP/1.1 404 Not Found");
    /// ```
    pub fn status_line(&self) -> String {
        format!("{} {}", HTTP_VERSION, self)
    }

    /// Verifica si el código indica error del servidor (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [StatusCode; 10] = [
        StatusCode::Ok,
        StatusCode::NoContent,
        StatusCode::MovedPermanently,
        StatusCode::Found,
        StatusCode::BadRequest,
        StatusCode::Forbidden,
        StatusCode::NotFound,
        StatusCode::MethodNotAllowed,
        StatusCode::ImATeapot,
        StatusCode::InternalServerError,
    ];

    #[test]
    fn test_status_code_values() {
        assert_eq!(StatusCode::Ok.as_u16(), 200);
        assert_eq!(StatusCode::Found.as_u16(), 302);
        assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
        assert_eq!(StatusCode::ImATeapot.as_u16(), 418);
    }

    #[test]
    fn test_every_status_has_a_line() {
        for status in ALL {
            let line = status.status_line();
            assert!(line.starts_with("HTTP/1.1 "));
            assert!(!status.reason_phrase().is_empty());
            assert!(line.ends_with(status.reason_phrase()));
        }
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(StatusCode::Ok.status_line(), "HTTP/1.1 200 OK");
        assert_eq!(StatusCode::ImATeapot.status_line(), "HTTP/1.1 418 I'm a teapot");
        assert_eq!(
            StatusCode::InternalServerError.status_line(),
            "HTTP/1.1 500 Internal Server Error"
        );
    }

    #[test]
    fn test_categories() {
        assert!(StatusCode::InternalServerError.is_server_error());
        assert!(!StatusCode::ImATeapot.is_server_error());
        assert!(!StatusCode::Forbidden.is_server_error());
    }
}
