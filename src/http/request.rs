//! # Parsing de Requests
//! src/http/request.rs
//!
//! Parser tolerante: nunca falla. Un verbo desconocido produce
//! `Method::Unknown` y un header ausente queda como `None`; las decisiones
//! de rechazo (400, 405, ...) las toma el dispatcher.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /new.txt HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path VERSION` (solo la primera línea)
//! 2. **Headers**: solo reconocemos `Host`, `Content-Type`,
//!    `Content-Length` y `Expect`. Se buscan por su prefijo literal
//!    `"Name: "` en cualquier posición de la cabecera (no anclado a línea)
//!    y el valor es el primer token delimitado por espacios.
//! 3. **Separador**: `\r\n\r\n`
//! 4. **Body**: exactamente `Content-Length` bytes

/// Separador canónico entre headers y body
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Métodos que entiende el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// HEAD - Como GET pero sin body
    HEAD,

    /// POST - Crear un recurso nuevo
    POST,

    /// DELETE - Reservado, todavía responde 405
    DELETE,

    /// BREW - Verbo HTCPCP, siempre responde 418
    BREW,

    /// Cualquier otro token al inicio del request
    Unknown,
}

impl Method {
    /// Verbos que anunciamos en el header `Allow`
    pub const ALLOWED: [Method; 4] = [Method::GET, Method::HEAD, Method::POST, Method::DELETE];

    /// Reconoce un verbo por comparación exacta del token
    fn from_token(token: &[u8]) -> Self {
        match token {
            b"GET" => Method::GET,
            b"HEAD" => Method::HEAD,
            b"POST" => Method::POST,
            b"DELETE" => Method::DELETE,
            b"BREW" => Method::BREW,
            _ => Method::Unknown,
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::DELETE => "DELETE",
            Method::BREW => "BREW",
            Method::Unknown => "UNKNOWN",
        }
    }

    /// Valor del header `Allow`: "GET HEAD POST DELETE"
    pub fn allow_header() -> String {
        Self::ALLOWED
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representa un request parseado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Método (GET, HEAD, POST, DELETE, BREW o Unknown)
    method: Method,

    /// Path de la petición; `None` si falta, no empieza con `/` o no es UTF-8
    path: Option<String>,

    /// Token de versión (ej: "HTTP/1.1")
    version: Option<String>,

    /// Header `Host`
    host: Option<String>,

    /// Header `Content-Type`
    content_type: Option<String>,

    /// Header `Content-Length`; 0 si falta o no es numérico
    content_length: usize,

    /// Header `Expect`
    expect: Option<String>,

    /// Body de exactamente `content_length` bytes
    body: Option<Vec<u8>>,

    /// `false` si llegaron menos bytes de body que los declarados
    complete: bool,
}

impl Request {
    /// Parsea un request desde el buffer leído del socket
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use teapot::http::{Method, Request};
    ///
    /// let raw = b"GET /hello HTTP/1.1\r\nHost: localhost\r\n\r\n";
    /// let request = Request::parse(raw);
    ///
    /// assert_eq!(request.method(), Method::GET);
    /// assert_eq!(request.path(), Some("/hello"));
    /// assert_eq!(request.host(), Some("localhost"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Self {
        // 1. Request line (primera línea)
        let line_end = find(buffer, b"\n").unwrap_or(buffer.len());
        let first_line = &buffer[..line_end];

        let method = first_line
            .split(|b| b.is_ascii_whitespace())
            .next()
            .map(Method::from_token)
            .unwrap_or(Method::Unknown);

        let mut tokens = tokens(first_line).skip(1);
        let path = tokens
            .next()
            .filter(|t| t.starts_with(b"/"))
            .and_then(|t| std::str::from_utf8(t).ok())
            .map(str::to_string);
        let version = tokens
            .next()
            .map(|t| String::from_utf8_lossy(t).into_owned());

        // 2. Headers: solo buscamos dentro de la cabecera
        let separator = find(buffer, HEADER_TERMINATOR);
        let head = match separator {
            Some(pos) => &buffer[..pos],
            None => buffer,
        };

        let host = header_token(head, "Host");
        let content_type = header_token(head, "Content-Type");
        let content_length = header_token(head, "Content-Length")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);
        let expect = header_token(head, "Expect");

        // 3. Body
        let (body, complete) = Self::parse_body(buffer, separator, content_length);

        Request {
            method,
            path,
            version,
            host,
            content_type,
            content_length,
            expect,
            body,
            complete,
        }
    }

    /// Copia exactamente `content_length` bytes después del separador
    fn parse_body(
        buffer: &[u8],
        separator: Option<usize>,
        content_length: usize,
    ) -> (Option<Vec<u8>>, bool) {
        if content_length == 0 {
            return (None, true);
        }

        let start = match separator {
            Some(pos) => pos + HEADER_TERMINATOR.len(),
            None => return (None, false),
        };

        let available = &buffer[start..];
        if available.len() < content_length {
            // Body truncado (ej: más grande que el buffer de lectura)
            return (None, false);
        }

        (Some(available[..content_length].to_vec()), true)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Obtiene la versión declarada en la request line
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn content_length(&self) -> usize {
        self.content_length
    }

    pub fn expect(&self) -> Option<&str> {
        self.expect.as_deref()
    }

    /// Obtiene el body del request, si lo hay
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// `true` si la request line no tiene un path válido
    pub fn is_malformed(&self) -> bool {
        self.path.is_none()
    }

    /// `true` si el body recibido coincide con el `Content-Length` declarado
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Busca la primera aparición de `needle` en `haystack`
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Tokens no vacíos separados por espacios en blanco
fn tokens(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(|b| b.is_ascii_whitespace())
        .filter(|t| !t.is_empty())
}

/// Extrae el primer token que sigue al prefijo literal `"Name: "`
fn header_token(head: &[u8], name: &str) -> Option<String> {
    let prefix = format!("{}: ", name);
    let start = find(head, prefix.as_bytes())? + prefix.len();

    tokens(&head[start..])
        .next()
        .map(|t| String::from_utf8_lossy(t).into_owned())
}
