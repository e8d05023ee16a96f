//! # Dispatcher del Protocolo
//! src/dispatcher/mod.rs
//!
//! Convierte un `Request` ya parseado en un `Response` según el método:
//!
//! ```text
//! GET     -> 301/302 (redirección) | 200 archivo | 403 | 404 | 500
//! HEAD    -> igual que GET pero 204 y sin body
//! POST    -> 200 creado | 403 ya existe / fuera del root | 500
//! DELETE  -> 405 (reservado)
//! BREW    -> 418 I'm a teapot
//! Unknown -> 405 con Allow: GET HEAD POST DELETE
//! ```
//!
//! No guarda estado entre requests y no hace I/O propio: todo acceso
//! externo pasa por `RedirectResolver` y `FileProvider`.

use crate::error::StorageError;
use crate::http::{Method, Request, Response, StatusCode};
use crate::redirect::RedirectResolver;
use crate::storage::{FileProvider, ReadRange};
use log::debug;
use std::sync::Arc;

/// Dispatcher que mapea requests a responses
#[derive(Clone)]
pub struct Dispatcher {
    redirects: Arc<dyn RedirectResolver>,
    files: Arc<dyn FileProvider>,
}

impl Dispatcher {
    /// Crea un dispatcher con sus colaboradores
    ///
    /// # Ejemplo
    /// ```
    /// use std::sync::Arc;
    /// use teapot::dispatcher::Dispatcher;
    /// use teapot::http::{Request, StatusCode};
    /// use teapot::redirect::RedirectTable;
    /// use teapot::storage::FsStorage;
    ///
    /// let dispatcher = Dispatcher::new(
    ///     Arc::new(RedirectTable::new()),
    ///     Arc::new(FsStorage::new(".")),
    /// );
    /// let response = dispatcher.dispatch(&Request::parse(b"BREW /pot-0 HTCPCP/1.0\r\n\r\n"));
    /// assert_eq!(response.status(), StatusCode::ImATeapot);
    /// ```
    pub fn new(redirects: Arc<dyn RedirectResolver>, files: Arc<dyn FileProvider>) -> Self {
        Self { redirects, files }
    }

    /// Produce la respuesta para un request
    pub fn dispatch(&self, request: &Request) -> Response {
        match request.method() {
            // HTCPCP: siempre una tetera, sin importar path ni headers
            Method::BREW => Response::new(StatusCode::ImATeapot),
            Method::Unknown => Self::method_not_allowed(),
            method => match request.path() {
                // Request line inválida: 400 también para DELETE
                None => Response::new(StatusCode::BadRequest),
                Some(path) => match method {
                    Method::GET => self.get(path),
                    Method::HEAD => self.head(path),
                    Method::POST => self.post(path, request),
                    _ => Self::method_not_allowed(),
                },
            },
        }
    }

    fn get(&self, path: &str) -> Response {
        if let Some(redirect) = self.redirect(path) {
            return redirect;
        }

        match self.files.read(path, ReadRange::FULL) {
            Ok(resource) => Response::new(StatusCode::Ok)
                .with_content_type(&resource.content_type)
                .with_body(resource.bytes),
            Err(e) => Self::storage_failure(path, &e),
        }
    }

    /// Misma resolución que GET, pero sin cargar el contenido
    fn head(&self, path: &str) -> Response {
        if let Some(redirect) = self.redirect(path) {
            return redirect;
        }

        match self.files.read(path, ReadRange::EMPTY) {
            Ok(resource) => {
                Response::new(StatusCode::NoContent).with_content_type(&resource.content_type)
            }
            Err(e) => Self::storage_failure(path, &e),
        }
    }

    fn post(&self, path: &str, request: &Request) -> Response {
        if !request.is_complete() {
            debug!(
                "POST {}: body shorter than Content-Length {}",
                path,
                request.content_length()
            );
            return Response::new(StatusCode::BadRequest);
        }

        let body = request.body().unwrap_or_default();
        match self.files.write_if_absent(path, body) {
            Ok(()) => Response::new(StatusCode::Ok),
            Err(e) => Self::storage_failure(path, &e),
        }
    }

    /// 301 tiene prioridad sobre 302
    fn redirect(&self, path: &str) -> Option<Response> {
        if let Some(target) = self.redirects.lookup_301(path) {
            return Some(Response::redirect(StatusCode::MovedPermanently, &target));
        }
        self.redirects
            .lookup_302(path)
            .map(|target| Response::redirect(StatusCode::Found, &target))
    }

    fn method_not_allowed() -> Response {
        Response::new(StatusCode::MethodNotAllowed).with_allow(&Method::allow_header())
    }

    fn storage_failure(path: &str, error: &StorageError) -> Response {
        debug!("{}: {}", path, error);
        Response::new(status_for(error))
    }
}

/// Código de estado para cada falla del storage
pub fn status_for(error: &StorageError) -> StatusCode {
    match error {
        StorageError::NotFound | StorageError::NotAFile => StatusCode::NotFound,
        StorageError::OutsideRoot | StorageError::AlreadyExists => StatusCode::Forbidden,
        StorageError::Io(_) => StatusCode::InternalServerError,
    }
}
