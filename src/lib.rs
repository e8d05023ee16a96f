//! # Teapot
//! src/lib.rs
//!
//! Servidor concurrente que atiende un protocolo derivado de HTTP (más el
//! verbo BREW de HTCPCP) sobre dos listeners: TCP plano y TLS. Cada
//! conexión lleva exactamente un request y una respuesta, y luego se cierra.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Codec del protocolo (parseo de requests, serialización de responses)
//! - `dispatcher`: Semántica de métodos y códigos de estado
//! - `redirect`: Tablas de redirección 301/302
//! - `storage`: Proveedor de archivos confinado a un directorio raíz
//! - `server`: Listeners, pools de workers, TLS y manejo de conexiones
//! - `config`: CLI, variables de entorno y archivo JSON
//! - `logger`: Inicialización del backend de logs
//! - `error`: Errores tipados de cada capa
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use std::sync::Arc;
//! use teapot::config::Config;
//! use teapot::dispatcher::Dispatcher;
//! use teapot::server;
//! use teapot::storage::FsStorage;
//!
//! let settings = Config::default().resolve().expect("configuración inválida");
//! let dispatcher = Dispatcher::new(
//!     Arc::new(settings.redirects.clone()),
//!     Arc::new(FsStorage::new(settings.root.clone())),
//! );
//!
//! let listener = server::http_listener(&settings.http, dispatcher, settings.workers)
//!     .expect("no se pudo ligar el puerto");
//! listener.run();
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod logger;
pub mod redirect;
pub mod server;
pub mod storage;
