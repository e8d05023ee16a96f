//! # Configuración del Servidor
//! src/config.rs
//!
//! Argumentos CLI, variables de entorno y un archivo de configuración JSON
//! opcional. Precedencia: CLI > entorno > archivo > valores por defecto.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./teapot --bind 0.0.0.0 -p 8080 -P 8443 \
//!   --cert cert.pem --key key.pem --root ./public
//! ```
//!
//! ### Archivo de configuración
//! ```json
//! {
//!   "bind": "0.0.0.0",
//!   "http_port": 8080,
//!   "https_port": 8443,
//!   "redirects": {
//!     "301": { "/old": "/new" },
//!     "302": { "/docs": "https://example.org/docs" }
//!   }
//! }
//! ```

use crate::error::ConfigError;
use crate::redirect::RedirectTable;
use clap::Parser;
use log::{debug, info, LevelFilter};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_HTTPS_PORT: u16 = 8443;
pub const DEFAULT_CERT_PATH: &str = "cert.pem";
pub const DEFAULT_KEY_PATH: &str = "key.pem";
pub const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_WORKERS: usize = 16;

/// Opciones de línea de comandos
///
/// Los campos opcionales pueden venir también del archivo `--conf`.
#[derive(Debug, Clone, Parser)]
#[command(name = "teapot")]
#[command(about = "A simple HTTP(S) server that is also a teapot")]
#[command(version)]
pub struct Config {
    /// Archivo de configuración JSON (se lee primero; la CLI gana)
    #[arg(short = 'C', long = "conf", env = "TEAPOT_CONF")]
    pub conf: Option<PathBuf>,

    /// Dirección en la que escuchan ambos listeners
    #[arg(short, long, env = "TEAPOT_BIND")]
    pub bind: Option<String>,

    /// Puerto del servicio HTTP
    #[arg(short = 'p', long = "http-port", env = "TEAPOT_HTTP_PORT")]
    pub http_port: Option<u16>,

    /// Puerto del servicio HTTPS
    #[arg(short = 'P', long = "https-port", env = "TEAPOT_HTTPS_PORT")]
    pub https_port: Option<u16>,

    /// Certificado TLS (PEM)
    #[arg(short, long, env = "TEAPOT_CERT")]
    pub cert: Option<PathBuf>,

    /// Llave privada TLS (PEM)
    #[arg(short, long, env = "TEAPOT_KEY")]
    pub key: Option<PathBuf>,

    /// Directorio raíz de los archivos servidos
    #[arg(short, long, env = "TEAPOT_ROOT")]
    pub root: Option<PathBuf>,

    /// Tamaño del pool de workers de cada listener
    #[arg(short, long, env = "TEAPOT_WORKERS")]
    pub workers: Option<usize>,

    /// Nivel de log (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "info", env = "TEAPOT_LOG_LEVEL")]
    pub log_level: LevelFilter,

    /// Archivo de log; por defecto se escribe en stderr
    #[arg(long = "log-file", env = "TEAPOT_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Contenido del archivo `--conf`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub bind: Option<String>,
    pub http_port: Option<u16>,
    pub https_port: Option<u16>,
    pub cert: Option<PathBuf>,
    pub key: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub workers: Option<usize>,
    #[serde(default)]
    pub redirects: RedirectConfig,
}

/// Sección `redirects` del archivo de configuración
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedirectConfig {
    #[serde(rename = "301", default)]
    pub permanent: HashMap<String, String>,
    #[serde(rename = "302", default)]
    pub temporary: HashMap<String, String>,
}

impl FileConfig {
    /// Lee y parsea el archivo de configuración
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Dirección y puerto del listener HTTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpBinding {
    pub address: String,
    pub port: u16,
}

impl HttpBinding {
    /// Dirección completa para mostrar (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use teapot::config::HttpBinding;
    ///
    /// let binding = HttpBinding { address: "127.0.0.1".to_string(), port: 8080 };
    /// assert_eq!(binding.socket_address(), "127.0.0.1:8080");
    /// ```
    pub fn socket_address(&self) -> String {
        socket_address(&self.address, self.port)
    }
}

/// Dirección, puerto y material TLS del listener HTTPS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpsBinding {
    pub address: String,
    pub port: u16,
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl HttpsBinding {
    pub fn socket_address(&self) -> String {
        socket_address(&self.address, self.port)
    }
}

fn socket_address(address: &str, port: u16) -> String {
    if address.contains(':') {
        format!("[{}]:{}", address, port)
    } else {
        format!("{}:{}", address, port)
    }
}

/// Configuración ya resuelta y validada
#[derive(Debug, Clone)]
pub struct Settings {
    pub http: HttpBinding,
    pub https: HttpsBinding,
    pub root: PathBuf,
    pub workers: usize,
    pub redirects: RedirectTable,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Combina CLI, archivo y valores por defecto, y valida el resultado
    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        let file = match &self.conf {
            Some(path) => {
                info!("Reading configuration file {:?}", path);
                FileConfig::load(path)?
            }
            None => FileConfig::default(),
        };

        self.merge(file)
    }

    /// Aplica la precedencia CLI > archivo > defecto
    pub fn merge(&self, file: FileConfig) -> Result<Settings, ConfigError> {
        let address = self
            .bind
            .clone()
            .or(file.bind)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let settings = Settings {
            http: HttpBinding {
                address: address.clone(),
                port: self.http_port.or(file.http_port).unwrap_or(DEFAULT_HTTP_PORT),
            },
            https: HttpsBinding {
                address,
                port: self.https_port.or(file.https_port).unwrap_or(DEFAULT_HTTPS_PORT),
                cert_path: self
                    .cert
                    .clone()
                    .or(file.cert)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CERT_PATH)),
                key_path: self
                    .key
                    .clone()
                    .or(file.key)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_KEY_PATH)),
            },
            root: self
                .root
                .clone()
                .or(file.root)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT)),
            workers: self.workers.or(file.workers).unwrap_or(DEFAULT_WORKERS),
            redirects: RedirectTable::from_maps(
                file.redirects.permanent,
                file.redirects.temporary,
            ),
        };

        settings.validate()?;
        Ok(settings)
    }
}

impl Default for Config {
    /// Configuración por defecto (sin argumentos)
    fn default() -> Self {
        Self {
            conf: None,
            bind: None,
            http_port: None,
            https_port: None,
            cert: None,
            key: None,
            root: None,
            workers: None,
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl Settings {
    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Los puertos van de 1 a 65535
        if self.http.port == 0 {
            return Err(ConfigError::InvalidPort { name: "HTTP" });
        }
        if self.https.port == 0 {
            return Err(ConfigError::InvalidPort { name: "HTTPS" });
        }

        if self.http.port == self.https.port {
            return Err(ConfigError::PortCollision(self.http.port));
        }

        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }

        if !self.root.is_dir() {
            return Err(ConfigError::InvalidRoot(self.root.clone()));
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        let default_mark = |port: u16, default: u16| if port == default { " (default)" } else { "" };

        debug!(
            "HTTP binding set to {}{}",
            self.http.socket_address(),
            default_mark(self.http.port, DEFAULT_HTTP_PORT)
        );
        debug!(
            "HTTPS binding set to {}{}",
            self.https.socket_address(),
            default_mark(self.https.port, DEFAULT_HTTPS_PORT)
        );
        debug!("TLS certificate path set to {:?}", self.https.cert_path);
        debug!("TLS private key path set to {:?}", self.https.key_path);

        if self.redirects.is_empty() {
            debug!("No redirects configured");
        }

        let (permanent, temporary) = self.redirects.len();
        info!(
            "Serving {:?} with {} workers per listener ({} permanent / {} temporary redirects)",
            self.root, self.workers, permanent, temporary
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::RedirectResolver;
    use crate::storage::tests::temp_root;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["teapot"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_default_settings() {
        let settings = Config::default().merge(FileConfig::default()).unwrap();

        assert_eq!(settings.http.socket_address(), "127.0.0.1:8080");
        assert_eq!(settings.https.socket_address(), "127.0.0.1:8443");
        assert_eq!(settings.https.cert_path, PathBuf::from("cert.pem"));
        assert_eq!(settings.https.key_path, PathBuf::from("key.pem"));
        assert_eq!(settings.workers, DEFAULT_WORKERS);
        assert!(settings.redirects.is_empty());
    }

    #[test]
    fn test_cli_flags() {
        let config = parse(&[
            "-b", "0.0.0.0", "-p", "3000", "-P", "3443", "-c", "/tmp/c.pem", "-k", "/tmp/k.pem",
            "-w", "4",
        ]);
        let settings = config.merge(FileConfig::default()).unwrap();

        assert_eq!(settings.http.socket_address(), "0.0.0.0:3000");
        assert_eq!(settings.https.port, 3443);
        assert_eq!(settings.https.address, "0.0.0.0");
        assert_eq!(settings.https.cert_path, PathBuf::from("/tmp/c.pem"));
        assert_eq!(settings.https.key_path, PathBuf::from("/tmp/k.pem"));
        assert_eq!(settings.workers, 4);
    }

    #[test]
    fn test_log_level_flag() {
        assert_eq!(parse(&[]).log_level, LevelFilter::Info);
        assert_eq!(parse(&["--log-level", "debug"]).log_level, LevelFilter::Debug);
        assert!(Config::try_parse_from(["teapot", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_port_out_of_range_rejected_by_parser() {
        assert!(Config::try_parse_from(["teapot", "-p", "70000"]).is_err());
        assert!(Config::try_parse_from(["teapot", "-p", "-1"]).is_err());
    }

    #[test]
    fn test_port_zero_rejected() {
        let result = parse(&["-p", "0"]).merge(FileConfig::default());
        assert!(matches!(result, Err(ConfigError::InvalidPort { name: "HTTP" })));

        let result = parse(&["-P", "0"]).merge(FileConfig::default());
        assert!(matches!(result, Err(ConfigError::InvalidPort { name: "HTTPS" })));
    }

    #[test]
    fn test_same_ports_rejected() {
        let result = parse(&["-p", "9000", "-P", "9000"]).merge(FileConfig::default());
        assert!(matches!(result, Err(ConfigError::PortCollision(9000))));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let result = parse(&["-w", "0"]).merge(FileConfig::default());
        assert!(matches!(result, Err(ConfigError::NoWorkers)));
    }

    #[test]
    fn test_missing_root_rejected() {
        let result = parse(&["-r", "/definitely/not/here"]).merge(FileConfig::default());
        assert!(matches!(result, Err(ConfigError::InvalidRoot(_))));
    }

    #[test]
    fn test_ipv6_socket_address() {
        let binding = HttpBinding { address: "::1".to_string(), port: 80 };
        assert_eq!(binding.socket_address(), "[::1]:80");
    }

    #[test]
    fn test_file_config_and_precedence() {
        let dir = temp_root("config");
        let path = dir.join("teapot.json");
        fs::write(
            &path,
            r#"{
                "bind": "10.0.0.1",
                "http_port": 8000,
                "https_port": 8001,
                "key": "file-key.pem",
                "redirects": {
                    "301": { "/old": "/new" },
                    "302": { "/tmp": "https://example.org/" }
                }
            }"#,
        )
        .unwrap();

        let config = parse(&["-C", path.to_str().unwrap(), "-p", "9000"]);
        let settings = config.resolve().unwrap();

        // CLI gana sobre el archivo
        assert_eq!(settings.http.port, 9000);
        assert_eq!(settings.https.port, 8001);
        assert_eq!(settings.http.address, "10.0.0.1");
        assert_eq!(settings.https.key_path, PathBuf::from("file-key.pem"));
        assert_eq!(settings.https.cert_path, PathBuf::from(DEFAULT_CERT_PATH));
        assert_eq!(settings.redirects.lookup_301("/old"), Some("/new".to_string()));
        assert_eq!(
            settings.redirects.lookup_302("/tmp"),
            Some("https://example.org/".to_string())
        );
    }

    #[test]
    fn test_file_config_unknown_key() {
        let dir = temp_root("config-bad");
        let path = dir.join("bad.json");
        fs::write(&path, r#"{ "colour": "blue" }"#).unwrap();

        let result = parse(&["-C", path.to_str().unwrap()]).resolve();
        assert!(matches!(result, Err(ConfigError::ParseFile { .. })));
    }

    #[test]
    fn test_file_config_missing() {
        let result = parse(&["-C", "/definitely/not/here.json"]).resolve();
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn test_log_summary_does_not_panic() {
        let settings = Config::default().merge(FileConfig::default()).unwrap();
        settings.log_summary();
    }
}
