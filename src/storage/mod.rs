//! # Proveedor de Archivos
//! src/storage/mod.rs
//!
//! Lecturas por rango y escrituras "crear si no existe" bajo un directorio
//! raíz fijo. Ningún path puede salir de ese directorio:
//!
//! ```text
//! /index.html        -> <root>/index.html
//! /a/./b/../c.txt    -> <root>/a/c.txt
//! /../etc/passwd     -> OutsideRoot
//! ```
//!
//! Las escrituras usan `create_new` (O_CREAT | O_EXCL): si dos workers
//! escriben el mismo path a la vez, exactamente uno gana.

use crate::error::StorageError;
use log::{debug, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};

/// Rango de bytes a leer; `len = None` significa "hasta el final"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRange {
    pub start: u64,
    pub len: Option<u64>,
}

impl ReadRange {
    /// Archivo completo
    pub const FULL: ReadRange = ReadRange { start: 0, len: None };

    /// Solo metadatos, sin contenido
    pub const EMPTY: ReadRange = ReadRange { start: 0, len: Some(0) };

    pub fn new(start: u64, len: Option<u64>) -> Self {
        Self { start, len }
    }
}

/// Un archivo cargado en memoria
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Nombre del archivo (último componente del path)
    pub name: String,
    /// Tipo MIME deducido de la extensión
    pub content_type: String,
    /// Tamaño total del archivo en disco
    pub size: u64,
    /// Bytes del rango pedido
    pub bytes: Vec<u8>,
}

/// Acceso a archivos usado por el dispatcher
pub trait FileProvider: Send + Sync {
    /// Lee `range` del archivo en `path`
    fn read(&self, path: &str, range: ReadRange) -> Result<Resource, StorageError>;

    /// Crea el archivo en `path` con `bytes`, solo si no existe nada ahí
    fn write_if_absent(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Proveedor sobre el sistema de archivos local
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Normaliza el path del request a un path dentro del root
    ///
    /// Es una normalización léxica: `..` quita un componente y si intenta
    /// subir por encima del root se rechaza.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let mut relative = PathBuf::new();

        for component in Path::new(path.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !relative.pop() {
                        return Err(StorageError::OutsideRoot);
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(StorageError::OutsideRoot);
                }
            }
        }

        Ok(self.root.join(relative))
    }

    /// Verifica, resolviendo symlinks, que `path` siga dentro del root
    ///
    /// Si `path` aún no existe se verifica su ancestro existente más cercano.
    fn ensure_inside(&self, path: &Path) -> Result<(), StorageError> {
        let existing = path
            .ancestors()
            .find(|p| p.exists())
            .unwrap_or(self.root.as_path());

        let canonical = fs::canonicalize(existing)?;
        let root = fs::canonicalize(&self.root)?;

        if canonical.starts_with(&root) {
            Ok(())
        } else {
            Err(StorageError::OutsideRoot)
        }
    }
}

impl FileProvider for FsStorage {
    fn read(&self, path: &str, range: ReadRange) -> Result<Resource, StorageError> {
        let full = self.resolve(path)?;

        let meta = match fs::symlink_metadata(&full) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => return Err(e.into()),
            Err(_) => return Err(StorageError::NotFound),
        };

        // Sin listado de directorios ni symlinks
        if !meta.file_type().is_file() {
            debug!("Storage: {:?} is not a regular file", full);
            return Err(StorageError::NotAFile);
        }

        self.ensure_inside(&full)?;

        let size = meta.len();
        let start = range.start.min(size);
        let end = match range.len {
            Some(len) => start.saturating_add(len).min(size),
            None => size,
        };

        let mut bytes = Vec::with_capacity((end - start) as usize);
        if end > start {
            let mut file = File::open(&full)?;
            file.seek(SeekFrom::Start(start))?;
            file.take(end - start).read_to_end(&mut bytes)?;
        }

        let name = full
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!("Storage: loaded {} of {} bytes from {:?}", bytes.len(), size, full);

        Ok(Resource {
            name,
            content_type: content_type_for(&full).to_string(),
            size,
            bytes,
        })
    }

    fn write_if_absent(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let full = self.resolve(path)?;

        if let Some(parent) = full.parent() {
            self.ensure_inside(parent)?;
            fs::create_dir_all(parent)?;
        }

        let file = match OpenOptions::new().write(true).create_new(true).open(&full) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists);
            }
            Err(e) => return Err(e.into()),
        };

        fill_new_file(&full, file, bytes)?;

        debug!("Storage: wrote {} bytes to {:?}", bytes.len(), full);
        Ok(())
    }
}

/// Escribe el contenido de un archivo recién creado en `full`.
///
/// Si la escritura falla el archivo se borra: un archivo a medias haría que
/// los POST siguientes a ese path recibieran `AlreadyExists`.
fn fill_new_file<W: Write>(full: &Path, mut file: W, bytes: &[u8]) -> Result<(), StorageError> {
    let written = file.write_all(bytes).and_then(|()| file.flush());
    drop(file);

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(full) {
            warn!("Storage: cannot remove partial file {:?}: {}", full, cleanup);
        }
        return Err(e.into());
    }

    Ok(())
}

/// Tipo MIME según la extensión del archivo
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    match ext.to_lowercase().as_str() {
        // Text
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Others
        "pdf" => "application/pdf",
        "wasm" => "application/wasm",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",

        _ => "application/octet-stream",
    }
}
