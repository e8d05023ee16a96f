//! # Tablas de Redirección
//! src/redirect/mod.rs
//!
//! Mapea un path exacto a un destino, por separado para redirecciones
//! permanentes (301) y temporales (302). Se construye una sola vez al
//! arrancar y luego solo se lee, así que se comparte entre workers con `Arc`.

use std::collections::HashMap;

/// Consulta de redirecciones usada por el dispatcher
pub trait RedirectResolver: Send + Sync {
    /// Destino de una redirección permanente (301) para `path`
    fn lookup_301(&self, path: &str) -> Option<String>;

    /// Destino de una redirección temporal (302) para `path`
    fn lookup_302(&self, path: &str) -> Option<String>;
}

/// Tabla en memoria, indexada por el path exacto
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectTable {
    permanent: HashMap<String, String>,
    temporary: HashMap<String, String>,
}

impl RedirectTable {
    /// Tabla vacía: nunca hay coincidencias
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_maps(permanent: HashMap<String, String>, temporary: HashMap<String, String>) -> Self {
        Self { permanent, temporary }
    }

    pub fn with_permanent(mut self, path: &str, target: &str) -> Self {
        self.permanent.insert(path.to_string(), target.to_string());
        self
    }

    pub fn with_temporary(mut self, path: &str, target: &str) -> Self {
        self.temporary.insert(path.to_string(), target.to_string());
        self
    }

    /// Cantidad de entradas (301, 302)
    pub fn len(&self) -> (usize, usize) {
        (self.permanent.len(), self.temporary.len())
    }

    pub fn is_empty(&self) -> bool {
        self.permanent.is_empty() && self.temporary.is_empty()
    }
}

impl RedirectResolver for RedirectTable {
    fn lookup_301(&self, path: &str) -> Option<String> {
        self.permanent.get(path).cloned()
    }

    fn lookup_302(&self, path: &str) -> Option<String> {
        self.temporary.get(path).cloned()
    }
}
