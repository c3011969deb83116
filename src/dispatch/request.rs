//! # Descriptor de Request
//! src/dispatch/request.rs
//!
//! Registro inmutable de una unidad de trabajo pendiente. Lo crea el
//! acceptor después de validar la ruta y se lo lleva exactamente un worker.

use crate::dispatch::scheduler::Schedulable;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Request admitido, listo para encolar
#[derive(Debug)]
pub struct StaticRequest<C> {
    connection: C,
    uri: String,
    path: PathBuf,
    file_size: u64,
    admitted_at: Instant,
}

impl<C> StaticRequest<C> {
    pub fn new(connection: C, uri: impl Into<String>, path: PathBuf, file_size: u64) -> Self {
        Self {
            connection,
            uri: uri.into(),
            path,
            file_size,
            admitted_at: Instant::now(),
        }
    }

    /// URI tal como la pidió el cliente
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Ruta canónica del archivo a servir
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tamaño observado por `stat` al admitir el request
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Momento en que el request fue admitido
    pub fn admitted_at(&self) -> Instant {
        self.admitted_at
    }

    /// Entrega la conexión al worker que desencoló el request
    pub fn into_parts(self) -> (C, PathBuf, u64) {
        (self.connection, self.path, self.file_size)
    }
}

impl<C> Schedulable for StaticRequest<C> {
    fn file_size(&self) -> u64 {
        self.file_size
    }
}
