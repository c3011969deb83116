//! # Validación de Rutas
//! src/files/validator.rs
//!
//! Convierte la URI de la request line en un archivo dentro del document
//! root, en este orden:
//!
//! 1. Clasificación: `cgi` o `?` → contenido dinámico (no soportado);
//!    una URI terminada en `/` apunta a `index.html`
//! 2. Contención léxica: un `..` que suba por encima del root es 403
//! 3. `stat`: debe existir (404) y ser un archivo regular legible por el
//!    dueño (403)
//! 4. Canonicalización: la ruta canónica debe ser el root o estar debajo
//!    de él, comparando por componentes (`/www` no contiene a `/www-evil`);
//!    si no se puede canonicalizar también es 403

use crate::error::{ForbiddenReason, RequestError};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

/// Archivo aceptado para encolar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath {
    /// Ruta canónica, siempre debajo del document root
    pub path: PathBuf,

    /// Tamaño según `stat`
    pub file_size: u64,
}

/// Validador atado a un document root canónico
#[derive(Debug, Clone)]
pub struct PathValidator {
    root: PathBuf,
}

impl PathValidator {
    /// Canonicaliza el document root una sola vez
    ///
    /// Falla si el root no existe o no es un directorio.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = fs::canonicalize(root.as_ref())?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    /// Document root canónico
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Valida una URI y retorna el archivo a servir
    pub fn resolve(&self, uri: &str) -> Result<ValidatedPath, RequestError> {
        let relative = Self::parse_uri(uri)?;
        let candidate = self.root.join(&relative);

        let metadata = fs::metadata(&candidate).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => {
                RequestError::forbidden(uri, ForbiddenReason::PermissionDenied)
            }
            _ => RequestError::NotFound { path: uri.to_string() },
        })?;

        if !metadata.is_file() || !owner_readable(&metadata) {
            return Err(RequestError::forbidden(uri, ForbiddenReason::PermissionDenied));
        }

        // `metadata` ya siguió los symlinks; esto solo falla si el archivo
        // cambió entre el stat y la resolución
        let canonical = fs::canonicalize(&candidate)
            .map_err(|_| RequestError::forbidden(uri, ForbiddenReason::ResolutionFailure))?;

        if !canonical.starts_with(&self.root) {
            return Err(RequestError::forbidden(uri, ForbiddenReason::PathEscape));
        }

        Ok(ValidatedPath {
            path: canonical,
            file_size: metadata.len(),
        })
    }

    /// Clasifica la URI y la convierte en una ruta relativa al root
    fn parse_uri(uri: &str) -> Result<PathBuf, RequestError> {
        if uri.contains("cgi") || uri.contains('?') {
            return Err(RequestError::DynamicContentUnsupported { uri: uri.to_string() });
        }

        let mut relative = PathBuf::new();
        for segment in uri.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if !relative.pop() {
                        return Err(RequestError::forbidden(uri, ForbiddenReason::PathEscape));
                    }
                }
                name => relative.push(name),
            }
        }

        if uri.ends_with('/') || relative.as_os_str().is_empty() {
            relative.push("index.html");
        }

        Ok(relative)
    }
}

#[cfg(unix)]
fn owner_readable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o400 != 0
}

#[cfg(not(unix))]
fn owner_readable(_metadata: &Metadata) -> bool {
    true
}
