//! # Errores del Servidor
//! src/error.rs
//!
//! Dos familias:
//!
//! - [`RequestError`]: rechazos por request. Producen una página de error
//!   y cierran solo esa conexión; nunca tumban a un worker ni tocan la cola.
//! - [`ServerError`]: fallas de arranque (configuración, document root,
//!   bind, creación de workers).

use crate::http::{Response, StatusCode};
use std::path::PathBuf;
use thiserror::Error;

/// Motivo de un 403
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    /// No es un archivo regular o el dueño no tiene permiso de lectura
    PermissionDenied,

    /// La ruta canónica queda fuera del document root
    PathEscape,

    /// Falló la canonicalización (symlink roto, permisos al resolver)
    ResolutionFailure,
}

/// Rechazo de un request antes de encolarlo
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("method not supported: {method}")]
    MethodNotSupported { method: String },

    #[error("dynamic content not supported: {uri}")]
    DynamicContentUnsupported { uri: String },

    #[error("file not found: {path}")]
    NotFound { path: String },

    #[error("forbidden ({reason:?}): {path}")]
    Forbidden { path: String, reason: ForbiddenReason },

    #[error("malformed request: {line}")]
    MalformedRequest { line: String },
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::MethodNotSupported { .. }
            | RequestError::DynamicContentUnsupported { .. } => StatusCode::NotImplemented,
            RequestError::NotFound { .. } => StatusCode::NotFound,
            RequestError::Forbidden { .. } => StatusCode::Forbidden,
            RequestError::MalformedRequest { .. } => StatusCode::BadRequest,
        }
    }

    /// Lo que el cliente pidió: método, línea o ruta según el caso
    pub fn cause(&self) -> &str {
        match self {
            RequestError::MethodNotSupported { method } => method,
            RequestError::DynamicContentUnsupported { uri } => uri,
            RequestError::NotFound { path } | RequestError::Forbidden { path, .. } => path,
            RequestError::MalformedRequest { line } => line,
        }
    }

    /// Mensaje largo para el `<p>` de la página de error
    pub fn long_message(&self) -> &'static str {
        match self {
            RequestError::MethodNotSupported { .. } => "server does not implement this method",
            RequestError::DynamicContentUnsupported { .. } => "server does not serve dynamic content",
            RequestError::NotFound { .. } => "server could not find this file",
            RequestError::Forbidden { reason, .. } => match reason {
                ForbiddenReason::PermissionDenied => "server could not read this file",
                ForbiddenReason::PathEscape => "illegal file path",
                ForbiddenReason::ResolutionFailure => "server could not resolve this file path",
            },
            RequestError::MalformedRequest { .. } => "server could not parse this request",
        }
    }

    /// Página de error lista para escribir en la conexión
    pub fn to_response(&self) -> Response {
        Response::error_page(self.status(), self.cause(), self.long_message())
    }

    pub(crate) fn forbidden(path: impl Into<String>, reason: ForbiddenReason) -> Self {
        RequestError::Forbidden { path: path.into(), reason }
    }
}

/// Fallas de arranque del servidor
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("document root {path} is unusable: {source}")]
    DocumentRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
