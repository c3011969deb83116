//! # Servicio de Requests Encolados
//! src/server/worker.rs
//!
//! Lo que hace cada worker con un request desencolado: servir el archivo
//! y cerrar la conexión.

use crate::dispatch::StaticRequest;
use crate::error::RequestError;
use crate::files::{send_error, serve_static};
use crate::metrics::MetricsCollector;
use crate::server::acceptor::Connection;
use std::io;
use tracing::{debug, warn};

/// Sirve un request y suelta (cierra) su conexión
pub fn serve_queued<C: Connection>(
    worker: usize,
    request: StaticRequest<C>,
    server_name: &str,
    metrics: &MetricsCollector,
) {
    let admitted_at = request.admitted_at();
    let uri = request.uri().to_string();
    let (mut connection, path, file_size) = request.into_parts();

    match serve_static(&mut connection, &path, file_size, server_name) {
        Ok(bytes) => {
            metrics.record_served(bytes, admitted_at.elapsed());
            debug!(worker, path = %path.display(), bytes, "served");
        }
        // Borrado mientras esperaba en la cola; todavía no se escribió nada
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            // La causa es la URI del cliente, nunca la ruta en disco
            let error = RequestError::NotFound { path: uri };
            metrics.record_rejected(error.status().as_u16());
            if let Err(e) = send_error(&mut connection, &error) {
                metrics.record_io_failure();
                warn!(worker, error = %e, "failed to send error page");
            }
        }
        Err(e) => {
            metrics.record_io_failure();
            warn!(worker, path = %path.display(), error = %e, "failed to serve file");
        }
    }
}
