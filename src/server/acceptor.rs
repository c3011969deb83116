//! # Acceptor
//! src/server/acceptor.rs
//!
//! Lleva una conexión recién aceptada hasta `Admitted` o `Rejected`:
//!
//! ```text
//! Received → MethodChecked → HeadersDrained → PathParsed → Stat'd
//!     ├─ Admitted → (cola)
//!     └─ Rejected → ErrorSent → Closed
//! ```
//!
//! Toda la lectura y escritura ocurre antes de `enqueue`; ninguna llamada
//! de I/O queda a medio camino de una mutación de la cola.

use crate::dispatch::{RequestQueue, StaticRequest};
use crate::error::RequestError;
use crate::files::{send_error, PathValidator};
use crate::http::request::{drain_headers, read_line, Line};
use crate::http::{RequestLine, StatusCode};
use crate::metrics::MetricsCollector;
use std::io::{self, BufReader, Read, Write};
use tracing::{debug, info, warn};

/// Conexión con lectura y escritura que puede pasar a un worker
pub trait Connection: Read + Write + Send + 'static {}

impl<T: Read + Write + Send + 'static> Connection for T {}

/// Resultado de procesar una conexión en el acceptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// El request quedó en la cola
    Admitted,

    /// Se envió una página de error y la conexión se cerró
    Rejected(StatusCode),

    /// El peer cerró sin enviar nada
    Disconnected,

    /// La cola estaba cerrada; la conexión se soltó sin respuesta
    Dropped,
}

/// Productor de la cola
pub struct Acceptor<C> {
    validator: PathValidator,
    queue: RequestQueue<StaticRequest<C>>,
    metrics: MetricsCollector,
}

impl<C: Connection> Acceptor<C> {
    pub fn new(
        validator: PathValidator,
        queue: RequestQueue<StaticRequest<C>>,
        metrics: MetricsCollector,
    ) -> Self {
        Self {
            validator,
            queue,
            metrics,
        }
    }

    /// Procesa una conexión
    ///
    /// Bloquea si la cola está llena. Los errores de I/O se propagan y la
    /// conexión se suelta (se cierra) en `Drop`.
    pub fn handle(&self, connection: C) -> io::Result<Admission> {
        let mut reader = BufReader::new(connection);

        let parsed = match read_line(&mut reader)? {
            Line::Eof => return Ok(Admission::Disconnected),
            Line::TooLong => Err(RequestError::MalformedRequest {
                line: "request line too long".to_string(),
            }),
            Line::Text(text) => RequestLine::parse(&text).map_err(|e| {
                debug!(error = %e, "unparseable request line");
                RequestError::MalformedRequest {
                    line: text.trim_end().to_string(),
                }
            }),
        };

        let checked = parsed.and_then(|line| {
            debug!(method = line.method().as_str(), uri = line.uri(), version = line.version(), "request line");
            if line.is_get() {
                Ok(line)
            } else {
                Err(RequestError::MethodNotSupported {
                    method: line.method().as_str().to_string(),
                })
            }
        });

        drain_headers(&mut reader)?;

        let validated = checked.and_then(|line| {
            let target = self.validator.resolve(line.uri())?;
            Ok((line, target))
        });
        let mut connection = reader.into_inner();

        match validated {
            Ok((line, target)) => {
                let request =
                    StaticRequest::new(connection, line.uri(), target.path, target.file_size);
                match self.queue.enqueue(request) {
                    Ok(()) => {
                        self.metrics.record_admitted();
                        Ok(Admission::Admitted)
                    }
                    Err(closed) => {
                        let request = closed.into_inner();
                        warn!(path = %request.path().display(), "queue closed, dropping connection");
                        Ok(Admission::Dropped)
                    }
                }
            }
            Err(error) => {
                let status = error.status();
                info!(status = status.as_u16(), cause = error.cause(), "request rejected: {}", error);
                self.metrics.record_rejected(status.as_u16());
                send_error(&mut connection, &error)?;
                Ok(Admission::Rejected(status))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Scheduler, SchedulingPolicy};
    use crate::server::test_support::MemoryConnection;
    use std::fs;
    use tempfile::TempDir;

    fn setup(capacity: usize) -> (TempDir, Acceptor<MemoryConnection>, RequestQueue<StaticRequest<MemoryConnection>>, MetricsCollector) {
        let tmp = TempDir::new().unwrap();
        let www = tmp.path().join("www");
        fs::create_dir_all(&www).unwrap();
        fs::write(www.join("index.html"), "x".repeat(42)).unwrap();
        fs::write(www.join("big.jpg"), vec![0u8; 1000]).unwrap();

        let queue = RequestQueue::new(capacity);
        let metrics = MetricsCollector::new();
        let acceptor = Acceptor::new(PathValidator::new(&www).unwrap(), queue.clone(), metrics.clone());
        (tmp, acceptor, queue, metrics)
    }

    #[test]
    fn test_get_is_admitted_with_size() {
        let (_tmp, acceptor, queue, metrics) = setup(4);
        let (conn, output) = MemoryConnection::new(b"GET /index.html HTTP/1.0\r\nHost: x\r\n\r\n");

        assert_eq!(acceptor.handle(conn).unwrap(), Admission::Admitted);
        assert!(output.lock().unwrap().is_empty());

        let mut scheduler = Scheduler::new(SchedulingPolicy::Fifo);
        let request = queue.try_dequeue(&mut scheduler).unwrap();
        assert_eq!(request.file_size(), 42);
        assert!(request.path().ends_with("index.html"));
        assert_eq!(request.uri(), "/index.html");
        assert_eq!(metrics.snapshot().admitted, 1);
    }

    #[test]
    fn test_post_is_501() {
        let (_tmp, acceptor, queue, metrics) = setup(4);
        let (conn, output) = MemoryConnection::new(b"POST /x HTTP/1.0\r\nContent-Length: 0\r\n\r\n");

        assert_eq!(
            acceptor.handle(conn).unwrap(),
            Admission::Rejected(StatusCode::NotImplemented)
        );
        let text = String::from_utf8(output.lock().unwrap().clone()).unwrap();
        assert!(text.starts_with("HTTP/1.0 501 Not Implemented\r\n"));
        assert!(text.contains("<p>POST: server does not implement this method</p>"));
        assert!(queue.is_empty());
        assert_eq!(metrics.snapshot().rejected.get(&501), Some(&1));
    }

    #[test]
    fn test_missing_is_404() {
        let (_tmp, acceptor, queue, _metrics) = setup(4);
        let (conn, output) = MemoryConnection::new(b"GET /missing.html HTTP/1.0\r\n\r\n");

        assert_eq!(acceptor.handle(conn).unwrap(), Admission::Rejected(StatusCode::NotFound));
        assert!(output.lock().unwrap().starts_with(b"HTTP/1.0 404 Not Found\r\n"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_traversal_is_403() {
        let (_tmp, acceptor, queue, _metrics) = setup(4);
        let (conn, output) = MemoryConnection::new(b"GET ../../etc/passwd HTTP/1.0\r\n\r\n");

        assert_eq!(acceptor.handle(conn).unwrap(), Admission::Rejected(StatusCode::Forbidden));
        assert!(output.lock().unwrap().starts_with(b"HTTP/1.0 403 Forbidden\r\n"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_garbage_is_400() {
        let (_tmp, acceptor, _queue, _metrics) = setup(4);
        let (conn, output) = MemoryConnection::new(b"\x00\x01\x02garbage\r\n\r\n");

        assert_eq!(acceptor.handle(conn).unwrap(), Admission::Rejected(StatusCode::BadRequest));
        assert!(output.lock().unwrap().starts_with(b"HTTP/1.0 400 Bad Request\r\n"));
    }

    #[test]
    fn test_peer_closed_immediately() {
        let (_tmp, acceptor, _queue, metrics) = setup(4);
        let (conn, output) = MemoryConnection::new(b"");

        assert_eq!(acceptor.handle(conn).unwrap(), Admission::Disconnected);
        assert!(output.lock().unwrap().is_empty());
        assert_eq!(metrics.snapshot().total_rejected(), 0);
    }

    #[test]
    fn test_closed_queue_drops_connection() {
        let (_tmp, acceptor, queue, metrics) = setup(4);
        queue.close();
        let (conn, output) = MemoryConnection::new(b"GET /index.html HTTP/1.0\r\n\r\n");

        assert_eq!(acceptor.handle(conn).unwrap(), Admission::Dropped);
        assert!(output.lock().unwrap().is_empty());
        assert_eq!(metrics.snapshot().admitted, 0);
    }

    #[test]
    fn test_sff_order_through_acceptor() {
        let (_tmp, acceptor, queue, _metrics) = setup(4);
        for uri in ["/big.jpg", "/index.html"] {
            let raw = format!("GET {} HTTP/1.0\r\n\r\n", uri);
            let (conn, _) = MemoryConnection::new(raw.as_bytes());
            acceptor.handle(conn).unwrap();
        }

        let mut scheduler = Scheduler::new(SchedulingPolicy::Sff);
        assert_eq!(queue.try_dequeue(&mut scheduler).unwrap().file_size(), 42);
        assert_eq!(queue.try_dequeue(&mut scheduler).unwrap().file_size(), 1000);
    }
}
