//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Un thread acceptor (el que llama a [`Server::run`]) produce requests
//! validados en la cola acotada; un pool fijo de workers los consume según
//! la política configurada.

use crate::config::Config;
use crate::dispatch::{QueueStats, RequestQueue, StaticRequest, WorkerPool};
use crate::error::ServerError;
use crate::files::PathValidator;
use crate::metrics::{MetricsCollector, MetricsSnapshot};
use crate::server::acceptor::Acceptor;
use crate::server::worker::serve_queued;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Servidor HTTP/1.0 de contenido estático
pub struct Server {
    config: Config,
    listener: TcpListener,
    acceptor: Acceptor<TcpStream>,
    pool: WorkerPool<StaticRequest<TcpStream>>,
    queue: RequestQueue<StaticRequest<TcpStream>>,
    metrics: MetricsCollector,
    stop: Arc<AtomicBool>,
}

/// Detiene el loop de [`Server::run`] desde otro thread
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    stop: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    /// Marca el servidor para detenerse y despierta al acceptor
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::SeqCst);
        // accept() está bloqueado; una conexión propia lo libera
        if let Err(e) = TcpStream::connect(self.addr) {
            debug!(error = %e, "wake-up connection failed");
        }
    }
}

impl Server {
    /// Valida la configuración, abre el document root, hace bind e inicia
    /// los workers
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        config.validate().map_err(ServerError::InvalidConfig)?;

        let validator = PathValidator::new(&config.docroot).map_err(|source| {
            ServerError::DocumentRoot {
                path: config.docroot.clone(),
                source,
            }
        })?;

        let listener = TcpListener::bind(config.address())?;
        let queue = RequestQueue::new(config.buffers);
        let metrics = MetricsCollector::new();

        let pool = {
            let server_name: Arc<str> = Arc::from(config.server_name.as_str());
            let metrics = metrics.clone();
            WorkerPool::spawn(
                config.threads,
                queue.clone(),
                config.schedalg,
                move |worker, request| serve_queued(worker, request, &server_name, &metrics),
            )?
        };

        let acceptor = Acceptor::new(validator, queue.clone(), metrics.clone());

        Ok(Self {
            config,
            listener,
            acceptor,
            pool,
            queue,
            metrics,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Dirección real del listener (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> io::Result<ShutdownHandle> {
        let mut addr = self.local_addr()?;
        // No se puede conectar a 0.0.0.0 / :: en todas las plataformas
        if addr.ip().is_unspecified() {
            let loopback = if addr.is_ipv4() {
                Ipv4Addr::LOCALHOST.into()
            } else {
                Ipv6Addr::LOCALHOST.into()
            };
            addr.set_ip(loopback);
        }

        Ok(ShutdownHandle {
            stop: Arc::clone(&self.stop),
            addr,
        })
    }

    /// Loop de aceptación
    ///
    /// Bloquea hasta que se llame a [`ShutdownHandle::shutdown`]. Cada
    /// conexión se valida en este thread; si la cola está llena, este
    /// thread espera y no acepta más conexiones.
    pub fn run(&self) -> Result<(), ServerError> {
        info!(
            address = %self.local_addr()?,
            workers = self.pool.size(),
            capacity = self.queue.capacity(),
            policy = %self.config.schedalg,
            "server listening"
        );

        for stream in self.listener.incoming() {
            if self.stop.load(Ordering::SeqCst) {
                break;
            }

            match stream {
                Ok(stream) => {
                    let peer = stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());
                    debug!(%peer, "connection accepted");

                    match self.acceptor.handle(stream) {
                        Ok(admission) => debug!(%peer, ?admission, "connection handled"),
                        Err(e) => {
                            self.metrics.record_io_failure();
                            warn!(%peer, error = %e, "connection dropped");
                        }
                    }
                }
                Err(e) => warn!(error = %e, "accept failed"),
            }
        }

        info!("acceptor stopped");
        Ok(())
    }

    /// Estado de la cola
    pub fn queue_stats(&self) -> QueueStats {
        self.queue.stats()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Cierra la cola, espera a que los workers drenen lo pendiente y
    /// retorna las métricas finales
    pub fn shutdown(self) -> MetricsSnapshot {
        let panicked = self.pool.shutdown();
        if panicked > 0 {
            error!(panicked, "workers panicked during shutdown");
        }

        let stats = self.queue.stats();
        info!(
            high_water = stats.high_water,
            enqueued = stats.total_enqueued,
            dequeued = stats.total_dequeued,
            "queue closed"
        );
        info!("final metrics: {}", self.metrics.to_json());

        self.metrics.snapshot()
    }
}
