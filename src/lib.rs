//! # Static Server
//! src/lib.rs
//!
//! Servidor HTTP/1.0 de contenido estático implementado desde cero para
//! demostrar conceptos de sistemas operativos: productor/consumidor con
//! cola acotada, sincronización con mutex y variables de condición, y
//! planificación de requests (FIFO, SFF, Random).
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Request line, headers y formato de responses HTTP/1.0
//! - `files`: Validación de rutas contra el document root y envío de archivos
//! - `dispatch`: Cola acotada, políticas de planificación y pool de workers
//! - `server`: Listener TCP, acceptor y servicio de requests encolados
//! - `metrics`: Contadores y latencias
//! - `config`: Argumentos CLI y variables de entorno
//! - `error`: Errores de request (con su status HTTP) y de arranque
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use static_server::config::Config;
//! use static_server::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(config).expect("Error al iniciar servidor");
//! server.run().expect("Error en el loop de aceptación");
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod files;
pub mod http;
pub mod metrics;
pub mod server;
