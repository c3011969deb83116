//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones y valida el request en el thread acceptor
//! 3. Encola los requests admitidos en la cola acotada
//! 4. Sirve los archivos desde un pool fijo de workers

pub mod acceptor;
pub mod tcp;
pub mod worker;

// Re-exportar para facilitar el uso
pub use acceptor::{Acceptor, Admission, Connection};
pub use tcp::{Server, ShutdownHandle};
pub use worker::serve_queued;
