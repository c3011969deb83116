//! # Static Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor HTTP/1.0 de contenido estático.
//!
//! El nivel de log se controla con `RUST_LOG` (por defecto `info`).

use static_server::config::Config;
use static_server::server::Server;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_thread_names(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Crear configuración (CLI o variables de entorno)
    let config = Config::new();
    config.print_summary();

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            error!("💥 Error fatal: {}", e);
            std::process::exit(1);
        }
    };

    // Esto bloqueará el thread
    if let Err(e) = server.run() {
        error!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }

    server.shutdown();
}
