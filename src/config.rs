//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor con soporte para argumentos CLI y variables
//! de entorno. Se lee una sola vez al arrancar.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./static_server -d ./www -p 10000 -t 8 -b 16 -s sff
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! DOC_ROOT=./www WORKER_THREADS=8 SCHED_ALG=random ./static_server
//! ```

use crate::dispatch::SchedulingPolicy;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Capacidad máxima permitida para la cola
///
/// SFF recorre toda la cola con el lock tomado; acotarla acota la sección
/// crítica.
pub const MAX_QUEUE_CAPACITY: usize = 1024;

/// Configuración del servidor HTTP/1.0
#[derive(Debug, Clone, Parser)]
#[command(name = "static_server")]
#[command(about = "Servidor HTTP/1.0 de contenido estático con planificación FIFO/SFF/Random")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "10000", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Document root: todo archivo servido debe resolver dentro de él
    #[arg(short = 'd', long = "docroot", default_value = ".", env = "DOC_ROOT")]
    pub docroot: PathBuf,

    /// Número de workers
    #[arg(short = 't', long = "threads", default_value = "1", env = "WORKER_THREADS")]
    pub threads: usize,

    /// Capacidad de la cola de requests
    #[arg(short = 'b', long = "buffers", default_value = "1", env = "QUEUE_CAPACITY")]
    pub buffers: usize,

    /// Política de planificación
    #[arg(
        short = 's',
        long = "schedalg",
        value_enum,
        ignore_case = true,
        default_value = "fifo",
        env = "SCHED_ALG"
    )]
    pub schedalg: SchedulingPolicy,

    /// Valor del header `Server`
    #[arg(long = "server-name", default_value = "RedUnix Static Server", env = "SERVER_NAME")]
    pub server_name: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use static_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:10000");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.threads == 0 {
            return Err("Worker threads must be >= 1".to_string());
        }

        if self.buffers == 0 {
            return Err("Queue capacity must be >= 1".to_string());
        }
        if self.buffers > MAX_QUEUE_CAPACITY {
            return Err(format!(
                "Queue capacity must be <= {} (got {})",
                MAX_QUEUE_CAPACITY, self.buffers
            ));
        }

        if self.docroot.as_os_str().is_empty() {
            return Err("Document root must not be empty".to_string());
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn print_summary(&self) {
        info!("RedUnix static HTTP/1.0 server configuration");
        info!("   Address:      {}", self.address());
        info!("   Doc root:     {}", self.docroot.display());
        info!("   Workers:      {}", self.threads);
        info!("   Queue cap:    {}", self.buffers);
        info!("   Scheduling:   {}", self.schedalg);
        info!("   Server name:  {}", self.server_name);
    }
}

impl Default for Config {
    /// Configuración por defecto (igual a los defaults del CLI)
    fn default() -> Self {
        Self {
            port: 10000,
            host: "127.0.0.1".to_string(),
            docroot: PathBuf::from("."),
            threads: 1,
            buffers: 1,
            schedalg: SchedulingPolicy::Fifo,
            server_name: "RedUnix Static Server".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 10000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.threads, 1);
        assert_eq!(config.buffers, 1);
        assert_eq!(config.schedalg, SchedulingPolicy::Fifo);
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "0.0.0.0".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_threads() {
        let mut config = Config::default();
        config.threads = 0;
        let result = config.validate();
        assert!(result.unwrap_err().contains("Worker threads"));
    }

    #[test]
    fn test_validate_invalid_buffers() {
        let mut config = Config::default();
        config.buffers = 0;
        assert!(config.validate().unwrap_err().contains("Queue capacity"));

        config.buffers = MAX_QUEUE_CAPACITY + 1;
        assert!(config.validate().unwrap_err().contains("<="));

        config.buffers = MAX_QUEUE_CAPACITY;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_docroot() {
        let mut config = Config::default();
        config.docroot = PathBuf::new();
        assert!(config.validate().unwrap_err().contains("Document root"));
    }

    #[test]
    fn test_cli_flags() {
        let config = Config::try_parse_from([
            "static_server", "-d", "/srv/www", "-p", "8081", "-t", "4", "-b", "16", "-s", "SFF",
        ])
        .unwrap();

        assert_eq!(config.docroot, PathBuf::from("/srv/www"));
        assert_eq!(config.port, 8081);
        assert_eq!(config.threads, 4);
        assert_eq!(config.buffers, 16);
        assert_eq!(config.schedalg, SchedulingPolicy::Sff);
    }

    #[test]
    fn test_cli_long_flags() {
        let config = Config::try_parse_from([
            "static_server", "--docroot", "www", "--threads", "2", "--buffers", "8",
            "--schedalg", "random", "--server-name", "Test",
        ])
        .unwrap();

        assert_eq!(config.schedalg, SchedulingPolicy::Random);
        assert_eq!(config.server_name, "Test");
    }

    #[test]
    fn test_cli_rejects_unknown_policy() {
        let result = Config::try_parse_from(["static_server", "-s", "lifo"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_print_summary() {
        // No debe hacer panic
        Config::default().print_summary();
    }
}
