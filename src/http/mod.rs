//! # Módulo HTTP
//!
//! Subconjunto de HTTP/1.0 (RFC 1945) que necesita un servidor de
//! contenido estático:
//!
//! - Lectura de la request line y descarte de headers
//! - Construcción de responses (head de archivo y página de error)
//! - Códigos de estado
//!
//! Sin keep-alive, sin chunked transfer, sin rangos: cada conexión
//! recibe una sola respuesta y se cierra.
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Server: RedUnix Static Server\r\n
//! Content-Length: 13\r\n
//! Content-Type: text/html\r\n
//! \r\n
//! <html></html>
//! ```

pub mod request;   // Lectura de la request line y headers
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

pub use request::{Method, ParseError, RequestLine};
pub use response::Response;
pub use status::StatusCode;
