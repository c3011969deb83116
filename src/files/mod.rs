//! # Archivos Estáticos
//!
//! - `validator`: URI → archivo dentro del document root
//! - `responder`: archivo validado → respuesta HTTP en la conexión

pub mod responder;
pub mod validator;

pub use responder::{content_type, send_error, serve_static};
pub use validator::{PathValidator, ValidatedPath};
