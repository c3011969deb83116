//! # Construcción de Respuestas HTTP
//!
//! API para construir respuestas HTTP/1.0 y convertirlas a bytes.
//!
//! Los headers se guardan en orden de inserción: el formato en el cable
//! es fijo y las pruebas lo comparan byte a byte.
//!
//! ## Respuesta exitosa (head de un archivo estático)
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Server: RedUnix Static Server\r\n
//! Content-Length: 42\r\n
//! Content-Type: text/html\r\n
//! \r\n
//! ```
//!
//! ## Respuesta de error
//!
//! ```text
//! HTTP/1.0 404 Not Found\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 187\r\n
//! \r\n
//! <!doctype html>...<h2>404: Not Found</h2>...
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use static_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("Hello");
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.0 200 OK\r\n"));
//! ```

use super::StatusCode;

/// Representa una respuesta HTTP/1.0 completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers en orden de inserción, sin duplicados
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe, se sobrescribe conservando su posición.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Establece el cuerpo desde un string y calcula `Content-Length`
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el cuerpo desde bytes y calcula `Content-Length`
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        let len = self.body.len().to_string();
        self.add_header("Content-Length", &len);
        self
    }

    /// Head de un archivo estático (200 OK)
    ///
    /// El cuerpo no se incluye: el responder escribe los bytes del archivo
    /// directamente desde su vista de solo lectura.
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::Response;
    ///
    /// let head = Response::file_head("RedUnix", 42, "text/html");
    /// assert_eq!(
    ///     head.to_bytes(),
    ///     b"HTTP/1.0 200 OK\r\nServer: RedUnix\r\nContent-Length: 42\r\nContent-Type: text/html\r\n\r\n"
    /// );
    /// ```
    pub fn file_head(server_name: &str, content_length: u64, content_type: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Server", server_name)
            .with_header("Content-Length", &content_length.to_string())
            .with_header("Content-Type", content_type)
    }

    /// Página de error HTML
    ///
    /// El body contiene `<h2>código: mensaje corto</h2>` y
    /// `<p>causa: mensaje largo</p>`. La causa viene del cliente y se escapa.
    pub fn error_page(status: StatusCode, cause: &str, long_message: &str) -> Self {
        let body = format!(
            "<!doctype html>\r\n\
             <head>\r\n  <title>Server Error</title>\r\n</head>\r\n\
             <body>\r\n  <h2>{}: {}</h2>\r\n  <p>{}: {}</p>\r\n</body>\r\n\
             </html>\r\n",
            status.as_u16(),
            status.reason_phrase(),
            escape_html(cause),
            long_message
        );
        Self::new(status)
            .with_header("Content-Type", "text/html")
            .with_body(&body)
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - Status line: `HTTP/1.0 200 OK\r\n`
    /// - Headers: `Header-Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(64 + self.body.len());

        result.extend_from_slice(format!("HTTP/1.0 {}\r\n", self.status).as_bytes());

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Headers en orden de emisión
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene un header específico (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
