//! # Lectura de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Lectura orientada a líneas sobre la conexión del cliente.
//!
//! ## Formato de un Request HTTP/1.0
//!
//! ```text
//! GET /index.html HTTP/1.0\r\n
//! Host: localhost:10000\r\n
//! User-Agent: curl/7.68.0\r\n
//! \r\n
//! ```
//!
//! El servidor solo necesita la request line. Los headers se leen y se
//! descartan hasta la línea vacía para dejar el socket limpio antes de
//! responder.

use std::io::{self, BufRead, Read};

/// Largo máximo de una línea (request line o header), en bytes
pub const MAX_LINE_LEN: usize = 8192;

/// Método HTTP de la request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Único método que sirve el servidor
    GET,

    /// HEAD - Reconocido, pero no implementado
    HEAD,

    /// POST - Reconocido, pero no implementado
    POST,

    /// Cualquier otro token
    Other(String),
}

impl Method {
    /// Parsea un método sin distinguir mayúsculas
    fn from_token(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            _ => Method::Other(s.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::Other(token) => token,
        }
    }
}

/// Request line parseada: `METHOD URI VERSION`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: Method,
    uri: String,
    version: String,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request line vacía
    EmptyRequest,

    /// Formato inválido de la request line
    InvalidRequestLine,

    /// Versión HTTP incorrecta
    InvalidHttpVersion(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyRequest => write!(f, "Empty request"),
            ParseError::InvalidRequestLine => write!(f, "Invalid request line format"),
            ParseError::InvalidHttpVersion(v) => write!(f, "Invalid HTTP version: {}", v),
        }
    }
}

impl std::error::Error for ParseError {}

impl RequestLine {
    /// Parsea la request line
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use static_server::http::RequestLine;
    ///
    /// let line = RequestLine::parse("GET /index.html HTTP/1.0\r\n").unwrap();
    /// assert!(line.is_get());
    /// assert_eq!(line.uri(), "/index.html");
    /// ```
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD URI VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let version = parts[2].to_string();
        if !version.eq_ignore_ascii_case("HTTP/1.0") && !version.eq_ignore_ascii_case("HTTP/1.1") {
            return Err(ParseError::InvalidHttpVersion(version));
        }

        Ok(RequestLine {
            method: Method::from_token(parts[0]),
            uri: parts[1].to_string(),
            version,
        })
    }

    /// Obtiene el método HTTP
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// `true` si el método es GET (sin distinguir mayúsculas)
    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// URI tal como llegó en la request line
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Resultado de leer una línea de la conexión
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Línea completa, incluyendo el terminador si lo hubo
    Text(String),

    /// Se leyeron `MAX_LINE_LEN` bytes sin encontrar `\n`
    TooLong,

    /// El peer cerró la conexión
    Eof,
}

/// Lee una línea acotada a `MAX_LINE_LEN` bytes
pub fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Line> {
    let mut buf = Vec::new();
    let read = reader
        .by_ref()
        .take(MAX_LINE_LEN as u64)
        .read_until(b'\n', &mut buf)?;

    if read == 0 {
        return Ok(Line::Eof);
    }
    if read == MAX_LINE_LEN && !buf.ends_with(b"\n") {
        return Ok(Line::TooLong);
    }

    Ok(Line::Text(String::from_utf8_lossy(&buf).into_owned()))
}

/// Descarta headers hasta la línea vacía (o EOF)
///
/// Retorna cuántas líneas de header se descartaron.
pub fn drain_headers<R: BufRead>(reader: &mut R) -> io::Result<usize> {
    let mut drained = 0;
    loop {
        match read_line(reader)? {
            Line::Eof => return Ok(drained),
            Line::Text(line) if line.trim().is_empty() => return Ok(drained),
            // Un header largo llega en varios trozos; cada trozo cuenta
            Line::Text(_) | Line::TooLong => drained += 1,
        }
    }
}
