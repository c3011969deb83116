//! # Responder Estático
//! src/files/responder.rs
//!
//! Escribe en la conexión un archivo ya validado, o una página de error.
//! El cuerpo se envía desde un mapeo de solo lectura del archivo; el mapeo
//! y el descriptor se liberan al salir del scope en cualquier camino.

use crate::error::RequestError;
use crate::http::Response;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Content-Type según la extensión
///
/// # Ejemplo
/// ```
/// use static_server::files::content_type;
/// use std::path::Path;
///
/// assert_eq!(content_type(Path::new("a/index.html")), "text/html");
/// assert_eq!(content_type(Path::new("notes.md")), "text/plain");
/// ```
pub fn content_type(path: &Path) -> &'static str {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if extension.eq_ignore_ascii_case("html") {
        "text/html"
    } else if extension.eq_ignore_ascii_case("gif") {
        "image/gif"
    } else if extension.eq_ignore_ascii_case("jpg") {
        "image/jpeg"
    } else {
        "text/plain"
    }
}

/// Sirve un archivo validado: head + bytes
///
/// `file_size` es el tamaño que vio el acceptor. Si el archivo cambió desde
/// entonces, el `Content-Length` refleja la longitud al abrirlo, que es la
/// que efectivamente se envía.
///
/// Retorna los bytes de cuerpo enviados.
pub fn serve_static<W: Write>(
    out: &mut W,
    path: &Path,
    file_size: u64,
    server_name: &str,
) -> io::Result<u64> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    if len != file_size {
        debug!(path = %path.display(), queued = file_size, current = len, "file size changed while queued");
    }

    let head = Response::file_head(server_name, len, content_type(path)).to_bytes();

    if len == 0 {
        out.write_all(&head)?;
        out.flush()?;
        return Ok(0);
    }

    // SAFETY: el mapeo es de solo lectura y vive solo durante esta llamada.
    // Truncar el archivo mientras se envía es la misma condición de carrera
    // que tiene cualquier servidor que mapea archivos.
    let map = unsafe { Mmap::map(&file)? };

    out.write_all(&head)?;
    out.write_all(&map)?;
    out.flush()?;

    Ok(map.len() as u64)
}

/// Envía la página de error de un request rechazado
pub fn send_error<W: Write>(out: &mut W, error: &RequestError) -> io::Result<()> {
    out.write_all(&error.to_response().to_bytes())?;
    out.flush()
}
