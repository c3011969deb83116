//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en 127.0.0.1:0 con un document
//! root temporal y lo detiene al final.

use static_server::config::Config;
use static_server::dispatch::SchedulingPolicy;
use static_server::metrics::MetricsSnapshot;
use static_server::server::{Server, ShutdownHandle};
use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tempfile::TempDir;

const PAGE: &[u8] = b"<html><body>exactly 42 bytes</body></html>";

struct TestServer {
    _docroot: TempDir,
    addr: SocketAddr,
    server: Arc<Server>,
    handle: ShutdownHandle,
    thread: JoinHandle<()>,
}

impl TestServer {
    fn start(threads: usize, buffers: usize, schedalg: SchedulingPolicy) -> Self {
        let docroot = TempDir::new().expect("tempdir");
        let www = docroot.path().join("www");
        fs::create_dir_all(www.join("img")).unwrap();
        fs::write(www.join("index.html"), PAGE).unwrap();
        fs::write(www.join("img/logo.gif"), b"GIF89a").unwrap();
        fs::write(docroot.path().join("secret.txt"), b"top secret").unwrap();

        let config = Config {
            port: 0,
            docroot: www,
            threads,
            buffers,
            schedalg,
            server_name: "Integration".to_string(),
            ..Config::default()
        };

        let server = Arc::new(Server::bind(config).expect("bind"));
        let addr = server.local_addr().unwrap();
        let handle = server.shutdown_handle().unwrap();
        let thread = {
            let server = Arc::clone(&server);
            thread::spawn(move || server.run().expect("run"))
        };

        Self {
            _docroot: docroot,
            addr,
            server,
            handle,
            thread,
        }
    }

    fn stop(self) -> MetricsSnapshot {
        self.handle.shutdown();
        self.thread.join().expect("server thread");
        match Arc::try_unwrap(self.server) {
            Ok(server) => server.shutdown(),
            Err(_) => panic!("server still shared after run returned"),
        }
    }
}

/// Helper: envía un request crudo y retorna la response completa
fn send_raw(addr: SocketAddr, raw: &[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect(addr)?;

    // Configurar timeouts
    stream.set_read_timeout(Some(Duration::from_secs(10)))?;
    stream.set_write_timeout(Some(Duration::from_secs(10)))?;

    stream.write_all(raw)?;
    stream.flush()?;

    // El servidor cierra la conexión al terminar la response
    let mut response = Vec::new();
    stream.read_to_end(&mut response)?;

    Ok(response)
}

/// Helper: GET HTTP/1.0 de una ruta
fn send_request(addr: SocketAddr, path: &str) -> String {
    let request = format!("GET {} HTTP/1.0\r\nHost: localhost\r\n\r\n", path);
    let response = send_raw(addr, request.as_bytes()).expect("Failed to send request");
    String::from_utf8_lossy(&response).into_owned()
}

/// Helper: separa headers y body
fn split_response(response: &str) -> (&str, &str) {
    match response.find("\r\n\r\n") {
        Some(pos) => (&response[..pos + 2], &response[pos + 4..]),
        None => (response, ""),
    }
}

#[test]
fn test_get_index_serves_exact_bytes() {
    let server = TestServer::start(2, 4, SchedulingPolicy::Fifo);

    let response = send_request(server.addr, "/index.html");
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.0 200 OK\r\n"), "got: {}", head);
    assert!(head.contains("Server: Integration\r\n"));
    assert!(head.contains("Content-Length: 42\r\n"));
    assert!(head.contains("Content-Type: text/html\r\n"));
    assert_eq!(body.as_bytes(), PAGE);

    let snapshot = server.stop();
    assert_eq!(snapshot.served, 1);
    assert_eq!(snapshot.bytes_served, 42);
}

#[test]
fn test_directory_uri_maps_to_index() {
    let server = TestServer::start(1, 1, SchedulingPolicy::Fifo);

    let response = send_request(server.addr, "/");
    assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(response.ends_with("exactly 42 bytes</body></html>"));

    server.stop();
}

#[test]
fn test_content_type_by_extension() {
    let server = TestServer::start(1, 1, SchedulingPolicy::Sff);

    let response = send_request(server.addr, "/img/logo.gif");
    assert!(response.contains("Content-Type: image/gif\r\n"));
    assert!(response.ends_with("GIF89a"));

    server.stop();
}

#[test]
fn test_post_is_not_implemented() {
    let server = TestServer::start(1, 1, SchedulingPolicy::Fifo);

    let raw = b"POST /x HTTP/1.0\r\nContent-Length: 0\r\n\r\n";
    let response = String::from_utf8(send_raw(server.addr, raw).unwrap()).unwrap();
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.0 501 Not Implemented\r\n"));
    assert!(head.contains("Content-Type: text/html\r\n"));
    assert!(head.contains(&format!("Content-Length: {}\r\n", body.len())));
    assert!(body.contains("501: Not Implemented"));

    let snapshot = server.stop();
    assert_eq!(snapshot.admitted, 0);
    assert_eq!(snapshot.rejected.get(&501), Some(&1));
}

#[test]
fn test_dynamic_content_is_not_implemented() {
    let server = TestServer::start(1, 1, SchedulingPolicy::Fifo);

    let response = send_request(server.addr, "/cgi-bin/run");
    assert!(response.starts_with("HTTP/1.0 501 Not Implemented\r\n"));
    assert!(response.contains("server does not serve dynamic content"));

    server.stop();
}

#[test]
fn test_missing_file_is_not_found() {
    let server = TestServer::start(1, 1, SchedulingPolicy::Fifo);

    let response = send_request(server.addr, "/missing.html");
    assert!(response.starts_with("HTTP/1.0 404 Not Found\r\n"));
    assert!(response.contains("/missing.html"));

    server.stop();
}

#[test]
fn test_traversal_is_forbidden() {
    let server = TestServer::start(1, 1, SchedulingPolicy::Fifo);

    for uri in ["../../etc/passwd", "/../secret.txt", "/img/../../secret.txt"] {
        let response = send_request(server.addr, uri);
        assert!(
            response.starts_with("HTTP/1.0 403 Forbidden\r\n"),
            "{} -> {}",
            uri,
            response
        );
        assert!(!response.contains("top secret"));
    }

    let snapshot = server.stop();
    assert_eq!(snapshot.rejected.get(&403), Some(&3));
}

#[test]
fn test_malformed_request_is_bad_request() {
    let server = TestServer::start(1, 1, SchedulingPolicy::Fifo);

    let response = send_raw(server.addr, b"\x00\x01\x02\x03garbage\r\n\r\n").unwrap();
    assert!(response.starts_with(b"HTTP/1.0 400 Bad Request\r\n"));

    server.stop();
}

#[test]
fn test_more_clients_than_capacity() {
    let server = TestServer::start(2, 2, SchedulingPolicy::Fifo);
    let addr = server.addr;

    let clients: Vec<_> = (0..16)
        .map(|_| thread::spawn(move || send_request(addr, "/index.html")))
        .collect();

    for client in clients {
        let response = client.join().unwrap();
        let (head, body) = split_response(&response);
        assert!(head.starts_with("HTTP/1.0 200 OK\r\n"));
        assert_eq!(body.as_bytes(), PAGE);
    }

    // Cada worker registra y suelta la conexión antes de que el cliente vea EOF
    let stats = server.server.queue_stats();
    assert_eq!(stats.count, 0);
    assert_eq!(stats.total_enqueued, 16);
    assert_eq!(stats.total_dequeued, 16);
    assert!(stats.high_water <= 2);
    assert!(!stats.closed);
    assert_eq!(server.server.metrics().served, 16);

    let snapshot = server.stop();
    assert_eq!(snapshot.admitted, 16);
    assert_eq!(snapshot.served, 16);
    assert_eq!(snapshot.io_failures, 0);
}

#[test]
fn test_random_policy_serves_everything() {
    let server = TestServer::start(3, 8, SchedulingPolicy::Random);
    let addr = server.addr;

    let clients: Vec<_> = (0..12)
        .map(|i| {
            let path = if i % 2 == 0 { "/index.html" } else { "/img/logo.gif" };
            thread::spawn(move || send_request(addr, path))
        })
        .collect();

    for client in clients {
        assert!(client.join().unwrap().starts_with("HTTP/1.0 200 OK\r\n"));
    }

    assert_eq!(server.stop().served, 12);
}

#[test]
fn test_client_closing_early_does_not_stop_server() {
    let server = TestServer::start(1, 1, SchedulingPolicy::Fifo);

    drop(TcpStream::connect(server.addr).unwrap());
    let response = send_request(server.addr, "/index.html");
    assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));

    server.stop();
}
