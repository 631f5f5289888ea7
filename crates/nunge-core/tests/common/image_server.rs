//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed responses per request path and counts GETs per path.
//! Unknown paths get 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
struct Route {
    status: u16,
    body: Vec<u8>,
    location: Option<String>,
}

#[derive(Clone, Default)]
pub struct ImageServerBuilder {
    routes: HashMap<String, Route>,
}

impl ImageServerBuilder {
    pub fn route(mut self, path: &str, status: u16, body: &[u8]) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                status,
                body: body.to_vec(),
                location: None,
            },
        );
        self
    }

    /// Answer `path` with `302 Found` pointing at `location`.
    pub fn redirect(mut self, path: &str, location: &str) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                status: 302,
                body: Vec::new(),
                location: Some(location.to_string()),
            },
        );
        self
    }

    /// Starts the server in a background thread. It runs until the process exits.
    pub fn start(self) -> ImageServer {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes = Arc::new(self.routes);
        let hits: Arc<Mutex<HashMap<String, usize>>> = Arc::default();
        let hits_srv = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&hits_srv);
                thread::spawn(move || handle(stream, &routes, &hits));
            }
        });
        ImageServer {
            base_url: format!("http://127.0.0.1:{}", port),
            hits,
        }
    }
}

pub struct ImageServer {
    base_url: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl ImageServer {
    pub fn builder() -> ImageServerBuilder {
        ImageServerBuilder::default()
    }

    /// Absolute URL for `path` (which starts with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/").to_string();
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    *hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    let (status, body, location) = match routes.get(&path) {
        Some(r) => (r.status, r.body.as_slice(), r.location.as_deref()),
        None => (404, &b"not found"[..], None),
    };
    let location = location
        .map(|l| format!("Location: {}\r\n", l))
        .unwrap_or_default();
    let head = format!(
        "HTTP/1.1 {} {}\r\n{}Content-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        location,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}
