//! In-memory transport for tests: canned responses per URL, call counting,
//! and in-flight tracking.

use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{Transport, TransportError};

#[derive(Debug, Clone)]
pub enum MockResponse {
    Body { status: u32, body: Vec<u8> },
    ConnectionError(String),
    /// Write `partial` to the sink, then panic mid-transfer.
    Panic { partial: Vec<u8> },
}

#[derive(Debug, Default)]
pub struct MockTransport {
    routes: HashMap<String, MockResponse>,
    delay: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
    total_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u32, body: &[u8]) -> Self {
        self.routes.insert(
            url.to_string(),
            MockResponse::Body {
                status,
                body: body.to_vec(),
            },
        );
        self
    }

    pub fn fail(mut self, url: &str, message: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            MockResponse::ConnectionError(message.to_string()),
        );
        self
    }

    pub fn panic_after(mut self, url: &str, partial: &[u8]) -> Self {
        self.routes.insert(
            url.to_string(),
            MockResponse::Panic {
                partial: partial.to_vec(),
            },
        );
        self
    }

    /// Block each request for `delay` so overlapping requests can be observed.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.calls
            .lock()
            .map(|c| c.get(url).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Highest number of requests observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, sink: &mut dyn Write) -> Result<u32, TransportError> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(url.to_string()).or_insert(0) += 1;
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(d) = self.delay {
            std::thread::sleep(d);
        }
        let res = match self.routes.get(url) {
            Some(MockResponse::Body { status, body }) => sink
                .write_all(body)
                .map(|()| *status)
                .map_err(TransportError::Sink),
            Some(MockResponse::ConnectionError(msg)) => {
                Err(TransportError::Connection(msg.clone()))
            }
            Some(MockResponse::Panic { partial }) => {
                let _ = sink.write_all(partial);
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                panic!("transport panicked while fetching {url}");
            }
            None => Err(TransportError::Connection(format!("no route for {url}"))),
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        res
    }
}
