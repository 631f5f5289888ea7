//! libcurl-backed transport (one Easy handle per request).

use std::io::{self, Write};
use std::time::Duration;

use super::{Transport, TransportError};
use crate::config::NungeConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct CurlTransport {
    connect_timeout: Option<Duration>,
    timeout: Option<Duration>,
}

impl CurlTransport {
    /// No timeouts: a stalled server stalls only its own image.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeouts(connect_timeout: Option<Duration>, timeout: Option<Duration>) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(cfg: &NungeConfig) -> Self {
        Self::with_timeouts(
            cfg.connect_timeout_secs.map(Duration::from_secs),
            cfg.timeout_secs.map(Duration::from_secs),
        )
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &str, sink: &mut dyn Write) -> Result<u32, TransportError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        // Redirects are not followed: a 3xx is reported as its own status.
        easy.follow_location(false)?;
        easy.useragent(concat!("nunge/", env!("CARGO_PKG_VERSION")))?;
        if let Some(t) = self.connect_timeout {
            easy.connect_timeout(t)?;
        }
        if let Some(t) = self.timeout {
            easy.timeout(t)?;
        }

        let mut sink_error: Option<io::Error> = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match sink.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    sink_error = Some(e);
                    // Short count makes libcurl abort the transfer.
                    Ok(0)
                }
            })?;
            transfer.perform()
        };
        if let Some(e) = sink_error {
            return Err(TransportError::Sink(e));
        }
        performed?;

        Ok(easy.response_code()?)
    }
}
