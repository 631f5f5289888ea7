//! Map fetch errors onto retry `ErrorKind`s.

use super::policy::ErrorKind;
use crate::fetcher::DownloadError;
use crate::transport::TransportError;

pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

pub fn classify(e: &DownloadError) -> ErrorKind {
    match e {
        DownloadError::HttpStatus(code) => classify_http_status(*code),
        DownloadError::Transport(TransportError::Curl(ce)) => classify_curl_error(ce),
        DownloadError::Transport(TransportError::Connection(_)) => ErrorKind::Connection,
        DownloadError::Transport(TransportError::Sink(_))
        | DownloadError::InvalidFilename(_)
        | DownloadError::UnsupportedUrl(_)
        | DownloadError::Storage(_)
        | DownloadError::Task(_) => ErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_429_and_503_throttled() {
        assert_eq!(classify_http_status(429), ErrorKind::Throttled);
        assert_eq!(classify_http_status(503), ErrorKind::Throttled);
    }

    #[test]
    fn http_5xx_retryable() {
        assert_eq!(classify_http_status(500), ErrorKind::Http5xx(500));
        assert_eq!(classify_http_status(504), ErrorKind::Http5xx(504));
    }

    #[test]
    fn http_4xx_and_redirects_other() {
        assert_eq!(classify_http_status(404), ErrorKind::Other);
        assert_eq!(classify_http_status(403), ErrorKind::Other);
        assert_eq!(classify_http_status(304), ErrorKind::Other);
    }

    #[test]
    fn download_errors() {
        assert_eq!(
            classify(&DownloadError::Transport(TransportError::Connection(
                "refused".into()
            ))),
            ErrorKind::Connection
        );
        assert_eq!(
            // CURLE_OPERATION_TIMEDOUT
            classify(&DownloadError::Transport(TransportError::Curl(
                curl::Error::new(28)
            ))),
            ErrorKind::Timeout
        );
        assert_eq!(
            classify(&DownloadError::InvalidFilename("..".into())),
            ErrorKind::Other
        );
        assert_eq!(classify(&DownloadError::HttpStatus(503)), ErrorKind::Throttled);
    }
}
