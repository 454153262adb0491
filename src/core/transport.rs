//! HTTP transport — the only piece that talks to the network.
//!
//! The [`Transport`] trait is deliberately blocking: requests run on a
//! background thread (see `app::fetch_runtime`) and their results are handed
//! back to the event loop over a channel.

use std::io;
use std::time::Duration;

use url::Url;

use super::error::FetchError;

/// Default service root, matching the reference backend's `app.run(port=5000)`.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// A validated service root.  Endpoint URLs are built from its path segments,
/// so ids are percent-encoded by the `url` crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrl {
    base: Url,
}

impl ServiceUrl {
    pub fn parse(base: &str) -> Result<Self, FetchError> {
        let bad = |message: String| FetchError::BadUrl {
            url: base.to_string(),
            message,
        };
        let url = Url::parse(base).map_err(|err| bad(err.to_string()))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(bad("expected an http(s) service root".into()));
        }
        Ok(Self { base: url })
    }

    /// `{base}/dataframes`
    pub fn dataframes(&self) -> String {
        self.endpoint(&["dataframes"])
    }

    /// `{base}/dataframe/{id}/columns`
    pub fn columns(&self, id: &str) -> String {
        self.endpoint(&["dataframe", id, "columns"])
    }

    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        // Only fails for cannot-be-a-base URLs, which `parse` rejects.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }
}

/// Something that can perform a bare `GET` and hand back the body bytes.
///
/// Non-success statuses must be reported as [`FetchError::Status`].
pub trait Transport: Send + Sync + 'static {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Production transport backed by a shared [`ureq::Agent`].
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Build a transport.  `timeout` of `None` means the request may wait
    /// indefinitely.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .build()
            .into();
        Self { agent }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::debug!("GET {url}");
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|err| map_ureq_error(url, err))?;
        response
            .body_mut()
            .read_to_vec()
            .map_err(|err| map_ureq_error(url, err))
    }
}

fn map_ureq_error(url: &str, err: ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(status) => FetchError::Status {
            url: url.to_string(),
            status,
        },
        ureq::Error::Timeout(_) => FetchError::Timeout {
            url: url.to_string(),
        },
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => FetchError::Connect {
            url: url.to_string(),
            message: err.to_string(),
        },
        ureq::Error::Io(io_err) => match io_err.kind() {
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::AddrNotAvailable => FetchError::Connect {
                url: url.to_string(),
                message: io_err.to_string(),
            },
            io::ErrorKind::TimedOut => FetchError::Timeout {
                url: url.to_string(),
            },
            _ => FetchError::Transport(io_err.to_string()),
        },
        other => FetchError::Transport(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    /// Serve exactly one HTTP response on a random local port and report the
    /// request head that was received.
    fn one_shot_server(status_line: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 512];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let _ = tx.send(String::from_utf8_lossy(&head).into_owned());
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        });

        (base, rx)
    }

    fn service(base: &str) -> ServiceUrl {
        ServiceUrl::parse(base).unwrap()
    }

    #[test]
    fn urls_are_built_from_the_base() {
        assert_eq!(service(DEFAULT_BASE_URL).dataframes(), "http://localhost:5000/dataframes");
        assert_eq!(service("http://h:1/").dataframes(), "http://h:1/dataframes");
        assert_eq!(service("http://h:1/api").dataframes(), "http://h:1/api/dataframes");
        assert_eq!(service("http://h:1").columns("df1"), "http://h:1/dataframe/df1/columns");
        assert_eq!(service("http://h:1").columns("a b/c"), "http://h:1/dataframe/a%20b%2Fc/columns");
    }

    #[test]
    fn bad_service_roots_are_rejected_up_front() {
        for base in ["localhost:5000", "not a url", "mailto:x@y", "ftp://h/"] {
            let err = ServiceUrl::parse(base).unwrap_err();
            assert!(matches!(err, FetchError::BadUrl { .. }), "{base}: {err:?}");
        }
    }

    #[test]
    fn get_returns_body_of_bare_request() {
        let (base, seen) = one_shot_server("200 OK", r#"[{"id":1},{"id":2}]"#);
        let transport = HttpTransport::new(Some(Duration::from_secs(5)));

        let body = transport.get(&service(&base).dataframes()).unwrap();
        assert_eq!(body, br#"[{"id":1},{"id":2}]"#);

        let head = seen.recv().unwrap();
        assert!(head.starts_with("GET /dataframes HTTP/1.1\r\n"), "{head}");
        assert!(!head.to_ascii_lowercase().contains("authorization"));
    }

    #[test]
    fn server_error_maps_to_status() {
        let (base, _seen) = one_shot_server("500 Internal Server Error", "{}");
        let transport = HttpTransport::new(Some(Duration::from_secs(5)));

        let err = transport.get(&service(&base).dataframes()).unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }), "{err:?}");
    }

    #[test]
    fn refused_connection_is_an_error_not_a_panic() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let transport = HttpTransport::new(Some(Duration::from_secs(5)));

        let err = transport.get(&format!("http://{addr}/dataframes")).unwrap_err();
        assert!(
            matches!(err, FetchError::Connect { .. } | FetchError::Transport(_)),
            "{err:?}"
        );
    }
}
