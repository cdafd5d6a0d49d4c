//! HTTP POST sink.

use async_trait::async_trait;
use reqwest::Client;
use rp_error::SinkError;
use rp_traits::Sink;
use std::time::Duration;
use tracing::trace;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sink that POSTs each payload as `application/json` to a fixed URL.
///
/// Any transport failure or non-2xx response is a [`SinkError`]; the
/// response body is drained and discarded.
pub struct HttpSink {
    client: Client,
    target_url: String,
}

impl HttpSink {
    /// Creates a sink posting to `target_url`.
    pub fn new(target_url: impl Into<String>) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|error| SinkError::Transport(error.to_string()))?;
        Ok(Self {
            client,
            target_url: target_url.into(),
        })
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }
}

#[async_trait]
impl Sink for HttpSink {
    async fn send(&self, payload: &[u8]) -> Result<(), SinkError> {
        let response = self
            .client
            .post(&self.target_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|error| SinkError::Transport(error.to_string()))?;

        let status = response.status();

        // Drain the body so the connection can be reused.
        response
            .bytes()
            .await
            .map_err(|error| SinkError::Transport(error.to_string()))?;

        if !status.is_success() {
            return Err(SinkError::Status(status.as_u16()));
        }

        trace!(url = %self.target_url, bytes = payload.len(), "document posted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// One-shot HTTP server answering every request with a canned
    /// status line.
    fn serve_once(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(
                    format!("{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                        .as_bytes(),
                );
            }
        });
        format!("http://{addr}/ingest")
    }

    #[tokio::test]
    async fn ok_response_is_success() {
        let url = serve_once("HTTP/1.1 200 OK");
        let sink = HttpSink::new(url.clone()).unwrap();
        assert_eq!(sink.target_url(), url);
        sink.send(br#"{"a":"1"}"#).await.unwrap();
    }

    #[tokio::test]
    async fn non_2xx_maps_to_status_error() {
        let url = serve_once("HTTP/1.1 503 Service Unavailable");
        let sink = HttpSink::new(url).unwrap();
        match sink.send(br#"{"a":"1"}"#).await {
            Err(SinkError::Status(503)) => {}
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_maps_to_transport_error() {
        // Bind then drop a listener to get a port nothing listens on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let sink = HttpSink::new(format!("http://127.0.0.1:{port}/ingest")).unwrap();
        let result = sink.send(b"{}").await;
        assert!(matches!(result, Err(SinkError::Transport(_))));
    }
}
