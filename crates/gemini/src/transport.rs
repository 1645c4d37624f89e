use std::time::Duration;

use grounded_agents_model::{Error, PostRequest, Transport};
use mime::Mime;
use reqwest::{Client, header};

/// A [`Transport`] backed by a `reqwest` client.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport without a request timeout.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport that aborts requests taking longer than
    /// `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build().map_err(|err| {
            Error::transport().with_reason(format!("{}", err.without_url()))
        })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(
        &self,
        req: PostRequest,
    ) -> impl Future<Output = Result<String, Error>> + Send + 'static {
        let resp_fut = self
            .client
            .post(req.url)
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(req.body)
            .send();

        async move {
            // The URL carries the API key, keep it out of error messages.
            let resp = resp_fut.await.map_err(|err| {
                Error::transport().with_reason(format!("{}", err.without_url()))
            })?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(Error::transport()
                    .with_reason(format!("HTTP {status}: {body}")));
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            let is_json = content_type
                .as_deref()
                .and_then(|v| v.parse().ok())
                .map(|m: Mime| m.subtype() == mime::JSON)
                .unwrap_or(true);
            if !is_json {
                return Err(Error::response_shape().with_reason(format!(
                    "unexpected content type: {content_type:?}"
                )));
            }

            resp.text().await.map_err(|err| {
                Error::transport().with_reason(format!("{}", err.without_url()))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use grounded_agents_model::ErrorKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    const KEY: &str = "secret-key";

    fn transport() -> HttpTransport {
        HttpTransport {
            client: Client::builder().no_proxy().build().unwrap(),
        }
    }

    fn post(url: String) -> PostRequest {
        PostRequest {
            url,
            body: r#"{"contents":[]}"#.to_owned(),
        }
    }

    /// Serves `response` to the first connection and returns the URL to
    /// post to.
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let Some(end) =
                    request.windows(4).position(|w| w == b"\r\n\r\n")
                else {
                    continue;
                };
                let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                let len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + len {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}/models/m:generateContent?key={KEY}")
    }

    fn http_response(status: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[tokio::test]
    async fn test_success() {
        let url = serve_once(http_response(
            "200 OK",
            "application/json; charset=UTF-8",
            r#"{"candidates":[]}"#,
        ))
        .await;
        let body = transport().post_json(post(url)).await.unwrap();
        assert_eq!(body, r#"{"candidates":[]}"#);
    }

    #[tokio::test]
    async fn test_error_status() {
        let url = serve_once(http_response(
            "500 Internal Server Error",
            "application/json",
            r#"{"e":"x"}"#,
        ))
        .await;
        let err = transport().post_json(post(url)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.reason(), r#"HTTP 500 Internal Server Error: {"e":"x"}"#);
    }

    #[tokio::test]
    async fn test_unexpected_content_type() {
        let url = serve_once(http_response("200 OK", "text/html", "oops")).await;
        let err = transport().post_json(post(url)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseShape);
        assert!(err.reason().contains("text/html"));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{addr}/models/m:generateContent?key={KEY}");
        let err = transport().post_json(post(url)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(!err.to_string().contains(KEY), "{err}");
    }
}
