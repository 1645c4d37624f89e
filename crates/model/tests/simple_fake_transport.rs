use std::future::ready;

use grounded_agents_model::{
    CredentialProvider, Error, ErrorKind, PostRequest, StaticCredential,
    Transport,
};

struct FakeTransport;

impl Transport for FakeTransport {
    fn post_json(
        &self,
        req: PostRequest,
    ) -> impl Future<Output = Result<String, Error>> + Send + 'static {
        let result = 'blk: {
            if req.body.is_empty() {
                break 'blk Err(Error::transport().with_reason("HTTP 400"));
            }
            Ok(format!("{} <- {}", req.url, req.body))
        };
        ready(result)
    }
}

struct MissingCredential;

impl CredentialProvider for MissingCredential {
    fn api_key(&self) -> Result<String, Error> {
        Err(Error::credential())
    }
}

async fn call(
    transport: &impl Transport,
    credential: &impl CredentialProvider,
    body: &str,
) -> Result<String, Error> {
    let key = credential.api_key()?;
    transport
        .post_json(PostRequest {
            url: format!("https://example.com?key={key}"),
            body: body.to_owned(),
        })
        .await
}

mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let resp = call(&FakeTransport, &StaticCredential::new("k"), "{}")
            .await
            .unwrap();
        assert_eq!(resp, "https://example.com?key=k <- {}");
    }

    #[tokio::test]
    async fn test_transport_error() {
        let err = call(&FakeTransport, &StaticCredential::new("k"), "")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.reason(), "HTTP 400");
    }

    #[tokio::test]
    async fn test_credential_error() {
        let err = call(&FakeTransport, &MissingCredential, "{}")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Credential);
    }
}
