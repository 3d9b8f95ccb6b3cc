//! End-to-end tests for HTTP Signature verification.
//!
//! Each test starts an in-process hyper server on a loopback port. The server
//! parses and verifies the signature on every request and answers with JSON:
//! `200 {"verified": bool, "params": {...}}` when the header could be checked,
//! `401 {"error": "<kind>", "message": "..."}` otherwise.
//!
//! Run them with:
//! ```text
//! cargo test -p httpsig-integration
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Once};

use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::Utc;
use http::header::{CONTENT_TYPE, DATE, HOST};
use http::{HeaderValue, Method, Request, Response, StatusCode};
use http_body_util::Full;
use httpsig_auth::{
    AuthError, KeyProvider, RequestSigner, SignatureParams, StaticKeyProvider, VerifierConfig,
    format_http_date, parse_request, verify,
};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// RSA private key used by signing clients.
pub const RSA_PRIVATE_PEM: &str =
    include_str!("../../../crates/httpsig-auth/testdata/rsa_private.pem");
/// Public half of [`RSA_PRIVATE_PEM`].
pub const RSA_PUBLIC_PEM: &str =
    include_str!("../../../crates/httpsig-auth/testdata/rsa_public.pem");
/// An unrelated RSA public key.
pub const OTHER_RSA_PUBLIC_PEM: &str =
    include_str!("../../../crates/httpsig-auth/testdata/other_rsa_public.pem");
/// DSA private key used by signing clients.
pub const DSA_PRIVATE_PEM: &str =
    include_str!("../../../crates/httpsig-auth/testdata/dsa_private.pem");
/// Public half of [`DSA_PRIVATE_PEM`].
pub const DSA_PUBLIC_PEM: &str =
    include_str!("../../../crates/httpsig-auth/testdata/dsa_public.pem");

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Server-side verification state shared by every connection.
#[derive(Debug)]
struct SignatureGate {
    provider: StaticKeyProvider,
    config: VerifierConfig,
}

impl SignatureGate {
    fn check<B>(&self, request: &Request<B>) -> Result<(SignatureParams, bool), AuthError> {
        let params = parse_request(request, &self.config)?;
        let key = self.provider.get_key(&params.key_id)?;
        let verified = verify(&params, &key)?;
        Ok((params, verified))
    }

    fn handle<B>(&self, request: &Request<B>) -> Response<Full<Bytes>> {
        match self.check(request) {
            Ok((params, verified)) => {
                debug!(key_id = %params.key_id, verified, "Checked signed request");
                json_response(
                    StatusCode::OK,
                    &serde_json::json!({ "verified": verified, "params": params }),
                )
            }
            Err(e) => {
                debug!(kind = e.kind(), error = %e, "Rejected request");
                json_response(
                    StatusCode::UNAUTHORIZED,
                    &serde_json::json!({ "error": e.kind(), "message": e.to_string() }),
                )
            }
        }
    }
}

fn json_response(status: StatusCode, body: &serde_json::Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// A loopback server that verifies HTTP signatures. Stops when dropped.
#[derive(Debug)]
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server that resolves keys through `provider`.
    pub async fn start(provider: StaticKeyProvider, config: VerifierConfig) -> Result<Self> {
        init_tracing();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("cannot bind loopback listener")?;
        let addr = listener.local_addr()?;
        let gate = Arc::new(SignatureGate { provider, config });
        let handle = tokio::spawn(serve(listener, gate));

        Ok(Self { addr, handle })
    }

    /// The `host:port` the server listens on, as a client sends it in `Host`.
    #[must_use]
    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    /// Absolute URL for `path_and_query`.
    #[must_use]
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{path_and_query}", self.addr)
    }

    /// A request as the server will see it: `Host` and a current `Date` set.
    pub fn request(&self, method: Method, path_and_query: &str) -> Result<Request<()>> {
        Request::builder()
            .method(method)
            .uri(path_and_query)
            .header(HOST, self.host())
            .header(DATE, format_http_date(Utc::now()))
            .body(())
            .context("invalid test request")
    }

    /// Sign `request` with `signer` and send it. Returns the status and body.
    pub async fn send_signed(
        &self,
        mut request: Request<()>,
        signer: &RequestSigner,
    ) -> Result<(StatusCode, serde_json::Value)> {
        let authorization = signer
            .authorization_header(&request)
            .context("cannot sign request")?;
        request
            .headers_mut()
            .insert(http::header::AUTHORIZATION, authorization.parse()?);
        self.send(request).await
    }

    /// Send `request` as-is. Returns the status and body.
    pub async fn send(&self, request: Request<()>) -> Result<(StatusCode, serde_json::Value)> {
        let (parts, ()) = request.into_parts();
        let path = parts
            .uri
            .path_and_query()
            .map_or("/", http::uri::PathAndQuery::as_str);

        let response = reqwest::Client::new()
            .request(parts.method.clone(), self.url(path))
            .headers(parts.headers)
            .send()
            .await
            .context("request to test server failed")?;

        let status = response.status();
        let body = response.json().await.context("response is not JSON")?;
        Ok((status, body))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Run the accept loop until the task is aborted.
async fn serve(listener: TcpListener, gate: Arc<SignatureGate>) {
    let http = HttpConnBuilder::new(TokioExecutor::new());

    loop {
        let (stream, peer_addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "failed to accept connection");
                continue;
            }
        };

        let gate = Arc::clone(&gate);
        let svc = service_fn(move |request| {
            let gate = Arc::clone(&gate);
            async move { Ok::<_, Infallible>(gate.handle(&request)) }
        });
        let conn = http.serve_connection(TokioIo::new(stream), svc).into_owned();

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                error!(peer_addr = %peer_addr, error = %e, "connection error");
            }
        });
    }
}

mod test_keys;
