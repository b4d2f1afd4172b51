//! Axum-based HTTP server for the gearbox simulator.
//!
//! Routes:
//! - GET `/` or `/index.html` - serve the configured HTML page from disk
//! - GET `/step?accelerate=&brake=` - advance the simulation by one fixed
//!   0.06 s step and return telemetry
//! - GET `/reset` - return the simulation to speed 0, gear 1
//! - anything else - 404 with an empty body
//!
//! The simulation is request-paced: `/step` always advances by the fixed
//! server dt regardless of wall-clock time between requests. Every response
//! carries `Connection: close`; one request yields exactly one fixed-shape
//! response. The accept loop validates the request line itself before
//! handing the connection to hyper: an unparseable line is answered with a
//! raw `HTTP/1.1 500` and the connection is closed, keeping the
//! 500-on-malformed / 404-on-unknown-route distinction.

use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::TcpListener;
use tower::Service;
use tower_http::cors::{Any, CorsLayer};

use crate::config::WebConfig;
use crate::gearbox::GearboxState;
use crate::parsing::parse_flag_param;

use super::api::TelemetryResponse;
use super::shared::SharedGearbox;

/// Fixed time step for server-driven simulation updates, in seconds.
pub const SERVER_DT: f64 = 0.06;

// ============================================================================
// Route Handlers
// ============================================================================

fn telemetry_response(state: GearboxState) -> Response {
    let body = TelemetryResponse::from(state).to_wire_json();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CONNECTION, "close"),
        ],
        body,
    )
        .into_response()
}

fn not_found_response() -> Response {
    (StatusCode::NOT_FOUND, [(header::CONNECTION, "close")], "").into_response()
}

/// GET /step - advance the simulation by one fixed step
///
/// The stimuli come from the raw query string: a parameter is truthy when
/// its value starts with `1`, `t`, `T`, `y`, or `Y`; absent or anything
/// else means false.
async fn step(
    State(state): State<WebState>,
    RawQuery(query): RawQuery,
) -> Response {
    let query = query.as_deref();
    let accelerating = parse_flag_param(query, "accelerate");
    let braking = parse_flag_param(query, "brake");

    let snapshot = state.gearbox.step(accelerating, braking, SERVER_DT);
    telemetry_response(snapshot)
}

/// GET /reset - return the simulation to its initial state
async fn reset(State(state): State<WebState>) -> Response {
    telemetry_response(state.gearbox.reset())
}

/// GET / - serve the web UI from disk; a missing file folds into 404
async fn index(State(state): State<WebState>) -> Response {
    match tokio::fs::read(state.index_path.as_ref()).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/html; charset=utf-8"),
                (header::CONNECTION, "close"),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => not_found_response(),
    }
}

/// Fallback handler: 404 with an empty body
async fn not_found() -> Response {
    not_found_response()
}

// ============================================================================
// Server Builder
// ============================================================================

/// Router state: the shared engine plus the index page location.
#[derive(Clone)]
struct WebState {
    gearbox: Arc<SharedGearbox>,
    index_path: Arc<str>,
}

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to
    pub addr: SocketAddr,
    /// Path of the HTML page served at `/`
    pub index_path: String,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self::from_config(&WebConfig::default())
    }
}

impl WebServerConfig {
    /// Create from shared WebConfig
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: ([0, 0, 0, 0], config.port).into(),
            index_path: config.index_path.as_str().to_owned(),
            cors_permissive: config.cors_permissive,
        }
    }

    /// Set the bind address
    pub fn with_addr(mut self, addr: impl Into<SocketAddr>) -> Self {
        self.addr = addr.into();
        self
    }
}

/// Build the Axum router with all routes
pub fn build_router(gearbox: Arc<SharedGearbox>, config: &WebServerConfig) -> Router {
    let state = WebState {
        gearbox,
        index_path: config.index_path.as_str().into(),
    };

    // Method-router fallbacks keep non-GET requests on known paths at 404
    // rather than axum's default 405; the protocol only defines GET.
    let mut router = Router::new()
        .route("/", get(index).fallback(not_found))
        .route("/index.html", get(index).fallback(not_found))
        .route("/step", get(step).fallback(not_found))
        .route("/reset", get(reset).fallback(not_found))
        .fallback(not_found)
        .with_state(state);

    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

// ============================================================================
// Connection Serving
// ============================================================================

/// Upper bound on the request line, matching the original receive buffer.
const MAX_REQUEST_LINE: usize = 4096;

const MALFORMED_RESPONSE: &[u8] = b"HTTP/1.1 500 Internal Server Error\r\n\
Content-Length: 0\r\n\
Connection: close\r\n\
\r\n";

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

/// Structured request-line check: `method SP target SP HTTP-version`.
///
/// Anything hyper's parser would reject fails here too (control bytes,
/// missing parts, bad version), so the connection can be answered with 500
/// before the protocol parser ever sees it. A well-formed line with an
/// unknown method or path still reaches the router and maps to 404.
fn request_line_is_malformed(line: &[u8]) -> bool {
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    let mut parts = line.split(|&b| b == b' ');
    let (Some(method), Some(target), Some(version)) = (parts.next(), parts.next(), parts.next())
    else {
        return true;
    };
    if parts.next().is_some() {
        return true;
    }

    method.is_empty()
        || !method.iter().copied().all(is_token_byte)
        || target.is_empty()
        || !target.iter().all(|&b| (0x21..=0x7e).contains(&b))
        || !version.starts_with(b"HTTP/")
}

/// Replays the already-consumed request-line bytes before the live stream.
struct Rewound<S> {
    prefix: Vec<u8>,
    pos: usize,
    inner: S,
}

impl<S: AsyncRead + Unpin> AsyncRead for Rewound<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if this.pos < this.prefix.len() {
            let n = (this.prefix.len() - this.pos).min(buf.remaining());
            buf.put_slice(&this.prefix[this.pos..this.pos + n]);
            this.pos += n;
            return Poll::Ready(Ok(()));
        }
        Pin::new(&mut this.inner).poll_read(cx, buf)
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for Rewound<S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().inner).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

/// Serve one connection: validate the request line, then hand off to hyper.
///
/// A request line that fails the structured parse (or never terminates
/// within [`MAX_REQUEST_LINE`] bytes) is answered with a raw 500 and an
/// empty body; a connection that closes without sending anything is dropped
/// silently. Valid requests are routed normally; the consumed bytes are
/// replayed in front of the stream so hyper sees the full request.
pub async fn serve_connection<S>(mut stream: S, router: Router) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let mut buf = Vec::with_capacity(256);
    let mut chunk = [0u8; 1024];
    let line_end = loop {
        if let Some(pos) = buf.iter().position(|&b| b == b'\n') {
            break Some(pos);
        }
        if buf.len() >= MAX_REQUEST_LINE {
            break None;
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break None; // EOF before the line terminator
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let malformed = match line_end {
        Some(pos) => request_line_is_malformed(&buf[..pos]),
        None if buf.is_empty() => return Ok(()),
        None => true,
    };

    if malformed {
        stream.write_all(MALFORMED_RESPONSE).await?;
        stream.shutdown().await?;
        return Ok(());
    }

    let io = TokioIo::new(Rewound {
        prefix: buf,
        pos: 0,
        inner: stream,
    });
    let service = service_fn(move |request: axum::http::Request<hyper::body::Incoming>| {
        router.clone().call(request)
    });
    http1::Builder::new()
        .half_close(true)
        .serve_connection(io, service)
        .await
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
}

/// Start the web server.
///
/// Resets the engine once before accepting connections and blocks until the
/// process exits. A failed accept is treated as transient and retried after
/// a short pause.
pub async fn run_server(
    gearbox: Arc<SharedGearbox>,
    config: WebServerConfig,
) -> Result<(), std::io::Error> {
    gearbox.reset();
    let router = build_router(gearbox, &config);

    let listener = TcpListener::bind(config.addr).await?;
    println!("Gearbox server listening on http://{}", config.addr);

    loop {
        let (stream, _peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(_) => {
                tokio::time::sleep(Duration::from_millis(10)).await;
                continue;
            }
        };
        let router = router.clone();
        tokio::spawn(async move {
            let _ = serve_connection(stream, router).await;
        });
    }
}
