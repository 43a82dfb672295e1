//! Mock HTTP server.

mod handler;
pub mod response;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

pub use handler::handle_request;

use crate::generator::ResponseGenerator;
use crate::routing::Router;

/// Shared, read-only state for all connections
#[derive(Debug)]
pub struct ServerState {
    pub router: Router,
    pub generator: ResponseGenerator,
    pub health_path: String,
}

/// Serves mocked responses for every operation in a specification
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
}

impl MockServer {
    pub fn new(addr: SocketAddr, state: ServerState) -> Self {
        Self {
            addr,
            state: Arc::new(state),
        }
    }

    /// Bind the configured address and serve until the task is dropped
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<(), anyhow::Error> {
        info!(
            "Specmock serving {} operations on http://{} ({:?} responses)",
            self.state.router.operation_count(),
            listener.local_addr()?,
            self.state.generator.policy()
        );

        loop {
            let (stream, _) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let state = Arc::clone(&self.state);

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let state = Arc::clone(&state);
                    async move { handle_request(req, state).await }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!("Connection error: {}", e);
                }
            });
        }
    }
}
