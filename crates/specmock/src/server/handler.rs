//! Request handling for the mock server.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, warn};

use super::response::{error_response, json_response, mock_response};
use super::ServerState;
use crate::routing::RouteError;

pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<ServerState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(respond(&req, &state))
}

pub(crate) fn respond<B>(req: &Request<B>, state: &ServerState) -> Response<Full<Bytes>> {
    let method = req.method();
    let path = req.uri().path();
    debug!("{} {}", method, path);

    if method == Method::GET && path == state.health_path {
        return json_response(StatusCode::OK, &serde_json::json!({"status": "ok"}));
    }

    let route = match state.router.find(method, path) {
        Ok(route) => {
            debug!("{} {} matched {} {:?}", method, path, route.path, route.params);
            route
        }
        Err(e) => {
            debug!("{} {}: {}", method, path, e);
            let status = match e {
                RouteError::NotFound(_) => StatusCode::NOT_FOUND,
                RouteError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
                RouteError::InvalidTemplate { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            return error_response(status, &e.to_string());
        }
    };

    match state.generator.generate_response(req, &route) {
        Ok(response) => {
            debug!(
                "{} {} -> {} ({} bytes)",
                method,
                path,
                response.status_code,
                response.body.len()
            );
            mock_response(response)
        }
        Err(e) => {
            let status = e.status_code();
            warn!("{} {} -> {}: {}", method, path, status, e);
            error_response(status, &e.to_string())
        }
    }
}
