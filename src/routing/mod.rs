//! Request routing
//!
//! Maps a parsed request onto one of the built-in handlers using an ordered
//! table of (method, path matcher, handler) entries.

pub mod handlers;
pub mod router;

pub use router::{Handler, PathMatch, Resolution, Route, Router};

use crate::http::request::Request;
use crate::http::response::Response;
use crate::store::FileStore;

/// Resolves `req` against `router` and runs the selected handler.
pub async fn dispatch<F: FileStore>(
    router: &Router,
    req: &Request,
    store: &F,
) -> anyhow::Result<Response> {
    match router.resolve(&req.method, &req.path) {
        Resolution::Matched { handler, param } => {
            tracing::debug!(
                method = %req.method,
                path = %req.path,
                handler = ?handler,
                "Routing request"
            );
            handlers::handle(handler, param, req, store).await
        }
        Resolution::MethodNotAllowed => {
            tracing::debug!(method = %req.method, path = %req.path, "Method not allowed");
            Ok(Response::method_not_allowed())
        }
    }
}
