use anyhow::Context;
use tracing::{debug, warn};

use crate::http::encoding::{self, Encoding};
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::routing::router::Handler;
use crate::store::FileStore;

/// Runs `handler` for `req`.
///
/// `param` is the path remainder after the route's prefix (echo text or file
/// name). Only compression can fail; file-store errors become 404.
pub async fn handle<F: FileStore>(
    handler: Handler,
    param: &str,
    req: &Request,
    store: &F,
) -> anyhow::Result<Response> {
    match handler {
        Handler::Root => Ok(root()),
        Handler::Echo => echo(param, encoding::negotiate(req.accept_encoding())),
        Handler::UserAgent => Ok(user_agent(req)),
        Handler::FileGet => Ok(get_file(param, store).await),
        Handler::FilePost => Ok(post_file(param, &req.body, store).await),
        Handler::NotFound => Ok(not_found()),
    }
}

pub fn root() -> Response {
    Response::ok()
}

pub fn not_found() -> Response {
    Response::not_found()
}

pub fn echo(text: &str, encoding: Option<Encoding>) -> anyhow::Result<Response> {
    let builder = ResponseBuilder::new(StatusCode::Ok).header("Content-Type", "text/plain");

    let response = match encoding {
        Some(encoding) => {
            let compressed = encoding
                .compress(text.as_bytes())
                .with_context(|| format!("{} compression failed", encoding.as_str()))?;
            builder
                .header("Content-Encoding", encoding.as_str())
                .sized_body(compressed)
        }
        None => builder.sized_body(text),
    };

    Ok(response.build())
}

pub fn user_agent(req: &Request) -> Response {
    ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .sized_body(req.user_agent())
        .build()
}

pub async fn get_file<F: FileStore>(name: &str, store: &F) -> Response {
    match store.read(name).await {
        Ok(contents) => ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "application/octet-stream")
            .sized_body(contents)
            .build(),
        Err(e) => {
            warn!(file = name, error = %e, "File read failed, answering 404");
            not_found()
        }
    }
}

pub async fn post_file<F: FileStore>(name: &str, contents: &[u8], store: &F) -> Response {
    match store.write(name, contents).await {
        Ok(()) => {
            debug!(file = name, bytes = contents.len(), "File written");
            Response::created()
        }
        Err(e) => {
            warn!(file = name, error = %e, "File write failed, answering 404");
            not_found()
        }
    }
}
