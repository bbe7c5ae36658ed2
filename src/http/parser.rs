use crate::http::request::{Method, Request};
use std::collections::HashMap;
use thiserror::Error;

const CRLF: &[u8] = b"\r\n";
const HEADER_SEPARATOR: &str = ": ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty request")]
    EmptyRequest,

    #[error("invalid request line format")]
    MalformedRequestLine,
}

/// Parses the bytes of a single read into a [`Request`].
///
/// The input is split on CRLF. The first line must hold at least three
/// space-separated tokens; the following lines up to the first blank one are
/// headers (lines without `": "` are skipped). The body is every line after
/// `headers.len() + 2`, joined back together with CRLF.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    if buf.is_empty() {
        return Err(ParseError::EmptyRequest);
    }

    let lines = split_lines(buf);

    // Request line
    let request_line = lines.first().ok_or(ParseError::EmptyRequest)?;
    let request_line = String::from_utf8_lossy(request_line);
    let (method, path, version) = parse_request_line(&request_line)?;

    // Headers
    let headers = parse_headers(&lines[1..]);

    // Body
    let body_start = headers.len() + 2;
    let body = lines
        .get(body_start..)
        .map(|rest| rest.join(CRLF))
        .unwrap_or_default();

    Ok(Request {
        method: Method::from_token(method),
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body,
    })
}

fn parse_request_line(line: &str) -> Result<(&str, &str, &str), ParseError> {
    let mut parts = line.split(' ');

    let method = parts.next().filter(|s| !s.is_empty());
    let path = parts.next().filter(|s| !s.is_empty());
    let version = parts.next().filter(|s| !s.is_empty());

    match (method, path, version) {
        (Some(method), Some(path), Some(version)) => Ok((method, path, version)),
        _ => Err(ParseError::MalformedRequestLine),
    }
}

/// Bytes that are not UTF-8 are replaced with U+FFFD rather than rejected.
fn parse_headers(lines: &[&[u8]]) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    for line in lines {
        if line.is_empty() {
            break;
        }

        let line = String::from_utf8_lossy(line);

        if let Some((key, value)) = line.split_once(HEADER_SEPARATOR) {
            headers.insert(key.to_string(), value.to_string());
        }
    }

    headers
}

fn split_lines(buf: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut rest = buf;

    while let Some(pos) = rest.windows(CRLF.len()).position(|w| w == CRLF) {
        lines.push(&rest[..pos]);
        rest = &rest[pos + CRLF.len()..];
    }
    lines.push(rest);

    lines
}
