use std::collections::HashMap;

/// Status lines the server can emit.
///
/// Each variant maps to the exact text written after `HTTP/1.1 `:
/// - `Ok`: `200 OK`
/// - `Created`: `201 Created`
/// - `NotFound`: `404 Not Found`
/// - `MethodNotAllowed`: `405 Method not allowed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 404 Not Found
    NotFound,
    /// 405 Method not allowed
    MethodNotAllowed,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use http_server::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
        }
    }

    /// The status payload written verbatim on the status line.
    ///
    /// # Example
    ///
    /// ```
    /// # use http_server::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_str(), "200 OK");
    /// assert_eq!(StatusCode::MethodNotAllowed.as_str(), "405 Method not allowed");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Ok => "200 OK",
            StatusCode::Created => "201 Created",
            StatusCode::NotFound => "404 Not Found",
            StatusCode::MethodNotAllowed => "405 Method not allowed",
        }
    }
}

/// A response produced by a handler.
///
/// Serialized and written once, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The status line payload
    pub status: StatusCode,
    /// HTTP headers as key-value pairs; emission order is unspecified
    pub headers: HashMap<String, String>,
    /// Response body as bytes, possibly compressed
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// Unlike many builders nothing is added implicitly: a response without
/// explicit headers goes out with an empty header block.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body(b"hi".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the body together with a matching `Content-Length` header.
    pub fn sized_body(self, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        self.header("Content-Length", body.len().to_string()).body(body)
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// A bodiless, headerless response with the given status.
    pub fn empty(status: StatusCode) -> Self {
        ResponseBuilder::new(status).build()
    }

    /// 200 OK with no headers and no body.
    pub fn ok() -> Self {
        Self::empty(StatusCode::Ok)
    }

    pub fn created() -> Self {
        Self::empty(StatusCode::Created)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::empty(StatusCode::NotFound)
    }

    pub fn method_not_allowed() -> Self {
        Self::empty(StatusCode::MethodNotAllowed)
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }
}
