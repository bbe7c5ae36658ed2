//! HTTP protocol implementation.
//!
//! Every connection serves exactly one request and is closed afterwards.
//!
//! # Architecture
//!
//! - **`connection`**: drives a single read → parse → route → write cycle
//! - **`parser`**: turns the bytes of one read into a [`request::Request`]
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: serializes a response and writes it in one call
//! - **`encoding`**: `Accept-Encoding` negotiation and gzip compression
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One read into a fixed-size buffer
//!        └──────┬──────┘
//!               │ Request parsed
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route and run the handler
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               ▼
//!             Closed          ← Stream shut down on every path
//! ```
//!
//! A parse error skips straight to `Closed` without writing anything.

pub mod connection;
pub mod encoding;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
