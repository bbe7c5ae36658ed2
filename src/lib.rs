//! Minimal HTTP/1.1 server
//!
//! One request per TCP connection: read, parse, route, write, close.

pub mod config;
pub mod http;
pub mod routing;
pub mod server;
pub mod store;
