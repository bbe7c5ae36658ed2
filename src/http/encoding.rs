//! Response content negotiation.
//!
//! Picks the first encoding from the client's `Accept-Encoding` list that the
//! server supports. The client's order wins; quality values are not
//! interpreted, so `gzip;q=0` is simply an unknown token.

use std::io::Write;

use anyhow::Context;
use flate2::Compression;
use flate2::write::GzEncoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Gzip,
}

/// Encodings the server can produce.
pub const SUPPORTED_ENCODINGS: &[Encoding] = &[Encoding::Gzip];

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Gzip => "gzip",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        SUPPORTED_ENCODINGS
            .iter()
            .copied()
            .find(|encoding| encoding.as_str() == token)
    }

    /// Compresses `body` with this encoding.
    pub fn compress(&self, body: &[u8]) -> anyhow::Result<Vec<u8>> {
        match self {
            Encoding::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder
                    .write_all(body)
                    .context("failed to write to gzip encoder")?;
                encoder.finish().context("failed to finish gzip stream")
            }
        }
    }
}

/// Chooses a response encoding from a raw `Accept-Encoding` value.
///
/// Returns `None` when the header is absent or lists nothing supported.
pub fn negotiate(accept_encoding: Option<&str>) -> Option<Encoding> {
    accept_encoding?
        .split(',')
        .map(str::trim)
        .find_map(Encoding::from_token)
}
