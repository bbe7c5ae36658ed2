//! Drives whole connections over in-memory pipes and real sockets.

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use flate2::read::GzDecoder;
use http_server::http::connection::{Connection, ConnectionState};
use http_server::routing::Router;
use http_server::server::listener;
use http_server::store::{DiskStore, MemoryStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Sends `request` through a fresh connection and returns what came back
/// together with the connection's result.
async fn exchange(
    request: &[u8],
    store: Arc<MemoryStore>,
    buffer_size: usize,
) -> (Vec<u8>, anyhow::Result<()>) {
    let (mut client, server) = tokio::io::duplex(64 * 1024);

    let task = tokio::spawn(async move {
        let mut conn = Connection::new(server, Arc::new(Router::default()), store)
            .with_buffer_size(buffer_size);
        let result = conn.run().await;
        assert!(matches!(conn.state(), ConnectionState::Closed));
        result
    });

    client.write_all(request).await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();

    (response, task.await.unwrap())
}

fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
    let pos = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("header terminator");
    (
        String::from_utf8(raw[..pos].to_vec()).unwrap(),
        raw[pos + 4..].to_vec(),
    )
}

#[tokio::test]
async fn test_root_response_bytes() {
    let (response, result) = exchange(
        b"GET / HTTP/1.1\r\nHost: localhost:4221\r\n\r\n",
        Arc::new(MemoryStore::new()),
        4096,
    )
    .await;

    result.unwrap();
    assert_eq!(response, b"HTTP/1.1 200 OK\r\n\r\n".to_vec());
}

#[tokio::test]
async fn test_echo_over_connection() {
    let (response, result) = exchange(
        b"GET /echo/abc HTTP/1.1\r\nHost: localhost:4221\r\n\r\n",
        Arc::new(MemoryStore::new()),
        4096,
    )
    .await;

    result.unwrap();
    let (head, body) = split_response(&response);
    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains("Content-Type: text/plain"));
    assert!(head.contains("Content-Length: 3"));
    assert_eq!(body, b"abc".to_vec());
}

#[tokio::test]
async fn test_gzip_echo_over_connection() {
    let (response, result) = exchange(
        b"GET /echo/banana HTTP/1.1\r\nAccept-Encoding: encoding-1, gzip\r\n\r\n",
        Arc::new(MemoryStore::new()),
        4096,
    )
    .await;

    result.unwrap();
    let (head, body) = split_response(&response);
    assert!(head.contains("Content-Encoding: gzip"));
    assert!(head.contains(&format!("Content-Length: {}", body.len())));

    let mut decoded = String::new();
    GzDecoder::new(body.as_slice())
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, "banana");
}

#[tokio::test]
async fn test_post_file_over_connection() {
    let store = Arc::new(MemoryStore::new());

    let (response, result) = exchange(
        b"POST /files/upload.bin HTTP/1.1\r\nContent-Length: 9\r\n\r\nsome data",
        Arc::clone(&store),
        4096,
    )
    .await;

    result.unwrap();
    assert_eq!(response, b"HTTP/1.1 201 Created\r\n\r\n".to_vec());
    assert_eq!(store.get("upload.bin"), Some(b"some data".to_vec()));
}

#[tokio::test]
async fn test_post_with_high_bit_header_is_stored() {
    let store = Arc::new(MemoryStore::new());

    let (response, result) = exchange(
        b"POST /files/a HTTP/1.1\r\nUser-Agent: caf\xe9\r\n\r\nhello",
        Arc::clone(&store),
        4096,
    )
    .await;

    result.unwrap();
    assert_eq!(response, b"HTTP/1.1 201 Created\r\n\r\n".to_vec());
    assert_eq!(store.get("a"), Some(b"hello".to_vec()));
}

#[tokio::test]
async fn test_put_is_method_not_allowed() {
    let (response, result) = exchange(
        b"PUT /files/x HTTP/1.1\r\n\r\n",
        Arc::new(MemoryStore::new()),
        4096,
    )
    .await;

    result.unwrap();
    assert_eq!(response, b"HTTP/1.1 405 Method not allowed\r\n\r\n".to_vec());
}

#[tokio::test]
async fn test_malformed_request_line_writes_nothing() {
    let (response, result) = exchange(
        b"GET /\r\n\r\n",
        Arc::new(MemoryStore::new()),
        4096,
    )
    .await;

    assert!(response.is_empty());
    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("invalid request line format"));
}

#[tokio::test]
async fn test_client_closing_without_request() {
    let (mut client, server) = tokio::io::duplex(1024);
    client.shutdown().await.unwrap();

    let mut conn = Connection::new(
        server,
        Arc::new(Router::default()),
        Arc::new(MemoryStore::new()),
    );
    conn.run().await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    assert!(response.is_empty());
}

#[tokio::test]
async fn test_request_is_truncated_to_buffer_size() {
    let store = Arc::new(MemoryStore::new());
    let head = b"POST /files/big HTTP/1.1\r\n\r\n";
    let mut request = head.to_vec();
    request.extend(std::iter::repeat_n(b'x', 8000));

    let (response, result) = exchange(&request, Arc::clone(&store), 4096).await;

    result.unwrap();
    assert_eq!(response, b"HTTP/1.1 201 Created\r\n\r\n".to_vec());
    assert_eq!(store.get("big").unwrap().len(), 4096 - head.len());
}

async fn start_server(dir: &std::path::Path) -> std::net::SocketAddr {
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();
    let store = Arc::new(DiskStore::new(dir));

    tokio::spawn(async move {
        let _ = listener::serve(tcp, store, 4096).await;
    });

    addr
}

async fn send(addr: std::net::SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn test_server_file_round_trip() {
    let dir = std::env::temp_dir().join(format!("http-server-e2e-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let addr = start_server(&dir).await;

    let created = send(
        addr,
        b"POST /files/foo.txt HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello",
    )
    .await;
    assert_eq!(created, b"HTTP/1.1 201 Created\r\n\r\n".to_vec());

    let fetched = send(addr, b"GET /files/foo.txt HTTP/1.1\r\n\r\n").await;
    let (head, body) = split_response(&fetched);
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert!(head.contains("Content-Type: application/octet-stream"));
    assert!(head.contains("Content-Length: 5"));
    assert_eq!(body, b"hello".to_vec());

    let missing = send(addr, b"GET /files/nope.txt HTTP/1.1\r\n\r\n").await;
    assert_eq!(missing, b"HTTP/1.1 404 Not Found\r\n\r\n".to_vec());

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_server_user_agent() {
    let addr = start_server(&std::env::temp_dir()).await;

    let response = send(
        addr,
        b"GET /user-agent HTTP/1.1\r\nHost: localhost\r\nUser-Agent: foobar/1.2.3\r\n\r\n",
    )
    .await;

    let (head, body) = split_response(&response);
    assert!(head.contains("Content-Length: 12"));
    assert_eq!(body, b"foobar/1.2.3".to_vec());
}

#[tokio::test]
async fn test_server_stalled_client_does_not_block_others() {
    let addr = start_server(&std::env::temp_dir()).await;

    // Connected but silent: its worker waits on the read forever.
    let _idle = TcpStream::connect(addr).await.unwrap();

    let response = tokio::time::timeout(
        Duration::from_secs(5),
        send(addr, b"GET / HTTP/1.1\r\n\r\n"),
    )
    .await
    .expect("second connection was served");

    assert_eq!(response, b"HTTP/1.1 200 OK\r\n\r\n".to_vec());
}

#[tokio::test]
async fn test_server_survives_malformed_request() {
    let addr = start_server(&std::env::temp_dir()).await;

    let dropped = send(addr, b"GARBAGE\r\n\r\n").await;
    assert!(dropped.is_empty());

    let response = send(addr, b"GET /nothing-here HTTP/1.1\r\n\r\n").await;
    assert_eq!(response, b"HTTP/1.1 404 Not Found\r\n\r\n".to_vec());
}
