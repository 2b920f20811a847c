//! Integration tests for the proxy
//!
//! These tests drive whole transactions through a listener, with stub
//! origins and real TCP clients on threads, mirroring how the binary
//! serves connections one at a time.

use miniproxy::http::{Error, FdSessionOps};
use miniproxy::net::Listener;
use miniproxy::proxy::Transaction;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

/// Serve `count` connections sequentially on a fresh listener, the way
/// the accept loop does, and return the proxy's address.
fn spawn_proxy(count: usize) -> SocketAddr {
    let listener = Listener::bind(0).unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for _ in 0..count {
            let (stream, _) = listener.accept().unwrap();
            let _ = Transaction::new(FdSessionOps::new(stream)).serve();
        }
    });

    addr
}

/// Stub origin answering each of `count` connections with `response`.
fn spawn_origin(response: Vec<u8>, count: usize) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for _ in 0..count {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = vec![0u8; 4096];
            let _ = stream.read(&mut request).unwrap();
            stream.write_all(&response).unwrap();
        }
    });

    addr
}

/// Send one raw request to the proxy and collect the full response.
fn roundtrip(proxy: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(proxy).unwrap();
    stream.write_all(request).unwrap();

    let mut received = Vec::new();
    stream.read_to_end(&mut received).unwrap();
    received
}

#[test]
fn test_proxied_get_delivers_origin_bytes_unmodified() {
    let origin = spawn_origin(b"HTTP/1.0 200 OK\r\nContent-length: 5\r\n\r\nhello".to_vec(), 1);
    let proxy = spawn_proxy(1);

    let request = format!("GET http://{}/ HTTP/1.1\r\nHost: ignored\r\n\r\n", origin);
    let received = roundtrip(proxy, request.as_bytes());

    assert_eq!(received, b"HTTP/1.0 200 OK\r\nContent-length: 5\r\n\r\nhello");
}

#[test]
fn test_repeated_transactions_are_byte_identical() {
    let origin = spawn_origin(b"HTTP/1.0 200 OK\r\nContent-length: 5\r\n\r\nhello".to_vec(), 2);
    let proxy = spawn_proxy(2);

    let request = format!("GET http://{}/same HTTP/1.0\r\n\r\n", origin);
    let first = roundtrip(proxy, request.as_bytes());
    let second = roundtrip(proxy, request.as_bytes());

    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn test_large_response_is_relayed_in_order() {
    // Larger than one relay chunk so the copy loop runs repeatedly.
    let body: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    let mut response =
        format!("HTTP/1.0 200 OK\r\nContent-length: {}\r\n\r\n", body.len()).into_bytes();
    response.extend_from_slice(&body);

    let origin = spawn_origin(response.clone(), 1);
    let proxy = spawn_proxy(1);

    let request = format!("GET http://{}/big HTTP/1.0\r\n\r\n", origin);
    let received = roundtrip(proxy, request.as_bytes());

    assert_eq!(received, response);
}

#[test]
fn test_post_gets_501_with_exact_content_length() {
    let proxy = spawn_proxy(1);

    let received = roundtrip(
        proxy,
        b"POST http://example.com/ HTTP/1.1\r\nContent-Length: 0\r\n\r\n",
    );
    let text = String::from_utf8(received).unwrap();

    assert!(text.starts_with("HTTP/1.0 501 Not Implemented\r\n"));

    let (head, body) = text.split_once("\r\n\r\n").unwrap();
    let declared: usize = head
        .lines()
        .find_map(|l| l.strip_prefix("Content-length: "))
        .unwrap()
        .parse()
        .unwrap();

    assert!(!body.is_empty());
    assert_eq!(declared, body.len());
}

#[test]
fn test_unparseable_uri_gets_400_with_exact_content_length() {
    let proxy = spawn_proxy(1);

    let received = roundtrip(proxy, b"GET ftp://example.com/ HTTP/1.1\r\n\r\n");
    let text = String::from_utf8(received).unwrap();

    assert!(text.starts_with("HTTP/1.0 400 Bad Request\r\n"));
    assert!(text.contains("Content-type: text/html\r\n"));

    let (head, body) = text.split_once("\r\n\r\n").unwrap();
    let declared: usize = head
        .lines()
        .find_map(|l| l.strip_prefix("Content-length: "))
        .unwrap()
        .parse()
        .unwrap();

    assert_eq!(declared, body.len());
}

#[test]
fn test_connect_failure_then_next_connection_still_served() {
    // Bind then drop to get a port with no listener behind it.
    let dead_addr = {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap()
    };

    let origin = spawn_origin(b"HTTP/1.0 200 OK\r\nContent-length: 2\r\n\r\nok".to_vec(), 1);
    let proxy = spawn_proxy(2);

    // First transaction: origin connect fails, client sees zero bytes.
    let request = format!("GET http://{}/ HTTP/1.0\r\n\r\n", dead_addr);
    let received = roundtrip(proxy, request.as_bytes());
    assert!(received.is_empty());

    // Second transaction on the same proxy succeeds.
    let request = format!("GET http://{}/ HTTP/1.0\r\n\r\n", origin);
    let received = roundtrip(proxy, request.as_bytes());
    assert_eq!(received, b"HTTP/1.0 200 OK\r\nContent-length: 2\r\n\r\nok");
}

#[test]
fn test_client_disconnect_mid_relay_keeps_proxy_serving() {
    // Origin that streams far more than one relay chunk, then serves a
    // normal second connection.
    let origin_listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let origin_addr = origin_listener.local_addr().unwrap();

    thread::spawn(move || {
        // First connection: keep streaming until the proxy gives up.
        let (mut stream, _) = origin_listener.accept().unwrap();
        let mut request = vec![0u8; 4096];
        let _ = stream.read(&mut request).unwrap();
        let chunk = vec![b'x'; 8192];
        stream.write_all(b"HTTP/1.0 200 OK\r\n\r\n").unwrap();
        for _ in 0..4096 {
            if stream.write_all(&chunk).is_err() {
                break;
            }
        }
        drop(stream);

        // Second connection: ordinary short response.
        let (mut stream, _) = origin_listener.accept().unwrap();
        let _ = stream.read(&mut request).unwrap();
        stream
            .write_all(b"HTTP/1.0 200 OK\r\nContent-length: 2\r\n\r\nok")
            .unwrap();
    });

    // Serve two transactions by hand so their results are observable.
    let listener = Listener::bind(0).unwrap();
    let addr = listener.local_addr().unwrap();

    let proxy = thread::spawn(move || {
        let mut results = Vec::new();
        for _ in 0..2 {
            let (stream, _) = listener.accept().unwrap();
            results.push(Transaction::new(FdSessionOps::new(stream)).serve());
        }
        results
    });

    // First client walks away mid-transfer: read a little, then close
    // with data still in flight.
    {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .write_all(format!("GET http://{}/stream HTTP/1.0\r\n\r\n", origin_addr).as_bytes())
            .unwrap();
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).unwrap();
    }

    // Give the abort a moment to land before the next transaction.
    thread::sleep(Duration::from_millis(50));

    // Second client is served normally.
    let request = format!("GET http://{}/ HTTP/1.0\r\n\r\n", origin_addr);
    let received = roundtrip(addr, request.as_bytes());
    assert_eq!(received, b"HTTP/1.0 200 OK\r\nContent-length: 2\r\n\r\nok");

    let results = proxy.join().unwrap();
    assert!(matches!(
        results[0],
        Err(Error::Io(_)) | Err(Error::ConnectionClosed)
    ));
    assert!(results[1].is_ok());
}

#[test]
fn test_client_headers_are_not_forwarded() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let origin_addr = listener.local_addr().unwrap();

    let origin = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = vec![0u8; 4096];
        let n = stream.read(&mut request).unwrap();
        request.truncate(n);
        stream
            .write_all(b"HTTP/1.0 204 No Content\r\n\r\n")
            .unwrap();
        String::from_utf8(request).unwrap()
    });

    let proxy = spawn_proxy(1);
    let request = format!(
        "GET http://{}/page HTTP/1.1\r\n\
         Host: client-supplied\r\n\
         Cookie: secret=1\r\n\
         If-Modified-Since: yesterday\r\n\
         \r\n",
        origin_addr
    );
    let _ = roundtrip(proxy, request.as_bytes());

    let forwarded = origin.join().unwrap();
    assert!(forwarded.starts_with("GET /page HTTP/1.0\r\n"));
    assert!(forwarded.contains("Connection: close\r\n"));
    assert!(forwarded.contains("Proxy-Connection: close\r\n"));
    assert!(forwarded.contains("User-Agent: Mozilla/5.0"));
    assert!(!forwarded.contains("Cookie"));
    assert!(!forwarded.contains("If-Modified-Since"));
    assert!(!forwarded.contains("client-supplied"));
}
