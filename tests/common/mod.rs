// One-shot HTTP server used by the integration tests. It accepts a single
// connection, records the request and answers with a canned response.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nab";

#[derive(Debug)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

pub struct OneShotServer {
    pub base_url: String,
    handle: JoinHandle<CapturedRequest>,
}

impl OneShotServer {
    pub fn start(status: u16, body: &str) -> Self {
        Self::start_raw(status, body.as_bytes())
    }

    /// Like `start`, but the body is sent byte for byte, valid UTF-8 or not.
    pub fn start_raw(status: u16, body: &[u8]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let body = body.to_vec();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let captured = read_request(&mut reader);

            let mut stream = stream;
            let head = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                reason(status),
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
            stream.flush().unwrap();
            captured
        });
        OneShotServer { base_url, handle }
    }

    pub fn finish(self) -> CapturedRequest {
        self.handle.join().unwrap()
    }
}

/// Accepts one connection, reads the request and never answers. The thread
/// ends once the client hangs up.
pub struct StalledServer {
    pub base_url: String,
    handle: JoinHandle<CapturedRequest>,
}

impl StalledServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let captured = read_request(&mut reader);
            let mut buf = [0u8; 256];
            while matches!(reader.read(&mut buf), Ok(n) if n > 0) {}
            captured
        });
        StalledServer { base_url, handle }
    }

    pub fn finish(self) -> CapturedRequest {
        self.handle.join().unwrap()
    }
}

/// A bound listener that nothing should ever connect to.
pub struct SilentListener {
    listener: TcpListener,
    pub base_url: String,
}

impl SilentListener {
    pub fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        SilentListener { listener, base_url }
    }

    pub fn assert_untouched(&self) {
        assert!(
            self.listener.accept().is_err(),
            "expected no connection to {}",
            self.base_url
        );
    }
}

fn read_request<R: BufRead>(reader: &mut R) -> CapturedRequest {
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }

    let find = |name: &str| {
        headers
            .iter()
            .find(|(k, _): &&(String, String)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    };
    let body = if let Some(len) = find("content-length") {
        let mut body = vec![0u8; len.parse().unwrap()];
        reader.read_exact(&mut body).unwrap();
        body
    } else if find("transfer-encoding").map_or(false, |v| v.eq_ignore_ascii_case("chunked")) {
        read_chunked(reader)
    } else {
        Vec::new()
    };

    CapturedRequest {
        method,
        path,
        headers,
        body,
    }
}

fn read_chunked<R: BufRead>(reader: &mut R) -> Vec<u8> {
    let mut body = Vec::new();
    loop {
        let mut size = String::new();
        reader.read_line(&mut size).unwrap();
        let size = usize::from_str_radix(size.trim().split(';').next().unwrap(), 16).unwrap();
        let mut chunk = vec![0u8; size + 2];
        reader.read_exact(&mut chunk).unwrap();
        if size == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..size]);
    }
    body
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

pub fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
