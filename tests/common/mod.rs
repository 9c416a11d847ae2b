//! Throwaway HTTP server shared by the integration tests.
#![allow(dead_code)]

use emotion_predict_cli::config::ClientConfig;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Answers the first connection with a canned response, then keeps
/// accepting for a short while to count any further connections.
pub struct TestServer {
    pub base_url: String,
    requests: mpsc::Receiver<String>,
    handle: JoinHandle<usize>,
}

impl TestServer {
    pub fn start(status: &'static str, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).expect("write");
            stream.flush().ok();
            drop(stream);
            tx.send(request).ok();

            listener.set_nonblocking(true).expect("nonblocking");
            let mut connections = 1;
            let deadline = Instant::now() + Duration::from_millis(300);
            while Instant::now() < deadline {
                if listener.accept().is_ok() {
                    connections += 1;
                }
                thread::sleep(Duration::from_millis(10));
            }
            connections
        });
        TestServer {
            base_url: format!("http://{}", addr),
            requests: rx,
            handle,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            ..ClientConfig::default()
        }
    }

    /// The captured request text and the number of connections seen.
    pub fn finish(self) -> (String, usize) {
        let request = self
            .requests
            .recv_timeout(Duration::from_secs(5))
            .expect("request captured");
        let connections = self.handle.join().expect("server thread");
        (request, connections)
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("read timeout");
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).unwrap_or(0);
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(end) = find(&data, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&data[..end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok());
            match body_len {
                Some(len) if data.len() >= end + 4 + len => break,
                Some(_) => continue,
                // chunked upload: stop at the terminating chunk
                None if data.ends_with(b"0\r\n\r\n") => break,
                None => continue,
            }
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
