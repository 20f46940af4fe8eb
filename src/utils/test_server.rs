//! One-shot loopback HTTP server for exercising the blocking clients.
//!
//! Each canned response answers exactly one connection, in order, and the
//! server closes the connection after replying so nothing is pooled.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

pub struct TestServer {
    pub url: String,
    requests: mpsc::Receiver<Recorded>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Waits for every canned response to be served.
    pub fn finish(self) -> Vec<Recorded> {
        self.handle.join().unwrap();
        self.requests.try_iter().collect()
    }
}

pub fn serve(responses: Vec<(u16, &str)>) -> TestServer {
    let responses: Vec<(u16, String)> = responses
        .into_iter()
        .map(|(status, body)| (status, body.to_owned()))
        .collect();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or_default().to_owned();
            let path = parts.next().unwrap_or_default().to_owned();

            let mut headers = Vec::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((key, value)) = line.split_once(':') {
                    let key = key.trim().to_ascii_lowercase();
                    let value = value.trim().to_owned();
                    if key == "content-length" {
                        content_length = value.parse().unwrap();
                    }
                    headers.push((key, value));
                }
            }
            let mut body_buf = vec![0; content_length];
            reader.read_exact(&mut body_buf).unwrap();

            let _ = tx.send(Recorded {
                method,
                path,
                headers,
                body: String::from_utf8_lossy(&body_buf).to_string(),
            });

            let reason = match status {
                200 => "OK",
                401 => "Unauthorized",
                404 => "Not Found",
                _ => "Error",
            };
            write!(
                stream,
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
        }
    });
    TestServer {
        url,
        requests: rx,
        handle,
    }
}

pub fn client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
