//! Minimal HTTP stub for catalog tests: serves canned JSON per path from a
//! background thread and records the API keys it was sent.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

pub struct StubServer {
    pub base: String,
    requests: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl StubServer {
    /// Paths requested so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|r| r.0.clone()).collect()
    }

    /// `X-Api-Key` values received, in order.
    pub fn api_keys(&self) -> Vec<Option<String>> {
        self.requests.lock().unwrap().iter().map(|r| r.1.clone()).collect()
    }
}

/// Serve `routes` (path -> (status, body)). Unknown paths get 404.
pub fn serve(routes: &[(&str, u16, &str)]) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let routes: HashMap<String, (u16, String)> = routes
        .iter()
        .map(|(p, s, b)| (p.to_string(), (*s, b.to_string())))
        .collect();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            handle(stream, &routes, &seen);
        }
    });

    StubServer { base, requests }
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, (u16, String)>,
    seen: &Mutex<Vec<(String, Option<String>)>>,
) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();

    let mut api_key = None;
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) if line == "\r\n" || line == "\n" => break,
            Ok(_) => {
                if let Some((name, value)) = line.split_once(':') {
                    if name.trim().eq_ignore_ascii_case("x-api-key") {
                        api_key = Some(value.trim().to_string());
                    }
                }
            }
        }
    }
    seen.lock().unwrap().push((path.clone(), api_key));

    let (status, body) = routes
        .get(&path)
        .cloned()
        .unwrap_or((404, r#"{"message":"NotFound"}"#.to_string()));
    let response = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// An address nothing listens on.
pub fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// True when running as root, where permission-based tests cannot fail.
#[cfg(unix)]
pub fn running_as_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}
