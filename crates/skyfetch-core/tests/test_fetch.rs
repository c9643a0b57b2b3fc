use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

use skyfetch_core::error::FetchError;
use skyfetch_core::fetch::{file_name_from_url, Fetcher, HttpFetcher};
use skyfetch_core::pipeline::config::FetchConfig;

/// Serve exactly one HTTP response on a local port and return its base URL.
fn serve_once(status_line: &'static str, body: &'static [u8]) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        let mut line = String::new();
        let mut user_agent = String::new();
        loop {
            line.clear();
            reader.read_line(&mut line).unwrap();
            if line.to_ascii_lowercase().starts_with("user-agent:") {
                user_agent = line["user-agent:".len()..].trim().to_string();
            }
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }
        let mut stream = stream;
        write!(
            stream,
            "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .unwrap();
        stream.write_all(body).unwrap();
        stream.flush().unwrap();
        format!("{} | {}", request_line.trim(), user_agent)
    });
    (format!("http://{addr}"), handle)
}

fn config() -> FetchConfig {
    FetchConfig {
        timeout_secs: Some(10),
        user_agent: "skyfetch-test/1.0".to_string(),
    }
}

#[test]
fn test_successful_download_returns_body() {
    let (base, server) = serve_once("HTTP/1.1 200 OK", b"SIMPLE  =                    T");
    let fetcher = HttpFetcher::new(&config()).unwrap();

    let body = fetcher.get(&format!("{base}/data/file.fits")).unwrap();
    assert_eq!(body, b"SIMPLE  =                    T");

    let seen = server.join().unwrap();
    assert_eq!(seen, "GET /data/file.fits HTTP/1.1 | skyfetch-test/1.0");
}

#[test]
fn test_error_status_is_reported() {
    let (base, server) = serve_once("HTTP/1.1 404 Not Found", b"no such file");
    let fetcher = HttpFetcher::new(&config()).unwrap();

    let err = fetcher.get(&format!("{base}/missing.fits")).unwrap_err();
    match err {
        FetchError::Status { status, url } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/missing.fits"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    server.join().unwrap();
}

#[test]
fn test_unreachable_host_is_a_transport_error() {
    // Bind then drop to get a port with no listener.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let fetcher = HttpFetcher::new(&config()).unwrap();
    let err = fetcher
        .get(&format!("http://127.0.0.1:{port}/x.fits"))
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
}

#[test]
fn test_file_name_is_last_path_segment() {
    assert_eq!(
        file_name_from_url("https://ws.cadc.test/raven/files/cadc:JWST/jw01_i2d.fits"),
        "jw01_i2d.fits"
    );
    assert_eq!(
        file_name_from_url("https://host/files/cube.fits?RUNID=42"),
        "cube.fits?RUNID=42"
    );
    assert_eq!(file_name_from_url("plain"), "plain");
    assert_eq!(file_name_from_url("https://host/dir/"), "");
}
