//! Fetcher tests against a local one-shot HTTP responder.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

use dataset_fetch::{CachedFetcher, DatasetFetcher, FetchError, Registry};

const ABC_MD5: &str = "md5:900150983cd24fb0d6963f7d28e17f72";

/// Nothing listens on the discard port.
const UNREACHABLE: &str = "http://127.0.0.1:9/";

/// Serve a single HTTP response on an ephemeral port and return its base URL.
fn serve_once(status: &'static str, body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let mut stream = stream;
            let header = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(body);
        }
    });
    format!("http://{}/data/", addr)
}

#[test]
fn test_cache_hit_needs_no_network() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("abc.txt"), b"abc").unwrap();

    let registry = Registry::new(UNREACHABLE).with_entry("abc.txt", ABC_MD5).unwrap();
    let fetcher = CachedFetcher::new(registry, dir.path()).unwrap();

    let path = fetcher.fetch("abc.txt").unwrap();
    assert_eq!(path, dir.path().join("abc.txt"));
}

#[test]
fn test_unknown_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = CachedFetcher::new(Registry::new(UNREACHABLE), dir.path()).unwrap();
    assert!(matches!(fetcher.fetch("nope.nc"), Err(FetchError::UnknownDataset(_))));
}

#[test]
fn test_download_verified_and_cached() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache");
    let base = serve_once("200 OK", b"abc");

    let registry = Registry::new(base).with_entry("abc.txt", ABC_MD5).unwrap();
    let fetcher = CachedFetcher::new(registry, &cache).unwrap();

    let path = fetcher.fetch("abc.txt").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"abc");
    assert!(!cache.join("abc.txt.partial").exists());
}

#[test]
fn test_mismatched_download_is_removed() {
    let dir = tempfile::tempdir().unwrap();
    let base = serve_once("200 OK", b"not abc");

    let registry = Registry::new(base).with_entry("abc.txt", ABC_MD5).unwrap();
    let fetcher = CachedFetcher::new(registry, dir.path()).unwrap();

    match fetcher.fetch("abc.txt") {
        Err(FetchError::ChecksumMismatch { expected, actual }) => {
            assert_eq!(expected, ABC_MD5);
            assert!(actual.starts_with("md5:"));
            assert_ne!(actual, expected);
        }
        other => panic!("expected ChecksumMismatch, got {:?}", other),
    }
    assert!(!dir.path().join("abc.txt").exists());
    assert!(!dir.path().join("abc.txt.partial").exists());
}

#[test]
fn test_stale_cache_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("abc.txt"), b"old content").unwrap();
    let base = serve_once("200 OK", b"abc");

    let registry = Registry::new(base).with_entry("abc.txt", ABC_MD5).unwrap();
    let fetcher = CachedFetcher::new(registry, dir.path()).unwrap();

    let path = fetcher.fetch("abc.txt").unwrap();
    assert_eq!(std::fs::read(path).unwrap(), b"abc");
}

#[test]
fn test_http_error_status() {
    let dir = tempfile::tempdir().unwrap();
    let base = serve_once("404 Not Found", b"missing");

    let registry = Registry::new(base).with_entry("abc.txt", ABC_MD5).unwrap();
    let fetcher = CachedFetcher::new(registry, dir.path()).unwrap();

    match fetcher.fetch("abc.txt") {
        Err(FetchError::Http(msg)) => assert!(msg.contains("404"), "{}", msg),
        other => panic!("expected Http error, got {:?}", other),
    }
    assert!(!dir.path().join("abc.txt.partial").exists());
}

#[test]
fn test_connection_failure_is_http_error() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::new(UNREACHABLE).with_entry("abc.txt", ABC_MD5).unwrap();
    let fetcher = CachedFetcher::new(registry, dir.path()).unwrap();

    assert!(matches!(fetcher.fetch("abc.txt"), Err(FetchError::Http(_))));
}
