//! Retrieval of station feeds and trip tables from disk or over HTTP.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads `source` from a local file path, or fetches it with `client` when
/// it is an HTTP(S) URL.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        fetch_bytes(client, source)
            .await
            .with_context(|| format!("failed to fetch {source}"))?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read {source}"))?
    };
    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/stations.json"));
        assert!(is_remote("http://localhost:8080/trips.csv"));
        assert!(!is_remote("data/trips.csv"));
        assert!(!is_remote("httpdocs/trips.csv"));
    }

    #[tokio::test]
    async fn test_load_local_source() {
        let path = format!("{}/station_traffic_fetch_test.txt", env::temp_dir().display());
        fs::write(&path, b"hello").unwrap();

        let bytes = load_source(&BasicClient::new(), &path).await.unwrap();
        assert_eq!(bytes, b"hello");

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_missing_source() {
        let err = load_source(&BasicClient::new(), "/nonexistent/station_traffic.csv")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
