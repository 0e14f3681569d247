//! Retrieving the raw CSV text of the sheet.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::{BoardError, BoardResult};

const USER_AGENT: &str = concat!("birthday-board/", env!("CARGO_PKG_VERSION"));

/// Anything that can hand back the sheet's CSV text.
pub trait SheetSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = BoardResult<String>> + Send;

    /// Where the data comes from, for logs.
    fn describe(&self) -> String;
}

impl<T: SheetSource> SheetSource for Arc<T> {
    fn fetch(&self) -> impl Future<Output = BoardResult<String>> + Send {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// A published sheet fetched with a plain anonymous GET.
#[derive(Debug, Clone)]
pub struct HttpSheet {
    http: reqwest::Client,
    url: Url,
}

impl HttpSheet {
    pub fn new(url: Url, timeout: Duration) -> BoardResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(HttpSheet { http, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl SheetSource for HttpSheet {
    async fn fetch(&self) -> BoardResult<String> {
        let response = self.http.get(self.url.clone()).send().await?;
        debug!(status = %response.status(), "sheet responded");

        if !response.status().is_success() {
            return Err(BoardError::Network(format!("status: {}", response.status())));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "sheet downloaded");
        Ok(body)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// A CSV file on disk, e.g. a downloaded copy of the sheet.
#[derive(Debug, Clone)]
pub struct FileSheet {
    path: PathBuf,
}

impl FileSheet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSheet { path: path.into() }
    }
}

impl SheetSource for FileSheet {
    async fn fetch(&self) -> BoardResult<String> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serves one connection with a canned HTTP response.
    async fn serve_once(response: &'static str) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        addr
    }

    fn sheet_at(addr: SocketAddr) -> HttpSheet {
        let url = Url::parse(&format!("http://{addr}/sheet.csv")).unwrap();
        HttpSheet::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_http_sheet_returns_body() {
        let addr = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: 30\r\nConnection: close\r\n\r\nName,Birthday\nAlice,1990-06-15",
        )
        .await;

        let text = sheet_at(addr).fetch().await.unwrap();

        assert_eq!(text, "Name,Birthday\nAlice,1990-06-15");
    }

    #[tokio::test]
    async fn test_http_error_status_is_network_error() {
        let addr = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let err = sheet_at(addr).fetch().await.unwrap_err();

        match err {
            BoardError::Network(detail) => assert!(detail.contains("404"), "{detail}"),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = sheet_at(addr).fetch().await.unwrap_err();

        assert!(matches!(err, BoardError::Network(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_file_sheet_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("birthdays.csv");
        std::fs::write(&path, "Name,Birthday\nAlice,1990-06-15\n").unwrap();

        let text = FileSheet::new(&path).fetch().await.unwrap();

        assert!(text.starts_with("Name,Birthday"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = FileSheet::new(dir.path().join("nope.csv")).fetch().await.unwrap_err();

        assert!(matches!(err, BoardError::Io(_)));
    }
}
