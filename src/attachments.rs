use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::platform::AttachmentRef;

/// Only files with this suffix are read; the check is case-sensitive.
pub const TEXT_EXTENSION: &str = ".txt";

#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Downloads attachments over plain HTTP GET.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build attachment HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AttachmentFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to download attachment")?
            .error_for_status()
            .context("Attachment download returned an error status")?;

        response
            .text()
            .await
            .context("Failed to read attachment body")
    }
}

pub fn is_text_attachment(attachment: &AttachmentRef) -> bool {
    attachment.filename.ends_with(TEXT_EXTENSION)
}

/// Concatenate every `.txt` attachment in order, with no separator.
///
/// The first failed download aborts the rest.
pub async fn read_text_attachments(
    fetcher: &dyn AttachmentFetcher,
    attachments: &[AttachmentRef],
) -> Result<String> {
    let mut content = String::new();

    for attachment in attachments.iter().filter(|a| is_text_attachment(a)) {
        let text = fetcher
            .fetch_text(&attachment.url)
            .await
            .with_context(|| format!("Failed to read attachment {}", attachment.filename))?;
        debug!("Read attachment {} ({} bytes)", attachment.filename, text.len());
        content.push_str(&text);
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MapFetcher {
        files: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl MapFetcher {
        fn new(files: &[(&str, &str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(u, t)| (u.to_string(), t.to_string()))
                    .collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AttachmentFetcher for MapFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String> {
            self.requested.lock().unwrap().push(url.to_string());
            self.files
                .get(url)
                .cloned()
                .with_context(|| format!("404 for {}", url))
        }
    }

    fn att(filename: &str, url: &str) -> AttachmentRef {
        AttachmentRef {
            filename: filename.to_string(),
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_concatenates_text_files_in_order() {
        let fetcher = MapFetcher::new(&[("u1", "first\n"), ("u2", "second")]);
        let content = read_text_attachments(
            &fetcher,
            &[att("a.txt", "u1"), att("img.png", "u3"), att("b.txt", "u2")],
        )
        .await
        .unwrap();

        assert_eq!(content, "first\nsecond");
        assert_eq!(*fetcher.requested.lock().unwrap(), vec!["u1", "u2"]);
    }

    #[tokio::test]
    async fn test_extension_check_is_case_sensitive() {
        let fetcher = MapFetcher::new(&[("u1", "LOUD")]);
        let content = read_text_attachments(&fetcher, &[att("LOG.TXT", "u1")])
            .await
            .unwrap();

        assert!(content.is_empty());
        assert!(fetcher.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_stops_remaining_downloads() {
        let fetcher = MapFetcher::new(&[("u2", "never read")]);
        let err = read_text_attachments(&fetcher, &[att("a.txt", "missing"), att("b.txt", "u2")])
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("a.txt"));
        assert_eq!(*fetcher.requested.lock().unwrap(), vec!["missing"]);
    }
}
