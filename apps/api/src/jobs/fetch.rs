//! Job-posting retrieval and HTML-to-text reduction.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page returned status {0}")]
    Status(u16),
}

/// Retrieves the raw body of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Parses `raw` and accepts only absolute http(s) URLs.
pub fn parse_job_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl(format!("unsupported scheme '{other}'"))),
    }
}

#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::builder()
                .timeout(FETCH_TIMEOUT)
                .user_agent(BROWSER_USER_AGENT)
                .build()?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script\s*>").unwrap());
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style\s*>").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Reduces an HTML page to its visible text. Never fails; malformed markup
/// just leaves more text behind.
pub fn strip_html(html: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(html, " ");
    let text = STYLE_BLOCK.replace_all(&text, " ");
    let text = TAG.replace_all(&text, " ");
    let text = decode_entities(&text);
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    // &amp; last so "&amp;lt;" decodes once to "&lt;".
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Serves one canned outcome and records requested URLs.
    pub struct StaticFetcher {
        outcome: Mutex<Option<Result<String, FetchError>>>,
        pub requested: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn page(html: &str) -> Self {
            Self {
                outcome: Mutex::new(Some(Ok(html.to_string()))),
                requested: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(status: u16) -> Self {
            Self {
                outcome: Mutex::new(Some(Err(FetchError::Status(status)))),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.outcome
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(FetchError::Status(404)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_drops_scripts() {
        assert_eq!(strip_html("<script>alert(1)</script><p>Hello</p>"), "Hello");
    }

    #[test]
    fn test_strip_html_drops_multiline_style_case_insensitive() {
        let html = "<STYLE type=\"text/css\">\nbody { color: red; }\n</STYLE>\n<h1>Rust   Engineer</h1>";
        assert_eq!(strip_html(html), "Rust Engineer");
    }

    #[test]
    fn test_strip_html_decodes_entities() {
        let html = "<p>R&amp;D&nbsp;team &lt;remote&gt; &quot;senior&quot; it&#39;s &amp;lt;</p>";
        assert_eq!(strip_html(html), "R&D team <remote> \"senior\" it's &lt;");
    }

    #[test]
    fn test_strip_html_tolerates_malformed_markup() {
        assert_eq!(strip_html("<div><p>Open <b>tags"), "Open tags");
        assert_eq!(strip_html("a < b and <unclosed"), "a < b and <unclosed");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_parse_job_url_accepts_http_schemes() {
        assert!(parse_job_url("https://jobs.example.com/123").is_ok());
        assert!(parse_job_url("http://example.com").is_ok());
    }

    #[test]
    fn test_parse_job_url_rejects_other_input() {
        assert!(matches!(parse_job_url("not a url"), Err(FetchError::InvalidUrl(_))));
        assert!(matches!(parse_job_url("ftp://example.com/x"), Err(FetchError::InvalidUrl(_))));
        assert!(matches!(parse_job_url("file:///etc/passwd"), Err(FetchError::InvalidUrl(_))));
    }
}
