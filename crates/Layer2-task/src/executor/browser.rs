//! Browser executor - fetches the page named by a task description

use crate::executor::CapabilityExecutor;
use async_trait::async_trait;
use blnt_foundation::{BrowserConfig, Error, Result};
use regex::Regex;
use reqwest::{redirect, Client, Url};
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// Fetches pages over HTTP(S) and reports status and title
pub struct BrowserExecutor {
    client: Client,
}

impl BrowserExecutor {
    pub fn new(config: &BrowserConfig) -> Result<Self> {
        let policy = if config.follow_redirects {
            redirect::Policy::limited(10)
        } else {
            redirect::Policy::none()
        };

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.request_timeout))
            .redirect(policy)
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl CapabilityExecutor for BrowserExecutor {
    async fn execute(&self, description: &str) -> Result<Value> {
        let url = resolve_url(description)?;
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            return Err(Error::executor(format!("HTTP {} for {}", status, final_url)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(json!({
            "url": final_url,
            "status": status.as_u16(),
            "title": extract_title(&body),
            "bytes": body.len(),
        }))
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}

/// Pick the URL out of a description such as `open https://example.com`.
/// A bare host gets `https://`.
pub fn resolve_url(description: &str) -> Result<Url> {
    let candidate = description
        .split_whitespace()
        .find(|word| word.starts_with("http://") || word.starts_with("https://"))
        .map(str::to_string)
        .or_else(|| match description.split_whitespace().collect::<Vec<_>>()[..] {
            [single] => Some(format!("https://{}", single)),
            _ => None,
        })
        .ok_or_else(|| {
            Error::InvalidInput(format!("No URL found in task description: {}", description))
        })?;

    Url::parse(&candidate)
        .map_err(|e| Error::InvalidInput(format!("Invalid URL {}: {}", candidate, e)))
}

fn extract_title(html: &str) -> Option<String> {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    let re = TITLE.get_or_init(|| {
        Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title pattern is valid")
    });

    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        assert_eq!(
            resolve_url("open https://example.com/a").unwrap().as_str(),
            "https://example.com/a"
        );
        assert_eq!(
            resolve_url("example.com").unwrap().as_str(),
            "https://example.com/"
        );
        assert!(matches!(
            resolve_url("search for cats"),
            Err(Error::InvalidInput(_))
        ));
        assert!(resolve_url("").is_err());
    }

    #[test]
    fn test_extract_title() {
        let html = "<html><head><TITLE>\n  Example   Domain </TITLE></head></html>";
        assert_eq!(extract_title(html).as_deref(), Some("Example Domain"));
        assert_eq!(extract_title("<p>no title</p>"), None);
        assert_eq!(extract_title("<title> </title>"), None);
    }

    #[test]
    fn test_client_builds_from_config() {
        let executor = BrowserExecutor::new(&BrowserConfig::default()).unwrap();
        assert_eq!(executor.name(), "browser");
    }
}
