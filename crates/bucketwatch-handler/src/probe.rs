//! Package probe
//!
//! Confirms the deployed package can reach the network and parse a page:
//! fetch a URL and log its `<title>`. Errors are returned to the caller,
//! which fails the invocation.

use bucketwatch_core::config::ProbeConfig;
use bucketwatch_core::{Error, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use reqwest::Client;
use tracing::{debug, info};

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title(?:\s[^>]*)?>(.*?)</title\s*>").expect("valid title pattern"));

static NUMERIC_ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));").expect("valid entity pattern"));

/// Probe handle
#[derive(Debug, Clone)]
pub struct PackageProbe {
    client: Client,
    url: String,
}

impl PackageProbe {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Probe(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Use a prebuilt client
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the page and return its title
    pub async fn run(&self) -> Result<String> {
        info!("Start testing packages");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Probe(format!("HTTP request to {} failed: {}", self.url, e)))?;
        debug!("Probe response status: {}", response.status());

        let body = response
            .text()
            .await
            .map_err(|e| Error::Probe(format!("Failed to read response body: {}", e)))?;

        let title = extract_title(&body)
            .ok_or_else(|| Error::Probe(format!("Page at {} has no <title>", self.url)))?;

        info!(title = %title, "Fetched probe page");
        info!("Finished testing packages");
        Ok(title)
    }
}

/// Text of the first `<title>` element, trimmed and entity-decoded
pub fn extract_title(html: &str) -> Option<String> {
    TITLE_RE
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|title| html_unescape(title.as_str().trim()))
}

/// Decode numeric references and the predefined named entities. Other named
/// entities are left as written; `&amp;` goes last so it cannot form new ones.
fn html_unescape(s: &str) -> String {
    let numeric = NUMERIC_ENTITY_RE.replace_all(s, |caps: &Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec)) => dec.as_str().parse().ok(),
            _ => None,
        };
        match code.and_then(char::from_u32) {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    });

    numeric
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
