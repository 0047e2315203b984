//! Source page fetching
//!
//! Downloads the answers page and keeps only the parts that matter:
//! `<h3>` headers become questions and `<p>` paragraphs become answers, in the
//! order they appear. Everything else on the page is dropped.

use std::time::Duration;

use scraper::{Html, Selector};

use crate::config::Config;
use crate::extract::Fragment;
use crate::{Error, Result};

const QUESTION_TAG: &str = "h3";
const ANSWER_TAG: &str = "p";

/// Blocking HTTP fetcher for the source page.
pub struct PageFetcher {
    client: reqwest::blocking::Client,
}

impl PageFetcher {
    /// Create a fetcher that identifies itself with `user_agent`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map(|client| Self { client })
            .map_err(|e| Error::Fetch(format!("failed to create HTTP client: {e}")))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.user_agent,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Fetch and parse `url`, logging and swallowing any failure.
    ///
    /// Returns an empty list when the page can't be fetched.
    pub fn fetch(&self, url: &str) -> Vec<Fragment> {
        match self.try_fetch(url) {
            Ok(fragments) => {
                tracing::info!("Loaded {} fragments from {url}", fragments.len());
                for fragment in fragments.iter().take(2) {
                    let preview: String = fragment.text.chars().take(100).collect();
                    tracing::debug!("{:?}: {preview}...", fragment.kind);
                }
                fragments
            }
            Err(e) => {
                tracing::error!("An error occurred while loading documents: {e}");
                Vec::new()
            }
        }
    }

    /// Fetch and parse `url`, returning any failure to the caller.
    pub fn try_fetch(&self, url: &str) -> Result<Vec<Fragment>> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::Fetch(format!("failed to fetch {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("{url} returned {status}")));
        }

        let body = response
            .text()
            .map_err(|e| Error::Fetch(format!("failed to read response body: {e}")))?;

        Ok(parse_fragments(&body))
    }
}

/// Pull question headers and answer paragraphs out of an HTML document.
#[must_use]
pub fn parse_fragments(html: &str) -> Vec<Fragment> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse(&format!("{QUESTION_TAG}, {ANSWER_TAG}")) {
        Ok(selector) => selector,
        Err(e) => {
            tracing::error!("invalid fragment selector: {e}");
            return Vec::new();
        }
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let text = element.text().collect::<String>().trim().to_string();
            match element.value().name() {
                QUESTION_TAG => Some(Fragment::question(text)),
                ANSWER_TAG => Some(Fragment::answer(text)),
                _ => None,
            }
        })
        .collect()
}
