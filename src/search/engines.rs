//! HTML scraping adapters for the supported search engines
//!
//! Every engine is queried through its plain HTML results page. Parsing is done
//! synchronously after the body has been read, since the scraper `Html` type must
//! not be held across an await point.

use crate::config::BrowserConfig;
use crate::search::{EngineName, ResultEntry, SearchAdapter, SearchError, TimePeriod};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// Builds the HTTP client used for search requests
///
/// The first configured user agent is used; search pages are fetched with a
/// browser-like identity.
pub fn build_search_client(config: &BrowserConfig) -> Result<Client, reqwest::Error> {
    let user_agent = config
        .user_agents
        .iter()
        .find(|ua| !ua.trim().is_empty())
        .cloned()
        .unwrap_or_default();

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Search adapter scraping one engine's HTML results page
pub struct HtmlSearchAdapter {
    engine: EngineName,
    client: Client,
    base_url: String,
}

impl HtmlSearchAdapter {
    /// Creates an adapter pointed at the engine's public endpoint
    pub fn new(engine: EngineName, client: Client) -> Self {
        let base_url = match engine {
            EngineName::Bing => "https://www.bing.com",
            EngineName::DuckDuckGo => "https://html.duckduckgo.com",
            EngineName::Baidu => "https://www.baidu.com",
            EngineName::Yandex => "https://yandex.com",
        };
        Self::with_base_url(engine, client, base_url)
    }

    /// Creates an adapter against a custom host (used for mirrors and tests)
    pub fn with_base_url(engine: EngineName, client: Client, base_url: impl Into<String>) -> Self {
        Self {
            engine,
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_page(
        &self,
        query: &str,
        period: TimePeriod,
        max_results: usize,
    ) -> Result<String, SearchError> {
        let count = max_results.to_string();
        let request = match self.engine {
            EngineName::Bing => {
                let mut params = vec![("q", query.to_string()), ("count", count)];
                match period {
                    TimePeriod::Day => params.push(("filters", "ex1:\"ez1\"".to_string())),
                    TimePeriod::Week => params.push(("filters", "ex1:\"ez2\"".to_string())),
                    TimePeriod::AllTime => {}
                }
                self.client
                    .get(format!("{}/search", self.base_url))
                    .query(&params)
            }
            EngineName::DuckDuckGo => {
                let mut form = vec![("q", query.to_string())];
                match period {
                    TimePeriod::Day => form.push(("df", "d".to_string())),
                    TimePeriod::Week => form.push(("df", "w".to_string())),
                    TimePeriod::AllTime => {}
                }
                self.client
                    .post(format!("{}/html/", self.base_url))
                    .form(&form)
            }
            // Baidu's HTML endpoint has no stable recency parameter
            EngineName::Baidu => self
                .client
                .get(format!("{}/s", self.base_url))
                .query(&[("wd", query.to_string()), ("rn", count)]),
            EngineName::Yandex => {
                let mut params = vec![("text", query.to_string())];
                match period {
                    TimePeriod::Day => params.push(("within", "77".to_string())),
                    TimePeriod::Week => params.push(("within", "1".to_string())),
                    TimePeriod::AllTime => {}
                }
                self.client
                    .get(format!("{}/search/", self.base_url))
                    .query(&params)
            }
        };

        let response = request.header("Accept", "text/html").send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::HttpStatus(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl SearchAdapter for HtmlSearchAdapter {
    fn engine(&self) -> EngineName {
        self.engine
    }

    async fn search(
        &self,
        query: &str,
        period: TimePeriod,
        max_results: usize,
    ) -> Result<Vec<ResultEntry>, SearchError> {
        let body = self.fetch_page(query, period, max_results).await?;
        let results = parse_results(self.engine, &body, max_results)?;
        tracing::debug!(
            "{} returned {} results for '{}'",
            self.engine,
            results.len(),
            query
        );
        Ok(results)
    }
}

/// Extracts result entries from an engine's HTML results page
///
/// # Arguments
///
/// * `engine` - Engine whose markup is being parsed
/// * `html` - The results page body
/// * `max_results` - Maximum entries to return
///
/// # Returns
///
/// * `Ok(Vec<ResultEntry>)` - Entries with absolute http(s) links, in page order
/// * `Err(SearchError::Parse)` - A selector failed to compile
pub fn parse_results(
    engine: EngineName,
    html: &str,
    max_results: usize,
) -> Result<Vec<ResultEntry>, SearchError> {
    let (container, anchor) = match engine {
        EngineName::Bing => ("li.b_algo", "h2 a"),
        EngineName::DuckDuckGo => (".result", "a.result__a"),
        EngineName::Baidu => ("div.result, div.c-container", "h3 a"),
        EngineName::Yandex => ("li.serp-item", "a.OrganicTitle-Link, h2 a"),
    };
    let container_sel = selector(container)?;
    let anchor_sel = selector(anchor)?;

    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for block in document.select(&container_sel) {
        if results.len() >= max_results {
            break;
        }

        let Some(a) = block.select(&anchor_sel).next() else {
            continue;
        };
        let Some(href) = a.value().attr("href") else {
            continue;
        };

        let link = match engine {
            EngineName::DuckDuckGo => decode_ddg_link(href),
            _ => href.trim().to_string(),
        };
        if !(link.starts_with("http://") || link.starts_with("https://")) {
            continue;
        }

        let title = a.text().collect::<Vec<_>>().join(" ");
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");

        results.push(ResultEntry {
            link,
            title,
            source: engine.to_string(),
        });
    }

    Ok(results)
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("{}: {:?}", css, e)))
}

/// DuckDuckGo wraps result links as `//duckduckgo.com/l/?uddg=<encoded>&rut=...`
///
/// Returns the decoded destination, or the href unchanged when it is not wrapped.
fn decode_ddg_link(href: &str) -> String {
    let href = href.trim();
    let Ok(base) = Url::parse("https://duckduckgo.com/") else {
        return href.to_string();
    };
    match base.join(href) {
        Ok(url) if url.path().starts_with("/l/") => url
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_else(|| href.to_string()),
        _ => href.to_string(),
    }
}
