use crate::search::{EngineName, TimePeriod};

/// Parameters of a search-mode task
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Engines in caller order; duplicates are removed on construction
    pub engines: Vec<EngineName>,
    pub query: String,
    pub time_period: TimePeriod,
    /// Results requested from each engine
    pub search_count: u32,
    /// Upper bound on extracted results
    pub crawl_count: u32,
    /// Direct crawl: the LLM summary is never requested
    pub direct_mode: bool,
}

/// A unit of work handed to the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub enum TaskRequest {
    Search(SearchParams),
    UrlList { urls: Vec<String> },
}

impl TaskRequest {
    /// Builds a search request
    ///
    /// Repeated engines keep their first position.
    pub fn search(
        engines: impl IntoIterator<Item = EngineName>,
        query: impl Into<String>,
        time_period: TimePeriod,
        search_count: u32,
        crawl_count: u32,
    ) -> Self {
        let mut ordered: Vec<EngineName> = Vec::new();
        for engine in engines {
            if !ordered.contains(&engine) {
                ordered.push(engine);
            }
        }
        Self::Search(SearchParams {
            engines: ordered,
            query: query.into(),
            time_period,
            search_count,
            crawl_count,
            direct_mode: false,
        })
    }

    /// Builds the direct-crawl request for a coin preset ("{COIN} Crypto News")
    pub fn preset(
        coin: &str,
        engines: impl IntoIterator<Item = EngineName>,
        time_period: TimePeriod,
        search_count: u32,
        crawl_count: u32,
    ) -> Self {
        let mut request = Self::search(
            engines,
            format!("{} Crypto News", coin),
            time_period,
            search_count,
            crawl_count,
        );
        if let Self::Search(params) = &mut request {
            params.direct_mode = true;
        }
        request
    }

    /// Builds a URL-mode request; entries are trimmed and blanks dropped
    pub fn url_list<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let urls = urls
            .into_iter()
            .map(|u| u.as_ref().trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        Self::UrlList { urls }
    }

    /// Builds a URL-mode request from newline separated text
    pub fn from_url_text(text: &str) -> Self {
        Self::url_list(text.lines())
    }

    pub fn is_url_mode(&self) -> bool {
        matches!(self, Self::UrlList { .. })
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Search(p) if p.direct_mode)
    }

    /// Query text for search mode
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Search(p) => Some(&p.query),
            Self::UrlList { .. } => None,
        }
    }

    /// Maximum number of results to extract; URL mode extracts every URL
    pub fn crawl_count(&self) -> usize {
        match self {
            Self::Search(p) => p.crawl_count as usize,
            Self::UrlList { urls } => urls.len(),
        }
    }
}
