//! Wikipedia adapter: REST page summaries plus the links API

use std::collections::HashMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client as HttpClient, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::domain::concept::Domain;
use crate::domain::extraction::{ConceptExtractor, ExtractedConcept, SourceType};
use crate::error::{Error, Result};

const REST_BASE: &str = "https://en.wikipedia.org/api/rest_v1";
const ACTION_API: &str = "https://en.wikipedia.org/w/api.php";
const ARTICLE_BASE: &str = "https://en.wikipedia.org/wiki/";

const MAX_RELATED_TERMS: usize = 10;
const MAX_NOTATIONS: usize = 5;

const SPELLED_GREEK: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "lambda", "sigma", "theta", "phi", "psi", "omega",
];

#[derive(Debug, Deserialize)]
struct PageSummary {
    title: Option<String>,
    #[serde(default)]
    extract: String,
    #[serde(default)]
    extract_html: String,
}

#[derive(Debug, Deserialize)]
struct LinksResponse {
    #[serde(default)]
    query: Option<LinksQuery>,
}

#[derive(Debug, Deserialize)]
struct LinksQuery {
    #[serde(default)]
    pages: HashMap<String, LinksPage>,
}

#[derive(Debug, Deserialize)]
struct LinksPage {
    #[serde(default)]
    links: Vec<PageLink>,
}

#[derive(Debug, Deserialize)]
struct PageLink {
    title: String,
}

struct WikiPatterns {
    math: Regex,
    tex_annotation: Regex,
    function_call: Regex,
}

static PATTERNS: OnceLock<WikiPatterns> = OnceLock::new();

fn patterns() -> &'static WikiPatterns {
    PATTERNS.get_or_init(|| WikiPatterns {
        math: Regex::new(r"(?i)<math[^>]*>([^<]+)</math>").expect("math regex must compile"),
        tex_annotation: Regex::new(
            r#"(?i)<annotation[^>]*encoding="application/x-tex"[^>]*>([^<]+)</annotation>"#,
        )
        .expect("annotation regex must compile"),
        function_call: Regex::new(r"\b[fghFGH]\s*\(\s*[xyztn]\s*\)")
            .expect("function call regex must compile"),
    })
}

/// Looks terms up on English Wikipedia
///
/// Any HTTP or decoding failure is reported as "nothing found" so the chain
/// moves on to the next adapter.
pub struct WikipediaExtractor {
    http: HttpClient,
    rest_base: String,
    action_api: String,
}

impl WikipediaExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            http: super::http_client(config)?,
            rest_base: REST_BASE.to_string(),
            action_api: ACTION_API.to_string(),
        })
    }

    /// Point the adapter at another MediaWiki deployment
    pub fn with_endpoints(mut self, rest_base: impl Into<String>, action_api: impl Into<String>) -> Self {
        self.rest_base = rest_base.into().trim_end_matches('/').to_string();
        self.action_api = action_api.into();
        self
    }

    fn summary_url(&self, term: &str) -> Result<Url> {
        let mut url = Url::parse(&self.rest_base)
            .map_err(|e| Error::ExtractionFailed(format!("bad Wikipedia base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::ExtractionFailed("Wikipedia base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(["page", "summary", title_slug(term).as_str()]);
        Ok(url)
    }

    async fn fetch_summary(&self, term: &str) -> Result<Option<PageSummary>> {
        let url = self.summary_url(term)?;
        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(term = %term, error = %e, "Wikipedia summary request failed");
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            debug!(term = %term, status = %response.status(), "No Wikipedia summary");
            return Ok(None);
        }

        match response.json::<PageSummary>().await {
            Ok(summary) => Ok(Some(summary)),
            Err(e) => {
                warn!(term = %term, error = %e, "Malformed Wikipedia summary");
                Ok(None)
            }
        }
    }

    async fn fetch_related_terms(&self, title: &str) -> Vec<String> {
        let url = match Url::parse_with_params(
            &self.action_api,
            &[
                ("action", "query"),
                ("titles", title),
                ("prop", "links"),
                ("pllimit", "50"),
                ("plnamespace", "0"),
                ("format", "json"),
            ],
        ) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Bad Wikipedia API URL");
                return Vec::new();
            }
        };

        let response = match self.http.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(title = %title, status = %response.status(), "Links request rejected");
                return Vec::new();
            }
            Err(e) => {
                warn!(title = %title, error = %e, "Links request failed");
                return Vec::new();
            }
        };

        match response.json::<LinksResponse>().await {
            Ok(body) => body
                .query
                .into_iter()
                .flat_map(|q| q.pages.into_values())
                .flat_map(|page| page.links)
                .map(|link| link.title)
                .take(MAX_RELATED_TERMS)
                .collect(),
            Err(e) => {
                warn!(title = %title, error = %e, "Malformed links response");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ConceptExtractor for WikipediaExtractor {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn can_extract(&self, term: &str) -> bool {
        let term = term.trim();
        !term.is_empty() && term.len() <= 255
    }

    async fn extract(&self, term: &str, domain: Domain, subfield: &str) -> Result<Option<ExtractedConcept>> {
        let Some(summary) = self.fetch_summary(term).await? else {
            return Ok(None);
        };
        if summary.extract.trim().is_empty() {
            return Ok(None);
        }

        let title = summary.title.clone().unwrap_or_else(|| term.to_string());
        let source_url = article_url(&title)?.to_string();
        let related_terms = self.fetch_related_terms(&title).await;

        let mut record = ExtractedConcept::new(
            title,
            summary.extract.trim(),
            domain,
            subfield,
            SourceType::Wikipedia,
        );
        record.latex_fragments = latex_fragments(&summary.extract_html);
        record.notations = notation_hints(&summary.extract);
        record.related_terms = related_terms;
        record.add_article(source_url.clone());
        record.source_url = Some(source_url);

        debug!(
            term = %term,
            related = record.related_terms.len(),
            latex = record.latex_fragments.len(),
            "Wikipedia summary extracted"
        );
        Ok(Some(record))
    }
}

/// Public article link for a page title, with reserved characters escaped
fn article_url(title: &str) -> Result<Url> {
    let mut url = Url::parse(ARTICLE_BASE)
        .map_err(|e| Error::ExtractionFailed(format!("bad Wikipedia article URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| Error::ExtractionFailed("Wikipedia article URL cannot hold a path".to_string()))?
        .pop_if_empty()
        .push(&title_slug(title));
    Ok(url)
}

/// MediaWiki title form: spaces become underscores
fn title_slug(term: &str) -> String {
    term.trim().replace(' ', "_")
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// TeX sources embedded in summary HTML
fn latex_fragments(html: &str) -> Vec<String> {
    let p = patterns();
    p.math
        .captures_iter(html)
        .chain(p.tex_annotation.captures_iter(html))
        .filter_map(|c| c.get(1))
        .map(|m| unescape_html(m.as_str()).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Plain-text hints of notation: `f(x)` style calls and spelled Greek letters
fn notation_hints(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let calls = patterns()
        .function_call
        .find_iter(text)
        .map(|m| m.as_str().to_string());
    let greek = SPELLED_GREEK
        .iter()
        .filter(|letter| lower.contains(*letter))
        .map(|letter| letter.to_string());

    let mut hints: Vec<String> = Vec::new();
    for hint in calls.chain(greek) {
        if !hints.contains(&hint) {
            hints.push(hint);
        }
    }
    hints.truncate(MAX_NOTATIONS);
    hints
}
