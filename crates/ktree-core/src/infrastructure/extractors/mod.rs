//! Extraction adapters for external knowledge sources
//!
//! [`build_chain`] and [`build_enrichers`] assemble the adapters enabled in
//! [`ExtractorConfig`], in a fixed order: Wikipedia first, then the trusted
//! web-source fallback.

mod citations;
mod web_search;
mod wikipedia;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::config::ExtractorConfig;
use crate::domain::extraction::{ExtractorChain, ResourceEnricher};
use crate::error::{Error, Result};

pub use citations::CitationEnricher;
pub use web_search::{SearchHit, WebSearchExtractor};
pub use wikipedia::WikipediaExtractor;

/// HTTP client shared by the network adapters
pub(crate) fn http_client(config: &ExtractorConfig) -> Result<HttpClient> {
    HttpClient::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(Error::NetworkError)
}

pub fn build_chain(config: &ExtractorConfig) -> Result<ExtractorChain> {
    let mut chain = ExtractorChain::new();
    if config.wikipedia {
        chain.push(Arc::new(WikipediaExtractor::new(config)?));
    }
    if config.web_search {
        chain.push(Arc::new(WebSearchExtractor::new()));
    }
    Ok(chain)
}

pub fn build_enrichers(config: &ExtractorConfig) -> Vec<Arc<dyn ResourceEnricher>> {
    let mut enrichers: Vec<Arc<dyn ResourceEnricher>> = Vec::new();
    if config.citations {
        enrichers.push(Arc::new(CitationEnricher::new()));
    }
    enrichers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_follows_config() {
        let config = ExtractorConfig::default();
        let chain = build_chain(&config).unwrap();
        assert_eq!(chain.names(), ["wikipedia"]);
        assert_eq!(build_enrichers(&config).len(), 1);

        let config = ExtractorConfig {
            wikipedia: false,
            web_search: true,
            citations: false,
            ..ExtractorConfig::default()
        };
        let chain = build_chain(&config).unwrap();
        assert_eq!(chain.names(), ["web_search"]);
        assert!(build_enrichers(&config).is_empty());
    }
}
