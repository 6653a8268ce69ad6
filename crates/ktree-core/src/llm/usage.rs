//! Token usage accounting and budget enforcement

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;

/// Token counts for a single call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u64 {
        self.input_tokens as u64 + self.output_tokens as u64
    }
}

/// Aggregated usage for one model
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelUsage {
    pub calls: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Snapshot of everything recorded so far
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsageSummary {
    pub calls: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub by_model: HashMap<String, ModelUsage>,
}

impl UsageSummary {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Shared tracker of backend calls and tokens, with an optional token budget
///
/// Wrap in an `Arc` and hand the same tracker to every client that should
/// draw from one budget.
#[derive(Debug, Default)]
pub struct UsageTracker {
    budget: Option<u64>,
    summary: RwLock<UsageSummary>,
}

impl UsageTracker {
    pub fn new(budget: Option<u64>) -> Self {
        Self {
            budget,
            summary: RwLock::new(UsageSummary::default()),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    pub fn budget(&self) -> Option<u64> {
        self.budget
    }

    /// Record a completed call
    pub fn record(&self, model: &str, usage: TokenUsage) {
        if let Ok(mut summary) = self.summary.write() {
            summary.calls += 1;
            summary.input_tokens += usage.input_tokens as u64;
            summary.output_tokens += usage.output_tokens as u64;

            let entry = summary.by_model.entry(model.to_string()).or_default();
            entry.calls += 1;
            entry.input_tokens += usage.input_tokens as u64;
            entry.output_tokens += usage.output_tokens as u64;
        }
    }

    pub fn total_tokens(&self) -> u64 {
        self.summary
            .read()
            .map(|s| s.total_tokens())
            .unwrap_or_default()
    }

    pub fn summary(&self) -> UsageSummary {
        self.summary
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// True once the spent tokens reach the budget
    pub fn is_over_budget(&self) -> bool {
        self.budget
            .is_some_and(|budget| self.total_tokens() >= budget)
    }

    /// Tokens left before the budget is hit; `None` when unlimited
    pub fn remaining(&self) -> Option<u64> {
        self.budget
            .map(|budget| budget.saturating_sub(self.total_tokens()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_aggregates_by_model() {
        let tracker = UsageTracker::unlimited();
        tracker.record("a/model", TokenUsage::new(10, 5));
        tracker.record("a/model", TokenUsage::new(1, 1));
        tracker.record("b/model", TokenUsage::new(3, 0));

        let summary = tracker.summary();
        assert_eq!(summary.calls, 3);
        assert_eq!(summary.total_tokens(), 20);
        assert_eq!(summary.by_model["a/model"].calls, 2);
        assert_eq!(summary.by_model["b/model"].input_tokens, 3);
    }

    #[test]
    fn test_budget() {
        let tracker = UsageTracker::new(Some(100));
        assert!(!tracker.is_over_budget());
        assert_eq!(tracker.remaining(), Some(100));

        tracker.record("m", TokenUsage::new(60, 40));
        assert!(tracker.is_over_budget());
        assert_eq!(tracker.remaining(), Some(0));
    }

    #[test]
    fn test_unlimited_is_never_over_budget() {
        let tracker = UsageTracker::unlimited();
        tracker.record("m", TokenUsage::new(u32::MAX, u32::MAX));
        assert!(!tracker.is_over_budget());
        assert_eq!(tracker.remaining(), None);
    }
}
