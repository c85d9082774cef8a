//! Translation coverage for build and export tooling.

use serde::Serialize;

use super::Catalog;

/// Coverage of one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextCoverage {
    pub context: String,
    /// Messages still part of the UI (not vanished or obsolete).
    pub total: usize,
    /// Active messages with a finished, non-empty translation.
    pub finished: usize,
    /// Active messages that are not finished.
    pub unfinished: usize,
    /// Vanished and obsolete messages.
    pub vanished: usize,
    /// Sorted source strings of active messages without a usable translation.
    pub untranslated: Vec<String>,
}

impl ContextCoverage {
    /// Share of finished messages as a whole percentage; 100 for an empty context.
    #[must_use]
    pub fn percent(&self) -> usize {
        if self.total == 0 { 100 } else { self.finished * 100 / self.total }
    }
}

/// Coverage of a whole catalog, one entry per context sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub locale: String,
    pub contexts: Vec<ContextCoverage>,
}

impl CoverageReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.contexts.iter().map(|context| context.total).sum()
    }

    #[must_use]
    pub fn finished(&self) -> usize {
        self.contexts.iter().map(|context| context.finished).sum()
    }

    /// Overall percentage of finished messages; 100 for an empty catalog.
    #[must_use]
    pub fn percent(&self) -> usize {
        let total = self.total();
        if total == 0 { 100 } else { self.finished() * 100 / total }
    }

    /// Whether every active message is finished.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.contexts.iter().all(|context| context.unfinished == 0)
    }
}

impl Catalog {
    /// Count finished, unfinished and vanished messages per context.
    #[must_use]
    pub fn coverage(&self) -> CoverageReport {
        let contexts = self
            .list_contexts()
            .into_iter()
            .map(|name| {
                let mut coverage = ContextCoverage {
                    context: name.to_string(),
                    total: 0,
                    finished: 0,
                    unfinished: 0,
                    vanished: 0,
                    untranslated: Vec::new(),
                };

                for message in self.messages(name) {
                    if !message.state.is_active() {
                        coverage.vanished += 1;
                        continue;
                    }
                    coverage.total += 1;
                    if message.state.is_finished() {
                        coverage.finished += 1;
                    } else {
                        coverage.unfinished += 1;
                    }
                    if message.state.usable_text().is_none() {
                        coverage.untranslated.push(message.source.clone());
                    }
                }
                coverage.untranslated.sort_unstable();

                coverage
            })
            .collect();

        CoverageReport { locale: self.locale().to_string(), contexts }
    }
}
