//! Bounded-concurrency scraping over a list of search terms.
//!
//! One adapter, one platform, many titles. Workers share the adapter and
//! the process-wide quota counter; once any worker observes exhaustion the
//! remaining terms are skipped without touching the network.

use futures::stream::{self, StreamExt};
use romdex_core::{GameRecord, QuotaState};
use romdex_sources::SourceAdapter;
use tokio::sync::mpsc;

/// Progress events emitted while a session runs, consumed by the terminal
/// front end.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A term was handed to a worker and its search is underway.
    Searching {
        index: usize,
        total: usize,
        term: String,
    },
    /// A record was assembled for a term.
    Scraped { title: String },
    /// Nothing matched a term on the requested platform.
    NotFound { term: String },
    /// A term was dropped because the request quota ran out.
    Skipped { term: String },
    /// All terms processed.
    Done,
}

/// Outcome for a single search term.
#[derive(Debug)]
pub enum TargetOutcome {
    /// A candidate matched and its details were fetched.
    Scraped(GameRecord),
    /// Nothing on the requested platform matched the term.
    NotFound { term: String },
    /// The shared quota ran out before this term could be looked up.
    Skipped { term: String },
}

/// Scrape every term against one platform with at most `max_workers`
/// lookups in flight.
///
/// Outcomes come back in input order regardless of completion order.
pub async fn scrape_terms(
    adapter: &dyn SourceAdapter,
    terms: Vec<String>,
    platform: &str,
    quota: &QuotaState,
    max_workers: usize,
    events: mpsc::UnboundedSender<SessionEvent>,
) -> Vec<TargetOutcome> {
    let total = terms.len();

    let mut indexed: Vec<(usize, TargetOutcome)> = stream::iter(terms.into_iter().enumerate())
        .map(|(index, term)| {
            let events = events.clone();
            async move {
                if quota.is_exhausted() {
                    let _ = events.send(SessionEvent::Skipped { term: term.clone() });
                    return (index, TargetOutcome::Skipped { term });
                }

                let _ = events.send(SessionEvent::Searching {
                    index,
                    total,
                    term: term.clone(),
                });

                let outcome = scrape_term(adapter, term, platform, quota).await;
                let event = match &outcome {
                    TargetOutcome::Scraped(record) => SessionEvent::Scraped {
                        title: record.title.clone().unwrap_or_else(|| record.id.to_string()),
                    },
                    TargetOutcome::NotFound { term } => {
                        SessionEvent::NotFound { term: term.clone() }
                    }
                    TargetOutcome::Skipped { term } => {
                        SessionEvent::Skipped { term: term.clone() }
                    }
                };
                let _ = events.send(event);

                (index, outcome)
            }
        })
        .buffer_unordered(max_workers.max(1))
        .collect()
        .await;

    indexed.sort_by_key(|(index, _)| *index);
    let _ = events.send(SessionEvent::Done);
    indexed.into_iter().map(|(_, outcome)| outcome).collect()
}

/// Search, pick the first candidate, and fetch its details.
async fn scrape_term(
    adapter: &dyn SourceAdapter,
    term: String,
    platform: &str,
    quota: &QuotaState,
) -> TargetOutcome {
    let candidates = match adapter.search(&term, platform).await {
        Ok(candidates) => candidates,
        Err(e) => {
            log::warn!("Search for '{}' failed: {}", term, e);
            return TargetOutcome::NotFound { term };
        }
    };

    let Some(candidate) = candidates.into_iter().next() else {
        // An empty result right after the quota died means the search was
        // cut short, not that the catalog has no entry.
        if quota.is_exhausted() {
            return TargetOutcome::Skipped { term };
        }
        return TargetOutcome::NotFound { term };
    };

    let mut record = candidate.into_record(adapter.name());
    if let Err(e) = adapter.fetch_details(&mut record).await {
        log::warn!("Detail fetch for '{}' failed: {}", term, e);
    }
    TargetOutcome::Scraped(record)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use romdex_core::{Candidate, SourceId};
    use romdex_sources::ScrapeError;

    use super::*;

    struct CannedAdapter {
        candidates: HashMap<String, Candidate>,
        searches: AtomicUsize,
    }

    impl CannedAdapter {
        fn new(entries: &[(&str, &str)]) -> Self {
            let candidates = entries
                .iter()
                .map(|(term, id)| {
                    (
                        term.to_string(),
                        Candidate {
                            id: SourceId::new(*id),
                            title: term.to_string(),
                            platform: "Amiga".to_string(),
                        },
                    )
                })
                .collect();
            Self {
                candidates,
                searches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SourceAdapter for CannedAdapter {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn search(
            &self,
            term: &str,
            _platform: &str,
        ) -> Result<Vec<Candidate>, ScrapeError> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            Ok(self.candidates.get(term).cloned().into_iter().collect())
        }

        async fn fetch_details(&self, record: &mut GameRecord) -> Result<(), ScrapeError> {
            record.description = Some("details".to_string());
            Ok(())
        }
    }

    /// Zeroes the shared quota on its first search, like an adapter that
    /// hits the daily limit mid-session.
    struct ExhaustingAdapter {
        quota: Arc<QuotaState>,
        searches: AtomicUsize,
    }

    #[async_trait]
    impl SourceAdapter for ExhaustingAdapter {
        fn name(&self) -> &'static str {
            "exhausting"
        }

        async fn search(
            &self,
            _term: &str,
            _platform: &str,
        ) -> Result<Vec<Candidate>, ScrapeError> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            self.quota.exhaust();
            Ok(Vec::new())
        }

        async fn fetch_details(&self, _record: &mut GameRecord) -> Result<(), ScrapeError> {
            Ok(())
        }
    }

    fn terms(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[tokio::test]
    async fn outcomes_come_back_in_input_order() {
        let adapter =
            CannedAdapter::new(&[("Turrican II", "7"), ("Lotus 2", "8"), ("Lemmings", "9")]);
        let quota = QuotaState::new();
        let (events, _rx) = mpsc::unbounded_channel();

        let outcomes = scrape_terms(
            &adapter,
            terms(&["Turrican II", "Lotus 2", "Lemmings"]),
            "Amiga",
            &quota,
            3,
            events,
        )
        .await;

        let titles: Vec<_> = outcomes
            .iter()
            .map(|outcome| match outcome {
                TargetOutcome::Scraped(record) => record.title.clone().unwrap(),
                other => panic!("unexpected outcome: {:?}", other),
            })
            .collect();
        assert_eq!(titles, vec!["Turrican II", "Lotus 2", "Lemmings"]);
    }

    #[tokio::test]
    async fn unknown_terms_come_back_not_found() {
        let adapter = CannedAdapter::new(&[("Lemmings", "9")]);
        let quota = QuotaState::new();
        let (events, _rx) = mpsc::unbounded_channel();

        let outcomes = scrape_terms(
            &adapter,
            terms(&["Lemmings", "No Such Game"]),
            "Amiga",
            &quota,
            2,
            events,
        )
        .await;

        assert!(matches!(outcomes[0], TargetOutcome::Scraped(_)));
        match &outcomes[1] {
            TargetOutcome::NotFound { term } => assert_eq!(term, "No Such Game"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn details_are_fetched_for_matches() {
        let adapter = CannedAdapter::new(&[("Lemmings", "9")]);
        let quota = QuotaState::new();
        let (events, _rx) = mpsc::unbounded_channel();

        let outcomes =
            scrape_terms(&adapter, terms(&["Lemmings"]), "Amiga", &quota, 1, events).await;

        match &outcomes[0] {
            TargetOutcome::Scraped(record) => {
                assert_eq!(record.source.as_deref(), Some("canned"));
                assert_eq!(record.description.as_deref(), Some("details"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn exhausted_quota_skips_before_searching() {
        let adapter = CannedAdapter::new(&[("Lemmings", "9")]);
        let quota = QuotaState::new();
        quota.exhaust();
        let (events, _rx) = mpsc::unbounded_channel();

        let outcomes = scrape_terms(
            &adapter,
            terms(&["Lemmings", "Lotus 2"]),
            "Amiga",
            &quota,
            2,
            events,
        )
        .await;

        assert!(
            outcomes
                .iter()
                .all(|outcome| matches!(outcome, TargetOutcome::Skipped { .. }))
        );
        assert_eq!(adapter.searches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn mid_session_exhaustion_stops_later_lookups() {
        let quota = Arc::new(QuotaState::new());
        let adapter = ExhaustingAdapter {
            quota: Arc::clone(&quota),
            searches: AtomicUsize::new(0),
        };
        let (events, _rx) = mpsc::unbounded_channel();

        let outcomes = scrape_terms(
            &adapter,
            terms(&["One", "Two", "Three"]),
            "Amiga",
            &quota,
            1,
            events,
        )
        .await;

        // Only the first term reaches the catalog; it and everything after
        // come back skipped.
        assert_eq!(adapter.searches.load(Ordering::SeqCst), 1);
        assert!(
            outcomes
                .iter()
                .all(|outcome| matches!(outcome, TargetOutcome::Skipped { .. }))
        );
    }

    #[tokio::test]
    async fn session_events_end_with_done() {
        let adapter = CannedAdapter::new(&[("Lemmings", "9")]);
        let quota = QuotaState::new();
        let (events, mut rx) = mpsc::unbounded_channel();

        scrape_terms(&adapter, terms(&["Lemmings"]), "Amiga", &quota, 1, events).await;

        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(event);
        }
        assert!(matches!(seen.first(), Some(SessionEvent::Searching { .. })));
        assert!(matches!(seen.last(), Some(SessionEvent::Done)));
    }
}
