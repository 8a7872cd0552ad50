//! The contract every catalog adapter satisfies, and the registry that
//! constructs them by name.

use std::sync::Arc;

use async_trait::async_trait;
use romdex_core::{Candidate, GameRecord, QuotaState};

use crate::credentials::Credentials;
use crate::error::ScrapeError;
use crate::igdb::IgdbAdapter;
use crate::options::ScrapeOptions;
use crate::screenscraper::ScreenScraperAdapter;
use crate::transport::Transport;

/// A remote metadata catalog.
///
/// Shared semantics, regardless of source:
///
/// - `search` yields candidates already filtered to the requested platform.
///   "Nothing found" and degraded responses (unreachable service, payload
///   that doesn't parse) both come back as an empty list, never as an error.
/// - `fetch_details` fills fields on the given record in the adapter's own
///   resolution order, leaving any field the source has no data for at its
///   current value. A degraded response leaves the record untouched.
/// - An adapter that recognizes its source's quota-exhaustion signal zeroes
///   the session's shared [`QuotaState`] and stops touching the network for
///   the rest of the session.
///
/// Errors are reserved for construction and transport-plumbing misuse.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Short lowercase identifier, e.g. `"igdb"`.
    fn name(&self) -> &'static str;

    /// Look up candidates for a title on one platform.
    async fn search(&self, term: &str, platform: &str) -> Result<Vec<Candidate>, ScrapeError>;

    /// Populate `record` from the source's detail payload for `record.id`.
    async fn fetch_details(&self, record: &mut GameRecord) -> Result<(), ScrapeError>;
}

/// All registered source names.
pub const SOURCE_NAMES: &[&str] = &["igdb", "screenscraper"];

/// Construct the adapter registered under `name`.
pub fn for_source(
    name: &str,
    transport: Arc<dyn Transport>,
    quota: Arc<QuotaState>,
    options: ScrapeOptions,
    credentials: &Credentials,
) -> Result<Box<dyn SourceAdapter>, ScrapeError> {
    match name {
        "igdb" => Ok(Box::new(IgdbAdapter::new(
            transport,
            quota,
            options,
            credentials,
        )?)),
        "screenscraper" => Ok(Box::new(ScreenScraperAdapter::new(
            transport,
            quota,
            options,
            credentials,
        )?)),
        _ => Err(ScrapeError::Config(format!(
            "Unknown source '{}'. Known sources: {}",
            name,
            SOURCE_NAMES.join(", ")
        ))),
    }
}
