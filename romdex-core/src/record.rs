//! The normalized metadata record and the identifiers that anchor it.

use std::fmt;

use serde::Serialize;

use crate::taxonomy::{AgeLabel, PlayerBucket};

/// Source-specific identifier for one catalog entry.
///
/// Search can attach platform-variant identifiers to the primary id: one
/// per platform listed on the entry, in listing order. Detail lookups use
/// only `primary`; the last variant names the platform the entry was
/// retained for and disambiguates platform-keyed sub-resources such as
/// release dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceId {
    pub primary: String,
    pub platform_variants: Vec<String>,
}

impl SourceId {
    pub fn new(primary: impl Into<String>) -> Self {
        SourceId {
            primary: primary.into(),
            platform_variants: Vec::new(),
        }
    }

    pub fn push_variant(&mut self, variant: impl Into<String>) {
        self.platform_variants.push(variant.into());
    }

    /// Platform identifier used when a detail payload keys sub-resources by
    /// platform. `None` when search attached no variants.
    pub fn date_platform(&self) -> Option<&str> {
        self.platform_variants.last().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary)?;
        for variant in &self.platform_variants {
            write!(f, ";{variant}")?;
        }
        Ok(())
    }
}

/// One search result: a (title, platform) pairing prior to any detail fetch.
///
/// An entry listed for several platforms yields several candidates, each
/// carrying the variant ids accumulated up to and including its own
/// platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub id: SourceId,
    pub title: String,
    pub platform: String,
}

impl Candidate {
    /// Seed a record from a chosen candidate. The identifier is fixed from
    /// here on; everything else is filled by the detail fetch.
    pub fn into_record(self, source: &str) -> GameRecord {
        GameRecord {
            id: self.id,
            title: (!self.title.is_empty()).then_some(self.title),
            platform: (!self.platform.is_empty()).then_some(self.platform),
            source: Some(source.to_string()),
            ..GameRecord::default()
        }
    }
}

/// Normalized game metadata assembled by a single catalog source.
///
/// Every field is optional: sources routinely lack data, and extractors
/// leave a field at its default rather than erroring when the payload has
/// nothing for it. Partially populated records are a normal outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameRecord {
    pub id: SourceId,
    pub title: Option<String>,
    pub platform: Option<String>,
    /// `YYYYMMDD`.
    pub release_date: Option<String>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    /// Normalized to `0.0..=1.0`.
    pub rating: Option<f32>,
    pub ages: Option<AgeLabel>,
    pub players: Option<PlayerBucket>,
    /// Genre names joined with `", "`, payload order preserved.
    pub tags: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub screenshot_url: Option<String>,
    /// Name of the adapter that produced this record.
    pub source: Option<String>,
}

impl GameRecord {
    /// Number of populated metadata fields, identifier and source excluded.
    pub fn populated_fields(&self) -> usize {
        [
            self.title.is_some(),
            self.platform.is_some(),
            self.release_date.is_some(),
            self.developer.is_some(),
            self.publisher.is_some(),
            self.rating.is_some(),
            self.ages.is_some(),
            self.players.is_some(),
            self.tags.is_some(),
            self.description.is_some(),
            self.cover_url.is_some(),
            self.screenshot_url.is_some(),
        ]
        .iter()
        .filter(|populated| **populated)
        .count()
    }
}
