//! Canonical vocabularies shared by every catalog source.
//!
//! Remote catalogs disagree on how regions, age ratings, and player counts
//! are encoded (numeric enums, locale strings, free text). Adapters map
//! whatever their source speaks onto the closed sets below so the rest of
//! the pipeline never sees source-specific codes.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Region tag used to rank release dates and region-keyed media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionTag {
    Europe,
    Usa,
    Australia,
    NewZealand,
    Japan,
    China,
    Asia,
    World,
}

/// All region tags, in canonical declaration order.
pub const ALL_REGION_TAGS: &[RegionTag] = &[
    RegionTag::Europe,
    RegionTag::Usa,
    RegionTag::Australia,
    RegionTag::NewZealand,
    RegionTag::Japan,
    RegionTag::China,
    RegionTag::Asia,
    RegionTag::World,
];

impl RegionTag {
    /// Short lowercase code, matching the codes used in region-keyed
    /// catalog payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionTag::Europe => "eu",
            RegionTag::Usa => "us",
            RegionTag::Australia => "au",
            RegionTag::NewZealand => "nz",
            RegionTag::Japan => "jp",
            RegionTag::China => "cn",
            RegionTag::Asia => "asi",
            RegionTag::World => "wor",
        }
    }

    /// Default release-date preference order. Covers every tag exactly once,
    /// Europe first.
    pub fn default_priorities() -> &'static [RegionTag] {
        &[
            RegionTag::Europe,
            RegionTag::Usa,
            RegionTag::World,
            RegionTag::Japan,
            RegionTag::Australia,
            RegionTag::NewZealand,
            RegionTag::China,
            RegionTag::Asia,
        ]
    }
}

impl fmt::Display for RegionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a region code can't be parsed.
#[derive(Debug, Clone)]
pub struct RegionTagParseError {
    input: String,
}

impl fmt::Display for RegionTagParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown region code: '{}'", self.input)
    }
}

impl std::error::Error for RegionTagParseError {}

impl FromStr for RegionTag {
    type Err = RegionTagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        for tag in ALL_REGION_TAGS {
            if tag.as_str() == lower {
                return Ok(*tag);
            }
        }
        // Common long-form spellings accepted for convenience.
        match lower.as_str() {
            "europe" => Ok(RegionTag::Europe),
            "usa" | "america" => Ok(RegionTag::Usa),
            "australia" => Ok(RegionTag::Australia),
            "newzealand" | "new zealand" => Ok(RegionTag::NewZealand),
            "japan" => Ok(RegionTag::Japan),
            "china" => Ok(RegionTag::China),
            "asia" => Ok(RegionTag::Asia),
            "world" | "worldwide" => Ok(RegionTag::World),
            _ => Err(RegionTagParseError {
                input: s.to_string(),
            }),
        }
    }
}

/// Age-classification label: PEGI buckets plus ESRB classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeLabel {
    Pegi3,
    Pegi7,
    Pegi12,
    Pegi16,
    Pegi18,
    EarlyChildhood,
    Everyone,
    Everyone10,
    Teen,
    Mature,
    AdultsOnly,
}

impl AgeLabel {
    /// Display form: PEGI labels are bare minimum ages, ESRB labels are the
    /// usual class abbreviations.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeLabel::Pegi3 => "3",
            AgeLabel::Pegi7 => "7",
            AgeLabel::Pegi12 => "12",
            AgeLabel::Pegi16 => "16",
            AgeLabel::Pegi18 => "18",
            AgeLabel::EarlyChildhood => "EC",
            AgeLabel::Everyone => "E",
            AgeLabel::Everyone10 => "E10",
            AgeLabel::Teen => "T",
            AgeLabel::Mature => "M",
            AgeLabel::AdultsOnly => "AO",
        }
    }
}

impl fmt::Display for AgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for AgeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Coarse player-count bucket.
///
/// Sources report player counts in wildly different shapes (mode lists,
/// ranges, free text), so records only distinguish single-player from
/// anything more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerBucket {
    One,
    Multi,
}

impl PlayerBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerBucket::One => "1",
            PlayerBucket::Multi => "2",
        }
    }
}

impl fmt::Display for PlayerBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for PlayerBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
