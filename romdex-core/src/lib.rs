//! Core types for romdex: the normalized game-metadata record, the
//! canonical taxonomies adapters map onto, platform-name equivalence, and
//! the shared request-quota counter.
//!
//! Everything here is source-agnostic. The adapters in `romdex-sources`
//! translate catalog-specific payloads into these types.

pub mod fields;
pub mod platform;
pub mod quota;
pub mod record;
pub mod taxonomy;
pub mod text;

pub use fields::FieldKind;
pub use quota::QuotaState;
pub use record::{Candidate, GameRecord, SourceId};
pub use taxonomy::{ALL_REGION_TAGS, AgeLabel, PlayerBucket, RegionTag, RegionTagParseError};
