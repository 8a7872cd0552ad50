//! Record fields as first-class values.

/// A record field a detail payload can populate.
///
/// Adapters resolve fields by walking an explicit ordered list of these
/// instead of a hard-wired sequence, so the resolution order is visible
/// and each step can be exercised on its own. Extractors only read the
/// fetched payload; reordering a list never changes what a field receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    ReleaseDate,
    Rating,
    Publisher,
    Developer,
    Description,
    Players,
    Tags,
    Ages,
    Cover,
    Screenshot,
}
