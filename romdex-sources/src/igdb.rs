//! IGDB catalog adapter.
//!
//! IGDB speaks the apicalypse query dialect over POST and keys almost
//! everything by numeric code: regions, age ratings and game modes arrive
//! as enum ids that get mapped onto the canonical taxonomies here. Search
//! excludes re-release editions (`version_parent = null`) and fans one
//! entry out into a candidate per listed platform.

use std::sync::Arc;

use async_trait::async_trait;
use romdex_core::{
    AgeLabel, Candidate, FieldKind, GameRecord, PlayerBucket, QuotaState, RegionTag, SourceId,
    platform, text,
};
use serde::Deserialize;

use crate::adapter::SourceAdapter;
use crate::credentials::Credentials;
use crate::error::ScrapeError;
use crate::options::ScrapeOptions;
use crate::transport::{SourceRequest, Transport};

const BASE_URL: &str = "https://api-v3.igdb.com";

/// `total_rating` is a 0-100 percentage.
const NATIVE_RATING_MAX: f64 = 100.0;

/// Field resolution order for detail payloads.
const FETCH_ORDER: &[FieldKind] = &[
    FieldKind::ReleaseDate,
    FieldKind::Rating,
    FieldKind::Publisher,
    FieldKind::Developer,
    FieldKind::Description,
    FieldKind::Players,
    FieldKind::Tags,
    FieldKind::Ages,
    FieldKind::Cover,
    FieldKind::Screenshot,
];

// --- wire types -----------------------------------------------------------
//
// Every field is defaulted: IGDB omits whatever an entry has no data for,
// and a partial object must never sink the whole payload.

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    game: Option<SearchGame>,
    /// Present on the error stub IGDB serves once the quota is spent.
    #[serde(default)]
    status: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SearchGame {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    platforms: Vec<PlatformRef>,
}

#[derive(Debug, Deserialize)]
struct PlatformRef {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct GameDetail {
    #[serde(default)]
    release_dates: Vec<ReleaseDateEntry>,
    #[serde(default)]
    total_rating: Option<f64>,
    #[serde(default)]
    involved_companies: Vec<InvolvedCompany>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    game_modes: Vec<GameMode>,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    age_ratings: Vec<AgeRating>,
    #[serde(default)]
    cover: Option<Image>,
    #[serde(default)]
    screenshots: Vec<Image>,
}

#[derive(Debug, Deserialize)]
struct ReleaseDateEntry {
    /// Epoch seconds.
    #[serde(default)]
    date: Option<i64>,
    #[serde(default)]
    region: Option<i64>,
    #[serde(default)]
    platform: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct InvolvedCompany {
    #[serde(default)]
    company: Option<Company>,
    #[serde(default)]
    developer: bool,
    #[serde(default)]
    publisher: bool,
}

#[derive(Debug, Deserialize)]
struct Company {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct GameMode {
    #[serde(default)]
    id: i64,
}

#[derive(Debug, Deserialize)]
struct Genre {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct AgeRating {
    #[serde(default)]
    rating: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Image {
    #[serde(default)]
    url: String,
}

// --- taxonomy mappers -----------------------------------------------------

/// Release-date region codes.
fn region_from_code(code: i64) -> Option<RegionTag> {
    match code {
        1 => Some(RegionTag::Europe),
        2 => Some(RegionTag::Usa),
        3 => Some(RegionTag::Australia),
        4 => Some(RegionTag::NewZealand),
        5 => Some(RegionTag::Japan),
        6 => Some(RegionTag::China),
        7 => Some(RegionTag::Asia),
        8 => Some(RegionTag::World),
        _ => None,
    }
}

/// Age-rating codes: 1-5 are PEGI, 7-12 are ESRB. Code 6 is "rating
/// pending" and maps to no label.
fn age_label_from_code(code: i64) -> Option<AgeLabel> {
    match code {
        1 => Some(AgeLabel::Pegi3),
        2 => Some(AgeLabel::Pegi7),
        3 => Some(AgeLabel::Pegi12),
        4 => Some(AgeLabel::Pegi16),
        5 => Some(AgeLabel::Pegi18),
        7 => Some(AgeLabel::EarlyChildhood),
        8 => Some(AgeLabel::Everyone),
        9 => Some(AgeLabel::Everyone10),
        10 => Some(AgeLabel::Teen),
        11 => Some(AgeLabel::Mature),
        12 => Some(AgeLabel::AdultsOnly),
        _ => None,
    }
}

/// Game modes: 1 single player, 2 multiplayer, 3 co-op, 4 split screen,
/// 5 MMO. Anything beyond plain single player lands in the multi bucket.
fn bucket_from_modes(modes: &[GameMode]) -> PlayerBucket {
    for mode in modes {
        if mode.id != 1 {
            return PlayerBucket::Multi;
        }
    }
    PlayerBucket::One
}

// --- extraction helpers ---------------------------------------------------

/// A present-but-zero rating means "no score", not a true zero.
fn normalize_rating(total_rating: Option<f64>) -> Option<f32> {
    let value = total_rating?;
    if value == 0.0 {
        return None;
    }
    Some((value / NATIVE_RATING_MAX) as f32)
}

/// Walk the caller's region priorities over the release-date entries.
///
/// A date must match both the current priority region and the platform the
/// record was retained for; the first such entry wins and the scan stops,
/// whether or not it carries a usable timestamp.
fn resolve_release_date(
    dates: &[ReleaseDateEntry],
    priorities: &[RegionTag],
    date_platform: Option<&str>,
) -> Option<String> {
    let date_platform = date_platform?;
    for priority in priorities {
        for entry in dates {
            let region_matches = entry
                .region
                .and_then(region_from_code)
                .is_some_and(|region| region == *priority);
            let platform_matches = entry
                .platform
                .is_some_and(|id| id.to_string() == date_platform);
            if region_matches && platform_matches {
                return entry.date.and_then(format_epoch_date);
            }
        }
    }
    None
}

/// Epoch seconds to `YYYYMMDD`, UTC.
fn format_epoch_date(epoch_seconds: i64) -> Option<String> {
    chrono::DateTime::from_timestamp(epoch_seconds, 0).map(|dt| dt.format("%Y%m%d").to_string())
}

/// First involved company carrying the selected role flag.
fn company_with_role(
    companies: &[InvolvedCompany],
    role: impl Fn(&InvolvedCompany) -> bool,
) -> Option<String> {
    companies
        .iter()
        .find(|c| role(c))
        .and_then(|c| c.company.as_ref())
        .map(|c| c.name.clone())
}

fn join_genres(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// IGDB image URLs arrive protocol-relative and thumb-sized; pin https and
/// swap the size token.
fn image_url(raw: &str, size: &str) -> String {
    let absolute = if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.to_string()
    };
    absolute.replace("t_thumb", size)
}

/// IGDB rejects with a plain-text body once the global allowance is spent.
fn body_signals_quota(body: &str) -> bool {
    body.contains("Limits exceeded")
}

// --- adapter --------------------------------------------------------------

pub struct IgdbAdapter {
    transport: Arc<dyn Transport>,
    quota: Arc<QuotaState>,
    options: ScrapeOptions,
    api_key: String,
    base_url: String,
}

impl IgdbAdapter {
    pub fn new(
        transport: Arc<dyn Transport>,
        quota: Arc<QuotaState>,
        options: ScrapeOptions,
        credentials: &Credentials,
    ) -> Result<Self, ScrapeError> {
        let api_key = credentials.igdb_api_key.clone().ok_or_else(|| {
            ScrapeError::Config(
                "Missing IGDB API key. Set ROMDEX_IGDB_APIKEY env var or add to config file"
                    .to_string(),
            )
        })?;
        Ok(Self {
            transport,
            quota,
            options,
            api_key,
            base_url: BASE_URL.to_string(),
        })
    }

    fn request(&self, endpoint: &str, query: String) -> SourceRequest {
        SourceRequest::post(format!("{}{}", self.base_url, endpoint), query)
            .header("user-key", &self.api_key)
    }

    fn search_query(term: &str) -> String {
        // A literal quote would close the apicalypse string early.
        let term = term.replace('"', "");
        format!(
            "fields game.name,game.platforms.name; search \"{term}\"; \
             where game != null & game.version_parent = null;"
        )
    }

    fn detail_query(primary_id: &str) -> String {
        format!(
            "fields age_ratings.rating,age_ratings.category,total_rating,cover.url,\
             game_modes.slug,genres.name,screenshots.url,summary,release_dates.date,\
             release_dates.region,release_dates.platform,involved_companies.company.name,\
             involved_companies.developer,involved_companies.publisher; \
             where id = {primary_id};"
        )
    }

    fn resolve_fields(&self, detail: &GameDetail, record: &mut GameRecord) {
        for kind in FETCH_ORDER {
            match kind {
                FieldKind::ReleaseDate => {
                    if let Some(date) = resolve_release_date(
                        &detail.release_dates,
                        &self.options.region_priorities,
                        record.id.date_platform(),
                    ) {
                        record.release_date = Some(date);
                    }
                }
                FieldKind::Rating => {
                    if let Some(rating) = normalize_rating(detail.total_rating) {
                        record.rating = Some(rating);
                    }
                }
                FieldKind::Publisher => {
                    if let Some(name) =
                        company_with_role(&detail.involved_companies, |c| c.publisher)
                    {
                        record.publisher = Some(name);
                    }
                }
                FieldKind::Developer => {
                    if let Some(name) =
                        company_with_role(&detail.involved_companies, |c| c.developer)
                    {
                        record.developer = Some(name);
                    }
                }
                FieldKind::Description => {
                    if let Some(summary) = &detail.summary {
                        record.description = Some(text::strip_html_tags(summary));
                    }
                }
                FieldKind::Players => {
                    record.players = Some(bucket_from_modes(&detail.game_modes));
                }
                FieldKind::Tags => {
                    let joined = join_genres(&detail.genres);
                    if !joined.is_empty() {
                        record.tags = Some(joined);
                    }
                }
                FieldKind::Ages => {
                    if let Some(label) = detail
                        .age_ratings
                        .first()
                        .and_then(|entry| entry.rating)
                        .and_then(age_label_from_code)
                    {
                        record.ages = Some(label);
                    }
                }
                FieldKind::Cover => {
                    if self.options.fetch_covers {
                        if let Some(cover) = &detail.cover {
                            if !cover.url.is_empty() {
                                record.cover_url = Some(image_url(&cover.url, "t_original"));
                            }
                        }
                    }
                }
                FieldKind::Screenshot => {
                    if self.options.fetch_screenshots {
                        if let Some(shot) = detail.screenshots.first() {
                            if !shot.url.is_empty() {
                                record.screenshot_url =
                                    Some(image_url(&shot.url, "t_screenshot_huge"));
                            }
                        }
                    }
                }
            }
        }
    }
}

#[async_trait]
impl SourceAdapter for IgdbAdapter {
    fn name(&self) -> &'static str {
        "igdb"
    }

    async fn search(&self, term: &str, platform_name: &str) -> Result<Vec<Candidate>, ScrapeError> {
        if self.quota.is_exhausted() {
            log::debug!("igdb: request allowance spent, skipping search for '{}'", term);
            return Ok(Vec::new());
        }

        let request = self.request("/search/", Self::search_query(term));
        let body = match self.transport.fetch(&request).await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("igdb: search request for '{}' failed: {}", term, e);
                return Ok(Vec::new());
            }
        };

        let body_text = String::from_utf8_lossy(&body);
        if body_signals_quota(&body_text) {
            log::error!("igdb: request limit reached, stopping for this session");
            self.quota.exhaust();
            return Ok(Vec::new());
        }

        let hits: Vec<SearchHit> = match serde_json::from_slice(&body) {
            Ok(hits) => hits,
            Err(e) => {
                log::warn!("igdb: unparseable search response for '{}': {}", term, e);
                return Ok(Vec::new());
            }
        };

        if hits.first().is_some_and(|hit| hit.status == Some(403)) {
            log::error!("igdb: request limit reached, stopping for this session");
            self.quota.exhaust();
            return Ok(Vec::new());
        }

        let mut candidates = Vec::new();
        for hit in hits {
            let Some(game) = hit.game else { continue };
            let mut id = SourceId::new(game.id.to_string());
            for platform_ref in &game.platforms {
                // Variants accumulate across the listing; a candidate for
                // the n-th platform carries the first n variant ids and the
                // matching platform is always the last of them.
                id.push_variant(platform_ref.id.to_string());
                if platform::names_match(&platform_ref.name, platform_name) {
                    candidates.push(Candidate {
                        id: id.clone(),
                        title: game.name.clone(),
                        platform: platform_ref.name.clone(),
                    });
                }
            }
        }
        Ok(candidates)
    }

    async fn fetch_details(&self, record: &mut GameRecord) -> Result<(), ScrapeError> {
        if record.id.is_empty() {
            log::debug!("igdb: detail fetch requested for a record without an id");
            return Ok(());
        }
        if self.quota.is_exhausted() {
            log::debug!(
                "igdb: request allowance spent, skipping details for id {}",
                record.id.primary
            );
            return Ok(());
        }

        let request = self.request("/games/", Self::detail_query(&record.id.primary));
        let body = match self.transport.fetch(&request).await {
            Ok(body) => body,
            Err(e) => {
                log::warn!(
                    "igdb: detail request for id {} failed: {}",
                    record.id.primary,
                    e
                );
                return Ok(());
            }
        };

        let body_text = String::from_utf8_lossy(&body);
        if body_signals_quota(&body_text) {
            log::error!("igdb: request limit reached, stopping for this session");
            self.quota.exhaust();
            return Ok(());
        }

        let details: Vec<GameDetail> = match serde_json::from_slice(&body) {
            Ok(details) => details,
            Err(e) => {
                log::warn!(
                    "igdb: unparseable detail response for id {}: {}",
                    record.id.primary,
                    e
                );
                return Ok(());
            }
        };

        let Some(detail) = details.into_iter().next() else {
            log::debug!("igdb: no detail payload for id {}", record.id.primary);
            return Ok(());
        };

        self.resolve_fields(&detail, record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Replays canned response bodies in order; empty-array JSON once the
    /// queue runs dry.
    struct FakeTransport {
        responses: Mutex<VecDeque<Vec<u8>>>,
        calls: AtomicUsize,
    }

    impl FakeTransport {
        fn with_responses(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.iter().map(|r| r.as_bytes().to_vec()).collect()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn fetch(&self, _request: &SourceRequest) -> Result<Vec<u8>, ScrapeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            Ok(responses.pop_front().unwrap_or_else(|| b"[]".to_vec()))
        }
    }

    /// Always fails as if the network were down.
    struct OfflineTransport;

    #[async_trait]
    impl Transport for OfflineTransport {
        async fn fetch(&self, _request: &SourceRequest) -> Result<Vec<u8>, ScrapeError> {
            Err(ScrapeError::Io(std::io::Error::other("connection refused")))
        }
    }

    fn test_credentials() -> Credentials {
        Credentials {
            igdb_api_key: Some("test-key".to_string()),
            ss_dev_id: None,
            ss_dev_password: None,
            ss_soft_name: "romdex".to_string(),
            ss_user_id: None,
            ss_user_password: None,
        }
    }

    fn adapter_over(transport: Arc<dyn Transport>) -> (IgdbAdapter, Arc<QuotaState>) {
        let quota = Arc::new(QuotaState::new());
        let adapter = IgdbAdapter::new(
            transport,
            Arc::clone(&quota),
            ScrapeOptions::default(),
            &test_credentials(),
        )
        .unwrap();
        (adapter, quota)
    }

    const MULTI_PLATFORM_SEARCH: &str = r#"[
        {"id": 501, "game": {"id": 1942, "name": "Pinball Dreams",
            "platforms": [{"id": 16, "name": "Amiga"}, {"id": 15, "name": "Commodore 64"}]}},
        {"id": 502, "game": {"id": 2077, "name": "Pinball Fantasies",
            "platforms": [{"id": 6, "name": "PC (Microsoft Windows)"}]}}
    ]"#;

    #[tokio::test]
    async fn search_retains_only_matching_platforms() {
        let transport = FakeTransport::with_responses(&[MULTI_PLATFORM_SEARCH]);
        let (adapter, _) = adapter_over(transport);

        let candidates = adapter.search("pinball", "Amiga").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Pinball Dreams");
        assert_eq!(candidates[0].platform, "Amiga");
        assert_eq!(candidates[0].id.primary, "1942");
        assert_eq!(candidates[0].id.platform_variants, vec!["16"]);
    }

    #[tokio::test]
    async fn search_matches_platform_aliases() {
        let transport = FakeTransport::with_responses(&[MULTI_PLATFORM_SEARCH]);
        let (adapter, _) = adapter_over(transport);

        let candidates = adapter.search("pinball", "c64").await.unwrap();
        assert_eq!(candidates.len(), 1);
        // Second listed platform: both variant ids accumulated, match last.
        assert_eq!(candidates[0].id.platform_variants, vec!["16", "15"]);
        assert_eq!(candidates[0].id.date_platform(), Some("15"));
    }

    #[tokio::test]
    async fn search_yields_nothing_for_unlisted_platform() {
        let transport = FakeTransport::with_responses(&[MULTI_PLATFORM_SEARCH]);
        let (adapter, _) = adapter_over(transport);

        let candidates = adapter.search("pinball", "ZX Spectrum").await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn plain_text_quota_body_exhausts_and_skips() {
        let transport =
            FakeTransport::with_responses(&["Limits exceeded: monthly request allowance"]);
        let (adapter, quota) = adapter_over(transport.clone());

        let candidates = adapter.search("doom", "snes").await.unwrap();
        assert!(candidates.is_empty());
        assert!(quota.is_exhausted());

        // Second search must not reach the network.
        let candidates = adapter.search("quake", "snes").await.unwrap();
        assert!(candidates.is_empty());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn status_403_stub_exhausts_quota() {
        let transport = FakeTransport::with_responses(&[
            r#"[{"title": "Forbidden", "status": 403, "cause": "request limit"}]"#,
        ]);
        let (adapter, quota) = adapter_over(transport);

        let candidates = adapter.search("doom", "snes").await.unwrap();
        assert!(candidates.is_empty());
        assert!(quota.is_exhausted());
    }

    #[tokio::test]
    async fn unreachable_service_degrades_to_empty_search() {
        let (adapter, quota) = adapter_over(Arc::new(OfflineTransport));
        let candidates = adapter.search("doom", "snes").await.unwrap();
        assert!(candidates.is_empty());
        assert!(!quota.is_exhausted());
    }

    #[tokio::test]
    async fn malformed_search_payload_degrades_to_empty() {
        let transport = FakeTransport::with_responses(&["{not json"]);
        let (adapter, _) = adapter_over(transport);
        let candidates = adapter.search("doom", "snes").await.unwrap();
        assert!(candidates.is_empty());
    }

    fn record_for(primary: &str, variants: &[&str]) -> GameRecord {
        let mut id = SourceId::new(primary);
        for variant in variants {
            id.push_variant(*variant);
        }
        GameRecord {
            id,
            title: Some("Pinball Dreams".to_string()),
            platform: Some("Amiga".to_string()),
            source: Some("igdb".to_string()),
            ..GameRecord::default()
        }
    }

    #[tokio::test]
    async fn detail_payload_fills_record_fields() {
        let detail = r#"[{
            "total_rating": 84.5,
            "summary": "A <b>pinball</b> classic.",
            "release_dates": [
                {"date": 1016755200, "region": 2, "platform": 16},
                {"date": 86400, "region": 1, "platform": 16}
            ],
            "involved_companies": [
                {"company": {"name": "Digital Illusions"}, "developer": true, "publisher": false},
                {"company": {"name": "21st Century"}, "developer": false, "publisher": true}
            ],
            "game_modes": [{"id": 1}],
            "genres": [{"name": "Pinball"}, {"name": "Arcade"}],
            "age_ratings": [{"rating": 8}],
            "cover": {"url": "//images.igdb.com/t_thumb/co1234.jpg"},
            "screenshots": [{"url": "//images.igdb.com/t_thumb/sc99.jpg"}]
        }]"#;
        let transport = FakeTransport::with_responses(&[detail]);
        let (adapter, _) = adapter_over(transport);

        let mut record = record_for("1942", &["16"]);
        adapter.fetch_details(&mut record).await.unwrap();

        // eu outranks us in the default priorities.
        assert_eq!(record.release_date.as_deref(), Some("19700102"));
        assert_eq!(record.rating, Some(0.845));
        assert_eq!(record.developer.as_deref(), Some("Digital Illusions"));
        assert_eq!(record.publisher.as_deref(), Some("21st Century"));
        assert_eq!(record.description.as_deref(), Some("A pinball classic."));
        assert_eq!(record.players, Some(PlayerBucket::One));
        assert_eq!(record.tags.as_deref(), Some("Pinball, Arcade"));
        assert_eq!(record.ages, Some(AgeLabel::Everyone));
        assert_eq!(
            record.cover_url.as_deref(),
            Some("https://images.igdb.com/t_original/co1234.jpg")
        );
        assert_eq!(
            record.screenshot_url.as_deref(),
            Some("https://images.igdb.com/t_screenshot_huge/sc99.jpg")
        );
    }

    #[tokio::test]
    async fn empty_detail_payload_leaves_record_unmodified() {
        let transport = FakeTransport::with_responses(&["[]"]);
        let (adapter, _) = adapter_over(transport);

        let mut record = record_for("1942", &["16"]);
        let before = record.clone();
        adapter.fetch_details(&mut record).await.unwrap();
        assert_eq!(record, before);
    }

    #[tokio::test]
    async fn malformed_detail_payload_leaves_record_unmodified() {
        let transport = FakeTransport::with_responses(&["<html>bad gateway</html>"]);
        let (adapter, _) = adapter_over(transport);

        let mut record = record_for("1942", &["16"]);
        let before = record.clone();
        adapter.fetch_details(&mut record).await.unwrap();
        assert_eq!(record, before);
    }

    #[tokio::test]
    async fn quota_body_on_details_exhausts_and_leaves_record() {
        let transport = FakeTransport::with_responses(&["Limits exceeded"]);
        let (adapter, quota) = adapter_over(transport);

        let mut record = record_for("1942", &["16"]);
        let before = record.clone();
        adapter.fetch_details(&mut record).await.unwrap();
        assert_eq!(record, before);
        assert!(quota.is_exhausted());
    }

    fn date_entry(date: i64, region: i64, platform: i64) -> ReleaseDateEntry {
        ReleaseDateEntry {
            date: Some(date),
            region: Some(region),
            platform: Some(platform),
        }
    }

    #[test]
    fn release_date_follows_region_priorities() {
        let dates = [date_entry(1016755200, 2, 16), date_entry(86400, 1, 16)];

        let us_first = resolve_release_date(
            &dates,
            &[RegionTag::Usa, RegionTag::Europe],
            Some("16"),
        );
        assert_eq!(us_first.as_deref(), Some("20020322"));

        let eu_first = resolve_release_date(
            &dates,
            &[RegionTag::Europe, RegionTag::Usa],
            Some("16"),
        );
        assert_eq!(eu_first.as_deref(), Some("19700102"));
    }

    #[test]
    fn release_date_requires_platform_match() {
        // Same region on two platforms; only the retained platform counts.
        let dates = [date_entry(0, 1, 6), date_entry(86400, 1, 14)];
        let resolved = resolve_release_date(&dates, &[RegionTag::Europe], Some("14"));
        assert_eq!(resolved.as_deref(), Some("19700102"));

        let resolved = resolve_release_date(&dates, &[RegionTag::Europe], Some("99"));
        assert_eq!(resolved, None);
    }

    #[test]
    fn release_date_without_variants_stays_unset() {
        let dates = [date_entry(86400, 1, 14)];
        assert_eq!(resolve_release_date(&dates, &[RegionTag::Europe], None), None);
    }

    #[test]
    fn epoch_formatting_is_utc() {
        assert_eq!(format_epoch_date(0).as_deref(), Some("19700101"));
        assert_eq!(format_epoch_date(86400).as_deref(), Some("19700102"));
        assert_eq!(format_epoch_date(1016755200).as_deref(), Some("20020322"));
    }

    #[test]
    fn rating_normalizes_to_unit_scale() {
        assert_eq!(normalize_rating(Some(84.5)), Some(0.845));
        assert_eq!(normalize_rating(Some(100.0)), Some(1.0));
        assert_eq!(normalize_rating(Some(0.0)), None);
        assert_eq!(normalize_rating(None), None);
        // Out-of-range inputs are divided, not clamped.
        assert_eq!(normalize_rating(Some(150.0)), Some(1.5));
        assert_eq!(normalize_rating(Some(-10.0)), Some(-0.1));
    }

    #[test]
    fn player_bucket_defaults_to_single() {
        assert_eq!(bucket_from_modes(&[]), PlayerBucket::One);
        assert_eq!(bucket_from_modes(&[GameMode { id: 1 }]), PlayerBucket::One);
        assert_eq!(
            bucket_from_modes(&[GameMode { id: 1 }, GameMode { id: 3 }]),
            PlayerBucket::Multi
        );
        assert_eq!(bucket_from_modes(&[GameMode { id: 5 }]), PlayerBucket::Multi);
    }

    #[test]
    fn genres_join_in_payload_order() {
        let genres = [
            Genre {
                name: "RPG".to_string(),
            },
            Genre {
                name: "Action".to_string(),
            },
        ];
        assert_eq!(join_genres(&genres), "RPG, Action");
        assert_eq!(join_genres(&[]), "");
    }

    #[test]
    fn age_codes_map_to_labels() {
        assert_eq!(age_label_from_code(1), Some(AgeLabel::Pegi3));
        assert_eq!(age_label_from_code(5), Some(AgeLabel::Pegi18));
        assert_eq!(age_label_from_code(6), None);
        assert_eq!(age_label_from_code(7), Some(AgeLabel::EarlyChildhood));
        assert_eq!(age_label_from_code(12), Some(AgeLabel::AdultsOnly));
        assert_eq!(age_label_from_code(99), None);
    }

    #[test]
    fn company_selection_honors_role_flags() {
        let companies = [
            InvolvedCompany {
                company: Some(Company {
                    name: "DICE".to_string(),
                }),
                developer: true,
                publisher: false,
            },
            InvolvedCompany {
                company: Some(Company {
                    name: "EA".to_string(),
                }),
                developer: false,
                publisher: true,
            },
        ];
        assert_eq!(
            company_with_role(&companies, |c| c.developer).as_deref(),
            Some("DICE")
        );
        assert_eq!(
            company_with_role(&companies, |c| c.publisher).as_deref(),
            Some("EA")
        );
        assert_eq!(company_with_role(&[], |c| c.publisher), None);
    }

    #[test]
    fn image_urls_get_pinned_and_resized() {
        assert_eq!(
            image_url("//images.igdb.com/t_thumb/co1.jpg", "t_original"),
            "https://images.igdb.com/t_original/co1.jpg"
        );
        assert_eq!(
            image_url("https://images.igdb.com/t_thumb/sc1.jpg", "t_screenshot_huge"),
            "https://images.igdb.com/t_screenshot_huge/sc1.jpg"
        );
    }

    #[test]
    fn search_query_embeds_term_and_filters() {
        let query = IgdbAdapter::search_query("pinball \"dreams\"");
        assert!(query.contains("search \"pinball dreams\""));
        assert!(query.contains("game.version_parent = null"));
    }
}
