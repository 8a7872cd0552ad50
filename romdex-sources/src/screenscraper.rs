//! ScreenScraper catalog adapter.
//!
//! ScreenScraper is plain GET endpoints with credentials in the query
//! string. Unlike IGDB it keys localized data by region and language codes
//! rather than numeric enums, reports the caller's daily allowance inside
//! successful payloads, and signals errors as text bodies on HTTP 200.

use std::sync::Arc;

use async_trait::async_trait;
use romdex_core::{
    Candidate, FieldKind, GameRecord, PlayerBucket, QuotaState, RegionTag, SourceId, platform,
    text,
};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::adapter::SourceAdapter;
use crate::credentials::Credentials;
use crate::error::ScrapeError;
use crate::options::ScrapeOptions;
use crate::transport::{SourceRequest, Transport};

const BASE_URL: &str = "https://api.screenscraper.fr/api2";

/// ScreenScraper rates games on a 0-20 scale.
const NATIVE_RATING_MAX: f32 = 20.0;

/// Minimum spacing between API requests; the service throttles callers
/// that burst.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(1200);

/// Field resolution order for detail payloads. ScreenScraper carries no
/// classification data romdex can map, so `Ages` is absent.
const FETCH_ORDER: &[FieldKind] = &[
    FieldKind::ReleaseDate,
    FieldKind::Rating,
    FieldKind::Publisher,
    FieldKind::Developer,
    FieldKind::Description,
    FieldKind::Players,
    FieldKind::Tags,
    FieldKind::Cover,
    FieldKind::Screenshot,
];

// --- wire types -----------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchBody,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    ssuser: Option<UserQuota>,
    #[serde(default)]
    jeux: Vec<JeuSummary>,
}

#[derive(Debug, Deserialize)]
struct JeuSummary {
    #[serde(default)]
    id: String,
    /// "true" on database entries that are not actually games.
    #[serde(default)]
    notgame: Option<String>,
    #[serde(default)]
    noms: Vec<RegionText>,
    #[serde(default)]
    systeme: Option<IdText>,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    response: DetailBody,
}

#[derive(Debug, Deserialize)]
struct DetailBody {
    #[serde(default)]
    ssuser: Option<UserQuota>,
    #[serde(default)]
    jeu: JeuDetail,
}

#[derive(Debug, Default, Deserialize)]
struct JeuDetail {
    #[serde(default)]
    notgame: Option<String>,
    #[serde(default)]
    synopsis: Vec<LangueText>,
    #[serde(default)]
    dates: Vec<RegionText>,
    #[serde(default)]
    medias: Vec<Media>,
    #[serde(default)]
    editeur: Option<IdText>,
    #[serde(default)]
    developpeur: Option<IdText>,
    #[serde(default)]
    joueurs: Option<IdText>,
    #[serde(default)]
    note: Option<IdText>,
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
struct RegionText {
    #[serde(default)]
    region: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct LangueText {
    #[serde(default)]
    langue: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct IdText {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Media {
    #[serde(default, rename = "type")]
    media_type: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    region: String,
}

#[derive(Debug, Deserialize)]
struct Genre {
    #[serde(default)]
    noms: Vec<LangueText>,
}

/// Daily allowance snapshot embedded in successful payloads.
#[derive(Debug, Deserialize)]
struct UserQuota {
    #[serde(default)]
    requeststoday: Option<String>,
    #[serde(default)]
    maxrequestsperday: Option<String>,
}

impl UserQuota {
    fn requests_today(&self) -> i64 {
        self.requeststoday
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    fn max_requests_per_day(&self) -> i64 {
        self.maxrequestsperday
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(20000)
    }

    fn remaining(&self) -> i64 {
        self.max_requests_per_day() - self.requests_today()
    }
}

// --- body-text signals ----------------------------------------------------
//
// ScreenScraper answers HTTP 200 with French error prose for every
// in-band condition.

fn body_signals_quota(body: &str) -> bool {
    body.contains("Le quota de scrape journalier")
}

fn body_signals_closed(body: &str) -> bool {
    body.contains("API fermé") || body.contains("API closed")
}

fn body_signals_not_found(body: &str) -> bool {
    body.is_empty() || body.contains("Erreur") || body.contains("Jeu non trouvé")
}

// --- extraction helpers ---------------------------------------------------

fn region_text<'a>(entries: &'a [RegionText], priorities: &[RegionTag]) -> Option<&'a str> {
    priorities
        .iter()
        .find_map(|p| entries.iter().find(|e| e.region == p.as_str()))
        .map(|e| e.text.as_str())
}

/// Title cascade: region priorities, then ScreenScraper's own "ss" entry,
/// then whatever is listed first.
fn preferred_name<'a>(entries: &'a [RegionText], priorities: &[RegionTag]) -> Option<&'a str> {
    region_text(entries, priorities)
        .or_else(|| {
            entries
                .iter()
                .find(|e| e.region == "ss")
                .map(|e| e.text.as_str())
        })
        .or_else(|| entries.first().map(|e| e.text.as_str()))
}

/// Language cascade: the preferred language, then English.
fn language_text<'a>(entries: &'a [LangueText], language: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|e| e.langue == language)
        .or_else(|| entries.iter().find(|e| e.langue == "en"))
        .map(|e| e.text.as_str())
}

/// Media cascade: region priorities, then "ss", then first of the type.
fn media_url<'a>(
    medias: &'a [Media],
    media_type: &str,
    priorities: &[RegionTag],
) -> Option<&'a str> {
    let of_type: Vec<&Media> = medias.iter().filter(|m| m.media_type == media_type).collect();
    priorities
        .iter()
        .find_map(|p| of_type.iter().find(|m| m.region == p.as_str()))
        .or_else(|| of_type.iter().find(|m| m.region == "ss"))
        .or_else(|| of_type.first())
        .map(|m| m.url.as_str())
        .filter(|url| !url.is_empty())
}

/// "1" is the single-player bucket; any other non-empty count text
/// ("2", "1-4", "1 à 2") means more than one player fits.
fn bucket_from_player_text(raw: &str) -> Option<PlayerBucket> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw == "1" {
        Some(PlayerBucket::One)
    } else {
        Some(PlayerBucket::Multi)
    }
}

/// A zero score means unrated, not a true zero.
fn normalize_rating(raw: &str) -> Option<f32> {
    let value: f32 = raw.trim().parse().ok()?;
    if value == 0.0 {
        return None;
    }
    Some(value / NATIVE_RATING_MAX)
}

fn join_genres(genres: &[Genre], language: &str) -> String {
    genres
        .iter()
        .filter_map(|g| language_text(&g.noms, language))
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_notgame(flag: &Option<String>) -> bool {
    flag.as_deref() == Some("true")
}

// --- adapter --------------------------------------------------------------

pub struct ScreenScraperAdapter {
    transport: Arc<dyn Transport>,
    quota: Arc<QuotaState>,
    options: ScrapeOptions,
    dev_id: String,
    dev_password: String,
    soft_name: String,
    user: Option<(String, String)>,
    last_request: Mutex<Instant>,
    base_url: String,
}

impl ScreenScraperAdapter {
    pub fn new(
        transport: Arc<dyn Transport>,
        quota: Arc<QuotaState>,
        options: ScrapeOptions,
        credentials: &Credentials,
    ) -> Result<Self, ScrapeError> {
        let dev_id = credentials.ss_dev_id.clone().ok_or_else(|| {
            ScrapeError::Config(
                "Missing ScreenScraper dev_id. Set ROMDEX_SS_DEVID env var or add to config file"
                    .to_string(),
            )
        })?;
        let dev_password = credentials.ss_dev_password.clone().ok_or_else(|| {
            ScrapeError::Config(
                "Missing ScreenScraper dev_password. Set ROMDEX_SS_DEVPASSWORD env var or add to config file"
                    .to_string(),
            )
        })?;
        let user = match (&credentials.ss_user_id, &credentials.ss_user_password) {
            (Some(id), Some(pw)) => Some((id.clone(), pw.clone())),
            _ => None,
        };
        Ok(Self {
            transport,
            quota,
            options,
            dev_id,
            dev_password,
            soft_name: credentials.ss_soft_name.clone(),
            user,
            last_request: Mutex::new(Instant::now() - MIN_REQUEST_INTERVAL),
            base_url: BASE_URL.to_string(),
        })
    }

    fn request(&self, endpoint: &str) -> SourceRequest {
        let mut request = SourceRequest::get(format!("{}/{}", self.base_url, endpoint))
            .param("devid", &self.dev_id)
            .param("devpassword", &self.dev_password)
            .param("softname", &self.soft_name)
            .param("output", "json");
        if let Some((id, pw)) = &self.user {
            request = request.param("ssid", id).param("sspassword", pw);
        }
        request
    }

    /// Wait until at least [`MIN_REQUEST_INTERVAL`] has passed since the
    /// last API request.
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < MIN_REQUEST_INTERVAL {
            tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
        }
        *last = Instant::now();
    }

    fn record_allowance(&self, ssuser: &Option<UserQuota>) {
        if let Some(user) = ssuser {
            self.quota.set_remaining(user.remaining());
        }
    }

    fn resolve_fields(&self, jeu: &JeuDetail, record: &mut GameRecord) {
        let priorities = &self.options.region_priorities;
        let language = &self.options.language;
        for kind in FETCH_ORDER {
            match kind {
                FieldKind::ReleaseDate => {
                    if let Some(date) =
                        region_text(&jeu.dates, priorities).and_then(text::conform_release_date)
                    {
                        record.release_date = Some(date);
                    }
                }
                FieldKind::Rating => {
                    if let Some(rating) =
                        jeu.note.as_ref().and_then(|n| normalize_rating(&n.text))
                    {
                        record.rating = Some(rating);
                    }
                }
                FieldKind::Publisher => {
                    if let Some(editeur) = &jeu.editeur {
                        if !editeur.text.is_empty() {
                            record.publisher = Some(editeur.text.clone());
                        }
                    }
                }
                FieldKind::Developer => {
                    if let Some(developpeur) = &jeu.developpeur {
                        if !developpeur.text.is_empty() {
                            record.developer = Some(developpeur.text.clone());
                        }
                    }
                }
                FieldKind::Description => {
                    if let Some(synopsis) = language_text(&jeu.synopsis, language) {
                        record.description = Some(text::strip_html_tags(synopsis));
                    }
                }
                FieldKind::Players => {
                    if let Some(bucket) = jeu
                        .joueurs
                        .as_ref()
                        .and_then(|j| bucket_from_player_text(&j.text))
                    {
                        record.players = Some(bucket);
                    }
                }
                FieldKind::Tags => {
                    let joined = join_genres(&jeu.genres, language);
                    if !joined.is_empty() {
                        record.tags = Some(joined);
                    }
                }
                FieldKind::Ages => {}
                FieldKind::Cover => {
                    if self.options.fetch_covers {
                        if let Some(url) = media_url(&jeu.medias, "box-2D", priorities) {
                            record.cover_url = Some(url.to_string());
                        }
                    }
                }
                FieldKind::Screenshot => {
                    if self.options.fetch_screenshots {
                        if let Some(url) = media_url(&jeu.medias, "ss", priorities) {
                            record.screenshot_url = Some(url.to_string());
                        }
                    }
                }
            }
        }
    }

    /// Shared degrade path: inspect a raw body for in-band error texts.
    /// Returns `true` when the caller should stop with no data.
    fn body_is_degraded(&self, body_text: &str, context: &str) -> bool {
        if body_signals_quota(body_text) {
            log::error!("screenscraper: daily quota reached, stopping for this session");
            self.quota.exhaust();
            return true;
        }
        if body_signals_closed(body_text) {
            log::warn!("screenscraper: API is temporarily closed ({})", context);
            return true;
        }
        if body_signals_not_found(body_text) {
            log::debug!("screenscraper: nothing found ({})", context);
            return true;
        }
        false
    }
}

#[async_trait]
impl SourceAdapter for ScreenScraperAdapter {
    fn name(&self) -> &'static str {
        "screenscraper"
    }

    async fn search(&self, term: &str, platform_name: &str) -> Result<Vec<Candidate>, ScrapeError> {
        if self.quota.is_exhausted() {
            log::debug!(
                "screenscraper: daily allowance spent, skipping search for '{}'",
                term
            );
            return Ok(Vec::new());
        }

        let request = self.request("jeuRecherche.php").param("recherche", term);
        self.rate_limit().await;
        let body = match self.transport.fetch(&request).await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("screenscraper: search request for '{}' failed: {}", term, e);
                return Ok(Vec::new());
            }
        };

        let body_text = String::from_utf8_lossy(&body);
        if self.body_is_degraded(&body_text, term) {
            return Ok(Vec::new());
        }

        let envelope: SearchEnvelope = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::warn!(
                    "screenscraper: unparseable search response for '{}': {}",
                    term,
                    e
                );
                return Ok(Vec::new());
            }
        };
        self.record_allowance(&envelope.response.ssuser);

        let mut candidates = Vec::new();
        for jeu in &envelope.response.jeux {
            if jeu.id.is_empty() || is_notgame(&jeu.notgame) {
                continue;
            }
            let Some(systeme) = &jeu.systeme else { continue };
            if !platform::names_match(&systeme.text, platform_name) {
                continue;
            }
            let title = preferred_name(&jeu.noms, &self.options.region_priorities)
                .unwrap_or_default()
                .to_string();
            candidates.push(Candidate {
                id: SourceId::new(jeu.id.clone()),
                title,
                platform: systeme.text.clone(),
            });
        }
        Ok(candidates)
    }

    async fn fetch_details(&self, record: &mut GameRecord) -> Result<(), ScrapeError> {
        if record.id.is_empty() {
            log::debug!("screenscraper: detail fetch requested for a record without an id");
            return Ok(());
        }
        if self.quota.is_exhausted() {
            log::debug!(
                "screenscraper: daily allowance spent, skipping details for id {}",
                record.id.primary
            );
            return Ok(());
        }

        let request = self
            .request("jeuInfos.php")
            .param("gameid", &record.id.primary);
        self.rate_limit().await;
        let body = match self.transport.fetch(&request).await {
            Ok(body) => body,
            Err(e) => {
                log::warn!(
                    "screenscraper: detail request for id {} failed: {}",
                    record.id.primary,
                    e
                );
                return Ok(());
            }
        };

        let body_text = String::from_utf8_lossy(&body);
        if self.body_is_degraded(&body_text, &record.id.primary) {
            return Ok(());
        }

        let envelope: DetailEnvelope = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::warn!(
                    "screenscraper: unparseable detail response for id {}: {}",
                    record.id.primary,
                    e
                );
                return Ok(());
            }
        };
        self.record_allowance(&envelope.response.ssuser);

        if is_notgame(&envelope.response.jeu.notgame) {
            log::debug!(
                "screenscraper: id {} is flagged as not a game",
                record.id.primary
            );
            return Ok(());
        }

        self.resolve_fields(&envelope.response.jeu, record);
        Ok(())
    }
}
